use std::fmt;
use std::str::FromStr;

use crate::errors::ParamParseError;

/// A type reference such as `User`, `payments.PaymentForm`, `Vector<long>`,
/// `%Peer` or `!X`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Type {
    /// Namespace components (`["payments"]` for `payments.PaymentForm`).
    pub namespace: Vec<String>,

    /// The name without namespace.
    pub name: String,

    /// `true` for bare references: lowercase names (`int`, `vector`,
    /// `labeledPrice`) and `%`-prefixed boxed names.
    pub bare: bool,

    /// `true` for a generic parameter reference (`!X`).
    pub generic_ref: bool,

    /// The argument of `Vector<…>` / `vector<…>`.
    pub generic_arg: Option<Box<Type>>,
}

impl Type {
    /// `namespace.name`, without generic arguments.
    pub fn full_name(&self) -> String {
        let mut s = String::new();
        for ns in &self.namespace {
            s.push_str(ns);
            s.push('.');
        }
        s.push_str(&self.name);
        s
    }

    /// Pushes every generic name referenced by this type onto `out`.
    pub(crate) fn collect_generic_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
        if self.generic_ref {
            out.push(&self.name);
        }
        if let Some(arg) = &self.generic_arg {
            arg.collect_generic_refs(out);
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generic_ref {
            write!(f, "!")?;
        }
        // A bare reference to an uppercase name was written with `%`.
        if self.bare && self.name.starts_with(|c: char| c.is_ascii_uppercase()) {
            write!(f, "%")?;
        }
        write!(f, "{}", self.full_name())?;
        if let Some(arg) = &self.generic_arg {
            write!(f, "<{arg}>")?;
        }
        Ok(())
    }
}

impl FromStr for Type {
    type Err = ParamParseError;

    /// ```
    /// use tlwire_parser::Type;
    /// let ty: Type = "Vector<payments.SavedInfo>".parse().unwrap();
    /// assert_eq!(ty.name, "Vector");
    /// assert_eq!(ty.generic_arg.unwrap().namespace, ["payments"]);
    /// assert!("%Peer".parse::<Type>().unwrap().bare);
    /// ```
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (raw, generic_ref) = match raw.strip_prefix('!') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        let (raw, forced_bare) = match raw.strip_prefix('%') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };

        let (name_part, generic_arg) = match raw.split_once('<') {
            Some((name, rest)) => {
                let arg = rest.strip_suffix('>').ok_or(ParamParseError::InvalidGeneric)?;
                (name, Some(Box::new(arg.parse::<Type>()?)))
            }
            None => (raw, None),
        };

        let (namespace, name) = match name_part.rsplit_once('.') {
            Some((ns, name)) => (ns.split('.').map(str::to_owned).collect::<Vec<_>>(), name),
            None => (Vec::new(), name_part),
        };

        if name.is_empty() || namespace.iter().any(String::is_empty) {
            return Err(ParamParseError::Empty);
        }

        let bare = forced_bare || name.starts_with(|c: char| c.is_ascii_lowercase());

        Ok(Self {
            namespace,
            name: name.to_owned(),
            bare,
            generic_ref,
            generic_arg,
        })
    }
}
