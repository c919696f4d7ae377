use std::fmt;
use std::str::FromStr;

use crate::ast::{Parameter, ParameterType, Type};
use crate::crc::derive_id;
use crate::errors::{ParamParseError, ParseError};

/// Which section of the schema a definition came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Data constructors (before `---functions---`).
    Types,
    /// RPC functions (after `---functions---`).
    Functions,
}

/// One TL definition: a constructor or a function.
///
/// ```text
/// payments.savedInfo#fb8fe43c flags:# saved_info:flags.0?PaymentRequestedInfo = payments.SavedInfo;
/// ```
/// has `namespace = ["payments"]`, `name = "savedInfo"`, `id = 0xfb8fe43c`,
/// two params and `ty = payments.SavedInfo`.
#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    /// Namespace components, empty for the global namespace.
    pub namespace: Vec<String>,

    /// Constructor or function name without namespace.
    pub name: String,

    /// The explicit `#id`, or the derived one when absent.
    pub id: u32,

    /// Parameters in wire order.
    pub params: Vec<Parameter>,

    /// The (boxed) type this constructor builds, or the function result type.
    pub ty: Type,

    /// Constructor or function.
    pub category: Category,
}

impl Definition {
    /// `namespace.name`.
    pub fn full_name(&self) -> String {
        let cap = self.namespace.iter().map(|ns| ns.len() + 1).sum::<usize>() + self.name.len();
        let mut s = String::with_capacity(cap);
        for ns in &self.namespace {
            s.push_str(ns);
            s.push('.');
        }
        s.push_str(&self.name);
        s
    }

    /// `true` when any parameter or the result is a `!X` generic reference.
    pub fn is_generic(&self) -> bool {
        self.ty.generic_ref
            || self.params.iter().any(|p| {
                matches!(&p.ty, ParameterType::Normal { ty, .. } if has_generic_ref(ty))
            })
    }
}

fn has_generic_ref(ty: &Type) -> bool {
    ty.generic_ref || ty.generic_arg.as_deref().is_some_and(has_generic_ref)
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{:x}", self.full_name(), self.id)?;

        let mut generics: Vec<&str> = Vec::new();
        for p in &self.params {
            if let ParameterType::Normal { ty, .. } = &p.ty {
                ty.collect_generic_refs(&mut generics);
            }
        }
        generics.sort_unstable();
        generics.dedup();
        for g in generics {
            write!(f, " {{{g}:Type}}")?;
        }

        for p in &self.params {
            write!(f, " {p}")?;
        }
        write!(f, " = {}", self.ty)
    }
}

impl FromStr for Definition {
    type Err = ParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim().trim_end_matches(';').trim();
        if raw.is_empty() {
            return Err(ParseError::Empty);
        }

        let (lhs, ty_str) = raw.split_once('=').ok_or(ParseError::MissingType)?;
        let ty_str = ty_str.trim();
        if ty_str.is_empty() {
            return Err(ParseError::MissingType);
        }
        let mut ty: Type = ty_str.parse().map_err(|_| ParseError::MissingType)?;

        let lhs = lhs.trim();
        let (head, rest) = lhs
            .split_once(char::is_whitespace)
            .map_or((lhs, ""), |(h, r)| (h, r.trim_start()));

        let (full_name, explicit_id) = match head.split_once('#') {
            Some((name, id)) => (name, Some(id)),
            None => (head, None),
        };

        let (namespace, name) = match full_name.rsplit_once('.') {
            Some((ns, name)) => (ns.split('.').map(str::to_owned).collect::<Vec<_>>(), name),
            None => (Vec::new(), full_name),
        };
        if name.is_empty() || namespace.iter().any(String::is_empty) {
            return Err(ParseError::MissingName);
        }

        let id = match explicit_id {
            Some(hex) => u32::from_str_radix(hex.trim(), 16).map_err(ParseError::InvalidId)?,
            None => derive_id(raw),
        };

        let mut generic_names: Vec<String> = Vec::new();
        let mut flag_names: Vec<&str> = Vec::new();
        let mut params = Vec::new();

        for token in rest.split_whitespace() {
            let param = match token.parse::<Parameter>() {
                Ok(param) => param,
                Err(ParamParseError::TypeDef { name }) => {
                    generic_names.push(name);
                    continue;
                }
                Err(ParamParseError::NotImplemented) => return Err(ParseError::NotImplemented),
                Err(e) => return Err(ParseError::InvalidParam(e)),
            };

            match &param.ty {
                ParameterType::Flags => flag_names.push(token.split(':').next().unwrap_or_default()),
                ParameterType::Normal { ty, flag } => {
                    // Flags must be declared before the parameters they guard.
                    if let Some(flag) = flag {
                        if !flag_names.contains(&flag.name.as_str()) {
                            return Err(ParseError::InvalidParam(ParamParseError::MissingDef));
                        }
                    }
                    if ty.generic_ref && !generic_names.contains(&ty.name) {
                        return Err(ParseError::InvalidParam(ParamParseError::MissingDef));
                    }
                }
            }
            params.push(param);
        }

        if generic_names.contains(&ty.name) {
            ty.generic_ref = true;
        }

        Ok(Definition {
            namespace,
            name: name.to_owned(),
            id,
            params,
            ty,
            // The iterator sets the real category.
            category: Category::Types,
        })
    }
}
