use std::fmt;
use std::str::FromStr;

use crate::ast::Type;
use crate::errors::ParamParseError;

/// The flag guard of an optional parameter: `flags.3` in `flags.3?string`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Flag {
    /// Name of the `#` parameter that carries the bit.
    pub name: String,
    /// Bit index, always below 32.
    pub index: u32,
}

/// What a parameter holds on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParameterType {
    /// A `#` flags word.
    Flags,

    /// A typed value, optionally present only when `flag` is set.
    Normal {
        /// The declared type.
        ty: Type,
        /// Guard for optional parameters.
        flag: Option<Flag>,
    },
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flags => write!(f, "#"),
            Self::Normal { ty, flag: Some(flag) } => write!(f, "{}.{}?{ty}", flag.name, flag.index),
            Self::Normal { ty, flag: None } => write!(f, "{ty}"),
        }
    }
}

impl FromStr for ParameterType {
    type Err = ParamParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "#" {
            return Ok(Self::Flags);
        }

        let Some((guard, ty)) = s.split_once('?') else {
            return Ok(Self::Normal { ty: s.parse()?, flag: None });
        };

        let (name, index) = guard.split_once('.').ok_or(ParamParseError::InvalidFlag)?;
        if name.is_empty() || index.is_empty() || ty.contains('?') {
            return Err(ParamParseError::InvalidFlag);
        }
        let index: u32 = index.parse().map_err(|_| ParamParseError::InvalidFlag)?;
        if index >= 32 {
            return Err(ParamParseError::FlagOutOfRange(index));
        }

        Ok(Self::Normal {
            ty: ty.parse()?,
            flag: Some(Flag { name: name.to_owned(), index }),
        })
    }
}

/// One `name:type` parameter of a definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    /// Parameter name as written in the schema.
    pub name: String,
    /// What the parameter holds.
    pub ty: ParameterType,
}

impl Parameter {
    /// `true` for `flags.N?true` parameters, which carry no bytes of their own.
    pub fn is_true_flag(&self) -> bool {
        matches!(&self.ty, ParameterType::Normal { ty, flag: Some(_) } if ty.name == "true")
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.ty)
    }
}

impl FromStr for Parameter {
    type Err = ParamParseError;

    /// Parses `flags:#`, `id:long`, `photo:flags.5?WebDocument` and friends.
    ///
    /// `{X:Type}` yields `Err(ParamParseError::TypeDef)` so the definition
    /// parser can record the generic name.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if let Some(inner) = token.strip_prefix('{') {
            return Err(match inner.strip_suffix(":Type}") {
                Some(name) => ParamParseError::TypeDef { name: name.to_owned() },
                None => ParamParseError::MissingDef,
            });
        }

        let (name, ty) = token.split_once(':').ok_or(ParamParseError::NotImplemented)?;
        if name.is_empty() || ty.is_empty() {
            return Err(ParamParseError::Empty);
        }

        Ok(Self { name: name.to_owned(), ty: ty.parse()? })
    }
}
