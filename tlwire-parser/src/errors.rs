use std::fmt;
use std::num::ParseIntError;

/// Errors produced while parsing a single `name:type` token.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamParseError {
    /// An empty name or type where one was required.
    Empty,
    /// A `{X:Type}` generic declaration. Not a failure: the definition parser
    /// uses it to collect generic names.
    TypeDef {
        /// The declared generic name (`X` in `{X:Type}`).
        name: String,
    },
    /// A `{…}` block that is not a generic declaration, or a reference to an
    /// undeclared generic or flags field.
    MissingDef,
    /// A malformed `name.N?Type` flag expression.
    InvalidFlag,
    /// A flag bit outside `0..32`.
    FlagOutOfRange(u32),
    /// An unclosed `<` in a generic argument.
    InvalidGeneric,
    /// A token without `:type`.
    NotImplemented,
}

impl fmt::Display for ParamParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty token"),
            Self::TypeDef { name } => write!(f, "generic type declaration: {name}"),
            Self::MissingDef => write!(f, "reference to an undeclared generic or flags field"),
            Self::InvalidFlag => write!(f, "malformed flag expression"),
            Self::FlagOutOfRange(bit) => write!(f, "flag bit {bit} does not fit in 32 bits"),
            Self::InvalidGeneric => write!(f, "unclosed `<` in generic argument"),
            Self::NotImplemented => write!(f, "parameter without `:type`"),
        }
    }
}

impl std::error::Error for ParamParseError {}

/// Errors produced while parsing one complete definition.
#[derive(Debug, PartialEq)]
pub enum ParseError {
    /// Blank definition.
    Empty,
    /// No `= Type` part.
    MissingType,
    /// Missing name, or an empty namespace component.
    MissingName,
    /// The `#id` was not valid hexadecimal.
    InvalidId(ParseIntError),
    /// One of the parameters failed to parse.
    InvalidParam(ParamParseError),
    /// Syntax outside the supported TL subset.
    NotImplemented,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty definition"),
            Self::MissingType => write!(f, "missing `= Type`"),
            Self::MissingName => write!(f, "missing or malformed name"),
            Self::InvalidId(e) => write!(f, "invalid constructor id: {e}"),
            Self::InvalidParam(e) => write!(f, "invalid parameter: {e}"),
            Self::NotImplemented => write!(f, "unsupported TL syntax"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidId(e) => Some(e),
            Self::InvalidParam(e) => Some(e),
            _ => None,
        }
    }
}
