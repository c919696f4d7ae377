//! Decode and build errors.

use std::fmt;

use crate::schema::FieldType;

// ─── Error ───────────────────────────────────────────────────────────────────

/// Errors that can occur while decoding.
///
/// Every failure is local to one decode call and leaves no partial value
/// behind; the caller decides whether it is fatal.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Ran out of bytes before the value was fully read.
    UnexpectedEof,
    /// Read a signature that is not a variant of the expected type.
    UnexpectedConstructor {
        /// The signature that was read.
        id: u32,
        /// The abstract type being decoded, `None` for global dispatch.
        expected: Option<String>,
    },
    /// A boxed vector did not start with the vector marker.
    BadVectorHeader {
        /// The word found where the marker should be.
        id: u32,
    },
    /// A vector declared a negative element count.
    NegativeLength {
        /// The declared count.
        len: i32,
    },
    /// A vector declared more elements than the decode limits allow.
    VectorTooLong {
        /// The declared count.
        len: usize,
    },
    /// A `string` field held bytes that are not UTF-8.
    InvalidUtf8,
    /// Nesting went deeper than the decode limits allow.
    DepthExceeded {
        /// The configured limit.
        limit: usize,
    },
    /// A required field had no value after all fields were read.
    MissingField {
        /// Constructor or function name.
        constructor: &'static str,
        /// Field name.
        field: &'static str,
    },
    /// A flag-gated field disagreed with its flags word.
    FlagMismatch {
        /// Constructor or function name.
        constructor: &'static str,
        /// Field name.
        field: &'static str,
    },
    /// The requested type or constructor name is not in the registry.
    UnknownType {
        /// The name that was looked up.
        name: String,
    },
    /// A strict decode finished with input left over.
    TrailingBytes {
        /// Number of unread bytes.
        count: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of buffer"),
            Self::UnexpectedConstructor { id, expected: Some(ty) } => {
                write!(f, "unexpected constructor id {id:#010x} for type {ty}")
            }
            Self::UnexpectedConstructor { id, expected: None } => {
                write!(f, "unknown constructor id {id:#010x}")
            }
            Self::BadVectorHeader { id } => {
                write!(f, "expected vector marker, found {id:#010x}")
            }
            Self::NegativeLength { len } => write!(f, "negative vector length {len}"),
            Self::VectorTooLong { len } => write!(f, "vector of {len} elements exceeds limit"),
            Self::InvalidUtf8 => write!(f, "string is not valid UTF-8"),
            Self::DepthExceeded { limit } => write!(f, "nesting deeper than {limit}"),
            Self::MissingField { constructor, field } => {
                write!(f, "{constructor}: missing required field {field}")
            }
            Self::FlagMismatch { constructor, field } => {
                write!(f, "{constructor}: field {field} disagrees with its flags")
            }
            Self::UnknownType { name } => write!(f, "unknown type {name}"),
            Self::TrailingBytes { count } => write!(f, "{count} trailing bytes after value"),
        }
    }
}

impl std::error::Error for Error {}

/// Specialized `Result` for decoding.
pub type Result<T> = std::result::Result<T, Error>;

// ─── BuildError ──────────────────────────────────────────────────────────────

/// Errors reported when constructing an [`Object`](crate::Object) or
/// [`Call`](crate::Call) that could not be encoded faithfully.
#[derive(Clone, Debug, PartialEq)]
pub enum BuildError {
    /// No constructor or function has this name.
    UnknownConstructor {
        /// The name that was looked up.
        name: String,
    },
    /// The constructor has no such field, or it is a flags word.
    UnknownField {
        /// Constructor or function name.
        constructor: &'static str,
        /// The name that was passed.
        field: String,
    },
    /// The value does not fit the field's declared type.
    TypeMismatch {
        /// Constructor or function name.
        constructor: &'static str,
        /// Field name.
        field: &'static str,
        /// The declared type.
        expected: FieldType,
    },
    /// A required field was never set.
    MissingField {
        /// Constructor or function name.
        constructor: &'static str,
        /// Field name.
        field: &'static str,
    },
    /// Fields sharing one flag bit disagree on presence.
    FlagConflict {
        /// Constructor or function name.
        constructor: &'static str,
        /// The first field that disagreed.
        field: &'static str,
    },
    /// A string or byte field is too long for the length prefix.
    TooLong {
        /// Constructor or function name.
        constructor: &'static str,
        /// Field name.
        field: &'static str,
        /// The offending length.
        len: usize,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownConstructor { name } => write!(f, "unknown constructor {name}"),
            Self::UnknownField { constructor, field } => {
                write!(f, "{constructor} has no field {field}")
            }
            Self::TypeMismatch { constructor, field, expected } => {
                write!(f, "{constructor}.{field} expects {expected}")
            }
            Self::MissingField { constructor, field } => {
                write!(f, "{constructor}.{field} is required")
            }
            Self::FlagConflict { constructor, field } => {
                write!(f, "{constructor}.{field} shares a flag bit with a field of different presence")
            }
            Self::TooLong { constructor, field, len } => {
                write!(f, "{constructor}.{field}: {len} bytes do not fit a length prefix")
            }
        }
    }
}

impl std::error::Error for BuildError {}
