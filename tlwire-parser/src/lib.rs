//! Parser for [Type Language] (TL) schema files.
//!
//! Turns raw `.tl` text into a list of [`Definition`]s. The build script of
//! `tlwire` feeds these to `tlwire-gen`, which emits the static descriptor
//! tables the runtime codec walks.
//!
//! # Quick start
//!
//! ```rust
//! use tlwire_parser::parse_tl_file;
//!
//! let src = "payments.exportedInvoice#aed0cbd9 url:string = payments.ExportedInvoice;";
//! let def = parse_tl_file(src).next().unwrap().unwrap();
//! assert_eq!(def.full_name(), "payments.exportedInvoice");
//! assert_eq!(def.id, 0xaed0cbd9);
//! ```
//!
//! [Type Language]: https://core.telegram.org/mtproto/TL

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;
mod crc;
/// Parse error types for TL schema parsing.
pub mod errors;
mod iterator;

pub use ast::{Category, Definition, Flag, Parameter, ParameterType, Type};
pub use crc::derive_id;
pub use errors::{ParamParseError, ParseError};

/// Parses a complete TL schema, yielding [`Definition`]s in source order.
///
/// `//` comment lines and blank lines are skipped. `---functions---` and
/// `---types---` switch the [`Category`] assigned to the definitions that
/// follow. A definition may span several lines; it ends at `;`.
///
/// Each item is a `Result` so the caller decides whether a bad line is fatal.
pub fn parse_tl_file(contents: &str) -> impl Iterator<Item = Result<Definition, ParseError>> + '_ {
    iterator::TlIterator::new(contents)
}

/// Reads the `// LAYER N` header from the first line of a schema, if present.
pub fn parse_layer(contents: &str) -> Option<i32> {
    contents
        .lines()
        .next()?
        .trim()
        .strip_prefix("// LAYER ")?
        .trim()
        .parse()
        .ok()
}
