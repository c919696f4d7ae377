//! Schema-driven codec for the MTProto TL binary wire format.
//!
//! The schema in `tl/api.tl` is compiled at build time into static
//! descriptor tables. One generic engine walks those tables to serialize,
//! parse and describe every constructor, so there is no per-type code.
//!
//! # Overview
//!
//! | Item                 | Role                                                    |
//! |----------------------|---------------------------------------------------------|
//! | [`Buffer`], [`Cursor`] | Byte sink and bounds-checked reader                   |
//! | [`Serializable`], [`Deserializable`] | Primitive codecs                        |
//! | [`Registry`]         | Signature → descriptor lookup, built once               |
//! | [`Object`], [`Value`] | Decoded values                                         |
//! | [`ObjectBuilder`], [`Call`] | Validated construction of values and requests    |
//! | [`Decoder`]          | Parsing with [`DecodeLimits`]                           |
//!
//! # Encoding and decoding
//!
//! ```
//! use tlwire::{Object, Serializable, Value, decode_boxed};
//!
//! let result = Object::builder("messages.stickerSetInstallResultArchive")
//!     .set("sets", Value::Vector(vec![]))
//!     .build()
//!     .unwrap();
//!
//! let bytes = result.to_bytes();
//! assert_eq!(bytes, [0xa8, 0x10, 0xe4, 0x35, 0x15, 0xc4, 0xb5, 0x1c, 0, 0, 0, 0]);
//!
//! let back = decode_boxed("messages.StickerSetInstallResult", &bytes).unwrap();
//! assert_eq!(back, result);
//! ```
//!
//! # Updating to a new layer
//!
//! 1. Replace `tl/api.tl` with the new schema.
//! 2. Rebuild; the build script regenerates the tables.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod builder;
mod call;
mod codec;
pub mod consts;
mod describe;
mod error;
mod generated;
mod primitives;
mod registry;
pub mod schema;
mod value;

pub use buffer::{Buffer, Cursor};
pub use builder::ObjectBuilder;
pub use call::{Call, CallBuilder};
pub use codec::{DecodeLimits, Decoder, decode_any, decode_boxed};
pub use describe::{FieldEntry, MAX_HEX_BYTES, describe_call_pretty, describe_pretty};
pub use error::{BuildError, Error, Result};
pub use generated::LAYER;
#[cfg(feature = "name-for-id")]
pub use generated::name_for_id;
pub use primitives::{Deserializable, Serializable};
pub use registry::Registry;
pub use value::{Object, Value};
