//! Build-time generator that turns a parsed TL schema into the static
//! descriptor tables consumed by the `tlwire` runtime.
//!
//! Nothing here knows about individual constructors: every definition
//! becomes one row of data (id, name, ordered fields with their flag bits),
//! and a single generic engine in `tlwire` serializes and parses all of them.
//!
//! # Usage
//!
//! ```no_run
//! // build.rs
//! use tlwire_gen::{Config, Outputs, generate};
//! use tlwire_parser::parse_tl_file;
//! use std::fs;
//!
//! fn main() {
//!     let schema = fs::read_to_string("tl/api.tl").unwrap();
//!     let defs: Vec<_> = parse_tl_file(&schema).filter_map(Result::ok).collect();
//!
//!     let out = std::env::var("OUT_DIR").unwrap();
//!     let mut outputs = Outputs::from_dir(&out).unwrap();
//!     let report = generate(&defs, &Config::default(), &mut outputs).unwrap();
//!     for warning in report.warnings {
//!         println!("cargo:warning={warning}");
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod codegen;
mod grouper;
mod metadata;
mod namegen;

pub use codegen::{Config, Outputs, Report, generate};
