//! Descriptor tables generated from `tl/api.tl` by the build script.

include!(concat!(env!("OUT_DIR"), "/generated_schema.rs"));
