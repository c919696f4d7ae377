//! Wire constants shared by every encoder and decoder.

/// Signature of the boxed `Vector<T>` wrapper.
pub const VECTOR_ID: u32 = 0x1cb5c415;

/// `boolTrue#997275b5 = Bool`.
pub const BOOL_TRUE_ID: u32 = 0x997275b5;

/// `boolFalse#bc799737 = Bool`.
pub const BOOL_FALSE_ID: u32 = 0xbc799737;

/// First byte of a string whose length needs the 3-byte form.
pub const LONG_STRING_MARKER: u8 = 0xfe;

/// Longest string that fits the 1-byte length prefix.
pub const MAX_SHORT_STRING_LEN: usize = 253;

/// Longest string the 3-byte length prefix can carry.
pub const MAX_STRING_LEN: usize = (1 << 24) - 1;

/// Everything on the wire is aligned to this many bytes.
pub const ALIGNMENT: usize = 4;

/// Default nesting limit for [`DecodeLimits`](crate::DecodeLimits).
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default element-count limit for [`DecodeLimits`](crate::DecodeLimits).
pub const DEFAULT_MAX_VECTOR_LEN: usize = 1_000_000;
