//! The [`Serializable`] and [`Deserializable`] traits and their
//! implementations for primitive TL types.
//!
//! Encoding follows the [MTProto Binary Serialization] rules.
//!
//! [MTProto Binary Serialization]: https://core.telegram.org/mtproto/serialize

use crate::buffer::Cursor;
use crate::consts::{
    ALIGNMENT, BOOL_FALSE_ID, BOOL_TRUE_ID, LONG_STRING_MARKER, MAX_SHORT_STRING_LEN,
};
use crate::error::{Error, Result};

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Serialize `self` into TL binary format.
pub trait Serializable {
    /// Appends the serialized form of `self` to `buf`.
    fn serialize(&self, buf: &mut impl Extend<u8>);

    /// Convenience: allocate a fresh `Vec<u8>` and serialize into it.
    fn to_bytes(&self) -> Vec<u8> {
        let mut v = Vec::new();
        self.serialize(&mut v);
        v
    }
}

/// Deserialize a value from TL binary format.
pub trait Deserializable: Sized {
    /// Reads `Self` from `buf`, advancing its position.
    fn deserialize(buf: &mut Cursor<'_>) -> Result<Self>;

    /// Convenience: deserialize from a byte slice, ignoring trailing bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::deserialize(&mut Cursor::from_slice(bytes))
    }
}

/// Zero bytes needed after `len` bytes to reach the next word boundary.
pub(crate) fn padding(len: usize) -> usize {
    (ALIGNMENT - len % ALIGNMENT) % ALIGNMENT
}

// ─── bool ────────────────────────────────────────────────────────────────────

/// `true`  → `boolTrue#997275b5`
/// `false` → `boolFalse#bc799737`
impl Serializable for bool {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        let id = if *self { BOOL_TRUE_ID } else { BOOL_FALSE_ID };
        id.serialize(buf);
    }
}

impl Deserializable for bool {
    fn deserialize(buf: &mut Cursor<'_>) -> Result<Self> {
        match buf.read_u32()? {
            BOOL_TRUE_ID => Ok(true),
            BOOL_FALSE_ID => Ok(false),
            id => Err(Error::UnexpectedConstructor { id, expected: Some("Bool".to_owned()) }),
        }
    }
}

// ─── integers ────────────────────────────────────────────────────────────────

macro_rules! fixed_width {
    ($($ty:ty => $read:ident),* $(,)?) => {$(
        impl Serializable for $ty {
            fn serialize(&self, buf: &mut impl Extend<u8>) {
                buf.extend(self.to_le_bytes());
            }
        }

        impl Deserializable for $ty {
            fn deserialize(buf: &mut Cursor<'_>) -> Result<Self> {
                buf.$read()
            }
        }
    )*};
}

fixed_width!(i32 => read_i32, u32 => read_u32, i64 => read_i64, f64 => read_f64);

impl<const N: usize> Serializable for [u8; N] {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        buf.extend(self.iter().copied());
    }
}

impl<const N: usize> Deserializable for [u8; N] {
    fn deserialize(buf: &mut Cursor<'_>) -> Result<Self> {
        let mut b = [0u8; N];
        buf.read_exact(&mut b)?;
        Ok(b)
    }
}

// ─── strings / bytes ─────────────────────────────────────────────────────────

/// TL string encoding: a length-prefixed, 4-byte aligned byte string.
///
/// * If `len ≤ 253`: `[len as u8][data][0-padding to align to 4 bytes]`
/// * If `len ≥ 254`: `[0xfe][len as 3 LE bytes][data][0-padding]`
///
/// Lengths past 2^24 - 1 do not fit; the object builder rejects them before
/// they reach this point.
impl Serializable for [u8] {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        let len = self.len();
        let header_len = if len <= MAX_SHORT_STRING_LEN {
            buf.extend([len as u8]);
            1
        } else {
            let [a, b, c, _] = (len as u32).to_le_bytes();
            buf.extend([LONG_STRING_MARKER, a, b, c]);
            4
        };

        buf.extend(self.iter().copied());
        buf.extend(std::iter::repeat_n(0u8, padding(header_len + len)));
    }
}

impl Serializable for Vec<u8> {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.as_slice().serialize(buf);
    }
}

impl Serializable for str {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.as_bytes().serialize(buf);
    }
}

impl Serializable for String {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.as_bytes().serialize(buf);
    }
}

/// Reads a length-prefixed byte string, borrowing from the input.
pub(crate) fn read_byte_string<'a>(buf: &mut Cursor<'a>) -> Result<&'a [u8]> {
    let first = buf.read_byte()?;
    let (len, header_len) = if first != LONG_STRING_MARKER {
        (first as usize, 1)
    } else {
        let [a, b, c] = <[u8; 3]>::deserialize(buf)?;
        (u32::from_le_bytes([a, b, c, 0]) as usize, 4)
    };

    let data = buf.read_bytes(len)?;
    buf.read_bytes(padding(header_len + len))?;
    Ok(data)
}

impl Deserializable for Vec<u8> {
    fn deserialize(buf: &mut Cursor<'_>) -> Result<Self> {
        read_byte_string(buf).map(<[u8]>::to_vec)
    }
}

impl Deserializable for String {
    fn deserialize(buf: &mut Cursor<'_>) -> Result<Self> {
        let bytes = read_byte_string(buf)?;
        std::str::from_utf8(bytes).map(str::to_owned).map_err(|_| Error::InvalidUtf8)
    }
}
