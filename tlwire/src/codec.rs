//! The generic engine: one serializer and one parser for every constructor,
//! driven by the descriptor tables.

use crate::buffer::Cursor;
use crate::builder::{Incomplete, IncompleteKind, assemble};
use crate::consts::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_VECTOR_LEN, VECTOR_ID};
use crate::error::{Error, Result};
use crate::primitives::{Deserializable, Serializable, read_byte_string};
use crate::registry::Registry;
use crate::schema::{FieldDescriptor, FieldKind, FieldType, VariantDescriptor};
use crate::value::{Object, Value, flags_word, slot_present, unmodelled_slot};

// ─── Encoding ────────────────────────────────────────────────────────────────

/// Writes `slots` in declared order. Flags words are computed from presence
/// plus any kept unmodelled bits; absent optionals and `true` flags write
/// nothing.
pub(crate) fn write_fields(
    fields: &[FieldDescriptor],
    slots: &[Option<Value>],
    buf: &mut impl Extend<u8>,
) {
    for (i, (field, slot)) in fields.iter().zip(slots).enumerate() {
        match &field.kind {
            FieldKind::Flags => flags_word(fields, slots, i).serialize(buf),
            FieldKind::Value { ty: FieldType::True, .. } => {}
            FieldKind::Value { ty, flag } => {
                if flag.is_some() && !slot_present(field, slot.as_ref()) {
                    continue;
                }
                if let Some(value) = slot {
                    write_value(value, ty, buf);
                }
            }
        }
    }
}

/// Writes `value` as `ty`. `ty` only decides boxing; the value decides
/// the encoding.
pub(crate) fn write_value(value: &Value, ty: &FieldType, buf: &mut impl Extend<u8>) {
    match value {
        Value::Int(v) => v.serialize(buf),
        Value::Long(v) => v.serialize(buf),
        Value::Double(v) => v.serialize(buf),
        Value::Bool(v) => v.serialize(buf),
        Value::String(s) => s.serialize(buf),
        Value::Bytes(b) => b.serialize(buf),
        Value::Int128(b) => b.serialize(buf),
        Value::Int256(b) => b.serialize(buf),
        Value::Vector(items) => {
            let inner = match ty {
                FieldType::Vector(inner) => {
                    VECTOR_ID.serialize(buf);
                    inner
                }
                FieldType::BareVector(inner) => inner,
                other => other,
            };
            (items.len() as i32).serialize(buf);
            for item in items {
                write_value(item, inner, buf);
            }
        }
        Value::Object(o) if matches!(ty, FieldType::Bare(_)) => o.serialize_bare(buf),
        Value::Object(o) => o.serialize(buf),
    }
}

/// Boxed: signature, then fields.
impl Serializable for Object {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.variant.id.serialize(buf);
        self.serialize_bare(buf);
    }
}

impl Object {
    /// Writes the fields without the signature.
    pub fn serialize_bare(&self, buf: &mut impl Extend<u8>) {
        write_fields(self.variant.fields, &self.slots, buf);
    }

    /// The bare encoding as a fresh `Vec<u8>`.
    pub fn to_bytes_bare(&self) -> Vec<u8> {
        let mut v = Vec::new();
        self.serialize_bare(&mut v);
        v
    }
}

// ─── DecodeLimits ────────────────────────────────────────────────────────────

/// Bounds applied while decoding untrusted input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Deepest allowed nesting of objects and vectors.
    pub max_depth: usize,
    /// Largest allowed vector element count.
    pub max_vector_len: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH, max_vector_len: DEFAULT_MAX_VECTOR_LEN }
    }
}

// ─── Decoder ─────────────────────────────────────────────────────────────────

/// Reads values from a byte slice according to a [`Registry`].
///
/// Any failure aborts the whole read; nothing partially decoded escapes.
#[derive(Debug)]
pub struct Decoder<'r, 'b> {
    cursor: Cursor<'b>,
    registry: &'r Registry,
    limits: DecodeLimits,
    depth: usize,
}

impl<'b> Decoder<'static, 'b> {
    /// A decoder over `bytes` using the global registry and default limits.
    pub fn new(bytes: &'b [u8]) -> Self {
        Self::with_registry(Registry::global(), bytes)
    }
}

impl<'r, 'b> Decoder<'r, 'b> {
    /// A decoder over `bytes` using `registry`.
    pub fn with_registry(registry: &'r Registry, bytes: &'b [u8]) -> Self {
        Self { cursor: Cursor::from_slice(bytes), registry, limits: DecodeLimits::default(), depth: 0 }
    }

    /// Replaces the decode limits.
    pub fn limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The registry this decoder resolves signatures in.
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Current byte offset.
    pub fn pos(&self) -> usize {
        self.cursor.pos()
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// Fails with [`Error::TrailingBytes`] unless all input was consumed.
    pub fn finish(&self) -> Result<()> {
        match self.cursor.remaining() {
            0 => Ok(()),
            count => Err(Error::TrailingBytes { count }),
        }
    }

    /// Reads a 4-byte signature.
    pub fn read_id(&mut self) -> Result<u32> {
        self.cursor.read_u32()
    }

    /// Peeks the next signature without consuming it.
    pub fn peek_id(&self) -> Result<u32> {
        self.cursor.peek_u32()
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.limits.max_depth {
            return Err(Error::DepthExceeded { limit: self.limits.max_depth });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Reads a signature and the fields of the variant of `type_name` it
    /// names.
    pub fn read_boxed(&mut self, type_name: &str) -> Result<Object> {
        if !self.registry.has_type(type_name) {
            return Err(Error::UnknownType { name: type_name.to_owned() });
        }
        let id = self.cursor.read_u32()?;
        let variant = self.registry.resolve(type_name, id)?;
        self.read_bare(variant)
    }

    /// Reads a signature and the fields of whichever constructor it names.
    pub fn read_any(&mut self) -> Result<Object> {
        let id = self.cursor.read_u32()?;
        let variant = self
            .registry
            .constructor(id)
            .ok_or(Error::UnexpectedConstructor { id, expected: None })?;
        self.read_bare(variant)
    }

    /// Reads the fields of `variant`; no signature.
    pub fn read_bare(&mut self, variant: &'static VariantDescriptor) -> Result<Object> {
        let slots = self.read_fields(variant.name, variant.fields)?;
        Ok(Object { variant, slots })
    }

    /// Reads `fields` into slots and assembles them.
    pub(crate) fn read_fields(
        &mut self,
        owner: &'static str,
        fields: &'static [FieldDescriptor],
    ) -> Result<Vec<Option<Value>>> {
        self.enter()?;
        let slots = self.read_slots(owner, fields);
        self.leave();

        assemble(fields, slots?).map_err(|Incomplete { field, kind }| match kind {
            IncompleteKind::MissingField => Error::MissingField { constructor: owner, field },
            IncompleteKind::FlagConflict => Error::FlagMismatch { constructor: owner, field },
        })
    }

    fn read_slots(
        &mut self,
        owner: &'static str,
        fields: &'static [FieldDescriptor],
    ) -> Result<Vec<Option<Value>>> {
        let mut words: Vec<Option<u32>> = vec![None; fields.len()];
        let mut slots = Vec::with_capacity(fields.len());

        for (i, field) in fields.iter().enumerate() {
            let slot = match &field.kind {
                FieldKind::Flags => {
                    let word = self.cursor.read_u32()?;
                    words[i] = Some(word);
                    unmodelled_slot(fields, i, word)
                }
                FieldKind::Value { ty, flag: None } => Some(self.read_value(ty)?),
                FieldKind::Value { ty, flag: Some(flag) } => {
                    let word = words
                        .get(flag.field)
                        .copied()
                        .flatten()
                        .ok_or(Error::FlagMismatch { constructor: owner, field: field.name })?;
                    let set = word & flag.mask() != 0;
                    match ty {
                        FieldType::True => Some(Value::Bool(set)),
                        _ if set => Some(self.read_value(ty)?),
                        _ => None,
                    }
                }
            };
            slots.push(slot);
        }
        Ok(slots)
    }

    /// Reads one value of type `ty`.
    pub fn read_value(&mut self, ty: &FieldType) -> Result<Value> {
        Ok(match ty {
            FieldType::Int => Value::Int(self.cursor.read_i32()?),
            FieldType::Long => Value::Long(self.cursor.read_i64()?),
            FieldType::Double => Value::Double(self.cursor.read_f64()?),
            FieldType::Bool => Value::Bool(bool::deserialize(&mut self.cursor)?),
            FieldType::True => Value::Bool(true),
            FieldType::String => Value::String(String::deserialize(&mut self.cursor)?),
            FieldType::Bytes => Value::Bytes(read_byte_string(&mut self.cursor)?.to_vec()),
            FieldType::Int128 => Value::Int128(<[u8; 16]>::deserialize(&mut self.cursor)?),
            FieldType::Int256 => Value::Int256(<[u8; 32]>::deserialize(&mut self.cursor)?),
            FieldType::Vector(inner) => {
                let id = self.cursor.read_u32()?;
                if id != VECTOR_ID {
                    return Err(Error::BadVectorHeader { id });
                }
                Value::Vector(self.read_elements(inner)?)
            }
            FieldType::BareVector(inner) => Value::Vector(self.read_elements(inner)?),
            FieldType::Boxed(name) => Value::Object(self.read_boxed(name)?),
            FieldType::Bare(name) => {
                let variant = self
                    .registry
                    .bare_variant(name)
                    .ok_or_else(|| Error::UnknownType { name: (*name).to_owned() })?;
                Value::Object(self.read_bare(variant)?)
            }
        })
    }

    fn read_elements(&mut self, ty: &FieldType) -> Result<Vec<Value>> {
        let len = self.cursor.read_i32()?;
        let count = usize::try_from(len).map_err(|_| Error::NegativeLength { len })?;
        if count > self.limits.max_vector_len {
            return Err(Error::VectorTooLong { len: count });
        }
        if count.saturating_mul(ty.min_wire_size()) > self.cursor.remaining() {
            return Err(Error::UnexpectedEof);
        }

        self.enter()?;
        let items: Result<Vec<Value>> = (0..count).map(|_| self.read_value(ty)).collect();
        self.leave();
        items
    }
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Decodes exactly one boxed value of `type_name` from `bytes` using the
/// global registry. Leftover input is an error.
pub fn decode_boxed(type_name: &str, bytes: &[u8]) -> Result<Object> {
    strict(bytes, |d| d.read_boxed(type_name))
}

/// Decodes exactly one boxed value of any type from `bytes` using the global
/// registry. Leftover input is an error.
pub fn decode_any(bytes: &[u8]) -> Result<Object> {
    strict(bytes, Decoder::read_any)
}

fn strict<'b, T>(
    bytes: &'b [u8],
    read: impl FnOnce(&mut Decoder<'static, 'b>) -> Result<T>,
) -> Result<T> {
    let mut decoder = Decoder::new(bytes);
    let result = read(&mut decoder).and_then(|value| decoder.finish().map(|()| value));
    if let Err(e) = &result {
        log::trace!("[tlwire] decode failed at byte {} of {}: {e}", decoder.pos(), bytes.len());
    }
    result
}
