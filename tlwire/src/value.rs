//! Decoded values.
//!
//! A [`Value`] is one field's content; an [`Object`] is one constructor with
//! a slot per field. Objects are created through [`ObjectBuilder`] or by the
//! decoder and are immutable afterwards.
//!
//! [`ObjectBuilder`]: crate::ObjectBuilder

use std::fmt;

use crate::registry::Registry;
use crate::schema::{FieldDescriptor, FieldKind, FieldType, VariantDescriptor, field_index};

/// The content of one field.
///
/// Equality is wire equality: doubles compare by bit pattern, so a decoded
/// `NaN` equals itself and `0.0` differs from `-0.0`.
#[derive(Clone, Debug)]
pub enum Value {
    /// `int`
    Int(i32),
    /// `long`
    Long(i64),
    /// `double`
    Double(f64),
    /// `Bool`, or the state of a `true` flag.
    Bool(bool),
    /// `string`
    String(String),
    /// `bytes`
    Bytes(Vec<u8>),
    /// `int128`
    Int128([u8; 16]),
    /// `int256`
    Int256([u8; 32]),
    /// `Vector<T>` or `vector<T>`.
    Vector(Vec<Value>),
    /// A boxed or bare constructor.
    Object(Object),
}

impl Value {
    /// A `bytes` value.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(data.into())
    }

    /// A vector of anything convertible to `Value`.
    pub fn vector<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::Vector(items.into_iter().map(Into::into).collect())
    }

    /// The `int`, if this is one.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The `long`, if this is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// The `double`, if this is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// The `Bool`, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The `string`, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The raw bytes of a `bytes` or `string` value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::String(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// The elements, if this is a vector.
    pub fn as_vector(&self) -> Option<&[Value]> {
        match self {
            Self::Vector(items) => Some(items),
            _ => None,
        }
    }

    /// The object, if this is one.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Int128(a), Self::Int128(b)) => a == b,
            (Self::Int256(a), Self::Int256(b)) => a == b,
            (Self::Vector(a), Self::Vector(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $arm:ident),* $(,)?) => {$(
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Self::$arm(v.into())
            }
        }
    )*};
}

value_from!(
    i32 => Int,
    i64 => Long,
    f64 => Double,
    bool => Bool,
    String => String,
    &str => String,
    [u8; 16] => Int128,
    [u8; 32] => Int256,
    Vec<Value> => Vector,
    Object => Object,
);

// ─── Object ──────────────────────────────────────────────────────────────────

/// A fully populated constructor.
///
/// Slots follow the descriptor's field order. The bits of a flags word that
/// gate fields are recomputed from which optional slots are filled, so an
/// object cannot disagree with its own flags. Bits no field claims are kept
/// from the decoded input in the flags slot (as `Value::Int`, only when
/// nonzero) and written back unchanged.
#[derive(Clone)]
pub struct Object {
    pub(crate) variant: &'static VariantDescriptor,
    pub(crate) slots: Vec<Option<Value>>,
}

impl Object {
    /// The constructor this object is an instance of.
    pub fn variant(&self) -> &'static VariantDescriptor {
        self.variant
    }

    /// Constructor name.
    pub fn name(&self) -> &'static str {
        self.variant.name
    }

    /// Constructor signature.
    pub fn id(&self) -> u32 {
        self.variant.id
    }

    /// Abstract type name.
    pub fn type_name(&self) -> &'static str {
        self.variant.type_name
    }

    /// The value of `field`, `None` if absent or unknown.
    ///
    /// `true` flags always read as `Some(Value::Bool(_))`. Flags words are
    /// not values; read them with [`Object::flags`].
    pub fn get(&self, field: &str) -> Option<&Value> {
        let i = field_index(self.variant.fields, field)?;
        self.variant.fields[i].ty()?;
        self.slots.get(i)?.as_ref()
    }

    /// The flags word at field index `field`, as it would be encoded.
    pub fn flags(&self, field: usize) -> u32 {
        flags_word(self.variant.fields, &self.slots, field)
    }

    /// Present fields in declared order, flags words excluded.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        present_fields(self.variant.fields, &self.slots)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.variant.id == other.variant.id && self.slots == other.slots
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.variant.name);
        for (name, value) in self.fields() {
            s.field(name, value);
        }
        s.finish()
    }
}

// ─── Slot helpers shared by objects and calls ────────────────────────────────

/// Whether the slot counts as "set" for its flag bit.
pub(crate) fn slot_present(field: &FieldDescriptor, slot: Option<&Value>) -> bool {
    if field.is_flag_only() {
        matches!(slot, Some(Value::Bool(true)))
    } else {
        slot.is_some()
    }
}

/// Bits of the flags word at `word` that gate some field.
pub(crate) fn modelled_bits(fields: &[FieldDescriptor], word: usize) -> u32 {
    fields
        .iter()
        .filter_map(FieldDescriptor::flag)
        .filter(|flag| flag.field == word)
        .fold(0, |bits, flag| bits | flag.mask())
}

/// Bits of a decoded flags word worth storing: those no field claims.
pub(crate) fn unmodelled_slot(fields: &[FieldDescriptor], word: usize, raw: u32) -> Option<Value> {
    match raw & !modelled_bits(fields, word) {
        0 => None,
        extra => Some(Value::Int(extra as i32)),
    }
}

/// The flags word at `word`: kept unmodelled bits plus one bit per present
/// optional field.
pub(crate) fn flags_word(fields: &[FieldDescriptor], slots: &[Option<Value>], word: usize) -> u32 {
    let kept = match slots.get(word) {
        Some(Some(Value::Int(extra))) => (*extra as u32) & !modelled_bits(fields, word),
        _ => 0,
    };
    let mut bits = kept;
    for (field, slot) in fields.iter().zip(slots) {
        if let Some(flag) = field.flag() {
            if flag.field == word && slot_present(field, slot.as_ref()) {
                bits |= flag.mask();
            }
        }
    }
    bits
}

pub(crate) fn present_fields<'a>(
    fields: &'static [FieldDescriptor],
    slots: &'a [Option<Value>],
) -> impl Iterator<Item = (&'static str, &'a Value)> {
    fields.iter().zip(slots).filter_map(|(field, slot)| match field.kind {
        FieldKind::Flags => None,
        FieldKind::Value { .. } => slot.as_ref().map(|v| (field.name, v)),
    })
}

// ─── Type conformance ────────────────────────────────────────────────────────

pub(crate) enum Mismatch {
    Type,
    TooLong(usize),
}

/// Checks that `value` can be encoded as `ty` and read back. A bare object
/// must be the constructor `registry` resolves the bare name to.
pub(crate) fn conforms(value: &Value, ty: &FieldType, registry: &Registry) -> Result<(), Mismatch> {
    use crate::consts::MAX_STRING_LEN;

    let ok = match (ty, value) {
        (FieldType::Int, Value::Int(_))
        | (FieldType::Long, Value::Long(_))
        | (FieldType::Double, Value::Double(_))
        | (FieldType::Bool | FieldType::True, Value::Bool(_))
        | (FieldType::Int128, Value::Int128(_))
        | (FieldType::Int256, Value::Int256(_)) => true,
        (FieldType::String, Value::String(s)) if s.len() > MAX_STRING_LEN => {
            return Err(Mismatch::TooLong(s.len()));
        }
        (FieldType::Bytes, Value::Bytes(b)) if b.len() > MAX_STRING_LEN => {
            return Err(Mismatch::TooLong(b.len()));
        }
        (FieldType::String, Value::String(_)) | (FieldType::Bytes, Value::Bytes(_)) => true,
        (FieldType::Vector(inner) | FieldType::BareVector(inner), Value::Vector(items)) => {
            for item in items {
                conforms(item, inner, registry)?;
            }
            true
        }
        (FieldType::Boxed(name), Value::Object(o)) => o.type_name() == *name,
        (FieldType::Bare(name), Value::Object(o)) => {
            registry.bare_variant(name).is_some_and(|v| v.id == o.id())
        }
        _ => false,
    };
    if ok { Ok(()) } else { Err(Mismatch::Type) }
}
