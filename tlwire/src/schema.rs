//! Static descriptors of every constructor and function.
//!
//! The build script turns `tl/api.tl` into tables of these types; the codec
//! engine walks them instead of per-constructor code.

use std::fmt;

/// The semantic type of a field, as declared in the schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// `int`
    Int,
    /// `long`
    Long,
    /// `double`
    Double,
    /// `Bool`, boxed as `boolTrue`/`boolFalse`.
    Bool,
    /// `true`; only meaningful behind a flag, occupies no bytes.
    True,
    /// `string`, must be UTF-8.
    String,
    /// `bytes`
    Bytes,
    /// `int128`
    Int128,
    /// `int256`
    Int256,
    /// `Vector<T>`: marker, count, elements.
    Vector(&'static FieldType),
    /// `vector<T>`: count, elements.
    BareVector(&'static FieldType),
    /// A signature-prefixed value of the named abstract type.
    Boxed(&'static str),
    /// A value of the named constructor (or single-constructor type)
    /// without its signature.
    Bare(&'static str),
}

impl FieldType {
    /// Fewest bytes any value of this type occupies on the wire.
    pub fn min_wire_size(&self) -> usize {
        match self {
            Self::True | Self::Bare(_) => 0,
            Self::Int | Self::Bool | Self::String | Self::Bytes | Self::Boxed(_) => 4,
            Self::BareVector(_) => 4,
            Self::Long | Self::Double | Self::Vector(_) => 8,
            Self::Int128 => 16,
            Self::Int256 => 32,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("int"),
            Self::Long => f.write_str("long"),
            Self::Double => f.write_str("double"),
            Self::Bool => f.write_str("Bool"),
            Self::True => f.write_str("true"),
            Self::String => f.write_str("string"),
            Self::Bytes => f.write_str("bytes"),
            Self::Int128 => f.write_str("int128"),
            Self::Int256 => f.write_str("int256"),
            Self::Vector(inner) => write!(f, "Vector<{inner}>"),
            Self::BareVector(inner) => write!(f, "vector<{inner}>"),
            Self::Boxed(name) => f.write_str(name),
            Self::Bare(name) if name.starts_with(|c: char| c.is_ascii_uppercase()) => {
                write!(f, "%{name}")
            }
            Self::Bare(name) => f.write_str(name),
        }
    }
}

/// Which bit of which flags word gates a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FlagBit {
    /// Index of the `#` field within the same descriptor.
    pub field: usize,
    /// Bit number, `0..32`.
    pub bit: u32,
}

impl FlagBit {
    /// The bit as a mask.
    pub fn mask(&self) -> u32 {
        1 << self.bit
    }
}

/// What a field holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A `#` flags word. Its value is derived from the fields it gates.
    Flags,
    /// A value, optional when `flag` is set.
    Value {
        /// The declared type.
        ty: FieldType,
        /// The gating bit, if the field is optional.
        flag: Option<FlagBit>,
    },
}

/// One field of a constructor or function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name as written in the schema.
    pub name: &'static str,
    /// Flags word or value.
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// The gating bit of an optional field.
    pub fn flag(&self) -> Option<FlagBit> {
        match self.kind {
            FieldKind::Value { flag, .. } => flag,
            FieldKind::Flags => None,
        }
    }

    /// The declared type, `None` for flags words.
    pub fn ty(&self) -> Option<&FieldType> {
        match &self.kind {
            FieldKind::Value { ty, .. } => Some(ty),
            FieldKind::Flags => None,
        }
    }

    /// `true` for `flags.N?true` fields, whose only content is the bit.
    pub fn is_flag_only(&self) -> bool {
        matches!(self.kind, FieldKind::Value { ty: FieldType::True, flag: Some(_) })
    }
}

/// One constructor of an abstract type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariantDescriptor {
    /// The 32-bit signature.
    pub id: u32,
    /// Full constructor name, e.g. `payments.savedInfo`.
    pub name: &'static str,
    /// Full abstract type name, e.g. `payments.SavedInfo`.
    pub type_name: &'static str,
    /// Fields in wire order.
    pub fields: &'static [FieldDescriptor],
}

/// One RPC function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FunctionDescriptor {
    /// The 32-bit signature.
    pub id: u32,
    /// Full function name, e.g. `payments.getSavedInfo`.
    pub name: &'static str,
    /// Parameters in wire order.
    pub params: &'static [FieldDescriptor],
    /// Type of the response.
    pub returns: FieldType,
}

/// Index of the field called `name`.
pub(crate) fn field_index(fields: &[FieldDescriptor], name: &str) -> Option<usize> {
    fields.iter().position(|f| f.name == name)
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldKind::Flags => write!(f, "{}:#", self.name),
            FieldKind::Value { ty, flag: None } => write!(f, "{}:{ty}", self.name),
            FieldKind::Value { ty, flag: Some(_) } => write!(f, "{}:?{ty}", self.name),
        }
    }
}

/// Renders the definition line, e.g. `dataJSON#7d748d04 data:string = DataJSON`.
impl fmt::Display for VariantDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{:08x}", self.name, self.id)?;
        write_params(f, self.fields)?;
        write!(f, " = {}", self.type_name)
    }
}

impl fmt::Display for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{:08x}", self.name, self.id)?;
        write_params(f, self.params)?;
        write!(f, " = {}", self.returns)
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, fields: &[FieldDescriptor]) -> fmt::Result {
    for field in fields {
        match &field.kind {
            FieldKind::Value { ty, flag: Some(flag) } => {
                let word = fields.get(flag.field).map_or("flags", |w| w.name);
                write!(f, " {}:{word}.{}?{ty}", field.name, flag.bit)?;
            }
            _ => write!(f, " {field}")?,
        }
    }
    Ok(())
}
