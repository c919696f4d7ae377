//! Human-readable rendering of decoded values.
//!
//! `Display` gives one line, `name { field: value, … }`, suitable for logs.
//! [`describe_pretty`] gives an indented multi-line form.
//!
//! Byte strings print as hex, cut off after [`MAX_HEX_BYTES`] bytes. Both
//! forms leave out absent optionals, unset `true` flags and all-zero flags
//! words; [`Object::description_fields`] lists everything.

use std::fmt::{self, Write};

use crate::call::Call;
use crate::schema::{FieldDescriptor, FieldKind};
use crate::value::{Object, Value, flags_word};

/// Longest byte string printed in full.
pub const MAX_HEX_BYTES: usize = 32;

/// One declared field as seen by [`Object::description_fields`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldEntry<'a> {
    /// A flags word, as it is encoded.
    Flags(u32),
    /// A field holding a value. Unset `true` flags hold `false`.
    Value(&'a Value),
    /// An optional field that is not set.
    Absent,
}

impl fmt::Display for FieldEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flags(word) => write!(f, "{word}"),
            Self::Value(value) => write!(f, "{value}"),
            Self::Absent => f.write_str("absent"),
        }
    }
}

fn entries<'a>(
    fields: &'static [FieldDescriptor],
    slots: &'a [Option<Value>],
) -> Vec<(&'static str, FieldEntry<'a>)> {
    fields
        .iter()
        .zip(slots)
        .enumerate()
        .map(|(i, (field, slot))| {
            let entry = match (&field.kind, slot) {
                (FieldKind::Flags, _) => FieldEntry::Flags(flags_word(fields, slots, i)),
                (FieldKind::Value { .. }, Some(value)) => FieldEntry::Value(value),
                (FieldKind::Value { .. }, None) => FieldEntry::Absent,
            };
            (field.name, entry)
        })
        .collect()
}

impl Object {
    /// The constructor name and every declared field in order, flags words
    /// and absent optionals included.
    pub fn description_fields(&self) -> (&'static str, Vec<(&'static str, FieldEntry<'_>)>) {
        (self.name(), entries(self.variant.fields, &self.slots))
    }
}

impl Call {
    /// The function name and every declared parameter, like
    /// [`Object::description_fields`].
    pub fn description_fields(&self) -> (&'static str, Vec<(&'static str, FieldEntry<'_>)>) {
        (self.name(), entries(self.function.params, &self.slots))
    }
}

/// Entries worth printing.
fn shown<'a>(
    fields: &'static [FieldDescriptor],
    slots: &'a [Option<Value>],
) -> impl Iterator<Item = (&'static str, FieldEntry<'a>)> {
    entries(fields, slots)
        .into_iter()
        .zip(fields)
        .filter(|((_, entry), field)| match entry {
            FieldEntry::Flags(word) => *word != 0,
            FieldEntry::Value(Value::Bool(false)) => !field.is_flag_only(),
            FieldEntry::Value(_) => true,
            FieldEntry::Absent => false,
        })
        .map(|(entry, _)| entry)
}

fn write_hex(f: &mut impl Write, bytes: &[u8]) -> fmt::Result {
    f.write_str("0x")?;
    for b in bytes.iter().take(MAX_HEX_BYTES) {
        write!(f, "{b:02x}")?;
    }
    if bytes.len() > MAX_HEX_BYTES {
        write!(f, "…({} bytes)", bytes.len())?;
    }
    Ok(())
}

fn write_compact<'a>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    fields: impl Iterator<Item = (&'static str, FieldEntry<'a>)>,
) -> fmt::Result {
    f.write_str(name)?;
    let mut first = true;
    for (field, entry) in fields {
        f.write_str(if first { " { " } else { ", " })?;
        write!(f, "{field}: {entry}")?;
        first = false;
    }
    if !first {
        f.write_str(" }")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v:?}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Bytes(b) => write_hex(f, b),
            Value::Int128(b) => write_hex(f, b),
            Value::Int256(b) => write_hex(f, b),
            Value::Vector(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(o) => write!(f, "{o}"),
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_compact(f, self.name(), shown(self.variant.fields, &self.slots))
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_compact(f, self.name(), shown(self.function.params, &self.slots))
    }
}

// ─── Pretty ──────────────────────────────────────────────────────────────────

const INDENT: &str = "  ";

/// Multi-line rendering with two-space indentation.
///
/// ```
/// use tlwire::{Object, describe_pretty};
///
/// let json = Object::builder("dataJSON").set("data", "{}").build().unwrap();
/// assert_eq!(describe_pretty(&json.into()), "dataJSON {\n  data: \"{}\"\n}");
/// ```
pub fn describe_pretty(value: &Value) -> String {
    let mut out = String::new();
    // Writing into a `String` cannot fail.
    let _ = pretty(&mut out, value, 0);
    out
}

/// [`describe_pretty`] for a call.
pub fn describe_call_pretty(call: &Call) -> String {
    let mut out = String::new();
    let _ = pretty_fields(&mut out, call.name(), shown(call.function.params, &call.slots), 0);
    out
}

fn pretty(out: &mut String, value: &Value, depth: usize) -> fmt::Result {
    match value {
        Value::Object(o) => pretty_fields(out, o.name(), shown(o.variant.fields, &o.slots), depth),
        Value::Vector(items) if items.is_empty() => out.write_str("[]"),
        Value::Vector(items) => {
            out.write_str("[\n")?;
            for item in items {
                indent(out, depth + 1);
                pretty(out, item, depth + 1)?;
                out.write_str("\n")?;
            }
            indent(out, depth);
            out.write_str("]")
        }
        scalar => write!(out, "{scalar}"),
    }
}

fn pretty_fields<'a>(
    out: &mut String,
    name: &str,
    fields: impl Iterator<Item = (&'static str, FieldEntry<'a>)>,
    depth: usize,
) -> fmt::Result {
    out.write_str(name)?;
    let mut fields = fields.peekable();
    if fields.peek().is_none() {
        return Ok(());
    }
    out.write_str(" {\n")?;
    for (field, entry) in fields {
        indent(out, depth + 1);
        write!(out, "{field}: ")?;
        match entry {
            FieldEntry::Value(value) => pretty(out, value, depth + 1)?,
            other => write!(out, "{other}")?,
        }
        out.write_str("\n")?;
    }
    indent(out, depth);
    out.write_str("}")
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scalars() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Double(1.0).to_string(), "1.0");
        assert_eq!(Value::from("a\"b").to_string(), r#""a\"b""#);
        assert_eq!(Value::bytes([0xdeu8, 0xad]).to_string(), "0xdead");
        assert_eq!(Value::vector([1i32, 2]).to_string(), "[1, 2]");
    }

    #[test]
    fn long_bytes_are_cut() {
        let s = Value::bytes(vec![0xabu8; 40]).to_string();
        assert!(s.starts_with(&format!("0x{}", "ab".repeat(32))));
        assert!(s.ends_with("…(40 bytes)"));
    }

    #[test]
    fn pretty_vectors() {
        assert_eq!(describe_pretty(&Value::Vector(vec![])), "[]");
        assert_eq!(describe_pretty(&Value::vector([1i64, 2])), "[\n  1\n  2\n]");
    }
}
