//! Validated construction of objects.
//!
//! Both the builder and the decoder fill one slot per field and then run
//! [`assemble`], which checks that every required slot is filled and that
//! fields sharing a flag bit agree on presence.

use crate::error::BuildError;
use crate::registry::Registry;
use crate::schema::{FieldDescriptor, FieldKind, FieldType, VariantDescriptor, field_index};
use crate::value::{Mismatch, Object, Value, conforms, slot_present};

// ─── Assembly ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum IncompleteKind {
    MissingField,
    FlagConflict,
}

/// Why a set of slots could not become a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Incomplete {
    pub(crate) field: &'static str,
    pub(crate) kind: IncompleteKind,
}

/// Validates `slots` against `fields`, filling absent `true` flags with
/// `false`. Flags slots pass through untouched.
pub(crate) fn assemble(
    fields: &'static [FieldDescriptor],
    mut slots: Vec<Option<Value>>,
) -> Result<Vec<Option<Value>>, Incomplete> {
    slots.resize(fields.len(), None);

    for (field, slot) in fields.iter().zip(slots.iter_mut()) {
        match field.kind {
            FieldKind::Flags => {}
            FieldKind::Value { ty: FieldType::True, flag: Some(_) } => {
                slot.get_or_insert(Value::Bool(false));
            }
            FieldKind::Value { flag: None, .. } if slot.is_none() => {
                return Err(Incomplete { field: field.name, kind: IncompleteKind::MissingField });
            }
            FieldKind::Value { .. } => {}
        }
    }

    // Fields gated by the same bit must all be present or all absent.
    for (i, field) in fields.iter().enumerate() {
        let Some(flag) = field.flag() else { continue };
        let present = slot_present(field, slots[i].as_ref());
        let first = fields
            .iter()
            .zip(&slots)
            .take(i)
            .find(|(other, _)| other.flag() == Some(flag));
        if let Some((other, other_slot)) = first {
            if slot_present(other, other_slot.as_ref()) != present {
                return Err(Incomplete { field: field.name, kind: IncompleteKind::FlagConflict });
            }
        }
    }

    Ok(slots)
}

// ─── SlotBuilder ─────────────────────────────────────────────────────────────

/// Shared state of [`ObjectBuilder`] and [`CallBuilder`](crate::CallBuilder):
/// the first error wins, later calls are ignored.
#[derive(Clone, Debug)]
pub(crate) struct SlotBuilder<'r> {
    registry: &'r Registry,
    name: &'static str,
    fields: &'static [FieldDescriptor],
    slots: Vec<Option<Value>>,
    error: Option<BuildError>,
}

impl<'r> SlotBuilder<'r> {
    pub(crate) fn new(
        registry: &'r Registry,
        name: &'static str,
        fields: &'static [FieldDescriptor],
    ) -> Self {
        Self { registry, name, fields, slots: vec![None; fields.len()], error: None }
    }

    pub(crate) fn failed(registry: &'r Registry, error: BuildError) -> Self {
        Self { registry, name: "", fields: &[], slots: Vec::new(), error: Some(error) }
    }

    pub(crate) fn set(&mut self, field: &str, value: Value) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.try_set(field, value) {
            self.error = Some(e);
        }
    }

    fn try_set(&mut self, field: &str, value: Value) -> Result<(), BuildError> {
        let unknown = || BuildError::UnknownField { constructor: self.name, field: field.to_owned() };
        let fields = self.fields;
        let i = field_index(fields, field).ok_or_else(unknown)?;
        let desc = &fields[i];
        let FieldKind::Value { ty, .. } = &desc.kind else {
            return Err(unknown());
        };

        match conforms(&value, ty, self.registry) {
            Ok(()) => {
                self.slots[i] = Some(value);
                Ok(())
            }
            Err(Mismatch::Type) => Err(BuildError::TypeMismatch {
                constructor: self.name,
                field: desc.name,
                expected: *ty,
            }),
            Err(Mismatch::TooLong(len)) => {
                Err(BuildError::TooLong { constructor: self.name, field: desc.name, len })
            }
        }
    }

    pub(crate) fn unset(&mut self, field: &str) {
        if let Some(i) = field_index(self.fields, field) {
            self.slots[i] = None;
        }
    }

    pub(crate) fn finish(self) -> Result<Vec<Option<Value>>, BuildError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let constructor = self.name;
        assemble(self.fields, self.slots).map_err(|Incomplete { field, kind }| match kind {
            IncompleteKind::MissingField => BuildError::MissingField { constructor, field },
            IncompleteKind::FlagConflict => BuildError::FlagConflict { constructor, field },
        })
    }
}

// ─── ObjectBuilder ───────────────────────────────────────────────────────────

/// Builds an [`Object`] field by field.
///
/// Bare fields are checked against the registry the builder was made from,
/// the global one for [`ObjectBuilder::new`].
///
/// ```
/// use tlwire::Object;
///
/// let info = Object::builder("payments.savedInfo")
///     .set("has_saved_credentials", true)
///     .build()
///     .unwrap();
/// assert_eq!(info.flags(0), 0b10);
/// ```
#[derive(Clone, Debug)]
pub struct ObjectBuilder<'r> {
    variant: Option<&'static VariantDescriptor>,
    slots: SlotBuilder<'r>,
}

impl ObjectBuilder<'static> {
    /// A builder for `variant`.
    pub fn new(variant: &'static VariantDescriptor) -> Self {
        Self::in_registry(Registry::global(), variant)
    }
}

impl<'r> ObjectBuilder<'r> {
    fn in_registry(registry: &'r Registry, variant: &'static VariantDescriptor) -> Self {
        Self {
            variant: Some(variant),
            slots: SlotBuilder::new(registry, variant.name, variant.fields),
        }
    }

    /// A builder for the constructor called `name` in `registry`.
    pub fn with_registry(registry: &'r Registry, name: &str) -> Self {
        match registry.constructor_by_name(name) {
            Some(variant) => Self::in_registry(registry, variant),
            None => Self {
                variant: None,
                slots: SlotBuilder::failed(
                    registry,
                    BuildError::UnknownConstructor { name: name.to_owned() },
                ),
            },
        }
    }

    /// Sets `field` to `value`.
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.slots.set(field, value.into());
        self
    }

    /// Sets `field` when `value` is `Some`, clears it otherwise.
    pub fn set_opt<V: Into<Value>>(mut self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.slots.set(field, v.into()),
            None => self.slots.unset(field),
        }
        self
    }

    /// Validates the fields and produces the object.
    pub fn build(self) -> Result<Object, BuildError> {
        let slots = self.slots.finish()?;
        match self.variant {
            Some(variant) => Ok(Object { variant, slots }),
            None => Err(BuildError::UnknownConstructor { name: String::new() }),
        }
    }
}

impl Object {
    /// A builder for the constructor called `name` in the global registry.
    pub fn builder(name: &str) -> ObjectBuilder<'static> {
        ObjectBuilder::with_registry(Registry::global(), name)
    }
}
