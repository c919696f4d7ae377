//! RPC function requests and their responses.

use crate::builder::SlotBuilder;
use crate::codec::{Decoder, write_fields};
use crate::error::{BuildError, Error, Result};
use crate::primitives::Serializable;
use crate::registry::Registry;
use crate::schema::{FunctionDescriptor, field_index};
use crate::value::{Value, flags_word, present_fields};

/// A request to a remote function, ready to be serialized.
///
/// Calls are always boxed: the function's signature comes first.
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub(crate) function: &'static FunctionDescriptor,
    pub(crate) slots: Vec<Option<Value>>,
}

impl Call {
    /// A builder for the function called `name` in the global registry.
    pub fn builder(name: &str) -> CallBuilder<'static> {
        CallBuilder::with_registry(Registry::global(), name)
    }

    /// The function being called.
    pub fn function(&self) -> &'static FunctionDescriptor {
        self.function
    }

    /// Function name.
    pub fn name(&self) -> &'static str {
        self.function.name
    }

    /// The value of parameter `field`, `None` if absent, unknown or a flags
    /// word.
    pub fn get(&self, field: &str) -> Option<&Value> {
        let i = field_index(self.function.params, field)?;
        self.function.params[i].ty()?;
        self.slots.get(i)?.as_ref()
    }

    /// The flags word at parameter index `field`, as it would be encoded.
    pub fn flags(&self, field: usize) -> u32 {
        flags_word(self.function.params, &self.slots, field)
    }

    /// Present parameters in declared order, flags words excluded.
    pub fn params(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        present_fields(self.function.params, &self.slots)
    }

    /// Decodes the response to this call from the global registry.
    ///
    /// The whole of `bytes` must be one value of the declared return type.
    pub fn read_response(&self, bytes: &[u8]) -> Result<Value> {
        self.read_response_with(&mut Decoder::new(bytes))
            .inspect_err(|e| log::trace!("[tlwire] {} response rejected: {e}", self.name()))
    }

    /// Decodes the response with a caller-supplied decoder.
    pub fn read_response_with(&self, decoder: &mut Decoder<'_, '_>) -> Result<Value> {
        let value = decoder.read_value(&self.function.returns)?;
        decoder.finish()?;
        Ok(value)
    }
}

impl Serializable for Call {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.function.id.serialize(buf);
        write_fields(self.function.params, &self.slots, buf);
    }
}

impl<'r, 'b> Decoder<'r, 'b> {
    /// Reads a signature and the parameters of the function it names, the
    /// way a server would read a request.
    pub fn read_call(&mut self) -> Result<Call> {
        let id = self.read_id()?;
        let function = self
            .registry()
            .function(id)
            .ok_or(Error::UnexpectedConstructor { id, expected: None })?;
        let slots = self.read_fields(function.name, function.params)?;
        Ok(Call { function, slots })
    }
}

/// Builds a [`Call`] parameter by parameter, with the same validation as
/// [`ObjectBuilder`](crate::ObjectBuilder).
#[derive(Clone, Debug)]
pub struct CallBuilder<'r> {
    function: Option<&'static FunctionDescriptor>,
    slots: SlotBuilder<'r>,
}

impl CallBuilder<'static> {
    /// A builder for `function`.
    pub fn new(function: &'static FunctionDescriptor) -> Self {
        Self::in_registry(Registry::global(), function)
    }
}

impl<'r> CallBuilder<'r> {
    fn in_registry(registry: &'r Registry, function: &'static FunctionDescriptor) -> Self {
        Self {
            function: Some(function),
            slots: SlotBuilder::new(registry, function.name, function.params),
        }
    }

    /// A builder for the function called `name` in `registry`.
    pub fn with_registry(registry: &'r Registry, name: &str) -> Self {
        match registry.function_by_name(name) {
            Some(function) => Self::in_registry(registry, function),
            None => Self {
                function: None,
                slots: SlotBuilder::failed(
                    registry,
                    BuildError::UnknownConstructor { name: name.to_owned() },
                ),
            },
        }
    }

    /// Sets parameter `field` to `value`.
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

    /// Validates the parameters and produces the call.
    pub fn build(self) -> std::result::Result<Call, BuildError> {
        let slots = self.slots.finish()?;
        match self.function {
            Some(function) => Ok(Call { function, slots }),
            None => Err(BuildError::UnknownConstructor { name: String::new() }),
        }
    }
}
