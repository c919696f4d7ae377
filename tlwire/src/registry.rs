//! Signature → descriptor lookup.
//!
//! A [`Registry`] indexes a pair of static descriptor tables. The one built
//! from the shipped schema is available through [`Registry::global`]; it is
//! constructed on first use and never mutated afterwards.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::consts::{BOOL_FALSE_ID, BOOL_TRUE_ID, VECTOR_ID};
use crate::error::{Error, Result};
use crate::generated;
use crate::schema::{FunctionDescriptor, VariantDescriptor};

static GLOBAL: LazyLock<Registry> =
    LazyLock::new(|| Registry::new(generated::CONSTRUCTORS, generated::FUNCTIONS));

/// An immutable index over constructor and function tables.
#[derive(Debug)]
pub struct Registry {
    constructors: &'static [VariantDescriptor],
    functions: &'static [FunctionDescriptor],
    by_id: HashMap<u32, usize>,
    by_name: HashMap<&'static str, usize>,
    by_type: HashMap<&'static str, Vec<usize>>,
    functions_by_id: HashMap<u32, usize>,
    functions_by_name: HashMap<&'static str, usize>,
}

impl Registry {
    /// The registry of the shipped schema.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Indexes `constructors` and `functions`.
    ///
    /// When two rows share an id or name, the first one wins.
    pub fn new(
        constructors: &'static [VariantDescriptor],
        functions: &'static [FunctionDescriptor],
    ) -> Self {
        let mut by_id = HashMap::with_capacity(constructors.len());
        let mut by_name = HashMap::with_capacity(constructors.len());
        let mut by_type: HashMap<&'static str, Vec<usize>> = HashMap::new();

        for (i, c) in constructors.iter().enumerate() {
            by_id.entry(c.id).or_insert(i);
            by_name.entry(c.name).or_insert(i);
            by_type.entry(c.type_name).or_default().push(i);
        }

        let mut functions_by_id = HashMap::with_capacity(functions.len());
        let mut functions_by_name = HashMap::with_capacity(functions.len());
        for (i, f) in functions.iter().enumerate() {
            functions_by_id.entry(f.id).or_insert(i);
            functions_by_name.entry(f.name).or_insert(i);
        }

        log::debug!(
            "[tlwire] registry built: {} constructors across {} types, {} functions",
            constructors.len(),
            by_type.len(),
            functions.len()
        );

        Self {
            constructors,
            functions,
            by_id,
            by_name,
            by_type,
            functions_by_id,
            functions_by_name,
        }
    }

    /// Resolves `id` among the variants of `type_name`.
    pub fn resolve(&self, type_name: &str, id: u32) -> Result<&'static VariantDescriptor> {
        match self.constructor(id) {
            Some(c) if c.type_name == type_name => Ok(c),
            _ => Err(Error::UnexpectedConstructor { id, expected: Some(type_name.to_owned()) }),
        }
    }

    /// The constructor with signature `id`, of any type.
    pub fn constructor(&self, id: u32) -> Option<&'static VariantDescriptor> {
        let constructors = self.constructors;
        self.by_id.get(&id).map(|&i| &constructors[i])
    }

    /// The constructor called `name`.
    pub fn constructor_by_name(&self, name: &str) -> Option<&'static VariantDescriptor> {
        let constructors = self.constructors;
        self.by_name.get(name).map(|&i| &constructors[i])
    }

    /// The function with signature `id`.
    pub fn function(&self, id: u32) -> Option<&'static FunctionDescriptor> {
        let functions = self.functions;
        self.functions_by_id.get(&id).map(|&i| &functions[i])
    }

    /// The function called `name`.
    pub fn function_by_name(&self, name: &str) -> Option<&'static FunctionDescriptor> {
        let functions = self.functions;
        self.functions_by_name.get(name).map(|&i| &functions[i])
    }

    /// All variants of `type_name`, in table order. Empty for unknown types.
    pub fn variants_of(&self, type_name: &str) -> Vec<&'static VariantDescriptor> {
        let constructors = self.constructors;
        self.by_type
            .get(type_name)
            .map(|ids| ids.iter().map(|&i| &constructors[i]).collect())
            .unwrap_or_default()
    }

    /// `true` if some constructor builds `type_name`.
    pub fn has_type(&self, type_name: &str) -> bool {
        self.by_type.contains_key(type_name)
    }

    /// Every abstract type name, sorted.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.by_type.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// The constructor a `Bare(name)` field refers to: the constructor
    /// called `name`, or the only constructor of type `name`.
    pub fn bare_variant(&self, name: &str) -> Option<&'static VariantDescriptor> {
        if let Some(c) = self.constructor_by_name(name) {
            return Some(c);
        }
        match self.variants_of(name).as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Every constructor row.
    pub fn constructors(&self) -> &'static [VariantDescriptor] {
        self.constructors
    }

    /// Every function row.
    pub fn functions(&self) -> &'static [FunctionDescriptor] {
        self.functions
    }

    /// Name of whatever `id` denotes, including the builtin `Bool`
    /// constructors and the vector marker.
    pub fn name_for_id(&self, id: u32) -> Option<&'static str> {
        match id {
            BOOL_TRUE_ID => Some("boolTrue"),
            BOOL_FALSE_ID => Some("boolFalse"),
            VECTOR_ID => Some("vector"),
            _ => self
                .constructor(id)
                .map(|c| c.name)
                .or_else(|| self.function(id).map(|f| f.name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDescriptor, FieldKind, FieldType};

    static ROWS: &[VariantDescriptor] = &[
        VariantDescriptor { id: 1, name: "peerUser", type_name: "Peer", fields: &[] },
        VariantDescriptor { id: 2, name: "peerChat", type_name: "Peer", fields: &[] },
        VariantDescriptor {
            id: 3,
            name: "dataJSON",
            type_name: "DataJSON",
            fields: &[FieldDescriptor {
                name: "data",
                kind: FieldKind::Value { ty: FieldType::String, flag: None },
            }],
        },
    ];

    #[test]
    fn scoped_resolution() {
        let reg = Registry::new(ROWS, &[]);
        assert_eq!(reg.resolve("Peer", 2).unwrap().name, "peerChat");
        assert_eq!(
            reg.resolve("Peer", 3),
            Err(Error::UnexpectedConstructor { id: 3, expected: Some("Peer".into()) })
        );
    }

    #[test]
    fn bare_lookup() {
        let reg = Registry::new(ROWS, &[]);
        assert_eq!(reg.bare_variant("DataJSON").unwrap().id, 3);
        assert_eq!(reg.bare_variant("peerUser").unwrap().id, 1);
        assert!(reg.bare_variant("Peer").is_none());
    }

    #[test]
    fn builtin_names() {
        let reg = Registry::new(ROWS, &[]);
        assert_eq!(reg.name_for_id(BOOL_TRUE_ID), Some("boolTrue"));
        assert_eq!(reg.name_for_id(2), Some("peerChat"));
        assert_eq!(reg.name_for_id(99), None);
        assert_eq!(reg.type_names(), vec!["DataJSON", "Peer"]);
    }
}
