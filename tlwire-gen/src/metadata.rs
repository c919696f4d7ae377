//! Whole-schema checks run before any code is written.

use std::collections::{HashMap, HashSet};

use tlwire_parser::{Category, Definition, ParameterType};

use crate::grouper;
use crate::namegen;

pub(crate) struct Metadata<'a> {
    /// Boxed type name → its constructors.
    constructors_by_type: HashMap<String, Vec<&'a Definition>>,
    /// Constructor full names, for resolving bare references.
    constructor_names: HashSet<String>,
}

impl<'a> Metadata<'a> {
    pub(crate) fn build(defs: &'a [Definition]) -> Self {
        let mut constructors_by_type: HashMap<String, Vec<&Definition>> = HashMap::new();
        let mut constructor_names = HashSet::new();

        for def in defs.iter().filter(|d| d.category == Category::Types) {
            constructors_by_type.entry(def.ty.full_name()).or_default().push(def);
            constructor_names.insert(def.full_name());
        }

        Self { constructors_by_type, constructor_names }
    }

    /// Ids that appear on more than one definition.
    pub(crate) fn duplicate_ids(defs: &[Definition]) -> Vec<(u32, String, String)> {
        let mut seen: HashMap<u32, String> = HashMap::new();
        let mut dupes = Vec::new();
        for def in defs {
            if let Some(first) = seen.insert(def.id, def.full_name()) {
                dupes.push((def.id, first, def.full_name()));
            }
        }
        dupes
    }

    /// Type names referenced by `defs` that no constructor builds.
    pub(crate) fn unresolved_references(&self, defs: &[Definition]) -> Vec<(String, String)> {
        let mut missing = Vec::new();
        for def in defs.iter().filter(|d| !d.is_generic()) {
            let mut refs = Vec::new();
            for param in &def.params {
                if let ParameterType::Normal { ty, .. } = &param.ty {
                    namegen::referenced_boxed(ty, &mut refs);
                }
            }
            if def.category == Category::Functions {
                namegen::referenced_boxed(&def.ty, &mut refs);
            }
            for name in refs {
                if !self.resolves(&name) {
                    missing.push((def.full_name(), name));
                }
            }
        }
        missing
    }

    fn resolves(&self, name: &str) -> bool {
        grouper::is_builtin_type(name)
            || self.constructors_by_type.contains_key(name)
            || self.constructor_names.contains(name)
    }

    /// Number of distinct boxed types that produce table rows.
    pub(crate) fn type_count(&self) -> usize {
        self.constructors_by_type
            .keys()
            .filter(|name| !grouper::is_builtin_type(name))
            .count()
    }
}
