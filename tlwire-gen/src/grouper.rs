//! Selects and orders the definitions that become table rows.

use tlwire_parser::{Category, Definition};

/// Boxed types the runtime treats as primitives; their constructors never
/// become table rows.
const BUILTIN_TYPES: &[&str] = &["Bool", "True"];

pub(crate) fn is_builtin_type(name: &str) -> bool {
    BUILTIN_TYPES.contains(&name)
}

/// Definitions of `category`, minus builtins and generic definitions,
/// sorted by full name for deterministic output.
pub(crate) fn rows(defs: &[Definition], category: Category) -> Vec<&Definition> {
    let mut rows: Vec<&Definition> = defs
        .iter()
        .filter(|d| d.category == category)
        .filter(|d| !d.is_generic())
        .filter(|d| category == Category::Functions || !is_builtin_type(&d.ty.name))
        .collect();
    rows.sort_by_cached_key(|d| d.full_name());
    rows
}

/// Generic definitions that were left out of the tables.
pub(crate) fn skipped_generics(defs: &[Definition]) -> impl Iterator<Item = &Definition> {
    defs.iter().filter(|d| d.is_generic())
}
