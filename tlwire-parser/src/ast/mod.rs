//! Syntax tree for TL definitions.

mod definition;
mod param;
mod ty;

pub use definition::{Category, Definition};
pub use param::{Flag, Parameter, ParameterType};
pub use ty::Type;
