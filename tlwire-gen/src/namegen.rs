//! Renders TL types and parameters as descriptor expressions.
//!
//! The generated file imports the runtime types under short aliases
//! (`T` = `FieldType`, `K` = `FieldKind`, `F` = `FieldDescriptor`), so the
//! strings produced here use those names.

use tlwire_parser::{Definition, Parameter, ParameterType, Type};

/// Maps a TL primitive to its `FieldType` arm.
fn builtin_type(name: &str) -> Option<&'static str> {
    Some(match name {
        "int" => "T::Int",
        "long" => "T::Long",
        "double" => "T::Double",
        "Bool" => "T::Bool",
        "true" => "T::True",
        "string" => "T::String",
        "bytes" => "T::Bytes",
        "int128" => "T::Int128",
        "int256" => "T::Int256",
        _ => return None,
    })
}

/// `FieldType` expression for `ty`, or `None` for generic references.
pub(crate) fn field_type(ty: &Type) -> Option<String> {
    if ty.generic_ref {
        return None;
    }
    if ty.namespace.is_empty() {
        if let Some(builtin) = builtin_type(&ty.name) {
            return Some(builtin.to_owned());
        }
        match (ty.name.as_str(), ty.generic_arg.as_deref()) {
            ("Vector", Some(arg)) => return Some(format!("T::Vector(&{})", field_type(arg)?)),
            ("vector", Some(arg)) => return Some(format!("T::BareVector(&{})", field_type(arg)?)),
            _ => {}
        }
    }
    if ty.bare {
        Some(format!("T::Bare({:?})", ty.full_name()))
    } else {
        Some(format!("T::Boxed({:?})", ty.full_name()))
    }
}

/// `FieldKind` expression for `param` inside `def`.
pub(crate) fn field_kind(def: &Definition, param: &Parameter) -> Option<String> {
    match &param.ty {
        ParameterType::Flags => Some("K::Flags".to_owned()),
        ParameterType::Normal { ty, flag: None } => {
            Some(format!("K::Value {{ ty: {}, flag: None }}", field_type(ty)?))
        }
        ParameterType::Normal { ty, flag: Some(flag) } => {
            let field = def.params.iter().position(|p| p.name == flag.name)?;
            Some(format!(
                "K::Value {{ ty: {}, flag: Some(FlagBit {{ field: {field}, bit: {} }}) }}",
                field_type(ty)?,
                flag.index
            ))
        }
    }
}

/// Every boxed type name `ty` refers to, including inside vectors.
pub(crate) fn referenced_boxed(ty: &Type, out: &mut Vec<String>) {
    if ty.generic_ref {
        return;
    }
    if let Some(arg) = &ty.generic_arg {
        referenced_boxed(arg, out);
        return;
    }
    if ty.namespace.is_empty() && builtin_type(&ty.name).is_some() {
        return;
    }
    out.push(ty.full_name());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(s: &str) -> Type {
        s.parse().unwrap()
    }

    #[test]
    fn primitives() {
        assert_eq!(field_type(&ty("long")).unwrap(), "T::Long");
        assert_eq!(field_type(&ty("Bool")).unwrap(), "T::Bool");
    }

    #[test]
    fn vectors() {
        assert_eq!(
            field_type(&ty("Vector<Vector<long>>")).unwrap(),
            "T::Vector(&T::Vector(&T::Long))"
        );
        assert_eq!(field_type(&ty("vector<int>")).unwrap(), "T::BareVector(&T::Int)");
    }

    #[test]
    fn boxed_and_bare() {
        assert_eq!(
            field_type(&ty("payments.PaymentForm")).unwrap(),
            r#"T::Boxed("payments.PaymentForm")"#
        );
        assert_eq!(field_type(&ty("%Peer")).unwrap(), r#"T::Bare("Peer")"#);
        assert_eq!(field_type(&ty("labeledPrice")).unwrap(), r#"T::Bare("labeledPrice")"#);
    }

    #[test]
    fn generics_are_unsupported() {
        assert!(field_type(&ty("!X")).is_none());
    }
}
