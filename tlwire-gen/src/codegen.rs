//! The public code-generation API.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tlwire_parser::{Category, Definition};

use crate::grouper;
use crate::metadata::Metadata;
use crate::namegen as n;

// ─── Config ───────────────────────────────────────────────────────────────────

/// Generation configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Emit `name_for_id(id) -> Option<&'static str>` covering every definition.
    pub gen_name_for_id: bool,
    /// Fill the `FUNCTIONS` table. When off it is emitted empty.
    pub include_functions: bool,
    /// Value of the generated `LAYER` constant.
    pub layer: i32,
    /// Module path the generated code imports descriptor types from.
    pub runtime: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gen_name_for_id: false,
            include_functions: true,
            layer: 0,
            runtime: "crate::schema".to_owned(),
        }
    }
}

// ─── Outputs ─────────────────────────────────────────────────────────────────

/// Writer for the generated descriptor module.
pub struct Outputs<W: Write> {
    /// Receives `LAYER`, `CONSTRUCTORS`, `FUNCTIONS` and `name_for_id`.
    pub schema: W,
}

impl Outputs<File> {
    /// Opens `generated_schema.rs` inside `out_dir`.
    pub fn from_dir(out_dir: &str) -> io::Result<Self> {
        let p = Path::new(out_dir);
        Ok(Self { schema: File::create(p.join("generated_schema.rs"))? })
    }
}

impl<W: Write> Outputs<W> {
    /// Flush the writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.schema.flush()
    }
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// Non-fatal findings from a generation run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    /// Human-readable warnings, one per problem.
    pub warnings: Vec<String>,
    /// Constructor rows written.
    pub constructors: usize,
    /// Function rows written.
    pub functions: usize,
}

// ─── Public API ───────────────────────────────────────────────────────────────

/// Generate the descriptor tables for `defs`.
///
/// Fails with [`io::ErrorKind::InvalidData`] when two definitions share an id,
/// since the registry could not tell them apart. References to undefined types
/// and generic definitions are reported as warnings and generation continues.
///
/// Call `outputs.flush()` when done.
pub fn generate<W: Write>(
    defs: &[Definition],
    config: &Config,
    outputs: &mut Outputs<W>,
) -> io::Result<Report> {
    if let Some((id, first, second)) = Metadata::duplicate_ids(defs).into_iter().next() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("duplicate constructor id {id:#010x}: {first} and {second}"),
        ));
    }

    let meta = Metadata::build(defs);
    let mut report = Report::default();

    for (owner, name) in meta.unresolved_references(defs) {
        report.warnings.push(format!("{owner} references undefined type {name}"));
    }
    for def in grouper::skipped_generics(defs) {
        report.warnings.push(format!("skipping generic definition {}", def.full_name()));
    }

    let out = &mut outputs.schema;
    write_header(config, meta.type_count(), out)?;
    write_constructors(defs, &mut report, out)?;
    write_functions(defs, config, &mut report, out)?;
    if config.gen_name_for_id {
        write_name_for_id(defs, out)?;
    }

    Ok(report)
}

// ─── Sections ─────────────────────────────────────────────────────────────────

fn write_header<W: Write>(config: &Config, types: usize, out: &mut W) -> io::Result<()> {
    writeln!(out, "// @generated by tlwire-gen. Do not edit by hand.")?;
    writeln!(out, "// {types} boxed types.")?;
    writeln!(out)?;
    writeln!(out, "#[allow(unused_imports)]")?;
    writeln!(
        out,
        "use {}::{{FieldDescriptor as F, FieldKind as K, FieldType as T, FlagBit, FunctionDescriptor, VariantDescriptor}};",
        config.runtime
    )?;
    writeln!(out)?;
    writeln!(out, "/// The API layer these tables were generated from.")?;
    writeln!(out, "pub const LAYER: i32 = {};", config.layer)?;
    writeln!(out)
}

/// Renders the `&[F { … }, …]` field list, or `None` when a field type
/// cannot be expressed.
fn fields(def: &Definition) -> Option<String> {
    let mut s = String::from("&[");
    for (i, param) in def.params.iter().enumerate() {
        if i > 0 {
            s.push_str(", ");
        }
        s.push_str(&format!("F {{ name: {:?}, kind: {} }}", param.name, n::field_kind(def, param)?));
    }
    s.push(']');
    Some(s)
}

fn write_constructors<W: Write>(
    defs: &[Definition],
    report: &mut Report,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "/// Every data constructor, sorted by name.")?;
    writeln!(out, "pub static CONSTRUCTORS: &[VariantDescriptor] = &[")?;
    for def in grouper::rows(defs, Category::Types) {
        let Some(fields) = fields(def) else {
            report.warnings.push(format!("cannot describe fields of {}", def.full_name()));
            continue;
        };
        writeln!(
            out,
            "    VariantDescriptor {{ id: {:#010x}, name: {:?}, type_name: {:?}, fields: {fields} }},",
            def.id,
            def.full_name(),
            def.ty.full_name(),
        )?;
        report.constructors += 1;
    }
    writeln!(out, "];")?;
    writeln!(out)
}

fn write_functions<W: Write>(
    defs: &[Definition],
    config: &Config,
    report: &mut Report,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "/// Every RPC function, sorted by name.")?;
    writeln!(out, "pub static FUNCTIONS: &[FunctionDescriptor] = &[")?;
    if config.include_functions {
        for def in grouper::rows(defs, Category::Functions) {
            let (Some(params), Some(returns)) = (fields(def), n::field_type(&def.ty)) else {
                report.warnings.push(format!("cannot describe function {}", def.full_name()));
                continue;
            };
            writeln!(
                out,
                "    FunctionDescriptor {{ id: {:#010x}, name: {:?}, params: {params}, returns: {returns} }},",
                def.id,
                def.full_name(),
            )?;
            report.functions += 1;
        }
    }
    writeln!(out, "];")?;
    writeln!(out)
}

fn write_name_for_id<W: Write>(defs: &[Definition], out: &mut W) -> io::Result<()> {
    writeln!(out, "/// Name of the definition with `id`, including builtins and functions.")?;
    writeln!(out, "pub fn name_for_id(id: u32) -> Option<&'static str> {{")?;
    writeln!(out, "    match id {{")?;
    for def in defs {
        writeln!(out, "        {:#010x} => Some({:?}),", def.id, def.full_name())?;
    }
    writeln!(out, "        _ => None,")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")
}
