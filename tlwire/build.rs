//! Build script: parse `tl/api.tl` and generate the descriptor tables.
//!
//! Moving to a new layer means replacing `tl/api.tl`; the `// LAYER N`
//! header on its first line becomes `tlwire::LAYER`.

use std::env;
use std::fs;
use std::io;

use tlwire_gen::{Config, Outputs, generate};
use tlwire_parser::{Definition, parse_layer, parse_tl_file};

const SCHEMA: &str = "tl/api.tl";

fn main() -> io::Result<()> {
    let out_dir = env::var("OUT_DIR").map_err(|e| io::Error::other(format!("OUT_DIR: {e}")))?;

    println!("cargo:rerun-if-changed={SCHEMA}");
    let content = fs::read_to_string(SCHEMA)?;

    let mut defs: Vec<Definition> = Vec::new();
    for result in parse_tl_file(&content) {
        match result {
            Ok(def) => defs.push(def),
            Err(e) => println!("cargo:warning=TL parse error in {SCHEMA}: {e}"),
        }
    }

    let config = Config {
        gen_name_for_id: cfg!(feature = "name-for-id"),
        include_functions: cfg!(feature = "functions"),
        layer: parse_layer(&content).unwrap_or(0),
        ..Config::default()
    };

    let mut outputs = Outputs::from_dir(&out_dir)?;
    let report = generate(&defs, &config, &mut outputs)?;
    outputs.flush()?;

    for warning in &report.warnings {
        println!("cargo:warning={warning}");
    }

    Ok(())
}
