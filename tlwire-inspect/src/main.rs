//! tlwire-inspect: decode TL payloads and browse the bundled schema.
//!
//! ```text
//! tlwire-inspect decode a810e43515c4b51c00000000
//! tlwire-inspect decode --function payments.getSavedInfo - < response.hex
//! tlwire-inspect list payments.PaymentForm
//! tlwire-inspect show payments.savedInfo
//! ```
//!
//! Logging goes through `env_logger`; set `RUST_LOG=tlwire=trace` to see why
//! a payload was rejected.

mod input;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tlwire::{DecodeLimits, Decoder, Registry, Value, describe_call_pretty, describe_pretty};

#[derive(Parser)]
#[command(name = "tlwire-inspect")]
#[command(about = "Decode MTProto TL payloads against the bundled schema", long_about = None)]
#[command(version)]
struct Cli {
    /// Deepest allowed object/vector nesting
    #[arg(long, global = true, default_value_t = DecodeLimits::default().max_depth)]
    max_depth: usize,

    /// Largest allowed vector element count
    #[arg(long, global = true, default_value_t = DecodeLimits::default().max_vector_len)]
    max_vector_len: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a hex payload
    Decode(DecodeArgs),
    /// List types, or the constructors of one type
    List {
        /// Boxed type name, e.g. `payments.PaymentForm`
        type_name: Option<String>,
        /// List functions instead of types
        #[arg(long, conflicts_with = "type_name")]
        functions: bool,
    },
    /// Print the definition of a constructor or function
    Show {
        /// Name, or signature as `#35e410a8` / `0x35e410a8`
        name: String,
    },
}

#[derive(Args)]
struct DecodeArgs {
    /// Hex payload (use '-' for stdin)
    input: String,

    /// Expect a boxed value of this type
    #[arg(long = "type", value_name = "TYPE", conflicts_with = "function")]
    type_name: Option<String>,

    /// Decode the payload as the response to this function
    #[arg(long, value_name = "FUNCTION")]
    function: Option<String>,

    /// Print on one line
    #[arg(long)]
    compact: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("✗ {e:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let limits = DecodeLimits { max_depth: cli.max_depth, max_vector_len: cli.max_vector_len };
    match cli.command {
        Command::Decode(args) => decode(&args, limits),
        Command::List { type_name: Some(name), .. } => list_variants(&name),
        Command::List { functions: true, .. } => Ok(list_functions()),
        Command::List { .. } => Ok(list_types()),
        Command::Show { name } => show(&name),
    }
}

// ─── decode ──────────────────────────────────────────────────────────────────

fn decode(args: &DecodeArgs, limits: DecodeLimits) -> Result<String> {
    let bytes = input::read(&args.input)?;
    log::debug!("decoding {} bytes", bytes.len());
    let registry = Registry::global();
    let mut decoder = Decoder::new(&bytes).limits(limits);

    let render = |value: Value| {
        if args.compact { value.to_string() } else { describe_pretty(&value) }
    };

    if let Some(name) = &args.function {
        let function = registry
            .function_by_name(name)
            .with_context(|| format!("unknown function {name}"))?;
        let value = decoder
            .read_value(&function.returns)
            .with_context(|| format!("decoding response to {name}"))?;
        decoder.finish()?;
        return Ok(render(value));
    }

    if let Some(ty) = &args.type_name {
        let object = decoder.read_boxed(ty).with_context(|| format!("decoding {ty}"))?;
        decoder.finish()?;
        return Ok(render(Value::Object(object)));
    }

    let id = decoder.peek_id()?;
    if registry.function(id).is_some() {
        let call = decoder.read_call()?;
        decoder.finish()?;
        return Ok(if args.compact { call.to_string() } else { describe_call_pretty(&call) });
    }

    let object = decoder.read_any()?;
    decoder.finish()?;
    Ok(render(Value::Object(object)))
}

// ─── list / show ─────────────────────────────────────────────────────────────

fn list_types() -> String {
    let registry = Registry::global();
    registry
        .type_names()
        .into_iter()
        .map(|ty| format!("{ty} ({})", registry.variants_of(ty).len()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn list_variants(type_name: &str) -> Result<String> {
    let variants = Registry::global().variants_of(type_name);
    if variants.is_empty() {
        bail!("unknown type {type_name}");
    }
    Ok(variants.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"))
}

fn list_functions() -> String {
    Registry::global()
        .functions()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn show(name: &str) -> Result<String> {
    let registry = Registry::global();
    if let Some(id) = parse_id(name) {
        if let Some(c) = registry.constructor(id) {
            return Ok(c.to_string());
        }
        if let Some(f) = registry.function(id) {
            return Ok(f.to_string());
        }
        if let Some(builtin) = registry.name_for_id(id) {
            return Ok(format!("{builtin}#{id:08x} (builtin)"));
        }
        bail!("no definition with signature #{id:08x}");
    }
    if let Some(c) = registry.constructor_by_name(name) {
        return Ok(c.to_string());
    }
    if let Some(f) = registry.function_by_name(name) {
        return Ok(f.to_string());
    }
    bail!("no constructor or function named {name}")
}

fn parse_id(text: &str) -> Option<u32> {
    let digits = text
        .strip_prefix('#')
        .or_else(|| text.strip_prefix("0x"))?;
    u32::from_str_radix(digits, 16).ok()
}
