mod manifest;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clapper::{CommandParsed, Registry};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use crate::manifest::{Manifest, load_manifest, write_default_manifest};

#[derive(Parser)]
#[command(name = "clapper-demo")]
#[command(version, about = "Resolve command-line tokens against a clapper schema", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a clapper.json schema manifest with the demo schema
    Init(InitArgs),

    /// Resolve tokens against the schema and print every value
    Parse(ParseArgs),

    /// Print the effective schema as JSON
    Schema(SchemaArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Target directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Overwrite an existing clapper.json
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct SchemaSource {
    /// Path to a clapper.json schema manifest
    #[arg(short, long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Leave the root command out of the schema
    #[arg(long)]
    no_root: bool,
}

#[derive(Parser)]
struct ParseArgs {
    #[command(flatten)]
    source: SchemaSource,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Tokens to resolve (use `--` before tokens that start with a dash)
    #[arg(value_name = "TOKENS", trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Parser)]
struct SchemaArgs {
    #[command(flatten)]
    source: SchemaSource,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Parse(args) => parse(args),
        Commands::Schema(args) => schema(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let dest = write_default_manifest(&dir, args.force)?;
    eprintln!("Created: {}", dest.display());
    Ok(())
}

fn parse(args: ParseArgs) -> Result<()> {
    tracing::debug!("executing parse command");

    let registry = load_registry(&args.source)?;
    let parsed = registry.parse(args.tokens.as_slice())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
    } else {
        print!("{}", render(&parsed));
    }
    Ok(())
}

fn schema(args: SchemaArgs) -> Result<()> {
    tracing::debug!("executing schema command");

    let registry = load_registry(&args.source)?;
    println!("{}", serde_json::to_string_pretty(&registry)?);
    Ok(())
}

fn load_registry(source: &SchemaSource) -> Result<Registry> {
    let manifest = match load_manifest(source.schema.as_deref())? {
        Some(loaded) => {
            tracing::debug!(path = %loaded.path.display(), "using schema manifest");
            loaded.manifest
        }
        None => {
            tracing::debug!("no schema manifest found, using demo schema");
            Manifest::demo()
        }
    };
    Ok(manifest.to_registry(source.no_root))
}

fn render(parsed: &CommandParsed) -> String {
    let mut out = format!("sub-command => {:?}\n", parsed.name());
    for (name, arg) in parsed.args() {
        out.push_str(&format!("argument({name}) => {:?}\n", arg.value));
    }
    for (name, flag) in parsed.flags() {
        out.push_str(&format!("flag({name}) => {:?}\n", flag.value));
    }
    out
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
