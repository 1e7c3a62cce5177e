//! rpc-bones CLI
//!
//! Command-line interface for generating example method stubs from
//! protobuf descriptor sets.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use rpc_bones_common::{Lang, QuoteStyle, RenderOptions};
use rpc_bones_generator::{write_stub, MethodOutcome, StubGenerator, WriteStatus};
use rpc_bones_parser::load_protoset;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rpc-bones")]
#[command(version, about = "Generate example stubs for gRPC methods", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one stub per method
    #[command(after_help = "EXAMPLES:\n  \
        # Print every stub to stdout\n  \
        rpc-bones generate --protoset greet.pb\n\n  \
        # Write JavaScript stubs for one service into a directory\n  \
        rpc-bones generate \\\n    \
        --protoset greet.pb \\\n    \
        --lang js \\\n    \
        --method-dir ./methods \\\n    \
        greet.Greeter\n\n  \
        # Type names only, overwriting existing files\n  \
        rpc-bones generate --protoset greet.pb --minimal --method-dir ./methods --force")]
    Generate {
        /// Path to a binary FileDescriptorSet (protoc --descriptor_set_out)
        #[arg(short, long)]
        protoset: PathBuf,

        /// Write each stub to <DIR>/<pkg.Service.Method>.<ext> instead of stdout
        #[arg(short, long)]
        method_dir: Option<PathBuf>,

        /// Overwrite existing stub files
        #[arg(short, long, requires = "method_dir")]
        force: bool,

        /// Target language of the stubs
        #[arg(short, long, value_enum, default_value_t = LangArg::Jsonnet)]
        lang: LangArg,

        /// Quote character for strings and keys
        #[arg(long, value_enum, default_value_t = QuoteArg::Double)]
        quote_style: QuoteArg,

        /// Only show request and response type names
        #[arg(long)]
        minimal: bool,

        /// Omit field type comments
        #[arg(long)]
        no_annotate: bool,

        /// How often a message type may be expanded along one path
        #[arg(long, default_value_t = 1)]
        expansion_budget: u32,

        /// Add a metadata parameter to every stub
        #[arg(long)]
        metadata_param: bool,

        /// Restrict generation to packages, services or methods
        /// (e.g. `greet`, `greet.Greeter`, `Greeter.Hello`, `Hello`)
        targets: Vec<String>,
    },

    /// Display the descriptor model read from a descriptor set
    Inspect {
        /// Path to a binary FileDescriptorSet
        #[arg(short, long)]
        protoset: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LangArg {
    /// Jsonnet function
    Jsonnet,
    /// JavaScript function
    Js,
}

impl From<LangArg> for Lang {
    fn from(arg: LangArg) -> Self {
        match arg {
            LangArg::Jsonnet => Lang::Jsonnet,
            LangArg::Js => Lang::Js,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum QuoteArg {
    Double,
    Single,
}

impl From<QuoteArg> for QuoteStyle {
    fn from(arg: QuoteArg) -> Self {
        match arg {
            QuoteArg::Double => QuoteStyle::Double,
            QuoteArg::Single => QuoteStyle::Single,
        }
    }
}

/// Where generated stubs go
struct OutputTarget<'a> {
    method_dir: Option<&'a Path>,
    force: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = cli.verbose || debug_env();
    init_tracing(verbose);

    match cli.command {
        Commands::Generate {
            protoset,
            method_dir,
            force,
            lang,
            quote_style,
            minimal,
            no_annotate,
            expansion_budget,
            metadata_param,
            targets,
        } => {
            let options = RenderOptions {
                annotate: !no_annotate,
                expansion_budget,
                include_metadata_param: metadata_param,
                quote_style: quote_style.into(),
                lang: lang.into(),
                minimal,
            };
            generate_command(
                &protoset,
                options,
                &targets,
                OutputTarget {
                    method_dir: method_dir.as_deref(),
                    force,
                },
            )?;
        }
        Commands::Inspect { protoset } => {
            inspect_command(&protoset)?;
        }
    }

    Ok(())
}

/// `DEBUG=1|yes|true` enables verbose output as well
fn debug_env() -> bool {
    std::env::var("DEBUG")
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "yes" | "true"))
        .unwrap_or(false)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::builder()
        .parse_lossy(std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_owned()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn generate_command(
    protoset: &Path,
    options: RenderOptions,
    targets: &[String],
    output: OutputTarget<'_>,
) -> Result<()> {
    eprintln!("{} Loading descriptor set: {}", "→".cyan(), protoset.display());
    let model = load_protoset(protoset)
        .with_context(|| format!("Failed to load descriptor set {}", protoset.display()))?;

    tracing::debug!(
        services = model.services().len(),
        lang = %options.lang,
        budget = options.expansion_budget,
        "descriptor set loaded"
    );

    if let Some(dir) = output.method_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create method directory {}", dir.display()))?;
    }

    let generator = StubGenerator::new(model, options).context("Failed to create generator")?;
    let outcomes = generator.generate(targets);

    if outcomes.is_empty() {
        eprintln!("{} No methods matched", "⚠".yellow());
        return Ok(());
    }

    let total = outcomes.len();
    let mut failed = 0;
    for outcome in outcomes {
        if let Err(e) = emit(outcome, &output) {
            failed += 1;
            eprintln!("{} {:#}", "✗".red(), e);
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} methods failed", failed, total);
    }

    if output.method_dir.is_some() {
        eprintln!("\n{}", "✓ Generation complete!".green().bold());
    }
    Ok(())
}

/// Print or write one generated stub
fn emit(outcome: MethodOutcome, output: &OutputTarget<'_>) -> Result<()> {
    let MethodOutcome { method, result } = outcome;
    let stub = result.with_context(|| format!("Failed to generate {}", method))?;

    match output.method_dir {
        Some(dir) => match write_stub(dir, &stub, output.force)
            .with_context(|| format!("Failed to write {}", method))?
        {
            WriteStatus::Created(path) => {
                eprintln!("{} {}", "✓".green(), path.display());
            }
            WriteStatus::Skipped(path) => {
                eprintln!(
                    "{} {} exists, use --force to overwrite",
                    "→".cyan(),
                    path.display()
                );
            }
        },
        None => {
            println!("{}", stub.text);
            println!();
        }
    }

    Ok(())
}

fn inspect_command(protoset: &Path) -> Result<()> {
    eprintln!("{} Loading descriptor set: {}", "→".cyan(), protoset.display());
    let model = load_protoset(protoset)
        .with_context(|| format!("Failed to load descriptor set {}", protoset.display()))?;

    let messages = model.messages().count();
    let enums = model.enums().count();
    let methods = model.methods().count();
    eprintln!(
        "{} {} services, {} methods, {} messages, {} enums",
        "✓".green(),
        model.services().len(),
        methods,
        messages,
        enums
    );

    let json = serde_json::to_string_pretty(&model).context("Failed to serialize model")?;
    println!("{}", json);
    Ok(())
}
