//! baikal AOT compiler driver
//!
//! Runs the compiler entry gate over a bytecode manifest: constructs the
//! compiler through the factory, filters pathological methods, and compiles
//! the rest into in-memory storage.

use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "baikal-aot")]
#[command(about = "Ahead-of-time compiler gate for baikal bytecode", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v: info, -vv: debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Host property file (TOML) instead of the environment
    #[arg(long, global = true)]
    properties: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report which methods the pathological filter accepts
    Check {
        /// Bytecode manifest (TOML)
        manifest: PathBuf,
    },

    /// Compile every accepted method
    Compile {
        /// Bytecode manifest (TOML)
        manifest: PathBuf,
        /// Compiler kind: name ("optimizing", "quick") or raw tag
        #[arg(short, long, default_value = "optimizing")]
        kind: String,
        /// Compiler options file (TOML)
        #[arg(short, long)]
        options: Option<PathBuf>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the method size limits in effect
    Limits,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let properties = commands::load_properties(cli.properties.as_deref())?;

    match cli.command {
        Commands::Check { manifest } => commands::check::execute(&manifest, &*properties),
        Commands::Compile {
            manifest,
            kind,
            options,
            json,
        } => commands::compile::execute(
            &manifest,
            &kind,
            options.as_deref(),
            json,
            &*properties,
        ),
        Commands::Limits => commands::limits::execute(&*properties),
    }
}
