//! Mosaic CLI tool
//!
//! Inspects how the modules of a `mosaic.toml` project are resolved:
//! their symbol sources, checkers, platform services and diagnostics.

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use output::{resolve_color_choice, ColorMode, StyledOutput};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mosaic")]
#[command(about = "Multi-platform module resolution inspector", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to mosaic.toml (default: search upward from the current directory)
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    /// Log resolution steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// When to color output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,

    #[command(subcommand)]
    command: Commands,
}

/// Output format of `mosaic resolve`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable
    Pretty,
    /// JSON
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Build module resolvers and describe them
    Resolve {
        /// Modules to resolve (default: all)
        modules: Vec<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },

    /// Resolve a qualified name as seen from a module
    Lookup {
        /// Module to resolve from
        module: String,
        /// Qualified name, e.g. demo.Greeter
        fq_name: String,
    },

    /// Show the merged service set of a platform combination
    Imports {
        /// Platform components, e.g. jvm,common
        platform: String,
    },

    /// Run declaration checkers and report diagnostics
    Check {
        /// Modules to check (default: all)
        modules: Vec<String>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("MOSAIC_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut out = StyledOutput::new(resolve_color_choice(cli.color));
    let manifest = cli.manifest.as_deref();

    let success = match cli.command {
        Commands::Resolve { modules, format } => {
            commands::resolve::execute(&mut out, manifest, &modules, format)?
        }
        Commands::Lookup { module, fq_name } => {
            commands::lookup::execute(&mut out, manifest, &module, &fq_name)?
        }
        Commands::Imports { platform } => commands::imports::execute(&mut out, &platform)?,
        Commands::Check { modules } => commands::check::execute(&mut out, manifest, &modules)?,
    };
    out.flush();

    if !success {
        std::process::exit(1);
    }
    Ok(())
}
