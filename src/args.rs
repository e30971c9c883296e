use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::SourceFormat;

/// Tailwind configuration manifest CLI - Loads, validates and normalizes tailwind.config files
#[derive(Parser, Debug)]
#[command(name = "tailwind-manifest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        default_value_t = false,
        help = "Enable debug logging (RUST_LOG overrides)"
    )]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a configuration and report how its content patterns resolve
    Check(CheckArgs),
    /// Print the canonical form of a configuration
    Show(ShowArgs),
    /// Read a configuration from stdin and write its canonical form to stdout
    Normalize(NormalizeArgs),
}

/// Serialization used for printed configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Arguments for the check command
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Project root holding the configuration
    #[arg(
        short = 'r',
        long = "root",
        value_name = "DIR",
        help = "Project root to look for tailwind.config.* in (defaults to searching upwards from the current directory)"
    )]
    pub root: Option<PathBuf>,

    /// Explicit configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        help = "Path to the configuration file (.js, .cjs, .mjs, .ts, .json, .yaml, .yml)"
    )]
    pub config: Option<PathBuf>,

    /// Treat warnings as failures
    #[arg(
        long = "strict",
        default_value_t = false,
        help = "Exit with an error when the check reports warnings"
    )]
    pub strict: bool,

    /// Number of parallel threads to use
    #[arg(
        short = 'j',
        long = "jobs",
        value_name = "NUM",
        help = "Number of parallel threads to use (defaults to number of CPU cores)"
    )]
    pub jobs: Option<usize>,

    /// Print the report as JSON
    #[arg(
        long = "json",
        default_value_t = false,
        help = "Print the check report as JSON"
    )]
    pub json: bool,
}

/// Arguments for the show command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    #[arg(short = 'r', long = "root", value_name = "DIR", help = "Project root to look for tailwind.config.* in")]
    pub root: Option<PathBuf>,

    #[arg(short = 'c', long = "config", value_name = "PATH", help = "Path to the configuration file")]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Json,
        help = "Output format"
    )]
    pub format: OutputFormat,

    #[arg(
        long = "minify",
        default_value_t = false,
        help = "Print compact JSON"
    )]
    pub minify: bool,
}

/// Arguments for the normalize command
#[derive(Parser, Debug, Clone)]
pub struct NormalizeArgs {
    #[arg(
        long = "from",
        value_enum,
        default_value_t = SourceFormat::Js,
        help = "Syntax of the configuration read from stdin"
    )]
    pub from: SourceFormat,

    #[arg(
        long = "to",
        value_enum,
        default_value_t = OutputFormat::Json,
        help = "Output format"
    )]
    pub to: OutputFormat,
}

impl CheckArgs {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        if self.root.is_some() && self.config.is_some() {
            return Err("--root and --config cannot be used together".to_string());
        }

        if let Some(jobs) = self.jobs {
            if jobs == 0 {
                return Err("Number of jobs must be at least 1".to_string());
            }
        }

        Ok(())
    }
}

impl ShowArgs {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        if self.root.is_some() && self.config.is_some() {
            return Err("--root and --config cannot be used together".to_string());
        }

        if self.minify && self.format != OutputFormat::Json {
            return Err("--minify only applies to JSON output".to_string());
        }

        Ok(())
    }
}
