pub mod args;
pub mod config;
pub mod content;
pub mod discovery;
pub mod errors;
pub mod js_source;
pub mod report;

pub use args::{CheckArgs, Cli, Commands, NormalizeArgs, OutputFormat, ShowArgs};
pub use config::{ConfigBuilder, ConfiguredPlugin, DarkMode, PluginSpec, SourceFormat, TailwindConfig, Theme};
pub use content::{ContentPattern, PatternMatches};
pub use errors::{ManifestError, Result};
pub use report::{CheckReport, ReportBuilder};

use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Load, validate and resolve a configuration
pub fn check(args: &CheckArgs) -> Result<CheckReport> {
    args.validate().map_err(ManifestError::InvalidInput)?;

    let manifest_path = manifest_path(args.config.as_deref(), args.root.as_deref())?;
    info!(path = %manifest_path.display(), "checking Tailwind configuration");

    let config = TailwindConfig::from_file(&manifest_path)?;

    // Content patterns are relative to the manifest location
    let root = manifest_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let matches = content::resolve(&config, root, args.jobs)?;

    let report = ReportBuilder::new(&config)
        .with_manifest_path(manifest_path.clone())
        .with_matches(&matches)
        .build();

    for warning in &report.warnings {
        warn!("{}", warning);
    }
    info!(
        patterns = report.content_patterns,
        files = report.total_files,
        "check complete"
    );

    Ok(report)
}

/// Load a configuration and render its canonical form
pub fn show(args: &ShowArgs) -> Result<String> {
    args.validate().map_err(ManifestError::InvalidInput)?;

    let manifest_path = manifest_path(args.config.as_deref(), args.root.as_deref())?;
    let config = TailwindConfig::from_file(&manifest_path)?;
    render(&config, args.format, args.minify)
}

fn render(config: &TailwindConfig, format: OutputFormat, minify: bool) -> Result<String> {
    match format {
        OutputFormat::Json if minify => config.to_json_compact(),
        OutputFormat::Json => config.to_json_pretty(),
        OutputFormat::Yaml => config.to_yaml(),
    }
}

/// Explicit file, conventional name in `root`, or upward search from the working directory
fn manifest_path(config: Option<&Path>, root: Option<&Path>) -> Result<PathBuf> {
    match (config, root) {
        (Some(path), _) => Ok(path.to_path_buf()),
        (None, Some(root)) => discovery::find_in_dir(root).ok_or_else(|| ManifestError::NotFound {
            start: root.to_path_buf(),
        }),
        (None, None) => discovery::locate(&std::env::current_dir()?),
    }
}

/// Handle normalize command - read a configuration from stdin, write canonical form to stdout
#[cfg(feature = "cli")]
pub async fn handle_normalize_command(args: NormalizeArgs) -> Result<()> {
    use tokio::io::{self, AsyncReadExt, AsyncWriteExt};

    let mut input = String::new();
    let mut stdin = io::stdin();
    stdin
        .read_to_string(&mut input)
        .await
        .map_err(|e| ManifestError::InvalidInput(format!("Failed to read from stdin: {}", e)))?;

    let config = TailwindConfig::parse(&input, args.from, "stdin")?;
    let mut output = render(&config, args.to, false)?;
    if !output.ends_with('\n') {
        output.push('\n');
    }

    let mut stdout = io::stdout();
    stdout
        .write_all(output.as_bytes())
        .await
        .map_err(|e| ManifestError::OutputError {
            path: "stdout".to_string(),
            message: e.to_string(),
        })?;

    stdout.flush().await.map_err(|e| ManifestError::OutputError {
        path: "stdout".to_string(),
        message: e.to_string(),
    })?;

    Ok(())
}
