use anyhow::Context;
use clap::Parser;
use tailwind_manifest::{check, handle_normalize_command, show, Cli, CheckReport, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check(args) => match check(&args) {
            Ok(report) => {
                if args.json {
                    println!("{}", report.to_pretty_json()?);
                } else {
                    print_summary(&report);
                }

                if args.strict && report.has_warnings() {
                    std::process::exit(1);
                }
                Ok(())
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Show(args) => {
            let output = show(&args).context("failed to load Tailwind configuration")?;
            println!("{}", output.trim_end());
            Ok(())
        }
        Commands::Normalize(args) => {
            handle_normalize_command(args).await?;
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "tailwind_manifest=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_summary(report: &CheckReport) {
    match &report.manifest_path {
        Some(path) => println!("Configuration OK: {}", path.display()),
        None => println!("Configuration OK"),
    }
    println!("  - darkMode: {}", report.dark_mode);
    println!(
        "  - {} content patterns matching {} files",
        report.content_patterns, report.total_files
    );
    for pattern in &report.patterns {
        println!("      {} ({} files)", pattern.pattern, pattern.matched_files);
    }
    println!("  - {} plugins", report.plugin_count);

    for warning in &report.warnings {
        println!("  ! {}", warning);
    }
}
