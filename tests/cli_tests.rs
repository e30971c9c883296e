use clap::Parser;
use tailwind_manifest::{CheckArgs, Cli, Commands, OutputFormat, ShowArgs, SourceFormat};

#[test]
fn test_cli_parse_check_defaults() {
    let cli = Cli::parse_from(["tailwind-manifest", "check"]);

    assert!(!cli.verbose);
    match cli.command {
        Commands::Check(args) => {
            assert!(args.root.is_none());
            assert!(args.config.is_none());
            assert!(!args.strict);
            assert!(!args.json);
            assert_eq!(args.jobs, None);
        }
        other => panic!("Unexpected command: {:?}", other),
    }
}

#[test]
fn test_cli_parse_check_with_flags() {
    let cli = Cli::parse_from([
        "tailwind-manifest",
        "check",
        "-c", "web/tailwind.config.js",
        "--strict",
        "--json",
        "-j", "4",
        "-v",
    ]);

    assert!(cli.verbose);
    match cli.command {
        Commands::Check(args) => {
            assert_eq!(args.config.unwrap().to_str().unwrap(), "web/tailwind.config.js");
            assert!(args.strict);
            assert!(args.json);
            assert_eq!(args.jobs, Some(4));
        }
        other => panic!("Unexpected command: {:?}", other),
    }
}

#[test]
fn test_cli_parse_show() {
    let cli = Cli::parse_from(["tailwind-manifest", "show", "--root", "site", "--format", "yaml"]);

    match cli.command {
        Commands::Show(args) => {
            assert_eq!(args.root.unwrap().to_str().unwrap(), "site");
            assert_eq!(args.format, OutputFormat::Yaml);
            assert!(!args.minify);
        }
        other => panic!("Unexpected command: {:?}", other),
    }
}

#[test]
fn test_cli_parse_normalize() {
    let cli = Cli::parse_from(["tailwind-manifest", "normalize"]);
    match cli.command {
        Commands::Normalize(args) => {
            assert_eq!(args.from, SourceFormat::Js);
            assert_eq!(args.to, OutputFormat::Json);
        }
        other => panic!("Unexpected command: {:?}", other),
    }

    let cli = Cli::parse_from(["tailwind-manifest", "normalize", "--from", "ts", "--to", "yaml"]);
    match cli.command {
        Commands::Normalize(args) => {
            assert_eq!(args.from, SourceFormat::TypeScript);
            assert_eq!(args.to, OutputFormat::Yaml);
        }
        other => panic!("Unexpected command: {:?}", other),
    }
}

#[test]
fn test_cli_rejects_unknown_format() {
    assert!(Cli::try_parse_from(["tailwind-manifest", "show", "--format", "toml"]).is_err());
}

#[test]
fn test_check_args_validate() {
    let mut args = CheckArgs {
        root: None,
        config: None,
        strict: false,
        jobs: None,
        json: false,
    };

    assert!(args.validate().is_ok());

    // Root and config together should fail
    args.root = Some("site".into());
    args.config = Some("site/tailwind.config.js".into());
    assert!(args.validate().is_err());
    args.config = None;
    assert!(args.validate().is_ok());

    // Zero jobs should fail
    args.jobs = Some(0);
    assert!(args.validate().is_err());

    args.jobs = Some(2);
    assert!(args.validate().is_ok());
}

#[test]
fn test_show_args_validate() {
    let mut args = ShowArgs {
        root: None,
        config: None,
        format: OutputFormat::Yaml,
        minify: true,
    };

    // Minify is JSON only
    assert!(args.validate().is_err());

    args.format = OutputFormat::Json;
    assert!(args.validate().is_ok());
}
