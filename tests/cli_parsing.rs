use clap::Parser;
use std::path::PathBuf;
use taskroll::cli::{Cli, Commands};

#[test]
fn test_parse_import_defaults() {
    let cli = Cli::try_parse_from(vec!["taskroll", "import"]).unwrap();

    assert!(!cli.json);
    assert!(cli.config.is_none());
    match cli.command {
        Commands::Import(args) => {
            assert!(args.input.is_none());
            assert!(args.output.is_none());
            assert!(!args.quiet);
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_import_with_paths_and_globals() {
    let cli = Cli::try_parse_from(vec![
        "taskroll",
        "import",
        "exports/week3.csv",
        "--output",
        "listing.csv",
        "--quiet",
        "--json",
        "--config",
        "alt.yaml",
    ])
    .unwrap();

    assert!(cli.json);
    assert_eq!(cli.config, Some(PathBuf::from("alt.yaml")));
    match cli.command {
        Commands::Import(args) => {
            assert_eq!(args.input, Some(PathBuf::from("exports/week3.csv")));
            assert_eq!(args.output, Some(PathBuf::from("listing.csv")));
            assert!(args.quiet);
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_report_sections() {
    let cli = Cli::try_parse_from(vec!["taskroll", "report", "--campus", "--tasks"]).unwrap();
    match cli.command {
        Commands::Report(args) => {
            assert!(args.campus);
            assert!(args.tasks);
            assert!(!args.changed);
            assert!(!args.complete);
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_show_requires_identifier() {
    assert!(Cli::try_parse_from(vec!["taskroll", "show"]).is_err());

    let cli = Cli::try_parse_from(vec!["taskroll", "show", "Smith, Al"]).unwrap();
    match cli.command {
        Commands::Show(args) => assert_eq!(args.identifier, "Smith, Al"),
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_runs_limit() {
    let cli = Cli::try_parse_from(vec!["taskroll", "runs"]).unwrap();
    match cli.command {
        Commands::Runs(args) => assert_eq!(args.limit, 10),
        _ => panic!("Wrong top-level command"),
    }

    let cli = Cli::try_parse_from(vec!["taskroll", "-j", "runs", "--limit", "3"]).unwrap();
    assert!(cli.json);
    match cli.command {
        Commands::Runs(args) => assert_eq!(args.limit, 3),
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_init_force() {
    let cli = Cli::try_parse_from(vec!["taskroll", "init", "--force"]).unwrap();
    match cli.command {
        Commands::Init(args) => {
            assert!(args.force);
            assert_eq!(args.path, PathBuf::from("."));
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_unknown_command_fails() {
    assert!(Cli::try_parse_from(vec!["taskroll", "export"]).is_err());
}
