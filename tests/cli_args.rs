// tests/cli_args.rs

use buildweb::cli::{CliArgs, Command, LogLevel};
use clap::Parser;

#[test]
fn run_collects_arguments_after_double_dash() {
    let args = CliArgs::try_parse_from(["buildweb", "run", "--", "-port", "9000"]).unwrap();

    assert_eq!(args.config, "buildweb.toml");
    match args.command {
        Command::Run { args } => assert_eq!(args, vec!["-port", "9000"]),
        other => panic!("Expected Run, got: {:?}", other),
    }
}

#[test]
fn dist_accepts_global_flags_after_subcommand() {
    let args = CliArgs::try_parse_from([
        "buildweb",
        "dist",
        "--skip-tests",
        "--config",
        "web/buildweb.toml",
        "--log-level",
        "debug",
    ])
    .unwrap();

    assert_eq!(args.config, "web/buildweb.toml");
    assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    assert!(matches!(args.command, Command::Dist { skip_tests: true }));
}

#[test]
fn subcommand_is_required() {
    assert!(CliArgs::try_parse_from(["buildweb"]).is_err());
}
