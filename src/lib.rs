// src/lib.rs

pub mod assets;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, error, info};

use crate::cli::{CliArgs, Command};
use crate::config::{load_and_validate, ProjectConfig, SharedConfig};
use crate::engine::{
    resolve_targets, run_distribution, run_interactive, Backends, DistOptions, Target, TaskRunner,
};
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::AssetKind;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the task runner and its collaborators
/// - the selected run mode
/// - Ctrl-C handling (interactive mode)
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    match args.command {
        Command::Check => {
            print_check(&cfg, &RealFileSystem);
            Ok(())
        }
        Command::Run { args: run_args } => {
            let run_args = if run_args.is_empty() {
                cfg.package.run_args.clone()
            } else {
                run_args
            };
            let runner = TaskRunner::new(SharedConfig::new(cfg), Backends::real(), run_args);

            run_interactive(runner, ctrl_c()).await?;
            info!("buildweb stopped");
            Ok(())
        }
        Command::Dist { skip_tests } => {
            let mut runner = TaskRunner::new(SharedConfig::new(cfg), Backends::real(), Vec::new());
            let options = DistOptions {
                run_tests: !skip_tests,
            };
            run_distribution(&mut runner, options).await?;
            Ok(())
        }
    }
}

/// Resolves on the first Ctrl-C. If the signal can't be listened for, never
/// resolves.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

/// Print package, targets and the asset catalog without running anything.
fn print_check(cfg: &ProjectConfig, fs: &dyn FileSystem) {
    println!("buildweb check");
    println!("  package = {}-{}", cfg.package.name, cfg.package.version);
    println!("  is_graceful = {}", cfg.package.is_graceful);
    println!("  toolchain = {}", cfg.toolchain.program.display());
    if !cfg.package.build_opts.is_empty() {
        println!("  build_opts (dev) = {:?}", cfg.package.build_opts);
    }
    if !cfg.distribution.build_opts.is_empty() {
        println!("  build_opts (dist) = {:?}", cfg.distribution.build_opts);
    }
    println!();

    let targets = resolve_targets(&cfg.distribution.cross_targets(), &Target::host());
    println!("distribution targets ({}):", targets.len());
    for target in &targets {
        println!(
            "  - {target}: {}",
            target.binary_name(&cfg.package.name, &cfg.package.version)
        );
    }
    println!();

    println!("assets:");
    for kind in AssetKind::ALL {
        let dir = cfg.assets.output_dir(kind);
        let state = if fs.exists(&dir) { "" } else { " (missing)" };
        let cmd = cfg.assets.compiler_command(kind).unwrap_or("<none>");
        println!("  {kind}: {}{state}", dir.display());
        println!("      cmd: {cmd}");
    }
    for set in &cfg.assets.vendor_sets {
        println!("  - vendor {}", set.name);
    }
    for entry in &cfg.assets.entries {
        println!("  - entry {}", entry.name);
    }

    debug!("check complete (no execution)");
}
