// src/engine/shell.rs

//! The two run modes.
//!
//! - [`run_interactive`]: development build through the task queue, with the
//!   backend restarted after each successful cycle.
//! - [`run_distribution`]: one production pass, called directly without the
//!   queue, failing fast and building every distribution target.

use std::future::Future;

use tracing::{error, info};

use crate::errors::{BuildwebError, Result};
use crate::types::{AssetKind, BuildMode};

use super::queue::spawn_task_runner;
use super::runner::TaskRunner;
use super::target::resolve_targets;
use super::{Task, TaskKind};

/// The batch the interactive loop starts with: every asset kind, then the
/// binary. Tests only run when explicitly enqueued.
pub fn default_cycle() -> Vec<Task> {
    vec![
        Task::all(TaskKind::BuildImages),
        Task::all(TaskKind::BuildStyles),
        Task::all(TaskKind::BuildScripts),
        Task::all(TaskKind::BuildBinary),
    ]
}

/// Run the development loop until `shutdown` resolves.
///
/// Returns the runner once the supervised process has been stopped.
pub async fn run_interactive<F>(mut runner: TaskRunner, shutdown: F) -> Result<TaskRunner>
where
    F: Future<Output = ()>,
{
    runner.set_mode(BuildMode::Development);

    let (queue, handle) = spawn_task_runner(runner);
    queue.enqueue(default_cycle())?;

    shutdown.await;
    queue.shutdown()?;

    handle
        .await
        .map_err(|e| BuildwebError::Other(anyhow::Error::from(e)))
}

/// Options for a distribution pass.
#[derive(Debug, Clone, Copy)]
pub struct DistOptions {
    /// Gate the binary builds on the root module's tests.
    pub run_tests: bool,
}

impl Default for DistOptions {
    fn default() -> Self {
        Self { run_tests: true }
    }
}

/// Build everything for release: assets, tests, and one binary per unique
/// target. Aborts on the first failure.
///
/// Returns the built binary names in build order.
pub async fn run_distribution(runner: &mut TaskRunner, options: DistOptions) -> Result<Vec<String>> {
    runner.set_mode(BuildMode::Production);
    let mode = BuildMode::Production;

    let (name, version, cross_targets) = {
        let cfg = runner.steps().config().read().await;
        (
            cfg.package.name.clone(),
            cfg.package.version.clone(),
            cfg.distribution.cross_targets(),
        )
    };
    info!("creating distribution package for {}-{}", name, version);

    for kind in AssetKind::ALL {
        runner
            .steps()
            .build_assets(kind, None, mode)
            .await
            .inspect_err(|e| error!(%kind, error = %e, "error when building assets"))?;
    }

    if options.run_tests {
        runner
            .steps()
            .run_tests(None)
            .await
            .inspect_err(|e| error!(error = %e, "you have failed test cases"))?;
    }

    let targets = resolve_targets(&cross_targets, runner.steps().host());
    let mut built = Vec::with_capacity(targets.len());
    for target in &targets {
        let binary = runner
            .build_binary_for(Some(target))
            .await
            .inspect_err(|e| error!(%target, error = %e, "error when building binary"))?;
        built.push(binary);
    }

    // TODO: bundle the built binaries together with the public/ assets into
    // one archive per target.
    info!(binaries = ?built, "distribution build finished");
    Ok(built)
}
