// src/engine/runner.rs

//! Task dispatch and the restart step.

use tracing::{debug, error, info, warn};

use crate::config::SharedConfig;
use crate::errors::{BuildwebError, Result};
use crate::exec::Supervisor;
use crate::types::{AssetKind, BuildMode};

use super::backends::Backends;
use super::state::ShellState;
use super::steps::BuildSteps;
use super::target::Target;
use super::{Task, TaskKind};

/// Owns the build steps, the supervisor and all mutable build state.
///
/// Exactly one `TaskRunner` exists per run; in interactive mode it is moved
/// into the queue consumer (see [`super::queue::spawn_task_runner`]).
#[derive(Debug)]
pub struct TaskRunner {
    steps: BuildSteps,
    supervisor: Supervisor,
    state: ShellState,
}

impl TaskRunner {
    /// Wire a runner from config and collaborators. `run_args` are passed to
    /// the supervised binary.
    pub fn new(config: SharedConfig, backends: Backends, run_args: Vec<String>) -> Self {
        let steps = BuildSteps::new(config, backends.fs, backends.assets, backends.tool);
        let supervisor = Supervisor::new(backends.launcher, run_args);
        Self::from_parts(steps, supervisor)
    }

    pub fn from_parts(steps: BuildSteps, supervisor: Supervisor) -> Self {
        Self {
            steps,
            supervisor,
            state: ShellState::default(),
        }
    }

    pub fn set_mode(&mut self, mode: BuildMode) {
        self.state.mode = mode;
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn steps(&self) -> &BuildSteps {
        &self.steps
    }

    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    /// Start a new cycle: forget failures from the previous batch.
    pub fn begin_cycle(&mut self) {
        self.state.last_error = None;
    }

    /// Execute one task to completion.
    ///
    /// Failures are logged and recorded in `last_error`; they never stop the
    /// caller from running the next task.
    pub async fn execute(&mut self, task: &Task) {
        let mode = self.state.mode;
        debug!(kind = ?task.kind(), scope = ?task.scope(), "executing task");

        let result = match task.kind() {
            TaskKind::BuildImages => {
                self.steps.build_assets(AssetKind::Images, task.scope(), mode).await
            }
            TaskKind::BuildStyles => {
                self.steps.build_assets(AssetKind::Styles, task.scope(), mode).await
            }
            TaskKind::BuildScripts => {
                self.steps.build_assets(AssetKind::Scripts, task.scope(), mode).await
            }
            TaskKind::RunTests => self.steps.run_tests(task.scope()).await,
            TaskKind::BuildBinary => self.build_binary_for(None).await.map(|_| ()),
            TaskKind::RestartProcess => {
                self.restart().await;
                return;
            }
        };

        if let Err(err) = result {
            self.record_failure(task, err);
        }
    }

    /// Build the backend binary and, on success, remember it as the binary
    /// to start on the next restart.
    pub async fn build_binary_for(&mut self, target: Option<&Target>) -> Result<String> {
        let name = self.steps.build_binary(target, self.state.mode).await?;
        self.state.binary_name = Some(name.clone());
        Ok(name)
    }

    fn record_failure(&mut self, task: &Task, err: BuildwebError) {
        error!(
            kind = ?task.kind(),
            scope = task.scope().unwrap_or("<all>"),
            error = %err,
            "build step failed"
        );
        self.state.last_error = Some(err);
    }

    /// Stop the running backend and start the freshly built one, unless a
    /// step of this cycle failed.
    async fn restart(&mut self) {
        if let Some(err) = &self.state.last_error {
            warn!(error = %err, "you have errors with current assets and binary, please fix that ...");
        } else if let Some(binary) = self.state.binary_name.clone() {
            let graceful = self.steps.config().read().await.package.is_graceful;
            self.supervisor.set_graceful(graceful);

            if let Err(e) = self.supervisor.stop().await {
                error!(error = %e, "app cannot be stopped, maybe you should restart buildweb");
            } else if let Err(e) = self.supervisor.start(&binary).await {
                error!(error = %e, "app cannot be started, maybe you should restart buildweb");
            }
        } else {
            warn!("no binary has been built yet; nothing to start");
        }

        info!("waiting for the file changes ...");
    }

    /// Stop the supervised process on the way out.
    pub async fn shutdown(&mut self) {
        let graceful = self.steps.config().read().await.package.is_graceful;
        self.supervisor.set_graceful(graceful);
        if let Err(e) = self.supervisor.stop().await {
            error!(error = %e, "app cannot be stopped on shutdown");
        }
    }
}
