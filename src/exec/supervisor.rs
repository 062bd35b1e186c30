// src/exec/supervisor.rs

//! Lifecycle of the one supervised backend process.
//!
//! `Absent --start--> Running --stop--> Absent`. There is never more than
//! one process: `start` on a running supervisor stops the old process first.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::errors::{BuildwebError, Result};

use super::process::{ProcessHandle, ProcessLauncher};

/// How long a non-graceful stop waits for the process to exit before killing it.
pub const STOP_TIMEOUT: Duration = Duration::from_secs(3);

/// Pause after a successful launch so the backend can bind its listeners.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

pub struct Supervisor {
    launcher: Box<dyn ProcessLauncher>,
    args: Vec<String>,
    graceful: bool,
    running: Option<Box<dyn ProcessHandle>>,
    stop_timeout: Duration,
    settle_delay: Duration,
}

impl fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("args", &self.args)
            .field("graceful", &self.graceful)
            .field("running", &self.running.as_ref().map(|p| p.id()))
            .finish_non_exhaustive()
    }
}

impl Supervisor {
    pub fn new(launcher: Box<dyn ProcessLauncher>, args: Vec<String>) -> Self {
        Self {
            launcher,
            args,
            graceful: false,
            running: None,
            stop_timeout: STOP_TIMEOUT,
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Whether the backend shuts itself down on interrupt (no forced kill).
    pub fn set_graceful(&mut self, graceful: bool) {
        self.graceful = graceful;
    }

    /// True if a process handle is held and that process has not exited.
    pub fn is_running(&self) -> bool {
        self.running.as_ref().is_some_and(|p| !p.has_exited())
    }

    pub fn has_handle(&self) -> bool {
        self.running.is_some()
    }

    /// Launch `./<binary>` with the configured arguments.
    ///
    /// Blocks for the settle delay after a successful launch.
    pub async fn start(&mut self, binary: &str) -> Result<()> {
        if self.running.is_some() {
            warn!(binary, "a process is still supervised; stopping it before start");
            self.stop().await?;
        }

        let program = Path::new(".").join(binary);
        let handle = self
            .launcher
            .launch(&program, &self.args)
            .map_err(|source| BuildwebError::ProcessLaunch {
                binary: binary.to_string(),
                source,
            })?;

        info!(
            pid = ?handle.id(),
            program = %program.display(),
            args = ?self.args,
            "app is starting"
        );
        self.running = Some(handle);

        sleep(self.settle_delay).await;
        Ok(())
    }

    /// Stop the supervised process, if any.
    ///
    /// Sends the platform's graceful stop request. Unless the backend is
    /// graceful, waits up to the stop timeout, then kills it and waits for
    /// the kill to complete.
    /// If the stop request itself fails the handle is kept so a later stop
    /// can retry.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(mut process) = self.running.take() else {
            return Ok(());
        };

        if process.has_exited() {
            debug!(pid = ?process.id(), "supervised process already exited");
            return Ok(());
        }

        if let Err(e) = process.request_graceful_stop().await {
            self.running = Some(process);
            return Err(BuildwebError::ProcessStop(e));
        }

        if self.graceful {
            debug!(pid = ?process.id(), "interrupt sent; graceful app exits on its own");
            return Ok(());
        }

        if timeout(self.stop_timeout, process.wait()).await.is_err() {
            warn!(
                pid = ?process.id(),
                timeout_ms = self.stop_timeout.as_millis() as u64,
                "app did not exit in time; killing it"
            );
            // The old process must be reaped before anything else is started.
            match process.force_stop() {
                Ok(()) => process.wait().await,
                Err(e) => warn!(pid = ?process.id(), error = %e, "failed to kill the app"),
            }
        }
        Ok(())
    }
}
