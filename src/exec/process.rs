// src/exec/process.rs

//! Platform capability interface for the supervised child process.
//!
//! The supervisor only ever talks to [`ProcessLauncher`] / [`ProcessHandle`];
//! signal semantics live behind `request_graceful_stop`, which is a SIGINT on
//! Unix and a plain kill on platforms without a cooperative interrupt.

use std::io;
use std::path::Path;
use std::process::Stdio;

use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use super::BoxFuture;

/// A launched process that the supervisor owns exclusively.
pub trait ProcessHandle: Send {
    fn id(&self) -> Option<u32>;

    /// True once the process has been reaped.
    fn has_exited(&self) -> bool;

    /// Ask the process to shut down on its own. A process that has already
    /// exited is not an error.
    fn request_graceful_stop(&mut self) -> BoxFuture<'_, io::Result<()>>;

    /// Kill the process without giving it a chance to clean up. Completion
    /// is observed through [`ProcessHandle::wait`].
    fn force_stop(&mut self) -> io::Result<()>;

    /// Resolve once the process has exited and been reaped.
    fn wait(&mut self) -> BoxFuture<'_, ()>;
}

/// Starts supervised processes.
pub trait ProcessLauncher: Send {
    fn launch(&mut self, program: &Path, args: &[String]) -> io::Result<Box<dyn ProcessHandle>>;
}

/// Requests from a [`ChildProcess`] to the task that owns the child.
#[derive(Debug)]
enum Control {
    Interrupt(oneshot::Sender<io::Result<()>>),
    Kill,
}

/// Launches real child processes with stdout/stderr wired to the console.
#[derive(Debug, Clone, Default)]
pub struct ChildLauncher;

impl ProcessLauncher for ChildLauncher {
    fn launch(&mut self, program: &Path, args: &[String]) -> io::Result<Box<dyn ProcessHandle>> {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?;

        let pid = child.id();
        let (control_tx, control_rx) = mpsc::unbounded_channel::<Control>();
        let (exit_tx, exit_rx) = watch::channel(false);

        tokio::spawn(reap(child, control_rx, exit_tx));

        Ok(Box::new(ChildProcess {
            pid,
            control: control_tx,
            exited: exit_rx,
        }))
    }
}

/// Owns the child until it has been reaped. Signals are only ever delivered
/// from here, so they can't reach a recycled pid.
async fn reap(
    mut child: Child,
    mut control: mpsc::UnboundedReceiver<Control>,
    exit_tx: watch::Sender<bool>,
) {
    let pid = child.id();
    loop {
        tokio::select! {
            status = child.wait() => {
                match status {
                    Ok(status) => info!(?pid, %status, "supervised process exited"),
                    Err(e) => warn!(?pid, error = %e, "failed to wait for supervised process"),
                }
                break;
            }
            Some(request) = control.recv() => match request {
                Control::Interrupt(reply) => {
                    let _ = reply.send(interrupt(&mut child).await);
                }
                Control::Kill => {
                    if let Err(e) = child.kill().await {
                        warn!(?pid, error = %e, "failed to kill supervised process");
                    } else {
                        info!(?pid, "supervised process killed");
                    }
                }
            },
        }
    }
    let _ = exit_tx.send(true);
}

#[cfg(unix)]
async fn interrupt(child: &mut Child) -> io::Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    // `id()` is `None` once the child has been reaped.
    let Some(pid) = child.id() else {
        return Ok(());
    };
    kill(Pid::from_raw(pid as i32), Signal::SIGINT).map_err(io::Error::from)
}

#[cfg(not(unix))]
async fn interrupt(child: &mut Child) -> io::Result<()> {
    child.kill().await
}

/// Handle to a child owned by a reaper task.
#[derive(Debug)]
pub struct ChildProcess {
    pid: Option<u32>,
    control: mpsc::UnboundedSender<Control>,
    exited: watch::Receiver<bool>,
}

impl ProcessHandle for ChildProcess {
    fn id(&self) -> Option<u32> {
        self.pid
    }

    fn has_exited(&self) -> bool {
        *self.exited.borrow()
    }

    fn request_graceful_stop(&mut self) -> BoxFuture<'_, io::Result<()>> {
        Box::pin(async move {
            let (reply_tx, reply_rx) = oneshot::channel();
            if self.control.send(Control::Interrupt(reply_tx)).is_err() {
                debug!(pid = ?self.pid, "process already reaped; nothing to interrupt");
                return Ok(());
            }
            // A dropped reply means the reaper saw the exit first.
            reply_rx.await.unwrap_or(Ok(()))
        })
    }

    fn force_stop(&mut self) -> io::Result<()> {
        if self.control.send(Control::Kill).is_err() {
            debug!(pid = ?self.pid, "process already reaped when kill was requested");
        }
        Ok(())
    }

    fn wait(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            // An error means the reaper is gone, which only happens after exit.
            let _ = self.exited.wait_for(|done| *done).await;
        })
    }
}
