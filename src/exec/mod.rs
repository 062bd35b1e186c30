// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`tool`] runs the backend toolchain (`build`, `test`).
//! - [`process`] is the platform capability interface for the supervised
//!   process, with a `tokio::process` implementation.
//! - [`supervisor`] owns the start / stop lifecycle of that process.

pub mod process;
pub mod supervisor;
pub mod tool;

use std::future::Future;
use std::pin::Pin;

/// Boxed `Send` future used by the object-safe collaborator traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub use process::{ChildLauncher, ChildProcess, ProcessHandle, ProcessLauncher};
pub use supervisor::{Supervisor, SETTLE_DELAY, STOP_TIMEOUT};
pub use tool::{BuildTool, CommandBuildTool, CompileOutput, CompileRequest, TestRequest};
