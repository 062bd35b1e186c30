// src/engine/state.rs

use crate::errors::BuildwebError;
use crate::types::BuildMode;

/// Mutable build state, owned by the task runner.
///
/// Only the queue consumer touches it, so it needs no locking. The running
/// process handle lives in the runner's `Supervisor`.
#[derive(Debug, Default)]
pub struct ShellState {
    /// Development or production options; fixed per run mode.
    pub mode: BuildMode,
    /// Latest failure in the current cycle. Cleared when a new batch starts;
    /// a later success does not clear it.
    pub last_error: Option<BuildwebError>,
    /// File name of the most recently built backend binary.
    pub binary_name: Option<String>,
}

impl ShellState {
    pub fn has_error(&self) -> bool {
        self.last_error.is_some()
    }
}
