// src/engine/mod.rs

//! Orchestration engine for buildweb.
//!
//! This module ties together:
//! - the task model ([`Task`], [`TaskKind`])
//! - the build steps (assets, tests, backend binary) in [`steps`]
//! - the single-consumer task queue in [`queue`], whose consumer owns the
//!   [`TaskRunner`] and with it all mutable build state
//! - distribution target resolution in [`target`]
//! - the two run modes (interactive loop, distribution pass) in [`shell`]

/// Kind of work a [`Task`] performs.
///
/// Declared in the order a full cycle runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskKind {
    BuildImages,
    BuildStyles,
    BuildScripts,
    RunTests,
    BuildBinary,
    RestartProcess,
}

/// One unit of work for the task queue.
///
/// `scope` names a single asset entry (asset tasks) or test module
/// (`RunTests`); `None` means every configured entry, or the root module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    kind: TaskKind,
    scope: Option<String>,
}

impl Task {
    /// A task scoped to one entry or module. An empty name means "all".
    pub fn new(kind: TaskKind, scope: impl Into<String>) -> Self {
        let scope = scope.into();
        Self {
            kind,
            scope: (!scope.is_empty()).then_some(scope),
        }
    }

    /// A task over all configured entries.
    pub fn all(kind: TaskKind) -> Self {
        Self { kind, scope: None }
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }
}

pub mod backends;
pub mod queue;
pub mod runner;
pub mod shell;
pub mod state;
pub mod steps;
pub mod target;

pub use backends::Backends;
pub use queue::{spawn_task_runner, QueueMessage, TaskQueue};
pub use runner::TaskRunner;
pub use shell::{default_cycle, run_distribution, run_interactive, DistOptions};
pub use state::ShellState;
pub use steps::BuildSteps;
pub use target::{resolve_targets, Target};
