//! Recording fakes for every external collaborator.
//!
//! Each fake is `Clone` and shares its log between clones, so a test keeps
//! one handle and gives the other to the engine.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use tokio::sync::watch;

use buildweb::assets::{AssetCompiler, AssetToolchain};
use buildweb::config::AssetsSection;
use buildweb::exec::{
    BoxFuture, BuildTool, CompileOutput, CompileRequest, ProcessHandle, ProcessLauncher,
    TestRequest,
};
use buildweb::types::AssetKind;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

// ---------------------------------------------------------------------------
// Assets

#[derive(Debug, Default)]
struct AssetLog {
    built: Vec<(AssetKind, String, bool)>,
    failing: HashSet<String>,
}

/// Asset toolchain whose compilers record `(kind, entry, production)` and
/// fail for entries registered with [`FakeAssetToolchain::fail_entry`].
#[derive(Debug, Clone, Default)]
pub struct FakeAssetToolchain {
    log: Arc<Mutex<AssetLog>>,
}

impl FakeAssetToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_entry(&self, name: &str) {
        lock(&self.log).failing.insert(name.to_string());
    }

    /// Every attempted build, in order.
    pub fn built(&self) -> Vec<(AssetKind, String, bool)> {
        lock(&self.log).built.clone()
    }

    /// Entry names attempted for one kind, in order.
    pub fn entries_for(&self, kind: AssetKind) -> Vec<String> {
        lock(&self.log)
            .built
            .iter()
            .filter(|(k, _, _)| *k == kind)
            .map(|(_, e, _)| e.clone())
            .collect()
    }
}

impl AssetToolchain for FakeAssetToolchain {
    fn compiler(
        &self,
        kind: AssetKind,
        _assets: &AssetsSection,
        entry: &str,
    ) -> Result<Box<dyn AssetCompiler>> {
        Ok(Box::new(FakeCompiler {
            kind,
            entry: entry.to_string(),
            log: Arc::clone(&self.log),
        }))
    }
}

struct FakeCompiler {
    kind: AssetKind,
    entry: String,
    log: Arc<Mutex<AssetLog>>,
}

impl AssetCompiler for FakeCompiler {
    fn build(&self, production: bool) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let mut log = lock(&self.log);
            log.built.push((self.kind, self.entry.clone(), production));
            if log.failing.contains(&self.entry) {
                return Err(anyhow!("{} exploded", self.entry));
            }
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// Build tool

#[derive(Debug, Default)]
struct ToolLog {
    compiles: Vec<CompileRequest>,
    tests: Vec<String>,
    failing_outputs: Vec<String>,
    tests_fail: bool,
}

/// Build tool that records requests instead of running a compiler.
#[derive(Debug, Clone, Default)]
pub struct FakeBuildTool {
    log: Arc<Mutex<ToolLog>>,
}

impl FakeBuildTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any compile whose output name contains `needle`.
    pub fn fail_compiles_matching(&self, needle: &str) {
        lock(&self.log).failing_outputs.push(needle.to_string());
    }

    pub fn fail_tests(&self) {
        lock(&self.log).tests_fail = true;
    }

    pub fn compiles(&self) -> Vec<CompileRequest> {
        lock(&self.log).compiles.clone()
    }

    pub fn compiled_outputs(&self) -> Vec<String> {
        lock(&self.log).compiles.iter().map(|r| r.output.clone()).collect()
    }

    pub fn tested_modules(&self) -> Vec<String> {
        lock(&self.log).tests.clone()
    }
}

impl BuildTool for FakeBuildTool {
    fn compile<'a>(&'a self, request: &'a CompileRequest) -> BoxFuture<'a, Result<CompileOutput>> {
        Box::pin(async move {
            let mut log = lock(&self.log);
            log.compiles.push(request.clone());
            let fails = log
                .failing_outputs
                .iter()
                .any(|needle| request.output.contains(needle.as_str()));
            Ok(CompileOutput {
                success: !fails,
                output: if fails {
                    format!("main.go:1: cannot build {}", request.output)
                } else {
                    String::new()
                },
            })
        })
    }

    fn test<'a>(&'a self, request: &'a TestRequest) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            let mut log = lock(&self.log);
            log.tests.push(request.module.clone());
            Ok(!log.tests_fail)
        })
    }
}

// ---------------------------------------------------------------------------
// Processes

/// Something that happened to a fake process. `usize` is the launch index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    Launched {
        id: usize,
        program: PathBuf,
        args: Vec<String>,
    },
    GracefulStop(usize),
    ForceStop(usize),
}

#[derive(Debug, Default)]
struct LaunchLog {
    events: Vec<ProcessEvent>,
    launches: usize,
    ignore_interrupt: bool,
    fail_launch: bool,
    fail_interrupt: bool,
}

/// Launcher whose processes obey interrupts unless told otherwise.
#[derive(Debug, Clone, Default)]
pub struct FakeLauncher {
    log: Arc<Mutex<LaunchLog>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes launched from now on keep running after an interrupt.
    pub fn ignore_interrupts(&self) {
        lock(&self.log).ignore_interrupt = true;
    }

    pub fn fail_launches(&self) {
        lock(&self.log).fail_launch = true;
    }

    pub fn fail_interrupts(&self) {
        lock(&self.log).fail_interrupt = true;
    }

    pub fn events(&self) -> Vec<ProcessEvent> {
        lock(&self.log).events.clone()
    }

    pub fn launched_programs(&self) -> Vec<PathBuf> {
        lock(&self.log)
            .events
            .iter()
            .filter_map(|e| match e {
                ProcessEvent::Launched { program, .. } => Some(program.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn force_stops(&self) -> usize {
        lock(&self.log)
            .events
            .iter()
            .filter(|e| matches!(e, ProcessEvent::ForceStop(_)))
            .count()
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&mut self, program: &Path, args: &[String]) -> io::Result<Box<dyn ProcessHandle>> {
        let mut log = lock(&self.log);
        if log.fail_launch {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such file"));
        }
        let id = log.launches;
        log.launches += 1;
        log.events.push(ProcessEvent::Launched {
            id,
            program: program.to_path_buf(),
            args: args.to_vec(),
        });

        let (exit_tx, exit_rx) = watch::channel(false);
        Ok(Box::new(FakeProcess {
            id,
            exits_on_interrupt: !log.ignore_interrupt,
            exit_tx,
            exit_rx,
            log: Arc::clone(&self.log),
        }))
    }
}

struct FakeProcess {
    id: usize,
    exits_on_interrupt: bool,
    exit_tx: watch::Sender<bool>,
    exit_rx: watch::Receiver<bool>,
    log: Arc<Mutex<LaunchLog>>,
}

impl ProcessHandle for FakeProcess {
    fn id(&self) -> Option<u32> {
        Some(self.id as u32)
    }

    fn has_exited(&self) -> bool {
        *self.exit_rx.borrow()
    }

    fn request_graceful_stop(&mut self) -> BoxFuture<'_, io::Result<()>> {
        Box::pin(async move {
            let mut log = lock(&self.log);
            if log.fail_interrupt {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "not permitted"));
            }
            log.events.push(ProcessEvent::GracefulStop(self.id));
            if self.exits_on_interrupt {
                let _ = self.exit_tx.send(true);
            }
            Ok(())
        })
    }

    fn force_stop(&mut self) -> io::Result<()> {
        lock(&self.log).events.push(ProcessEvent::ForceStop(self.id));
        let _ = self.exit_tx.send(true);
        Ok(())
    }

    fn wait(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let _ = self.exit_rx.wait_for(|done| *done).await;
        })
    }
}
