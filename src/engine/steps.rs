// src/engine/steps.rs

//! Build step executors: assets, tests, backend binary.
//!
//! Each step reads the config under the shared read lock, releases it, and
//! only then runs the external tool. None of them touch `ShellState` or log
//! their own failures; the runner records and reports their results.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::assets::AssetToolchain;
use crate::config::{SharedConfig, ToolchainSection};
use crate::errors::{BuildwebError, Result};
use crate::exec::{BuildTool, CompileRequest, TestRequest};
use crate::fs::FileSystem;
use crate::types::{AssetKind, BuildMode};

use super::target::Target;

pub struct BuildSteps {
    config: SharedConfig,
    fs: Arc<dyn FileSystem>,
    assets: Arc<dyn AssetToolchain>,
    tool: Arc<dyn BuildTool>,
    host: Target,
}

impl std::fmt::Debug for BuildSteps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildSteps")
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl BuildSteps {
    pub fn new(
        config: SharedConfig,
        fs: Arc<dyn FileSystem>,
        assets: Arc<dyn AssetToolchain>,
        tool: Arc<dyn BuildTool>,
    ) -> Self {
        Self {
            config,
            fs,
            assets,
            tool,
            host: Target::host(),
        }
    }

    /// Pretend to run on `host` instead of the real machine.
    pub fn with_host(mut self, host: Target) -> Self {
        self.host = host;
        self
    }

    pub fn host(&self) -> &Target {
        &self.host
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// Build one asset entry, or with `entry == None` reset the kind's
    /// output directory and build every vendor set then every entry, in
    /// declared order, stopping at the first failure.
    pub async fn build_assets(
        &self,
        kind: AssetKind,
        entry: Option<&str>,
        mode: BuildMode,
    ) -> Result<()> {
        if let Some(name) = entry {
            return self.build_entry(kind, name, mode).await;
        }

        let (dir, names) = {
            let cfg = self.config.read().await;
            (cfg.assets.output_dir(kind), cfg.assets.names_in_build_order())
        };
        self.fs
            .reset_dir(&dir)
            .map_err(|source| BuildwebError::DirectoryReset {
                dir: dir.clone(),
                source,
            })?;

        info!(%kind, dir = %dir.display(), count = names.len(), "rebuilding all assets");

        for name in names {
            self.build_entry(kind, &name, mode).await?;
        }
        Ok(())
    }

    async fn build_entry(&self, kind: AssetKind, name: &str, mode: BuildMode) -> Result<()> {
        let cfg = self.config.read().await;
        let compiler = self.assets.compiler(kind, &cfg.assets, name);
        drop(cfg);
        let compiler = compiler.map_err(|e| asset_error(kind, name, e))?;

        compiler
            .build(mode.is_production())
            .await
            .map_err(|e| asset_error(kind, name, e))?;

        debug!(%kind, entry = name, "asset built");
        Ok(())
    }

    /// Run the test runner for `module` (root module `.` when `None`).
    pub async fn run_tests(&self, module: Option<&str>) -> Result<()> {
        let module = module.filter(|m| !m.is_empty()).unwrap_or(".");
        let request = TestRequest {
            program: self.config.read().await.toolchain.program.clone(),
            module: module.to_string(),
        };

        match self.tool.test(&request).await {
            Ok(true) => {
                info!(module, "tests passed");
                Ok(())
            }
            Ok(false) => Err(BuildwebError::TestFailure {
                module: module.to_string(),
                message: "test runner reported failures".to_string(),
            }),
            Err(e) => Err(BuildwebError::TestFailure {
                module: module.to_string(),
                message: format!("{e:#}"),
            }),
        }
    }

    /// Compile the backend for `target` (the host when `None`) and return
    /// the built file name.
    pub async fn build_binary(&self, target: Option<&Target>, mode: BuildMode) -> Result<String> {
        let target = Target::effective(target, &self.host);

        let request = {
            let cfg = self.config.read().await;
            CompileRequest {
                program: cfg.toolchain.program.clone(),
                options: cfg.build_opts(mode.is_production()),
                output: target.binary_name(&cfg.package.name, &cfg.package.version),
                env: compile_env(&cfg.toolchain, &target),
            }
        };

        debug!(args = ?request.args(), %target, "running build");
        let started = Instant::now();

        let outcome = self
            .tool
            .compile(&request)
            .await
            .map_err(|e| BuildwebError::Compile {
                binary: request.output.clone(),
                output: format!("{e:#}"),
            })?;

        if !outcome.success {
            return Err(BuildwebError::Compile {
                binary: request.output,
                output: outcome.output,
            });
        }

        let took_ms = started.elapsed().as_secs_f64() * 1000.0;
        info!(binary = %request.output, %target, "got binary built, takes={:.3}ms", took_ms);
        Ok(request.output)
    }
}

fn asset_error(kind: AssetKind, entry: &str, err: anyhow::Error) -> BuildwebError {
    BuildwebError::AssetCompile {
        kind,
        entry: entry.to_string(),
        message: format!("{err:#}"),
    }
}

/// Environment overrides for a cross compile: search path, target OS and
/// arch, and the module path when one is set.
fn compile_env(toolchain: &ToolchainSection, target: &Target) -> Vec<(String, String)> {
    let mut env = Vec::with_capacity(4);
    if let Ok(path) = std::env::var("PATH") {
        env.push(("PATH".to_string(), path));
    }
    env.push((toolchain.os_var.clone(), target.os.clone()));
    env.push((toolchain.arch_var.clone(), target.arch.clone()));
    if let Ok(module_path) = std::env::var(&toolchain.module_path_var) {
        env.push((toolchain.module_path_var.clone(), module_path));
    }
    env
}
