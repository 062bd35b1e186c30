// src/exec/tool.rs

//! External backend toolchain: `<program> build ...` and `<program> test ...`.

use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::debug;

use super::BoxFuture;

/// Everything needed to run one `build` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub program: PathBuf,
    /// Mode-specific compiler options, copied out of the config.
    pub options: Vec<String>,
    /// Output file name for `-o`.
    pub output: String,
    /// Environment overrides, applied on top of the inherited environment.
    pub env: Vec<(String, String)>,
}

impl CompileRequest {
    /// `build [options...] -o <output>`
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(3 + self.options.len());
        args.push("build".to_string());
        args.extend(self.options.iter().cloned());
        args.push("-o".to_string());
        args.push(self.output.clone());
        args
    }
}

/// Everything needed to run the test runner for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRequest {
    pub program: PathBuf,
    pub module: String,
}

/// Result of a compile: exit success plus combined stdout/stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    pub success: bool,
    pub output: String,
}

/// Trait abstracting how the backend toolchain is invoked.
///
/// Production code uses [`CommandBuildTool`]; tests provide fakes that
/// record requests.
pub trait BuildTool: Send + Sync {
    /// Run a compile and capture its output. `Err` only when the tool could
    /// not be run at all.
    fn compile<'a>(&'a self, request: &'a CompileRequest) -> BoxFuture<'a, Result<CompileOutput>>;

    /// Run the tests of one module, streaming output to the console.
    /// Returns whether they passed.
    fn test<'a>(&'a self, request: &'a TestRequest) -> BoxFuture<'a, Result<bool>>;
}

/// Runs the configured toolchain program as a child process.
#[derive(Debug, Clone, Default)]
pub struct CommandBuildTool;

impl BuildTool for CommandBuildTool {
    fn compile<'a>(&'a self, request: &'a CompileRequest) -> BoxFuture<'a, Result<CompileOutput>> {
        Box::pin(async move {
            let args = request.args();
            debug!(program = %request.program.display(), ?args, "running build");

            let output = Command::new(&request.program)
                .args(&args)
                .envs(request.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output()
                .await
                .with_context(|| format!("running {}", request.program.display()))?;

            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));

            Ok(CompileOutput {
                success: output.status.success(),
                output: combined,
            })
        })
    }

    fn test<'a>(&'a self, request: &'a TestRequest) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            let status = Command::new(&request.program)
                .arg("test")
                .arg(&request.module)
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .kill_on_drop(true)
                .status()
                .await
                .with_context(|| format!("running {} test", request.program.display()))?;
            Ok(status.success())
        })
    }
}
