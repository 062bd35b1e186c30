pub mod builders;
pub mod fakes;

use std::sync::{Arc, Once};

use tracing_subscriber::{fmt, EnvFilter};

use buildweb::config::SharedConfig;
use buildweb::engine::{Backends, BuildSteps, Target, TaskRunner};
use buildweb::exec::Supervisor;
use buildweb::fs::mock::MockFileSystem;

use crate::fakes::{FakeAssetToolchain, FakeBuildTool, FakeLauncher};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// The host every rig pretends to run on.
pub fn test_host() -> Target {
    Target::new("linux", "amd64")
}

/// A full set of fakes. Clones of each fake share their logs, so the rig
/// keeps observing after handing copies to a runner.
#[derive(Debug, Clone, Default)]
pub struct Rig {
    pub fs: MockFileSystem,
    pub assets: FakeAssetToolchain,
    pub tool: FakeBuildTool,
    pub launcher: FakeLauncher,
}

impl Rig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backends(&self) -> Backends {
        Backends {
            fs: Arc::new(self.fs.clone()),
            assets: Arc::new(self.assets.clone()),
            tool: Arc::new(self.tool.clone()),
            launcher: Box::new(self.launcher.clone()),
        }
    }

    pub fn steps(&self, config: SharedConfig) -> BuildSteps {
        let b = self.backends();
        BuildSteps::new(config, b.fs, b.assets, b.tool).with_host(test_host())
    }

    pub fn supervisor(&self, args: Vec<String>) -> Supervisor {
        Supervisor::new(Box::new(self.launcher.clone()), args)
    }

    /// A runner on [`test_host`] wired to this rig's fakes.
    pub fn runner(&self, config: SharedConfig) -> TaskRunner {
        TaskRunner::from_parts(self.steps(config), self.supervisor(Vec::new()))
    }
}
