// tests/build_steps.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use buildweb::config::SharedConfig;
use buildweb::engine::BuildSteps;
use buildweb::errors::BuildwebError;
use buildweb::fs::FileSystem;
use buildweb::types::{AssetKind, BuildMode};
use buildweb_test_utils::builders::ProjectConfigBuilder;
use buildweb_test_utils::{init_tracing, test_host, Rig};

fn demo() -> ProjectConfigBuilder {
    ProjectConfigBuilder::new("demo", "1.2.0")
}

#[tokio::test]
async fn full_rebuild_resets_dir_then_builds_vendors_before_entries() {
    init_tracing();
    let rig = Rig::new();
    let cfg = demo()
        .entry("e1")
        .vendor("v1")
        .entry("e2")
        .vendor("v2")
        .shared();
    let steps = rig.steps(cfg);

    steps
        .build_assets(AssetKind::Styles, None, BuildMode::Development)
        .await
        .expect("assets should build");

    assert_eq!(rig.fs.resets(), vec![PathBuf::from("public/stylesheets")]);
    assert_eq!(
        rig.assets.entries_for(AssetKind::Styles),
        vec!["v1", "v2", "e1", "e2"]
    );
}

#[tokio::test]
async fn first_failing_vendor_stops_the_traversal() {
    init_tracing();
    let rig = Rig::new();
    rig.assets.fail_entry("v2");
    let cfg = demo().vendor("v1").vendor("v2").entry("e1").entry("e2").shared();
    let steps = rig.steps(cfg);

    let err = steps
        .build_assets(AssetKind::Scripts, None, BuildMode::Development)
        .await
        .unwrap_err();

    assert_eq!(rig.assets.entries_for(AssetKind::Scripts), vec!["v1", "v2"]);
    match err {
        BuildwebError::AssetCompile { kind, entry, message } => {
            assert_eq!(kind, AssetKind::Scripts);
            assert_eq!(entry, "v2");
            assert!(message.contains("exploded"));
        }
        other => panic!("Expected AssetCompile, got: {:?}", other),
    }
}

#[tokio::test]
async fn failed_reset_builds_nothing() {
    init_tracing();
    let rig = Rig::new();
    rig.fs.fail_resets_of("public/images");
    let steps = rig.steps(demo().vendor("v1").entry("e1").shared());

    let err = steps
        .build_assets(AssetKind::Images, None, BuildMode::Development)
        .await
        .unwrap_err();

    assert!(matches!(err, BuildwebError::DirectoryReset { ref dir, .. } if dir == &PathBuf::from("public/images")));
    assert!(rig.assets.built().is_empty());
}

#[tokio::test]
async fn single_entry_build_skips_the_reset() {
    init_tracing();
    let rig = Rig::new();
    let steps = rig.steps(demo().vendor("v1").entry("e1").entry("e2").shared());

    steps
        .build_assets(AssetKind::Styles, Some("e2"), BuildMode::Production)
        .await
        .unwrap();

    assert!(rig.fs.resets().is_empty());
    assert_eq!(
        rig.assets.built(),
        vec![(AssetKind::Styles, "e2".to_string(), true)]
    );
}

#[tokio::test]
async fn empty_catalog_still_resets_the_directory() {
    init_tracing();
    let rig = Rig::new();
    let steps = rig.steps(demo().public_dir("web").shared());

    steps
        .build_assets(AssetKind::Images, None, BuildMode::Development)
        .await
        .unwrap();

    assert_eq!(rig.fs.resets(), vec![PathBuf::from("web/images")]);
    assert!(rig.assets.built().is_empty());
}

/// Reloads the config from `path` in the middle of a directory reset.
#[derive(Debug)]
struct ReloadingFileSystem {
    config: SharedConfig,
    path: PathBuf,
}

impl FileSystem for ReloadingFileSystem {
    fn reset_dir(&self, _path: &Path) -> anyhow::Result<()> {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(self.config.reload(&self.path))
        })?;
        Ok(())
    }

    fn exists(&self, _path: &Path) -> bool {
        false
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn full_rebuild_uses_one_config_snapshot() {
    init_tracing();
    let rig = Rig::new();
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("buildweb.toml");
    std::fs::write(
        &path,
        "[package]\nname = \"demo\"\nversion = \"1.2.0\"\n\n[assets]\nentries = [{ name = \"reloaded\" }]\n",
    )
    .unwrap();

    let shared = demo().vendor("v1").entry("e1").shared();
    let fs = ReloadingFileSystem {
        config: shared.clone(),
        path,
    };
    let steps = BuildSteps::new(
        shared.clone(),
        Arc::new(fs),
        Arc::new(rig.assets.clone()),
        Arc::new(rig.tool.clone()),
    )
    .with_host(test_host());

    steps
        .build_assets(AssetKind::Styles, None, BuildMode::Development)
        .await
        .unwrap();

    // The reload landed, but the rebuild kept the catalog it started with.
    assert_eq!(
        shared.read().await.assets.names_in_build_order(),
        vec!["reloaded"]
    );
    assert_eq!(rig.assets.entries_for(AssetKind::Styles), vec!["v1", "e1"]);
}

#[tokio::test]
async fn tests_default_to_root_module() {
    init_tracing();
    let rig = Rig::new();
    let steps = rig.steps(demo().shared());

    steps.run_tests(None).await.unwrap();
    steps.run_tests(Some("")).await.unwrap();
    steps.run_tests(Some("./handlers")).await.unwrap();

    assert_eq!(rig.tool.tested_modules(), vec![".", ".", "./handlers"]);
}

#[tokio::test]
async fn failing_tests_become_test_failure() {
    init_tracing();
    let rig = Rig::new();
    rig.tool.fail_tests();
    let steps = rig.steps(demo().shared());

    match steps.run_tests(Some("./models")).await {
        Err(BuildwebError::TestFailure { module, .. }) => assert_eq!(module, "./models"),
        other => panic!("Expected TestFailure, got: {:?}", other),
    }
}

#[tokio::test]
async fn host_build_uses_dev_options_and_target_env() {
    init_tracing();
    let rig = Rig::new();
    let steps = rig.steps(demo().dev_opt("-race").dist_opt("-trimpath").shared());

    let name = steps
        .build_binary(None, BuildMode::Development)
        .await
        .unwrap();
    assert_eq!(name, "demo-1.2.0.linux.amd64");

    let requests = rig.tool.compiles();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(
        req.args(),
        vec!["build", "-race", "-o", "demo-1.2.0.linux.amd64"]
    );
    assert!(req.env.contains(&("GOOS".to_string(), "linux".to_string())));
    assert!(req.env.contains(&("GOARCH".to_string(), "amd64".to_string())));
}

#[tokio::test]
async fn cross_build_uses_production_options_and_exe_suffix() {
    init_tracing();
    let rig = Rig::new();
    let steps = rig.steps(demo().dev_opt("-race").dist_opt("-trimpath").shared());
    let windows = buildweb::engine::Target::new("windows", "amd64");

    let name = steps
        .build_binary(Some(&windows), BuildMode::Production)
        .await
        .unwrap();

    assert_eq!(name, "demo-1.2.0.windows.amd64.exe");
    let req = &rig.tool.compiles()[0];
    assert_eq!(req.options, vec!["-trimpath"]);
    assert!(req.env.contains(&("GOOS".to_string(), "windows".to_string())));
}

#[tokio::test]
async fn failed_compile_carries_tool_output() {
    init_tracing();
    let rig = Rig::new();
    rig.tool.fail_compiles_matching("linux");
    let steps = rig.steps(demo().shared());

    match steps.build_binary(None, BuildMode::Development).await {
        Err(BuildwebError::Compile { binary, output }) => {
            assert_eq!(binary, "demo-1.2.0.linux.amd64");
            assert!(output.contains("cannot build"));
        }
        other => panic!("Expected Compile error, got: {:?}", other),
    }
}
