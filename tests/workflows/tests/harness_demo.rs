//! # Batch Harness Demo
//!
//! The demo shows how the harness composes a batch run:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ ScenarioBuilder                                      │
//! │   ├─ config (faucet, endpoints, amounts, homes)      │
//! │   ├─ batch_transfers() → faucet round-trip workload  │
//! │   └─ expectations (faucet sequence, balances)        │
//! └──────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────┐
//! │ LocalDeployer               │
//! │   ├─ probe daemon RPC       │
//! │   ├─ resolve tool binaries  │
//! │   └─ Runner                 │
//! │        ├─ drive workload    │
//! │        └─ evaluate checks   │
//! └─────────────────────────────┘
//! ```
//!
//! The live test needs the node and wallet daemons running on their default
//! ports plus the key-generation tool on PATH, so it is ignored by default:
//!
//! ```text
//! cargo test -p tests-workflows -- --ignored
//! ```
//!
//! Point it elsewhere with the `WALLET_HARNESS_*` environment overrides.

use std::{fs, path::PathBuf, time::Duration};

use serial_test::serial;
use tempfile::TempDir;
use wallet_harness_config::HarnessConfig;
use wallet_harness_core::scenario::{Deployer as _, Runner, ScenarioBuilder};
use wallet_harness_runner_local::LocalDeployer;
use wallet_harness_workflows::ScenarioBuilderExt as _;

const DEMO_ITERATIONS: usize = 2;
const DEMO_RUN_SECS: u64 = 120;

fn config_with_password_file(dir: &TempDir) -> HarnessConfig {
    let path = dir.path().join("password.txt");
    fs::write(&path, "demo-password\n").expect("write password file");

    let mut config = HarnessConfig::default();
    config.homes.password_file = path;
    config
}

fn demo_plan(config: HarnessConfig) -> ScenarioBuilder {
    ScenarioBuilder::new(config)
        .batch_transfers_with(|flow| flow.iterations(DEMO_ITERATIONS))
        .with_run_duration(Duration::from_secs(DEMO_RUN_SECS))
}

#[test]
fn demo_plan_builds_with_workload_and_expectations() {
    let dir = tempfile::tempdir().expect("tempdir");
    let plan = demo_plan(config_with_password_file(&dir))
        .build()
        .expect("scenario must build");

    assert_eq!(plan.workloads().len(), 1);
    assert_eq!(plan.workloads()[0].name(), "batch_transfer");
    assert_eq!(plan.expectations().len(), 2);
    // The cap never undercuts what the batch needs to shell out per round.
    assert!(plan.duration() >= Duration::from_secs(DEMO_RUN_SECS));
}

#[test]
fn run_duration_is_derived_when_not_requested() {
    let dir = tempfile::tempdir().expect("tempdir");
    let plan = ScenarioBuilder::new(config_with_password_file(&dir))
        .batch_transfers_with(|flow| flow.iterations(DEMO_ITERATIONS))
        .build()
        .expect("scenario must build");

    assert!(plan.duration() > Duration::ZERO);
}

#[test]
fn plan_build_fails_without_a_password_file() {
    let mut config = HarnessConfig::default();
    config.homes.password_file = PathBuf::from("/no/such/password-file.txt");

    let err = ScenarioBuilder::new(config)
        .batch_transfers_with(|flow| flow.iterations(DEMO_ITERATIONS))
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("batch_transfer"));
}

#[tokio::test]
#[ignore = "requires running node + wallet daemons and the key-generation tool"]
#[serial]
async fn live_batch_roundtrip_against_local_daemons() {
    let mut plan = demo_plan(HarnessConfig::from_env())
        .build()
        .expect("scenario must build");

    let deployer = LocalDeployer::default();

    let runner: Runner = deployer.deploy(&plan).await.expect("scenario deployment");

    runner
        .run(&mut plan)
        .await
        .expect("batch scenario should execute");
}
