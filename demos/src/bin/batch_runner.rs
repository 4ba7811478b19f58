use std::{process, time::Duration};

use anyhow::{Context as _, Result};
use tracing::{info, warn};
use wallet_harness_config::HarnessConfig;
use wallet_harness_core::scenario::{Deployer as _, Runner, ScenarioBuilder};
use wallet_harness_demos::{ScenarioBuilderExt as _, defaults, read_env_any};
use wallet_harness_runner_local::LocalDeployer;

const RUN_SECS_ENVS: &[&str] = &["WALLET_HARNESS_RUN_SECS"];

// Zero lets the scenario derive its cap from the iteration count.
const DEFAULT_RUN_SECS: u64 = 0;

#[tokio::main]
async fn main() {
    defaults::init_tracing();

    let config = HarnessConfig::from_env();
    let run_secs = read_env_any(RUN_SECS_ENVS, DEFAULT_RUN_SECS);

    info!(
        iterations = config.iterations.get(),
        faucet = %config.faucet.address,
        wallet_rpc = %config.endpoints.wallet_rpc,
        "starting batch runner"
    );

    if let Err(err) = run_batch(config, Duration::from_secs(run_secs)).await {
        warn!("batch runner failed: {err:#}");
        process::exit(1);
    }
}

async fn run_batch(config: HarnessConfig, run_duration: Duration) -> Result<()> {
    let mut plan = ScenarioBuilder::new(config)
        .batch_transfers_with(|flow| flow)
        .with_run_duration(run_duration)
        .build()
        .context("building batch scenario failed")?;

    let deployer = LocalDeployer::default();
    info!("attaching to local daemons");

    let runner: Runner = deployer
        .deploy(&plan)
        .await
        .context("attaching to local daemons failed")?;
    info!("running batch scenario");

    runner
        .run(&mut plan)
        .await
        .context("running batch scenario failed")?;
    info!("batch scenario complete");

    Ok(())
}
