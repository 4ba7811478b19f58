use std::{io, path::PathBuf, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};
use wallet_harness_core::{
    adjust_timeout,
    rpc::{RpcClient, RpcReadinessError, WalletRpcClient, wait_for_node_rpc, wait_for_wallet_rpc},
    scenario::{
        Deployer, DynError, HarnessClients, RunContext, Runner, Scenario, ScenarioError,
    },
    tools::{KeygenTool, WalletCli},
};

const READINESS_TIMEOUT: Duration = Duration::from_secs(30);
const READINESS_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Attaches to the node and wallet daemons already running on this host.
///
/// The daemons are a precondition, not something the harness launches; deploy
/// verifies they answer RPC, resolves the external binaries, and hands back a
/// runner wired to them.
#[derive(Clone)]
pub struct LocalDeployer {}

/// Errors surfaced by the local deployer while driving a scenario.
#[derive(Debug, Error)]
pub enum LocalDeployerError {
    #[error("account password file not readable at {}: {source}", path.display())]
    PasswordFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("daemon rpc readiness failed: {source}")]
    ReadinessFailed {
        #[source]
        source: RpcReadinessError,
    },
    #[error("workload failed: {source}")]
    WorkloadFailed {
        #[source]
        source: DynError,
    },
    #[error("workloads did not finish within {limit:?}")]
    WorkloadTimedOut { limit: Duration },
    #[error("expectations failed: {source}")]
    ExpectationsFailed {
        #[source]
        source: DynError,
    },
}

impl From<ScenarioError> for LocalDeployerError {
    fn from(value: ScenarioError) -> Self {
        match value {
            ScenarioError::Workload(source) => Self::WorkloadFailed { source },
            ScenarioError::WorkloadTimeout { limit } => Self::WorkloadTimedOut { limit },
            ScenarioError::ExpectationCapture(source) | ScenarioError::Expectations(source) => {
                Self::ExpectationsFailed { source }
            }
        }
    }
}

#[async_trait]
impl Deployer for LocalDeployer {
    type Error = LocalDeployerError;

    async fn deploy(&self, scenario: &Scenario) -> Result<Runner, Self::Error> {
        let config = scenario.config();

        info!(
            wallet_rpc = %config.endpoints.wallet_rpc,
            node_rpc = %config.endpoints.node_rpc,
            iterations = config.iterations.get(),
            "attaching to local daemons"
        );

        check_password_file(config.homes.password_file.clone())?;

        let keygen = KeygenTool::from_homes(&config.homes);
        let wallet_cli = WalletCli::resolve();
        let wallet_rpc = WalletRpcClient::new(config.endpoints.wallet_rpc.clone());

        wait_for_readiness(config, &wallet_rpc).await.map_err(|source| {
            debug!(error = ?source, "local readiness failed");
            LocalDeployerError::ReadinessFailed { source }
        })?;

        info!("local daemons are ready");

        let clients = HarnessClients::new(wallet_rpc, wallet_cli, keygen);
        let context = RunContext::new(config.clone(), clients, scenario.duration());

        Ok(Runner::new(context))
    }
}

impl LocalDeployer {
    #[must_use]
    /// Construct a local deployer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for LocalDeployer {
    fn default() -> Self {
        Self {}
    }
}

fn check_password_file(path: PathBuf) -> Result<(), LocalDeployerError> {
    match std::fs::metadata(&path) {
        Ok(_) => Ok(()),
        Err(source) => Err(LocalDeployerError::PasswordFile { path, source }),
    }
}

async fn wait_for_readiness(
    config: &wallet_harness_config::HarnessConfig,
    wallet_rpc: &WalletRpcClient,
) -> Result<(), RpcReadinessError> {
    let timeout = adjust_timeout(READINESS_TIMEOUT);

    let node_rpc = RpcClient::new(config.endpoints.node_rpc.clone());
    wait_for_node_rpc(&node_rpc, timeout, READINESS_POLL_INTERVAL).await?;

    wait_for_wallet_rpc(
        wallet_rpc,
        &config.faucet.address,
        timeout,
        READINESS_POLL_INTERVAL,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_password_file_is_reported() {
        let err = check_password_file(PathBuf::from("/no/such/password.txt")).unwrap_err();
        assert!(matches!(err, LocalDeployerError::PasswordFile { .. }));
    }
}
