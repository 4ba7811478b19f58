use std::time::Duration;

use wallet_harness_config::HarnessConfig;

use crate::{
    rpc::WalletRpcClient,
    tools::{KeygenTool, WalletCli},
};

/// Handles to the external tools a run drives.
#[derive(Clone, Debug)]
pub struct HarnessClients {
    wallet_rpc: WalletRpcClient,
    wallet_cli: WalletCli,
    keygen: KeygenTool,
}

impl HarnessClients {
    #[must_use]
    pub const fn new(wallet_rpc: WalletRpcClient, wallet_cli: WalletCli, keygen: KeygenTool) -> Self {
        Self {
            wallet_rpc,
            wallet_cli,
            keygen,
        }
    }
}

/// Shared state handed to workloads and expectations during a run.
pub struct RunContext {
    config: HarnessConfig,
    clients: HarnessClients,
    duration: Duration,
}

impl RunContext {
    #[must_use]
    pub const fn new(config: HarnessConfig, clients: HarnessClients, duration: Duration) -> Self {
        Self {
            config,
            clients,
            duration,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    #[must_use]
    pub const fn wallet_rpc(&self) -> &WalletRpcClient {
        &self.clients.wallet_rpc
    }

    #[must_use]
    pub const fn wallet_cli(&self) -> &WalletCli {
        &self.clients.wallet_cli
    }

    #[must_use]
    pub const fn keygen(&self) -> &KeygenTool {
        &self.clients.keygen
    }

    #[must_use]
    pub const fn run_duration(&self) -> Duration {
        self.duration
    }
}
