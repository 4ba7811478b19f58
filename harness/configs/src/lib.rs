pub mod accounts;
pub mod endpoints;
pub mod env;
pub mod paths;
pub mod transfer;

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::{
    accounts::{Address, AddressParseError, FaucetAccount},
    endpoints::RpcEndpoints,
    env::{read_env_any, read_env_string},
    paths::ToolHomes,
    transfer::{TransferPlan, TransferPlanError},
};

/// Number of faucet funding rounds executed by a full batch run.
pub const DEFAULT_ITERATIONS: usize = 500;

/// Chain id stamped into every transfer request.
pub const DEFAULT_CHAIN_ID: &str = "testnet";

const ITERATIONS_ENV: &str = "WALLET_HARNESS_ITERATIONS";
const CHAIN_ID_ENV: &str = "WALLET_HARNESS_CHAIN_ID";

#[derive(Debug, Error)]
pub enum HarnessConfigError {
    #[error(transparent)]
    Transfer(#[from] TransferPlanError),
    #[error("chain id must not be empty")]
    ChainIdEmpty,
}

/// Full harness configuration shared by the deployer, workloads, and
/// expectations.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HarnessConfig {
    pub faucet: FaucetAccount,
    pub chain_id: String,
    pub endpoints: RpcEndpoints,
    pub homes: ToolHomes,
    pub transfer: TransferPlan,
    pub iterations: NonZeroUsize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            faucet: FaucetAccount::default(),
            chain_id: DEFAULT_CHAIN_ID.to_owned(),
            endpoints: RpcEndpoints::default(),
            homes: ToolHomes::default(),
            transfer: TransferPlan::default(),
            iterations: NonZeroUsize::new(DEFAULT_ITERATIONS)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl HarnessConfig {
    /// Defaults overlaid with any `WALLET_HARNESS_*` environment overrides.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let iterations = read_env_any(&[ITERATIONS_ENV], defaults.iterations.get());
        let iterations = NonZeroUsize::new(iterations).unwrap_or_else(|| {
            tracing::warn!(
                env = ITERATIONS_ENV,
                "iteration override must be non-zero; keeping default"
            );
            defaults.iterations
        });

        Self {
            faucet: FaucetAccount::from_env(),
            chain_id: read_env_string(&[CHAIN_ID_ENV]).unwrap_or(defaults.chain_id),
            endpoints: RpcEndpoints::from_env(),
            homes: ToolHomes::from_env(),
            transfer: defaults.transfer,
            iterations,
        }
    }

    /// Check cross-field invariants before a scenario is built.
    pub fn validate(&self) -> Result<(), HarnessConfigError> {
        if self.chain_id.is_empty() {
            return Err(HarnessConfigError::ChainIdEmpty);
        }
        self.transfer.validate()?;
        Ok(())
    }
}
