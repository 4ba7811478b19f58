use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::{debug, info};
use url::Url;
use wallet_harness_config::Address;

use super::{client::RpcClient, wallet::WalletRpcClient};
use crate::rpc::RpcError;

const NODE_STATUS_METHOD: &str = "theta.GetStatus";

#[derive(Serialize)]
struct NoArgs {}

/// Error raised when a daemon RPC endpoint does not answer in time.
#[derive(Clone, Debug, Error)]
#[error("timeout waiting for rpc endpoint {endpoint} after {timeout:?}")]
pub struct RpcReadinessError {
    endpoint: Url,
    timeout: Duration,
}

impl RpcReadinessError {
    #[must_use]
    pub const fn new(endpoint: Url, timeout: Duration) -> Self {
        Self { endpoint, timeout }
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Wait until the wallet daemon answers RPC calls.
///
/// The probe issues a read-only unlock check against `probe_address`; any
/// well-formed response, including a server-side error object, proves the
/// daemon is up.
pub async fn wait_for_wallet_rpc(
    client: &WalletRpcClient,
    probe_address: &Address,
    timeout_duration: Duration,
    poll_interval: Duration,
) -> Result<(), RpcReadinessError> {
    info!(
        endpoint = %client.endpoint(),
        timeout_secs = timeout_duration.as_secs_f32(),
        poll_ms = poll_interval.as_millis(),
        "waiting for wallet daemon rpc readiness"
    );

    let probe = async {
        loop {
            match client.is_key_unlocked(probe_address).await {
                Ok(_) | Err(RpcError::Server { .. } | RpcError::MissingResult { .. }) => return,
                Err(RpcError::Transport(err)) => {
                    debug!(error = %err, "wallet daemon not answering yet");
                }
            }
            sleep(poll_interval).await;
        }
    };

    timeout(timeout_duration, probe)
        .await
        .map_err(|_| RpcReadinessError::new(client.endpoint().clone(), timeout_duration))
}

/// Wait until the node daemon answers its status query.
pub async fn wait_for_node_rpc(
    client: &RpcClient,
    timeout_duration: Duration,
    poll_interval: Duration,
) -> Result<(), RpcReadinessError> {
    info!(
        endpoint = %client.endpoint(),
        timeout_secs = timeout_duration.as_secs_f32(),
        poll_ms = poll_interval.as_millis(),
        "waiting for node rpc readiness"
    );

    let probe = async {
        loop {
            let call: Result<Value, _> = client.call(NODE_STATUS_METHOD, &NoArgs {}).await;
            match call {
                Ok(_) | Err(RpcError::Server { .. } | RpcError::MissingResult { .. }) => return,
                Err(RpcError::Transport(err)) => {
                    debug!(error = %err, "node daemon not answering yet");
                }
            }
            sleep(poll_interval).await;
        }
    };

    timeout(timeout_duration, probe)
        .await
        .map_err(|_| RpcReadinessError::new(client.endpoint().clone(), timeout_duration))
}
