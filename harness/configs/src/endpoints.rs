use serde::{Deserialize, Serialize};
use url::Url;

use crate::env::read_env_string;

/// Wallet daemon JSON-RPC endpoint, as launched by `wallet daemon start`.
pub const DEFAULT_WALLET_RPC_URL: &str = "http://localhost:16889/rpc";

/// Node JSON-RPC endpoint; only probed for readiness.
pub const DEFAULT_NODE_RPC_URL: &str = "http://localhost:16888/rpc";

const WALLET_RPC_ENV: &str = "WALLET_HARNESS_WALLET_RPC_URL";
const NODE_RPC_ENV: &str = "WALLET_HARNESS_NODE_RPC_URL";

/// JSON-RPC endpoints of the externally launched daemons.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RpcEndpoints {
    pub wallet_rpc: Url,
    pub node_rpc: Url,
}

impl Default for RpcEndpoints {
    fn default() -> Self {
        Self {
            wallet_rpc: parse_known(DEFAULT_WALLET_RPC_URL),
            node_rpc: parse_known(DEFAULT_NODE_RPC_URL),
        }
    }
}

impl RpcEndpoints {
    /// Defaults overlaid with env overrides; malformed overrides are logged
    /// and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            wallet_rpc: override_url(WALLET_RPC_ENV, defaults.wallet_rpc),
            node_rpc: override_url(NODE_RPC_ENV, defaults.node_rpc),
        }
    }
}

fn override_url(env_var: &str, default: Url) -> Url {
    match read_env_string(&[env_var]) {
        Some(raw) => Url::parse(&raw).unwrap_or_else(|err| {
            tracing::warn!(
                env = env_var,
                raw,
                error = %err,
                "endpoint override is not a valid url; keeping default"
            );
            default
        }),
        None => default,
    }
}

fn parse_known(url: &str) -> Url {
    Url::parse(url).unwrap_or_else(|_| unsafe {
        // Safety: the default endpoint literals are valid URLs.
        std::hint::unreachable_unchecked()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_localhost_rpc() {
        let endpoints = RpcEndpoints::default();
        assert_eq!(endpoints.wallet_rpc.as_str(), DEFAULT_WALLET_RPC_URL);
        assert_eq!(endpoints.node_rpc.as_str(), DEFAULT_NODE_RPC_URL);
        assert_eq!(endpoints.wallet_rpc.port(), Some(16889));
        assert_eq!(endpoints.node_rpc.port(), Some(16888));
    }
}
