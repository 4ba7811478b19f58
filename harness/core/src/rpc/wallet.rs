use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;
use wallet_harness_config::Address;

use super::client::{RpcClient, RpcError};

const UNLOCK_KEY_METHOD: &str = "thetacli.UnlockKey";
const IS_KEY_UNLOCKED_METHOD: &str = "thetacli.IsKeyUnlocked";
const SEND_METHOD: &str = "thetacli.Send";

#[derive(Serialize)]
struct UnlockKeyArgs<'a> {
    address: Address,
    password: &'a str,
}

#[derive(Serialize)]
struct IsKeyUnlockedArgs {
    address: Address,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct UnlockKeyResult {
    pub unlocked: bool,
}

/// Arguments for a signed transfer submitted through the wallet daemon.
/// Amounts and the sequence travel as decimal strings.
#[derive(Clone, Debug, Serialize)]
pub struct SendArgs {
    pub chain_id: String,
    pub from: Address,
    pub to: Address,
    pub thetawei: String,
    pub tfuelwei: String,
    pub fee: String,
    pub sequence: String,
    #[serde(rename = "async")]
    pub asynchronous: bool,
}

impl SendArgs {
    /// Blocking transfer with the given amounts at the given sequence.
    #[must_use]
    pub fn transfer(
        chain_id: &str,
        from: Address,
        to: Address,
        thetawei: u128,
        tfuelwei: u128,
        fee: u128,
        sequence: u64,
    ) -> Self {
        Self {
            chain_id: chain_id.to_owned(),
            from,
            to,
            thetawei: thetawei.to_string(),
            tfuelwei: tfuelwei.to_string(),
            fee: fee.to_string(),
            sequence: sequence.to_string(),
            asynchronous: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SendResult {
    #[serde(default)]
    pub hash: Option<String>,
}

/// Typed client for the wallet daemon's key and transfer methods.
#[derive(Clone, Debug)]
pub struct WalletRpcClient {
    rpc: RpcClient,
}

impl WalletRpcClient {
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            rpc: RpcClient::new(endpoint),
        }
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        self.rpc.endpoint()
    }

    /// Unlock a keystore entry so the daemon can sign with it.
    pub async fn unlock_key(
        &self,
        address: &Address,
        password: &str,
    ) -> Result<UnlockKeyResult, RpcError> {
        let args = UnlockKeyArgs {
            address: *address,
            password,
        };
        self.rpc.call(UNLOCK_KEY_METHOD, &args).await
    }

    /// Read-only unlock probe; never mutates daemon state.
    pub async fn is_key_unlocked(&self, address: &Address) -> Result<UnlockKeyResult, RpcError> {
        let args = IsKeyUnlockedArgs { address: *address };
        self.rpc.call(IS_KEY_UNLOCKED_METHOD, &args).await
    }

    /// Submit a transfer and wait for the daemon to report its hash.
    pub async fn send(&self, args: &SendArgs) -> Result<SendResult, RpcError> {
        let result: SendResult = self.rpc.call(SEND_METHOD, args).await?;
        debug!(
            from = %args.from,
            to = %args.to,
            sequence = %args.sequence,
            hash = result.hash.as_deref().unwrap_or("<none>"),
            "transfer accepted"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn send_args_serialize_to_the_daemon_wire_format() {
        let from: Address = "0x9f1233798e905e173560071255140b4a8abd3ec6".parse().unwrap();
        let to: Address = "0x71ab3f2c8870c0b5f6a1e02e1e26e67a74bc1ede".parse().unwrap();
        let args = SendArgs::transfer(
            "testnet",
            from,
            to,
            1_000,
            1_000_000_000_000_000_000,
            1_000_000_000_000,
            42,
        );

        let encoded: Value = serde_json::to_value(&args).unwrap();
        assert_eq!(
            encoded,
            json!({
                "chain_id": "testnet",
                "from": "0x9f1233798e905e173560071255140b4a8abd3ec6",
                "to": "0x71ab3f2c8870c0b5f6a1e02e1e26e67a74bc1ede",
                "thetawei": "1000",
                "tfuelwei": "1000000000000000000",
                "fee": "1000000000000",
                "sequence": "42",
                "async": false,
            })
        );
    }

    #[test]
    fn send_result_tolerates_missing_hash() {
        let result: SendResult = serde_json::from_str("{}").unwrap();
        assert!(result.hash.is_none());

        let result: SendResult =
            serde_json::from_str(r#"{"hash": "0xabc", "block": null}"#).unwrap();
        assert_eq!(result.hash.as_deref(), Some("0xabc"));
    }
}
