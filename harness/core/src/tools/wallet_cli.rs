use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use wallet_harness_config::Address;

use super::{
    binary::{BinaryConfig, BinaryResolver},
    command::{CommandError, run_captured},
};

/// Default resolution for the wallet query CLI.
pub const BINARY: BinaryConfig = BinaryConfig {
    env_var: "WALLET_HARNESS_WALLET_CLI_BIN",
    binary_name: "thetacli",
    fallback_path: "/usr/local/bin/thetacli",
};

#[derive(Debug, Error)]
pub enum WalletCliError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("account query output is not valid account JSON: {source}; output: {output}")]
    Parse {
        #[source]
        source: serde_json::Error,
        output: String,
    },
}

/// Account state as printed by `query account`; the daemon stringifies the
/// sequence and coin amounts.
#[derive(Clone, Debug, Deserialize)]
pub struct AccountStatus {
    #[serde(deserialize_with = "stringly::u64")]
    pub sequence: u64,
    pub coins: Coins,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Coins {
    #[serde(deserialize_with = "stringly::u128")]
    pub thetawei: u128,
    #[serde(deserialize_with = "stringly::u128")]
    pub tfuelwei: u128,
}

/// Driver for the wallet CLI's read-only queries.
#[derive(Clone, Debug)]
pub struct WalletCli {
    binary: PathBuf,
}

impl WalletCli {
    #[must_use]
    pub const fn new(binary: PathBuf) -> Self {
        Self { binary }
    }

    #[must_use]
    pub fn resolve() -> Self {
        Self::new(BinaryResolver::resolve_path(&BINARY))
    }

    /// `query account --address=0x…`, parsed from the CLI's JSON output.
    pub async fn query_account(&self, address: &Address) -> Result<AccountStatus, WalletCliError> {
        let address_flag = format!("--address={address}");
        let output = run_captured(&self.binary, ["query", "account", address_flag.as_str()]).await?;

        parse_account_status(&output)
    }
}

fn parse_account_status(output: &str) -> Result<AccountStatus, WalletCliError> {
    serde_json::from_str(output).map_err(|source| WalletCliError::Parse {
        source,
        output: output.trim().to_owned(),
    })
}

/// The daemon encodes unsigned numbers as decimal strings; some tools emit
/// plain numbers for small values, so both spellings are accepted.
mod stringly {
    use serde::{Deserialize, Deserializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    pub fn u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Text(raw) => raw.parse().map_err(de::Error::custom),
            Raw::Number(value) => Ok(value),
        }
    }

    pub fn u128<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Text(raw) => raw.parse().map_err(de::Error::custom),
            Raw::Number(value) => Ok(value.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUERY_OUTPUT: &str = r#"{
    "address": "0x9f1233798e905e173560071255140b4a8abd3ec6",
    "coins": {
        "thetawei": "994999990000000000000000000",
        "tfuelwei": "4999999979999000000000000000"
    },
    "reserved_funds": [],
    "last_updated_block_height": "0",
    "root": "0x0000000000000000000000000000000000000000000000000000000000000000",
    "code": "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470",
    "sequence": "12"
}"#;

    #[test]
    fn query_output_parses_sequence_and_coins() {
        let status = parse_account_status(QUERY_OUTPUT).unwrap();
        assert_eq!(status.sequence, 12);
        assert_eq!(status.coins.thetawei, 994_999_990_000_000_000_000_000_000);
        assert_eq!(status.coins.tfuelwei, 4_999_999_979_999_000_000_000_000_000);
    }

    #[test]
    fn plain_number_sequence_is_accepted() {
        let output = r#"{"sequence": 3, "coins": {"thetawei": "0", "tfuelwei": "0"}}"#;
        let status = parse_account_status(output).unwrap();
        assert_eq!(status.sequence, 3);
    }

    #[test]
    fn non_json_output_is_a_parse_error() {
        let err = parse_account_status("Failed to get account details").unwrap_err();
        assert!(matches!(err, WalletCliError::Parse { .. }));
    }

    #[test]
    fn non_numeric_sequence_is_a_parse_error() {
        let output = r#"{"sequence": "abc", "coins": {"thetawei": "0", "tfuelwei": "0"}}"#;
        let err = parse_account_status(output).unwrap_err();
        assert!(matches!(err, WalletCliError::Parse { .. }));
    }
}
