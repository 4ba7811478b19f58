use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, de};
use thiserror::Error;

use crate::env::read_env_string;

/// Pre-funded account used to distribute test tokens.
pub const DEFAULT_FAUCET_ADDRESS: &str = "0x9f1233798e905e173560071255140b4a8abd3ec6";

const DEFAULT_FAUCET_PASSWORD: &str = "qwertyuiop";
const FAUCET_ADDRESS_ENV: &str = "WALLET_HARNESS_FAUCET_ADDRESS";
const FAUCET_PASSWORD_ENV: &str = "WALLET_HARNESS_FAUCET_PASSWORD";

const ADDRESS_BYTES: usize = 20;

#[derive(Debug, Error)]
pub enum AddressParseError {
    #[error("address must be {expected} hex chars, got {got}")]
    BadLength { expected: usize, got: usize },
    #[error("address contains non-hex characters: '{raw}'")]
    BadHex { raw: String },
}

/// 20-byte account address, displayed as lowercase `0x…` hex.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Address([u8; ADDRESS_BYTES]);

impl Address {
    /// Lowercase hex without the `0x` prefix, as used in keystore file names.
    #[must_use]
    pub fn bare_hex(&self) -> String {
        hex::encode(self.0)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let bare = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")).unwrap_or(raw);
        if bare.len() != ADDRESS_BYTES * 2 {
            return Err(AddressParseError::BadLength {
                expected: ADDRESS_BYTES * 2,
                got: bare.len(),
            });
        }
        let mut bytes = [0u8; ADDRESS_BYTES];
        hex::decode_to_slice(bare, &mut bytes).map_err(|_| AddressParseError::BadHex {
            raw: raw.to_owned(),
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Faucet credentials used to source every funding transfer.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FaucetAccount {
    pub address: Address,
    pub password: String,
}

impl Default for FaucetAccount {
    fn default() -> Self {
        let address = DEFAULT_FAUCET_ADDRESS.parse().unwrap_or_else(|_| unsafe {
            // Safety: the default faucet address literal is valid hex.
            std::hint::unreachable_unchecked()
        });
        Self {
            address,
            password: DEFAULT_FAUCET_PASSWORD.to_owned(),
        }
    }
}

impl FaucetAccount {
    /// Defaults overlaid with env overrides; a malformed address override is
    /// logged and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let address = match read_env_string(&[FAUCET_ADDRESS_ENV]) {
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                tracing::warn!(
                    env = FAUCET_ADDRESS_ENV,
                    raw,
                    error = %err,
                    "faucet address override is invalid; keeping default"
                );
                defaults.address
            }),
            None => defaults.address,
        };

        Self {
            address,
            password: read_env_string(&[FAUCET_PASSWORD_ENV]).unwrap_or(defaults.password),
        }
    }
}
