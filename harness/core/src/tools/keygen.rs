use std::{ffi::OsStr, path::PathBuf};

use thiserror::Error;
use tracing::debug;
use wallet_harness_config::{Address, AddressParseError, ToolHomes};

use super::{
    binary::{BinaryConfig, BinaryResolver},
    command::{CommandError, run_captured},
};

/// Default resolution for the key-generation tool.
pub const BINARY: BinaryConfig = BinaryConfig {
    env_var: "WALLET_HARNESS_KEYGEN_BIN",
    binary_name: "geth",
    fallback_path: "/usr/local/bin/geth",
};

const ANNOUNCEMENT_PREFIX: &str = "Address: {";

#[derive(Debug, Error)]
pub enum KeygenError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("no address announcement in key generation output: {output}")]
    MissingAnnouncement { output: String },
    #[error("announced address is malformed: {source}")]
    MalformedAddress {
        #[source]
        source: AddressParseError,
    },
}

/// Driver for the external key-generation tool (`account new`).
#[derive(Clone, Debug)]
pub struct KeygenTool {
    binary: PathBuf,
    datadir: PathBuf,
    password_file: PathBuf,
}

impl KeygenTool {
    #[must_use]
    pub const fn new(binary: PathBuf, datadir: PathBuf, password_file: PathBuf) -> Self {
        Self {
            binary,
            datadir,
            password_file,
        }
    }

    /// Resolve the binary and wire it to the configured homes.
    #[must_use]
    pub fn from_homes(homes: &ToolHomes) -> Self {
        Self::new(
            BinaryResolver::resolve_path(&BINARY),
            homes.keygen_home.clone(),
            homes.password_file.clone(),
        )
    }

    /// Generate a fresh keystore entry and return the announced address.
    pub async fn generate_account(&self) -> Result<Address, KeygenError> {
        let output = run_captured(
            &self.binary,
            [
                OsStr::new("account"),
                OsStr::new("new"),
                OsStr::new("--datadir"),
                self.datadir.as_os_str(),
                OsStr::new("--password"),
                self.password_file.as_os_str(),
            ],
        )
        .await?;

        let address = parse_announced_address(&output)?;
        debug!(%address, "key generation tool announced a new account");
        Ok(address)
    }
}

/// Extract the address from the tool's `Address: {…}` announcement line.
///
/// Only lowercase bare hex is accepted, matching what the tool prints.
fn parse_announced_address(output: &str) -> Result<Address, KeygenError> {
    let missing = || KeygenError::MissingAnnouncement {
        output: output.trim().to_owned(),
    };

    let start = output.find(ANNOUNCEMENT_PREFIX).ok_or_else(missing)?;
    let rest = &output[start + ANNOUNCEMENT_PREFIX.len()..];
    let end = rest.find('}').ok_or_else(missing)?;
    let bare = &rest[..end];

    if bare.is_empty() || !bare.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()) {
        return Err(missing());
    }

    bare.parse()
        .map_err(|source| KeygenError::MalformedAddress { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn announcement_line_is_extracted() {
        let output = "Address: {9f1233798e905e173560071255140b4a8abd3ec6}\n";
        let address = parse_announced_address(output).unwrap();
        assert_eq!(
            address.to_string(),
            "0x9f1233798e905e173560071255140b4a8abd3ec6"
        );
    }

    #[test]
    fn surrounding_log_noise_is_tolerated() {
        let output = "\
WARN some tool banner
Address: {71ab3f2c8870c0b5f6a1e02e1e26e67a74bc1ede}
done
";
        let address = parse_announced_address(output).unwrap();
        assert_eq!(address.bare_hex(), "71ab3f2c8870c0b5f6a1e02e1e26e67a74bc1ede");
    }

    #[test]
    fn missing_announcement_is_an_error() {
        let err = parse_announced_address("nothing to see here").unwrap_err();
        assert!(matches!(err, KeygenError::MissingAnnouncement { .. }));
    }

    #[test]
    fn uppercase_hex_is_rejected() {
        let output = "Address: {9F1233798E905E173560071255140B4A8ABD3EC6}";
        let err = parse_announced_address(output).unwrap_err();
        assert!(matches!(err, KeygenError::MissingAnnouncement { .. }));
    }

    #[test]
    fn unterminated_announcement_is_an_error() {
        let output = "Address: {9f1233798e905e17356007";
        let err = parse_announced_address(output).unwrap_err();
        assert!(matches!(err, KeygenError::MissingAnnouncement { .. }));
    }

    #[test]
    fn short_address_is_malformed() {
        let output = "Address: {9f1233}";
        let err = parse_announced_address(output).unwrap_err();
        assert!(matches!(err, KeygenError::MalformedAddress { .. }));
    }
}
