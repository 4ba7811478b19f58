use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::env::read_env_string;

const KEYGEN_HOME_ENV: &str = "WALLET_HARNESS_KEYGEN_HOME";
const WALLET_HOME_ENV: &str = "WALLET_HARNESS_WALLET_HOME";
const PASSWORD_FILE_ENV: &str = "WALLET_HARNESS_PASSWORD_FILE";

const DEFAULT_KEYGEN_HOME: &str = ".ethereum";
const DEFAULT_WALLET_HOME: &str = ".thetacli";
const DEFAULT_PASSWORD_FILE: &str = "new_account_password.txt";

/// Filesystem locations of the external tools' data directories.
///
/// `keygen_home` is the key-generation tool's data dir (holds `keystore/`);
/// `wallet_home` is the wallet daemon's home (holds `keys/encrypted/`);
/// `password_file` protects every generated account and is passed to the
/// key-generation tool verbatim.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ToolHomes {
    pub keygen_home: PathBuf,
    pub wallet_home: PathBuf,
    pub password_file: PathBuf,
}

impl Default for ToolHomes {
    fn default() -> Self {
        Self {
            keygen_home: home_relative(DEFAULT_KEYGEN_HOME),
            wallet_home: home_relative(DEFAULT_WALLET_HOME),
            password_file: PathBuf::from(DEFAULT_PASSWORD_FILE),
        }
    }
}

impl ToolHomes {
    /// Defaults overlaid with env overrides.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            keygen_home: override_path(KEYGEN_HOME_ENV, defaults.keygen_home),
            wallet_home: override_path(WALLET_HOME_ENV, defaults.wallet_home),
            password_file: override_path(PASSWORD_FILE_ENV, defaults.password_file),
        }
    }

    /// Directory the key-generation tool writes fresh key files into.
    #[must_use]
    pub fn keystore_dir(&self) -> PathBuf {
        self.keygen_home.join("keystore")
    }

    /// Directory the wallet daemon reads encrypted keys from.
    #[must_use]
    pub fn encrypted_keys_dir(&self) -> PathBuf {
        self.wallet_home.join("keys").join("encrypted")
    }
}

fn override_path(env_var: &str, default: PathBuf) -> PathBuf {
    read_env_string(&[env_var]).map_or(default, PathBuf::from)
}

fn home_relative(name: &str) -> PathBuf {
    std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from).join(name)
}
