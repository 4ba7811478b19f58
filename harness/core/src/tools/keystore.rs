use std::{fs, io, path::PathBuf};

use thiserror::Error;
use tracing::debug;
use wallet_harness_config::{Address, ToolHomes};

#[derive(Debug, Error)]
pub enum KeystoreImportError {
    #[error("failed to read keystore dir {}: {source}", dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no key file for {address} under {}", dir.display())]
    KeyFileNotFound { address: Address, dir: PathBuf },
    #[error("failed to create {}: {source}", dir.display())]
    CreateTarget {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Copy a freshly generated key file into the wallet daemon's encrypted-keys
/// directory, renaming it to the bare-hex address the daemon looks up.
///
/// The key-generation tool names its files `UTC--<timestamp>--<address>`, so
/// the match is on the `--<address>` suffix.
pub fn import_generated_key(
    homes: &ToolHomes,
    address: &Address,
) -> Result<PathBuf, KeystoreImportError> {
    let keystore_dir = homes.keystore_dir();
    let suffix = format!("--{}", address.bare_hex());

    let entries = fs::read_dir(&keystore_dir).map_err(|source| KeystoreImportError::ReadDir {
        dir: keystore_dir.clone(),
        source,
    })?;

    let key_file = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .find(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(&suffix))
        })
        .ok_or_else(|| KeystoreImportError::KeyFileNotFound {
            address: *address,
            dir: keystore_dir.clone(),
        })?;

    let target_dir = homes.encrypted_keys_dir();
    fs::create_dir_all(&target_dir).map_err(|source| KeystoreImportError::CreateTarget {
        dir: target_dir.clone(),
        source,
    })?;

    let target = target_dir.join(address.bare_hex());
    fs::copy(&key_file, &target).map_err(|source| KeystoreImportError::Copy {
        from: key_file.clone(),
        to: target.clone(),
        source,
    })?;

    debug!(from = %key_file.display(), to = %target.display(), "imported key file");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    const ADDRESS: &str = "71ab3f2c8870c0b5f6a1e02e1e26e67a74bc1ede";

    fn homes_in(root: &Path) -> ToolHomes {
        ToolHomes {
            keygen_home: root.join("keygen"),
            wallet_home: root.join("wallet"),
            password_file: root.join("password.txt"),
        }
    }

    #[test]
    fn key_file_is_copied_and_renamed() {
        let root = tempfile::tempdir().unwrap();
        let homes = homes_in(root.path());
        let keystore = homes.keystore_dir();
        fs::create_dir_all(&keystore).unwrap();
        fs::write(
            keystore.join(format!("UTC--2020-01-01T00-00-00.000000000Z--{ADDRESS}")),
            b"{\"version\":3}",
        )
        .unwrap();

        let address: Address = ADDRESS.parse().unwrap();
        let imported = import_generated_key(&homes, &address).unwrap();

        assert_eq!(imported, homes.encrypted_keys_dir().join(ADDRESS));
        assert_eq!(fs::read(imported).unwrap(), b"{\"version\":3}");
    }

    #[test]
    fn missing_key_file_is_reported() {
        let root = tempfile::tempdir().unwrap();
        let homes = homes_in(root.path());
        fs::create_dir_all(homes.keystore_dir()).unwrap();

        let address: Address = ADDRESS.parse().unwrap();
        let err = import_generated_key(&homes, &address).unwrap_err();
        assert!(matches!(err, KeystoreImportError::KeyFileNotFound { .. }));
    }

    #[test]
    fn missing_keystore_dir_is_reported() {
        let root = tempfile::tempdir().unwrap();
        let homes = homes_in(root.path());

        let address: Address = ADDRESS.parse().unwrap();
        let err = import_generated_key(&homes, &address).unwrap_err();
        assert!(matches!(err, KeystoreImportError::ReadDir { .. }));
    }
}
