pub mod binary;
pub mod command;
pub mod keygen;
pub mod keystore;
pub mod wallet_cli;

pub use binary::{BinaryConfig, BinaryResolver};
pub use command::{CommandError, run_captured};
pub use keygen::{KeygenError, KeygenTool};
pub use keystore::{KeystoreImportError, import_generated_key};
pub use wallet_cli::{AccountStatus, Coins, WalletCli, WalletCliError};
