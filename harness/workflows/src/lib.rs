pub mod builder;
pub mod expectations;
pub mod ledger;
pub mod workloads;

pub use builder::ScenarioBuilderExt;
pub use expectations::{AccountBalanceExpectation, FaucetSequenceExpectation};
pub use ledger::{CreatedAccount, TransferLedger};
pub use workloads::batch_transfer::BatchTransferWorkload;
