pub mod client;
pub mod probe;
pub mod wallet;

pub use client::{RpcClient, RpcError};
pub use probe::{RpcReadinessError, wait_for_node_rpc, wait_for_wallet_rpc};
pub use wallet::{SendArgs, SendResult, UnlockKeyResult, WalletRpcClient};
