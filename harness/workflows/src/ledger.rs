use std::sync::{Mutex, OnceLock};

use wallet_harness_config::Address;

/// One account the batch workload funded and drained.
#[derive(Clone, Copy, Debug)]
pub struct CreatedAccount {
    pub address: Address,
}

/// Run record shared between the batch workload and its expectations.
///
/// The workload records the faucet's pre-run sequence once and appends every
/// account whose round completed; expectations read both after the run.
#[derive(Debug, Default)]
pub struct TransferLedger {
    base_sequence: OnceLock<u64>,
    completed: Mutex<Vec<CreatedAccount>>,
}

impl TransferLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the faucet sequence observed before the first transfer. Later
    /// calls are ignored; the first observation wins.
    pub fn record_base_sequence(&self, sequence: u64) {
        let _ = self.base_sequence.set(sequence);
    }

    #[must_use]
    pub fn base_sequence(&self) -> Option<u64> {
        self.base_sequence.get().copied()
    }

    pub fn record_completed(&self, account: CreatedAccount) {
        self.completed
            .lock()
            .expect("transfer ledger lock poisoned")
            .push(account);
    }

    #[must_use]
    pub fn completed(&self) -> Vec<CreatedAccount> {
        self.completed
            .lock()
            .expect("transfer ledger lock poisoned")
            .clone()
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed
            .lock()
            .expect("transfer ledger lock poisoned")
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_base_sequence_observation_wins() {
        let ledger = TransferLedger::new();
        assert_eq!(ledger.base_sequence(), None);

        ledger.record_base_sequence(7);
        ledger.record_base_sequence(99);
        assert_eq!(ledger.base_sequence(), Some(7));
    }

    #[test]
    fn completed_accounts_accumulate_in_order() {
        let ledger = TransferLedger::new();
        let first: Address = "0x9f1233798e905e173560071255140b4a8abd3ec6".parse().unwrap();
        let second: Address = "0x71ab3f2c8870c0b5f6a1e02e1e26e67a74bc1ede".parse().unwrap();

        ledger.record_completed(CreatedAccount { address: first });
        ledger.record_completed(CreatedAccount { address: second });

        let completed = ledger.completed();
        assert_eq!(completed.len(), 2);
        assert_eq!(completed[0].address, first);
        assert_eq!(completed[1].address, second);
        assert_eq!(ledger.completed_count(), 2);
    }
}
