use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::sleep;
use wallet_harness_config::Address;
use wallet_harness_core::scenario::{DynError, Expectation, RunContext};

use crate::ledger::TransferLedger;

const REQUEST_RETRIES: usize = 5;
const REQUEST_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Checks that the faucet sequence advanced by exactly one per completed
/// funding transfer.
pub struct FaucetSequenceExpectation {
    ledger: Arc<TransferLedger>,
}

#[derive(Debug, Error)]
enum FaucetSequenceError {
    #[error("batch workload never recorded the faucet base sequence")]
    MissingBaseSequence,
    #[error(
        "faucet sequence is {observed}, expected {expected} (base {base} + {completed} transfers)"
    )]
    SequenceMismatch {
        base: u64,
        completed: u64,
        expected: u64,
        observed: u64,
    },
}

#[async_trait]
impl Expectation for FaucetSequenceExpectation {
    fn name(&self) -> &'static str {
        "faucet_sequence"
    }

    async fn evaluate(&mut self, ctx: &RunContext) -> Result<(), DynError> {
        let base = self
            .ledger
            .base_sequence()
            .ok_or(FaucetSequenceError::MissingBaseSequence)?;
        let completed = self.ledger.completed_count() as u64;
        let expected = base + completed;

        let faucet = ctx.config().faucet.address;
        let observed = sample_sequence(ctx, &faucet, expected).await?;

        if observed == expected {
            tracing::info!(
                base,
                completed,
                observed,
                "faucet sequence expectation satisfied"
            );
            return Ok(());
        }

        Err(Box::new(FaucetSequenceError::SequenceMismatch {
            base,
            completed,
            expected,
            observed,
        }))
    }
}

impl FaucetSequenceExpectation {
    #[must_use]
    pub const fn new(ledger: Arc<TransferLedger>) -> Self {
        Self { ledger }
    }
}

/// Sample the faucet sequence, retrying while the last transfer may still be
/// settling below the expected value.
async fn sample_sequence(
    ctx: &RunContext,
    faucet: &Address,
    expected: u64,
) -> Result<u64, DynError> {
    let mut last_seen = None;

    for attempt in 0..REQUEST_RETRIES {
        match ctx.wallet_cli().query_account(faucet).await {
            Ok(status) => {
                tracing::debug!(
                    attempt,
                    sequence = status.sequence,
                    expected,
                    "faucet sequence sampled"
                );
                last_seen = Some(status.sequence);
                if status.sequence >= expected {
                    return Ok(status.sequence);
                }
            }
            Err(err) if attempt + 1 == REQUEST_RETRIES => return Err(err.into()),
            Err(err) => {
                tracing::debug!(attempt, error = %err, "faucet query failed; retrying");
            }
        }
        sleep(REQUEST_RETRY_DELAY).await;
    }

    last_seen.ok_or_else(|| "faucet sequence could not be sampled".into())
}
