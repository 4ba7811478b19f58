use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::sleep;
use wallet_harness_config::Address;
use wallet_harness_core::scenario::{DynError, Expectation, RunContext};

use crate::ledger::TransferLedger;

const DEFAULT_SAMPLE_LIMIT: usize = 5;
const REQUEST_RETRIES: usize = 5;
const REQUEST_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Checks that sampled created accounts hold the net of the two transfers:
/// funding minus the returned amounts, with the fee debited from tfuel.
pub struct AccountBalanceExpectation {
    ledger: Arc<TransferLedger>,
    sample_limit: usize,
}

#[derive(Debug, Error)]
enum AccountBalanceIssue {
    #[error("{account} holds {observed} thetawei, expected {expected}")]
    Thetawei {
        account: Address,
        expected: u128,
        observed: u128,
    },
    #[error("{account} holds {observed} tfuelwei, expected {expected}")]
    Tfuelwei {
        account: Address,
        expected: u128,
        observed: u128,
    },
    #[error("{account} query failed: {source}")]
    RequestFailed {
        account: Address,
        #[source]
        source: DynError,
    },
}

#[derive(Debug, Error)]
enum AccountBalanceError {
    #[error("no completed transfer rounds to verify")]
    NoCompletedAccounts,
    #[error("transfer plan nets below zero; config validation should have caught this")]
    PlanUnderflow,
    #[error("account balances violated:\n{details}")]
    Violations {
        #[source]
        details: ViolationIssues,
    },
}

#[derive(Debug, Error)]
#[error("{message}")]
struct ViolationIssues {
    issues: Vec<AccountBalanceIssue>,
    message: String,
}

#[async_trait]
impl Expectation for AccountBalanceExpectation {
    fn name(&self) -> &'static str {
        "account_balance"
    }

    async fn evaluate(&mut self, ctx: &RunContext) -> Result<(), DynError> {
        let completed = self.ledger.completed();
        if completed.is_empty() {
            return Err(Box::new(AccountBalanceError::NoCompletedAccounts));
        }

        let plan = &ctx.config().transfer;
        let expected_thetawei = plan.net_thetawei().ok_or(AccountBalanceError::PlanUnderflow)?;
        let expected_tfuelwei = plan.net_tfuelwei().ok_or(AccountBalanceError::PlanUnderflow)?;

        let sampled: Vec<_> = completed
            .iter()
            .rev()
            .take(self.sample_limit)
            .copied()
            .collect();

        tracing::info!(
            completed = completed.len(),
            sampled = sampled.len(),
            expected_thetawei,
            expected_tfuelwei,
            "verifying created account balances"
        );

        let mut issues = Vec::new();
        for account in sampled {
            match fetch_coins(ctx, &account.address).await {
                Ok((thetawei, tfuelwei)) => {
                    if thetawei != expected_thetawei {
                        issues.push(AccountBalanceIssue::Thetawei {
                            account: account.address,
                            expected: expected_thetawei,
                            observed: thetawei,
                        });
                    }
                    if tfuelwei != expected_tfuelwei {
                        issues.push(AccountBalanceIssue::Tfuelwei {
                            account: account.address,
                            expected: expected_tfuelwei,
                            observed: tfuelwei,
                        });
                    }
                }
                Err(source) => issues.push(AccountBalanceIssue::RequestFailed {
                    account: account.address,
                    source,
                }),
            }
        }

        if issues.is_empty() {
            tracing::info!("account balance expectation satisfied");
            return Ok(());
        }

        for issue in &issues {
            tracing::warn!(?issue, "account balance issue");
        }

        Err(Box::new(AccountBalanceError::Violations {
            details: issues.into(),
        }))
    }
}

impl AccountBalanceExpectation {
    #[must_use]
    pub const fn new(ledger: Arc<TransferLedger>) -> Self {
        Self {
            ledger,
            sample_limit: DEFAULT_SAMPLE_LIMIT,
        }
    }

    #[must_use]
    /// Adjusts how many of the most recent accounts get verified.
    pub const fn with_sample_limit(mut self, sample_limit: usize) -> Self {
        self.sample_limit = sample_limit;
        self
    }
}

async fn fetch_coins(ctx: &RunContext, account: &Address) -> Result<(u128, u128), DynError> {
    for attempt in 0..REQUEST_RETRIES {
        match ctx.wallet_cli().query_account(account).await {
            Ok(status) => return Ok((status.coins.thetawei, status.coins.tfuelwei)),
            Err(err) if attempt + 1 == REQUEST_RETRIES => return Err(err.into()),
            Err(err) => {
                tracing::debug!(attempt, account = %account, error = %err, "account query failed; retrying");
                sleep(REQUEST_RETRY_DELAY).await;
            }
        }
    }
    Err("account balance could not be sampled".into())
}

impl From<Vec<AccountBalanceIssue>> for ViolationIssues {
    fn from(issues: Vec<AccountBalanceIssue>) -> Self {
        let mut message = String::new();
        for issue in &issues {
            if !message.is_empty() {
                message.push('\n');
            }
            message.push_str("- ");
            message.push_str(&issue.to_string());
        }
        Self { issues, message }
    }
}
