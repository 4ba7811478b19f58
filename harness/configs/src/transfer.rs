use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_FUNDING_THETAWEI: u128 = 1_000;
const DEFAULT_FUNDING_TFUELWEI: u128 = 1_000_000_000_000_000_000;
const DEFAULT_RETURN_THETAWEI: u128 = 19;
const DEFAULT_RETURN_TFUELWEI: u128 = 19;
const DEFAULT_FEE_TFUELWEI: u128 = 1_000_000_000_000;

#[derive(Debug, Error)]
pub enum TransferPlanError {
    #[error("return of {returned} thetawei exceeds funding of {funded}")]
    ThetaReturnExceedsFunding { funded: u128, returned: u128 },
    #[error("return of {returned} tfuelwei plus fee {fee} exceeds funding of {funded}")]
    TfuelReturnExceedsFunding { funded: u128, returned: u128, fee: u128 },
}

/// Amounts moved per round: a funding transfer from the faucet to the fresh
/// account, and a smaller transfer back. The returning transaction pays the
/// fee out of the account's tfuel balance.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct TransferPlan {
    pub funding_thetawei: u128,
    pub funding_tfuelwei: u128,
    pub return_thetawei: u128,
    pub return_tfuelwei: u128,
    pub fee_tfuelwei: u128,
}

impl Default for TransferPlan {
    fn default() -> Self {
        Self {
            funding_thetawei: DEFAULT_FUNDING_THETAWEI,
            funding_tfuelwei: DEFAULT_FUNDING_TFUELWEI,
            return_thetawei: DEFAULT_RETURN_THETAWEI,
            return_tfuelwei: DEFAULT_RETURN_TFUELWEI,
            fee_tfuelwei: DEFAULT_FEE_TFUELWEI,
        }
    }
}

impl TransferPlan {
    /// Reject plans whose return leg could overdraw the fresh account.
    pub fn validate(&self) -> Result<(), TransferPlanError> {
        if self.return_thetawei > self.funding_thetawei {
            return Err(TransferPlanError::ThetaReturnExceedsFunding {
                funded: self.funding_thetawei,
                returned: self.return_thetawei,
            });
        }
        let tfuel_out = self.return_tfuelwei.checked_add(self.fee_tfuelwei);
        if tfuel_out.is_none_or(|out| out > self.funding_tfuelwei) {
            return Err(TransferPlanError::TfuelReturnExceedsFunding {
                funded: self.funding_tfuelwei,
                returned: self.return_tfuelwei,
                fee: self.fee_tfuelwei,
            });
        }
        Ok(())
    }

    /// Thetawei left on a fresh account after both transfers settle.
    #[must_use]
    pub fn net_thetawei(&self) -> Option<u128> {
        self.funding_thetawei.checked_sub(self.return_thetawei)
    }

    /// Tfuelwei left on a fresh account after both transfers and the fee.
    #[must_use]
    pub fn net_tfuelwei(&self) -> Option<u128> {
        self.funding_tfuelwei
            .checked_sub(self.return_tfuelwei)?
            .checked_sub(self.fee_tfuelwei)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_is_valid_and_nets_out() {
        let plan = TransferPlan::default();
        assert!(plan.validate().is_ok());
        assert_eq!(plan.net_thetawei(), Some(981));
        assert_eq!(
            plan.net_tfuelwei(),
            Some(1_000_000_000_000_000_000 - 19 - 1_000_000_000_000)
        );
    }

    #[test]
    fn theta_overdraw_is_rejected() {
        let plan = TransferPlan {
            return_thetawei: DEFAULT_FUNDING_THETAWEI + 1,
            ..TransferPlan::default()
        };

        let err = plan.validate().unwrap_err();
        assert!(matches!(err, TransferPlanError::ThetaReturnExceedsFunding { .. }));
    }

    #[test]
    fn fee_counts_against_tfuel_funding() {
        let plan = TransferPlan {
            funding_tfuelwei: 20,
            return_tfuelwei: 19,
            fee_tfuelwei: 2,
            ..TransferPlan::default()
        };

        let err = plan.validate().unwrap_err();
        assert!(matches!(err, TransferPlanError::TfuelReturnExceedsFunding { .. }));
    }
}
