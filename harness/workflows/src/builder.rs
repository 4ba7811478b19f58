use std::num::NonZeroUsize;

use wallet_harness_core::scenario::Builder as CoreScenarioBuilder;

use crate::workloads::batch_transfer::BatchTransferWorkload;

/// Extension methods for building harness scenarios with common patterns.
pub trait ScenarioBuilderExt: Sized {
    /// Configure the batch transfer workload.
    fn batch_transfers(self) -> BatchTransferFlowBuilder;

    /// Configure the batch transfer workload via closure.
    fn batch_transfers_with(
        self,
        f: impl FnOnce(BatchTransferFlowBuilder) -> BatchTransferFlowBuilder,
    ) -> CoreScenarioBuilder;
}

impl ScenarioBuilderExt for CoreScenarioBuilder {
    fn batch_transfers(self) -> BatchTransferFlowBuilder {
        BatchTransferFlowBuilder::new(self)
    }

    fn batch_transfers_with(
        self,
        f: impl FnOnce(BatchTransferFlowBuilder) -> BatchTransferFlowBuilder,
    ) -> CoreScenarioBuilder {
        f(self.batch_transfers()).apply()
    }
}

/// Builder for shaping the batch transfer flow.
pub struct BatchTransferFlowBuilder {
    builder: CoreScenarioBuilder,
    iterations: Option<NonZeroUsize>,
}

impl BatchTransferFlowBuilder {
    const fn new(builder: CoreScenarioBuilder) -> Self {
        Self {
            builder,
            iterations: None,
        }
    }

    /// Override the number of faucet rounds; zero is logged and ignored.
    #[must_use]
    pub fn iterations(mut self, iterations: usize) -> Self {
        match NonZeroUsize::new(iterations) {
            Some(value) => self.iterations = Some(value),
            None => {
                tracing::warn!("iteration count must be non-zero; keeping configured value");
            }
        }
        self
    }

    /// Finalize and return the underlying scenario builder with the workload
    /// (and its expectations) attached.
    #[must_use]
    pub fn apply(self) -> CoreScenarioBuilder {
        let iterations = self
            .iterations
            .unwrap_or(self.builder.config().iterations);

        self.builder
            .with_workload(BatchTransferWorkload::new(iterations))
    }
}
