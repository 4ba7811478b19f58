use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::{DynError, definition::Scenario, runtime::runner::Runner};

/// Errors surfaced while a runner drives a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("workload failed: {0}")]
    Workload(#[source] DynError),
    #[error("workloads did not finish within {limit:?}")]
    WorkloadTimeout { limit: Duration },
    #[error("expectation capture failed: {0}")]
    ExpectationCapture(#[source] DynError),
    #[error("expectations failed:\n{0}")]
    Expectations(DynError),
}

#[async_trait]
/// Prepares an environment capable of executing a scenario.
pub trait Deployer {
    type Error;

    async fn deploy(&self, scenario: &Scenario) -> Result<Runner, Self::Error>;
}
