pub mod definition;
pub mod deployer;
pub mod expectation;
pub mod runtime;
pub mod workload;

/// Boxed error used at workload/expectation boundaries.
pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub use definition::{Builder, Scenario, ScenarioBuildError, ScenarioBuilder};
pub use deployer::{Deployer, ScenarioError};
pub use expectation::Expectation;
pub use runtime::{
    context::{HarnessClients, RunContext},
    runner::Runner,
};
pub use workload::Workload;
