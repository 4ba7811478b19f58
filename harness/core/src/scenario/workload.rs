use async_trait::async_trait;
use wallet_harness_config::HarnessConfig;

use super::{DynError, Expectation, RunContext};

#[async_trait]
/// Describes an action sequence executed during a scenario run.
pub trait Workload: Send + Sync {
    fn name(&self) -> &str;

    fn expectations(&self) -> Vec<Box<dyn Expectation>> {
        Vec::new()
    }

    fn init(&mut self, _config: &HarnessConfig) -> Result<(), DynError> {
        Ok(())
    }

    async fn start(&self, ctx: &RunContext) -> Result<(), DynError>;
}
