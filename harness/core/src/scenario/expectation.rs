use async_trait::async_trait;
use wallet_harness_config::HarnessConfig;

use super::{DynError, RunContext};

#[async_trait]
/// Defines a check evaluated after a scenario run.
pub trait Expectation: Send + Sync {
    fn name(&self) -> &str;

    fn init(&mut self, _config: &HarnessConfig) -> Result<(), DynError> {
        Ok(())
    }

    async fn start_capture(&mut self, _ctx: &RunContext) -> Result<(), DynError> {
        Ok(())
    }

    async fn evaluate(&mut self, ctx: &RunContext) -> Result<(), DynError>;
}
