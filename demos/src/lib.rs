pub mod defaults;

pub use wallet_harness_config::read_env_any;
pub use wallet_harness_workflows::ScenarioBuilderExt;
