use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tracing::{debug, info};
use wallet_harness_config::{HarnessConfig, HarnessConfigError};

use super::{DynError, expectation::Expectation, workload::Workload};

const MIN_RUN_SECS: u64 = 30;
const SECS_PER_ITERATION_HINT: u64 = 2;

#[derive(Debug, Error)]
pub enum ScenarioBuildError {
    #[error(transparent)]
    Config(#[from] HarnessConfigError),
    #[error("workload '{name}' failed to initialize")]
    WorkloadInit { name: String, source: DynError },
    #[error("expectation '{name}' failed to initialize")]
    ExpectationInit { name: String, source: DynError },
}

/// Immutable scenario definition shared between the runner, workloads, and
/// expectations.
pub struct Scenario {
    config: HarnessConfig,
    workloads: Vec<Arc<dyn Workload>>,
    expectations: Vec<Box<dyn Expectation>>,
    duration: Duration,
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("config", &self.config)
            .field("workloads", &self.workloads.len())
            .field("expectations", &self.expectations.len())
            .field("duration", &self.duration)
            .finish()
    }
}

impl Scenario {
    fn new(
        config: HarnessConfig,
        workloads: Vec<Arc<dyn Workload>>,
        expectations: Vec<Box<dyn Expectation>>,
        duration: Duration,
    ) -> Self {
        Self {
            config,
            workloads,
            expectations,
            duration,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    #[must_use]
    pub fn workloads(&self) -> &[Arc<dyn Workload>] {
        &self.workloads
    }

    #[must_use]
    pub fn expectations(&self) -> &[Box<dyn Expectation>] {
        &self.expectations
    }

    #[must_use]
    pub fn expectations_mut(&mut self) -> &mut [Box<dyn Expectation>] {
        &mut self.expectations
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

/// Builder used by callers to describe the desired scenario.
pub struct Builder {
    config: HarnessConfig,
    workloads: Vec<Box<dyn Workload>>,
    expectations: Vec<Box<dyn Expectation>>,
    duration: Duration,
}

pub type ScenarioBuilder = Builder;

impl Builder {
    #[must_use]
    /// Start a builder from a harness configuration.
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            workloads: Vec::new(),
            expectations: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    #[must_use]
    pub const fn config_mut(&mut self) -> &mut HarnessConfig {
        &mut self.config
    }

    #[must_use]
    pub fn with_workload<W>(mut self, workload: W) -> Self
    where
        W: Workload + 'static,
    {
        self.expectations.extend(workload.expectations());
        self.workloads.push(Box::new(workload));
        self
    }

    #[must_use]
    /// Add a standalone expectation not tied to a workload.
    pub fn with_expectation<E>(mut self, expectation: E) -> Self
    where
        E: Expectation + 'static,
    {
        self.expectations.push(Box::new(expectation));
        self
    }

    #[must_use]
    /// Configure the cap on total run time.
    pub const fn with_run_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    /// Finalize the scenario, validating config and initializing components.
    pub fn build(self) -> Result<Scenario, ScenarioBuildError> {
        let Self {
            config,
            mut workloads,
            mut expectations,
            duration,
        } = self;

        config.validate()?;

        let duration = enforce_min_duration(&config, duration);
        initialize_components(&config, &mut workloads, &mut expectations)?;
        let workloads: Vec<Arc<dyn Workload>> = workloads.into_iter().map(Arc::from).collect();

        info!(
            iterations = config.iterations.get(),
            duration_secs = duration.as_secs(),
            workloads = workloads.len(),
            expectations = expectations.len(),
            "scenario built"
        );

        Ok(Scenario::new(config, workloads, expectations, duration))
    }
}

fn initialize_components(
    config: &HarnessConfig,
    workloads: &mut [Box<dyn Workload>],
    expectations: &mut [Box<dyn Expectation>],
) -> Result<(), ScenarioBuildError> {
    for workload in workloads {
        debug!(workload = workload.name(), "initializing workload");
        workload
            .init(config)
            .map_err(|source| ScenarioBuildError::WorkloadInit {
                name: workload.name().to_owned(),
                source,
            })?;
    }
    for expectation in expectations {
        debug!(expectation = expectation.name(), "initializing expectation");
        expectation
            .init(config)
            .map_err(|source| ScenarioBuildError::ExpectationInit {
                name: expectation.name().to_owned(),
                source,
            })?;
    }
    Ok(())
}

/// Give every iteration room to shell out and settle; a zero requested
/// duration picks the derived cap outright.
fn enforce_min_duration(config: &HarnessConfig, requested: Duration) -> Duration {
    let per_iteration = Duration::from_secs(
        SECS_PER_ITERATION_HINT.saturating_mul(config.iterations.get() as u64),
    );
    let min_duration = per_iteration.max(Duration::from_secs(MIN_RUN_SECS));

    requested.max(min_duration)
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    #[test]
    fn min_duration_scales_with_iterations() {
        let mut config = HarnessConfig::default();
        config.iterations = NonZeroUsize::new(500).unwrap();

        let enforced = enforce_min_duration(&config, Duration::ZERO);
        assert_eq!(enforced, Duration::from_secs(1000));

        let generous = enforce_min_duration(&config, Duration::from_secs(3600));
        assert_eq!(generous, Duration::from_secs(3600));
    }

    #[test]
    fn small_batches_still_get_a_floor() {
        let mut config = HarnessConfig::default();
        config.iterations = NonZeroUsize::new(1).unwrap();

        let enforced = enforce_min_duration(&config, Duration::ZERO);
        assert_eq!(enforced, Duration::from_secs(MIN_RUN_SECS));
    }
}
