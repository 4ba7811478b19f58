use std::{any::Any, panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt as _;
use tokio::{task::JoinSet, time::timeout};

use super::context::RunContext;
use crate::scenario::{DynError, Expectation, Scenario, deployer::ScenarioError};

type WorkloadOutcome = Result<(), DynError>;

/// Represents a fully prepared environment capable of executing a scenario.
pub struct Runner {
    context: Arc<RunContext>,
}

impl Runner {
    /// Construct a runner from the run context.
    #[must_use]
    pub fn new(context: RunContext) -> Self {
        Self {
            context: Arc::new(context),
        }
    }

    /// Access the underlying run context.
    #[must_use]
    pub fn context(&self) -> Arc<RunContext> {
        Arc::clone(&self.context)
    }

    /// Executes the scenario by driving workloads to completion and then
    /// evaluating all expectations. A batch that is still running when the
    /// duration cap fires is a failure, not a quiet stop.
    pub async fn run(self, scenario: &mut Scenario) -> Result<(), ScenarioError> {
        let context = self.context();

        Self::prepare_expectations(scenario.expectations_mut(), context.as_ref()).await?;
        Self::run_workloads(&context, scenario).await?;
        Self::run_expectations(scenario.expectations_mut(), context.as_ref()).await
    }

    async fn prepare_expectations(
        expectations: &mut [Box<dyn Expectation>],
        context: &RunContext,
    ) -> Result<(), ScenarioError> {
        for expectation in expectations {
            if let Err(source) = expectation.start_capture(context).await {
                return Err(ScenarioError::ExpectationCapture(source));
            }
        }
        Ok(())
    }

    /// Spawns every workload and waits for all of them to finish, capped by
    /// the scenario duration.
    async fn run_workloads(
        context: &Arc<RunContext>,
        scenario: &Scenario,
    ) -> Result<(), ScenarioError> {
        let mut workloads = Self::spawn_workloads(scenario, context);

        let timed_out = Self::drive_until_timer(&mut workloads, scenario).await?;
        if timed_out {
            Self::drain_workloads(&mut workloads).await?;
            return Err(ScenarioError::WorkloadTimeout {
                limit: scenario.duration(),
            });
        }

        Ok(())
    }

    /// Evaluates every registered expectation, aggregating failures so callers
    /// can see all missing conditions in a single report.
    async fn run_expectations(
        expectations: &mut [Box<dyn Expectation>],
        context: &RunContext,
    ) -> Result<(), ScenarioError> {
        let mut failures: Vec<(String, DynError)> = Vec::new();
        for expectation in expectations {
            if let Err(source) = expectation.evaluate(context).await {
                failures.push((expectation.name().to_owned(), source));
            }
        }

        if failures.is_empty() {
            return Ok(());
        }

        let summary = failures
            .into_iter()
            .map(|(name, source)| format!("{name}: {source}"))
            .collect::<Vec<_>>()
            .join("\n");

        Err(ScenarioError::Expectations(summary.into()))
    }

    /// Spawns each workload inside its own task and returns the join set for
    /// cooperative management.
    fn spawn_workloads(scenario: &Scenario, context: &Arc<RunContext>) -> JoinSet<WorkloadOutcome> {
        let mut workloads = JoinSet::new();
        for workload in scenario.workloads() {
            let workload = Arc::clone(workload);
            let ctx = Arc::clone(context);

            workloads.spawn(async move {
                let outcome = AssertUnwindSafe(async { workload.start(ctx.as_ref()).await })
                    .catch_unwind()
                    .await;

                outcome.unwrap_or_else(|panic| {
                    Err(format!("workload panicked: {}", panic_message(panic)).into())
                })
            });
        }

        workloads
    }

    /// Polls workload tasks until they all finish, one reports an error, or
    /// the cap fires. Returns whether the cap fired first.
    async fn drive_until_timer(
        workloads: &mut JoinSet<WorkloadOutcome>,
        scenario: &Scenario,
    ) -> Result<bool, ScenarioError> {
        let run_future = async {
            while let Some(result) = workloads.join_next().await {
                Self::map_join_result(result)?;
            }
            Ok(())
        };

        timeout(scenario.duration(), run_future)
            .await
            .map_or(Ok(true), |result| {
                result?;
                Ok(false)
            })
    }

    /// Aborts and drains any remaining workload tasks so we do not leak work
    /// across scenario runs.
    async fn drain_workloads(workloads: &mut JoinSet<WorkloadOutcome>) -> Result<(), ScenarioError> {
        workloads.abort_all();

        while let Some(result) = workloads.join_next().await {
            Self::map_join_result(result)?;
        }

        Ok(())
    }

    /// Converts the outcome of a workload task into the canonical scenario
    /// error, tolerating cancellation when the runner aborts unfinished tasks.
    fn map_join_result(
        result: Result<WorkloadOutcome, tokio::task::JoinError>,
    ) -> Result<(), ScenarioError> {
        match result {
            Ok(outcome) => outcome.map_err(ScenarioError::Workload),
            Err(join_err) if join_err.is_cancelled() => Ok(()),
            Err(join_err) => Err(ScenarioError::Workload(
                format!("workload task failed: {join_err}").into(),
            )),
        }
    }
}

/// Attempts to turn a panic payload into a readable string for diagnostics.
fn panic_message(panic: Box<dyn Any + Send>) -> String {
    panic.downcast::<String>().map_or_else(
        |panic| {
            panic.downcast::<&'static str>().map_or_else(
                |_| "unknown panic".to_owned(),
                |message| (*message).to_owned(),
            )
        },
        |message| *message,
    )
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use wallet_harness_config::HarnessConfig;

    use super::*;
    use crate::{
        rpc::WalletRpcClient,
        scenario::{Builder, HarnessClients, Workload},
        tools::{KeygenTool, WalletCli},
    };

    fn test_runner(scenario: &Scenario) -> Runner {
        let config = scenario.config().clone();
        let clients = HarnessClients::new(
            WalletRpcClient::new(config.endpoints.wallet_rpc.clone()),
            WalletCli::new("/no/such/wallet-cli".into()),
            KeygenTool::new(
                "/no/such/keygen".into(),
                config.homes.keygen_home.clone(),
                config.homes.password_file.clone(),
            ),
        );
        Runner::new(RunContext::new(config, clients, scenario.duration()))
    }

    struct NoopWorkload;

    #[async_trait]
    impl Workload for NoopWorkload {
        fn name(&self) -> &'static str {
            "noop"
        }

        async fn start(&self, _ctx: &RunContext) -> Result<(), DynError> {
            Ok(())
        }
    }

    struct FailingWorkload;

    #[async_trait]
    impl Workload for FailingWorkload {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn start(&self, _ctx: &RunContext) -> Result<(), DynError> {
            Err("deliberate failure".into())
        }
    }

    struct StalledWorkload;

    #[async_trait]
    impl Workload for StalledWorkload {
        fn name(&self) -> &'static str {
            "stalled"
        }

        async fn start(&self, _ctx: &RunContext) -> Result<(), DynError> {
            futures::future::pending::<()>().await;
            Ok(())
        }
    }

    struct PanickingWorkload;

    #[async_trait]
    impl Workload for PanickingWorkload {
        fn name(&self) -> &'static str {
            "panicking"
        }

        async fn start(&self, _ctx: &RunContext) -> Result<(), DynError> {
            panic!("boom");
        }
    }

    struct FailingExpectation;

    #[async_trait]
    impl Expectation for FailingExpectation {
        fn name(&self) -> &'static str {
            "always_fails"
        }

        async fn evaluate(&mut self, _ctx: &RunContext) -> Result<(), DynError> {
            Err("expectation violated".into())
        }
    }

    fn build_scenario(builder: Builder) -> Scenario {
        builder.build().expect("scenario must build")
    }

    #[tokio::test]
    async fn completed_workloads_pass() {
        let mut scenario =
            build_scenario(Builder::new(HarnessConfig::default()).with_workload(NoopWorkload));
        let runner = test_runner(&scenario);

        runner.run(&mut scenario).await.expect("run must succeed");
    }

    #[tokio::test]
    async fn workload_errors_propagate() {
        let mut scenario =
            build_scenario(Builder::new(HarnessConfig::default()).with_workload(FailingWorkload));
        let runner = test_runner(&scenario);

        let err = runner.run(&mut scenario).await.unwrap_err();
        assert!(matches!(err, ScenarioError::Workload(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_workloads_hit_the_cap() {
        let mut scenario =
            build_scenario(Builder::new(HarnessConfig::default()).with_workload(StalledWorkload));
        let runner = test_runner(&scenario);

        let err = runner.run(&mut scenario).await.unwrap_err();
        assert!(matches!(err, ScenarioError::WorkloadTimeout { .. }));
    }

    #[tokio::test]
    async fn workload_panics_become_errors() {
        let mut scenario =
            build_scenario(Builder::new(HarnessConfig::default()).with_workload(PanickingWorkload));
        let runner = test_runner(&scenario);

        let err = runner.run(&mut scenario).await.unwrap_err();
        match err {
            ScenarioError::Workload(source) => {
                assert!(source.to_string().contains("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn expectation_failures_are_aggregated() {
        let mut scenario = build_scenario(
            Builder::new(HarnessConfig::default())
                .with_workload(NoopWorkload)
                .with_expectation(FailingExpectation),
        );
        let runner = test_runner(&scenario);

        let err = runner.run(&mut scenario).await.unwrap_err();
        match err {
            ScenarioError::Expectations(summary) => {
                assert!(summary.to_string().contains("always_fails"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
