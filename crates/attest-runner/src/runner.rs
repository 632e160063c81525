//! Scenario runner.
//!
//! Executes an ordered sequence of steps, each pairing a catalog document
//! with either a set of checks to satisfy or an expected-error pattern.
//! Precheck runs once before the sequence; destroy and the completeness
//! check run after it regardless of step outcomes, so a failing run never
//! leaks remote objects across test runs.

use std::sync::Arc;
use std::time::Duration;

use attest_core::{DeclaredStateSnapshot, HarnessConfig, Result, VerifyError};
use attest_remote::RemoteLookup;
use regex::Regex;

use crate::catalog::ScenarioKey;
use crate::check::{check_destroy_complete, Check};
use crate::engine::{ApplyOutcome, ConfigEngine};
use crate::precheck::Precheck;
use crate::report::{RunId, RunReport, RunState, StepReport};

/// Expected outcome of one step. Exactly one of the two is the intended
/// result: checks all passing, or apply failing with a matching error.
#[derive(Debug, Clone)]
pub enum StepExpect {
    /// Apply must succeed and every check must pass, in order.
    Checks(Vec<Check>),
    /// Apply must fail with error text matching this pattern
    /// (regex search, not anchored full-match).
    Error(Regex),
}

/// One scenario step: a catalog document plus its expected outcome.
#[derive(Debug, Clone)]
pub struct Step {
    /// Catalog document to apply.
    pub key: ScenarioKey,
    /// Expected outcome.
    pub expect: StepExpect,
}

impl Step {
    /// A step whose apply must succeed and whose checks must all pass.
    #[must_use]
    pub fn checks(key: ScenarioKey, checks: Vec<Check>) -> Self {
        Self {
            key,
            expect: StepExpect::Checks(checks),
        }
    }

    /// A step whose apply must fail with an error matching `pattern`.
    ///
    /// # Errors
    /// Returns [`VerifyError::Config`] if the pattern is not a valid
    /// regular expression.
    pub fn expect_error(key: ScenarioKey, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| VerifyError::config(format!("invalid error pattern {pattern:?}: {e}")))?;
        Ok(Self {
            key,
            expect: StepExpect::Error(regex),
        })
    }
}

/// A named, ordered sequence of steps over a disjoint logical-name space.
#[derive(Debug, Clone)]
pub struct ScenarioPlan {
    /// Scenario name, carried through logs and the report.
    pub name: String,
    /// Steps, executed in order.
    pub steps: Vec<Step>,
}

impl ScenarioPlan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Appends a step, builder style.
    #[must_use]
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }
}

/// Orchestrates one scenario run against injected collaborators.
///
/// The runner holds no global state; independent scenarios may run
/// concurrently against the same remote system as long as their
/// logical-name spaces are disjoint.
pub struct ScenarioRunner {
    engine: Arc<dyn ConfigEngine>,
    lookup: RemoteLookup,
    precheck: Arc<dyn Precheck>,
    step_timeout: Duration,
}

impl ScenarioRunner {
    /// Creates a runner from its collaborators and configuration.
    #[must_use]
    pub fn new(
        engine: Arc<dyn ConfigEngine>,
        lookup: RemoteLookup,
        precheck: Arc<dyn Precheck>,
        config: &HarnessConfig,
    ) -> Self {
        Self {
            engine,
            lookup: lookup.with_poll(config.poll.clone()),
            precheck,
            step_timeout: config.step_timeout,
        }
    }

    /// Runs the scenario to completion and returns the report.
    ///
    /// Never returns early on step failure: once any apply has been
    /// attempted, destroy and the completeness check always execute against
    /// the last known snapshot.
    pub async fn run(&self, plan: &ScenarioPlan) -> RunReport {
        let run_id = RunId::new();
        let mut report = RunReport::new(run_id, plan.name.clone());

        report.state = RunState::Precheck;
        tracing::info!(%run_id, scenario = %plan.name, "precheck");
        if let Err(e) = self.precheck.check().await {
            tracing::error!(%run_id, error = %e, "precheck failed, aborting before any apply");
            report.precheck_failure = Some(e);
            report.state = RunState::Failed;
            return report;
        }

        let mut last_snapshot = DeclaredStateSnapshot::new();
        for step in &plan.steps {
            report.state = RunState::Apply;
            tracing::info!(%run_id, step = %step.key, "apply");

            let step_report = self
                .execute_step(&mut report.state, step, &mut last_snapshot)
                .await;
            let failed = !step_report.is_passed();
            if let Some(failure) = &step_report.failure {
                tracing::warn!(%run_id, step = %step.key, error = %failure, "step failed");
            }
            report.steps.push(step_report);
            if failed {
                // Remaining steps are skipped; cleanup still runs below.
                break;
            }
        }

        report.state = RunState::Destroy;
        tracing::info!(%run_id, resources = last_snapshot.len(), "destroy");
        if let Err(e) = self.destroy(&last_snapshot).await {
            tracing::warn!(%run_id, error = %e, "destroy failed");
            report.destroy_failure = Some(e);
        }

        report.state = RunState::VerifyDestroy;
        if let Err(e) = check_destroy_complete(&last_snapshot, &self.lookup).await {
            tracing::error!(%run_id, error = %e, "destroy verification failed");
            report.completeness_failure = Some(e);
        }

        report.state = if report.precheck_failure.is_none()
            && report.steps.iter().all(StepReport::is_passed)
            && report.destroy_failure.is_none()
            && report.completeness_failure.is_none()
        {
            RunState::Done
        } else {
            RunState::Failed
        };
        tracing::info!(%run_id, state = %report.state, "run finished");
        report
    }

    /// Executes one step: apply, then either error matching or checks.
    /// The last known snapshot is threaded forward whenever apply
    /// succeeded, so cleanup always sees the newest accumulated state.
    async fn execute_step(
        &self,
        state: &mut RunState,
        step: &Step,
        last_snapshot: &mut DeclaredStateSnapshot,
    ) -> StepReport {
        let document = step.key.document();
        let applied = tokio::time::timeout(self.step_timeout, self.engine.apply(document)).await;

        let applied = match applied {
            Ok(outcome) => outcome,
            Err(_) => return StepReport::failed(step.key, VerifyError::Timeout(self.step_timeout)),
        };

        *state = RunState::Verify;
        match (&step.expect, applied) {
            (StepExpect::Checks(checks), Ok(outcome)) => {
                let failure = self.run_checks(checks, &outcome).await;
                *last_snapshot = outcome.snapshot;
                match failure {
                    None => StepReport::passed(step.key),
                    Some(e) => StepReport::failed(step.key, e),
                }
            }
            (StepExpect::Checks(_), Err(e)) => {
                StepReport::failed(step.key, VerifyError::apply(e.to_string()))
            }
            (StepExpect::Error(pattern), Ok(outcome)) => {
                // The engine created something it should have rejected;
                // keep the snapshot so cleanup can remove it.
                *last_snapshot = outcome.snapshot;
                StepReport::failed(
                    step.key,
                    VerifyError::UnexpectedSuccess(pattern.as_str().to_string()),
                )
            }
            (StepExpect::Error(pattern), Err(e)) => {
                let text = e.to_string();
                if pattern.is_match(&text) {
                    StepReport::passed(step.key)
                } else {
                    StepReport::failed(
                        step.key,
                        VerifyError::ErrorMismatch {
                            pattern: pattern.as_str().to_string(),
                            text,
                        },
                    )
                }
            }
        }
    }

    /// Runs a step's checks in order, stopping at the first failure.
    async fn run_checks(&self, checks: &[Check], outcome: &ApplyOutcome) -> Option<VerifyError> {
        for check in checks {
            tracing::debug!(check = %check, "verify");
            if let Err(e) = check
                .eval(&outcome.snapshot, &outcome.outputs, &self.lookup)
                .await
            {
                return Some(e);
            }
        }
        None
    }

    async fn destroy(&self, snapshot: &DeclaredStateSnapshot) -> Result<()> {
        tokio::time::timeout(self.step_timeout, self.engine.destroy(snapshot))
            .await
            .map_err(|_| VerifyError::Timeout(self.step_timeout))?
            .map_err(|e| VerifyError::destroy(e.to_string()))
    }
}
