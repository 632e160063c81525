//! Run identity, lifecycle states, and the run report.

use serde::{Deserialize, Serialize};

use attest_core::VerifyError;

use crate::catalog::ScenarioKey;

/// Unique identifier for one scenario run.
///
/// UUIDs rather than counters, so concurrent scenarios and re-runs never
/// collide in logs or stored artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(uuid::Uuid);

impl RunId {
    /// Creates a new random run ID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scenario run lifecycle state.
///
/// ```text
/// Init → Precheck → (Apply → Verify)* → Destroy → VerifyDestroy → Done
///                                                              ↘ Failed
/// ```
///
/// `Failed` is absorbing for the aggregate result, but destroy and destroy
/// verification still execute after a step failure (cleanup-on-failure).
/// Only a precheck failure skips them: nothing was created yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Run constructed, nothing executed.
    Init,
    /// One-time environment readiness check.
    Precheck,
    /// Submitting a step's document to the configuration engine.
    Apply,
    /// Evaluating a step's checks or expected-error pattern.
    Verify,
    /// Invoking the engine's destroy operation.
    Destroy,
    /// Confirming destroy completeness against the remote system.
    VerifyDestroy,
    /// Run finished with every step and the destroy check passing.
    Done,
    /// Run finished with at least one failure.
    Failed,
}

impl RunState {
    /// Returns true for the two terminal states.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Precheck => "precheck",
            Self::Apply => "apply",
            Self::Verify => "verify",
            Self::Destroy => "destroy",
            Self::VerifyDestroy => "verify_destroy",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of one executed step.
#[derive(Debug)]
pub struct StepReport {
    /// Which catalog document the step applied.
    pub key: ScenarioKey,
    /// First-cause failure, if the step failed.
    pub failure: Option<VerifyError>,
}

impl StepReport {
    /// A passing step.
    #[must_use]
    pub fn passed(key: ScenarioKey) -> Self {
        Self { key, failure: None }
    }

    /// A failing step with its first-cause error.
    #[must_use]
    pub fn failed(key: ScenarioKey, failure: VerifyError) -> Self {
        Self {
            key,
            failure: Some(failure),
        }
    }

    /// Returns true if the step passed.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Aggregate result of one scenario run.
///
/// Exactly one first-cause failure is recorded per failed step, and the
/// destroy/completeness outcomes are tracked independently of step
/// outcomes, mirroring the guaranteed-run teardown check.
#[derive(Debug)]
pub struct RunReport {
    /// Run identifier.
    pub run_id: RunId,
    /// Scenario name.
    pub scenario: String,
    /// Final lifecycle state.
    pub state: RunState,
    /// Precheck failure, if the run aborted before any step.
    pub precheck_failure: Option<VerifyError>,
    /// Per-step outcomes, in execution order. Steps after the first
    /// failure are not executed and not reported.
    pub steps: Vec<StepReport>,
    /// Engine destroy failure, if teardown itself failed.
    pub destroy_failure: Option<VerifyError>,
    /// Destroy-completeness failure (residual object, corruption, or
    /// transport error during confirmation).
    pub completeness_failure: Option<VerifyError>,
}

impl RunReport {
    /// Creates an empty report in the initial state.
    #[must_use]
    pub fn new(run_id: RunId, scenario: impl Into<String>) -> Self {
        Self {
            run_id,
            scenario: scenario.into(),
            state: RunState::Init,
            precheck_failure: None,
            steps: Vec::new(),
            destroy_failure: None,
            completeness_failure: None,
        }
    }

    /// Returns true only for a clean run: every executed step passed,
    /// teardown succeeded, and nothing survived destroy.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.state == RunState::Done
            && self.precheck_failure.is_none()
            && self.steps.iter().all(StepReport::is_passed)
            && self.destroy_failure.is_none()
            && self.completeness_failure.is_none()
    }

    /// The first-cause failure of the run, if any.
    #[must_use]
    pub fn first_failure(&self) -> Option<&VerifyError> {
        self.precheck_failure
            .as_ref()
            .or_else(|| self.steps.iter().find_map(|s| s.failure.as_ref()))
            .or(self.destroy_failure.as_ref())
            .or(self.completeness_failure.as_ref())
    }

    /// Renders the report as JSON for artifact storage.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "run_id": self.run_id.to_string(),
            "scenario": self.scenario,
            "state": self.state.to_string(),
            "passed": self.passed(),
            "precheck_failure": self.precheck_failure.as_ref().map(ToString::to_string),
            "steps": self
                .steps
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "key": s.key.as_str(),
                        "passed": s.is_passed(),
                        "failure": s.failure.as_ref().map(ToString::to_string),
                    })
                })
                .collect::<Vec<_>>(),
            "destroy_failure": self.destroy_failure.as_ref().map(ToString::to_string),
            "completeness_failure": self.completeness_failure.as_ref().map(ToString::to_string),
        })
    }
}
