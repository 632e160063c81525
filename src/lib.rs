//! Attest: acceptance-test verification for declaratively managed
//! notification endpoints.
//!
//! Given a declaration document, a run verifies that applying it produces a
//! remote object matching expectations, that updates transition the object
//! correctly, that invalid input is rejected with a specific diagnostic,
//! and that destroying the declaration removes the remote object.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use attest::prelude::*;
//!
//! # async fn run(engine: Arc<dyn ConfigEngine>) -> RunReport {
//! let config = HarnessConfig::new("https://api.example.test");
//! let precheck = EnvTokenPrecheck::new(config.token_env.clone());
//! # let token = "token".to_string();
//! let api = Arc::new(HttpEndpointApi::new(config.api_base_url.clone(), token).unwrap());
//! let runner = ScenarioRunner::new(engine, RemoteLookup::new(api), Arc::new(precheck), &config);
//!
//! let plan = ScenarioPlan::new("slack_happy_path").with_step(Step::checks(
//!     ScenarioKey::SlackHappyPath,
//!     vec![
//!         Check::exists("logzio_endpoint.slack"),
//!         Check::attribute("logzio_endpoint.slack", "title", "my_slack_title"),
//!         Check::output("logzio_endpoint.slack", "test"),
//!     ],
//! ));
//! runner.run(&plan).await
//! # }
//! ```

pub use attest_core as core;
pub use attest_remote as remote;
pub use attest_runner as runner;

/// Prelude module for common imports.
pub mod prelude {
    pub use attest_core::{
        DeclaredStateSnapshot, HarnessConfig, OutputSet, PollConfig, Resource, VerifyError,
    };
    pub use attest_remote::{EndpointApi, HttpEndpointApi, RemoteLookup};
    pub use attest_runner::{
        Check, ConfigEngine, EnvTokenPrecheck, Precheck, RunReport, RunState, ScenarioKey,
        ScenarioPlan, ScenarioRunner, Step, StepExpect,
    };
}
