// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # attest-runner
//!
//! Scenario orchestration for the Attest verification engine.
//!
//! This crate provides:
//!
//! - [`ScenarioKey`]: the closed catalog of declaration documents
//! - [`Check`]: per-step verification checks (existence, attribute
//!   equality, output consistency)
//! - [`ScenarioRunner`]: the state machine driving precheck, apply/verify
//!   steps, destroy, and the unconditional destroy-completeness check
//! - [`ConfigEngine`] and [`Precheck`]: seams to the external
//!   declarative-configuration engine and environment readiness check
//!
//! A runner owns nothing global: the engine, the remote lookup, and the
//! harness configuration are all injected at construction, so independent
//! scenarios can run concurrently as long as their logical-name spaces are
//! disjoint.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod check;
pub mod engine;
pub mod precheck;
pub mod report;
pub mod runner;

pub use catalog::ScenarioKey;
pub use check::{check_destroy_complete, Check};
pub use engine::{ApplyOutcome, ConfigEngine, EngineError, EngineResult};
pub use precheck::{EnvTokenPrecheck, Precheck};
pub use report::{RunId, RunReport, RunState, StepReport};
pub use runner::{ScenarioPlan, ScenarioRunner, Step, StepExpect};
