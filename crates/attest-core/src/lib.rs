// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # attest-core
//!
//! Foundational types for the Attest acceptance-test verification engine.
//!
//! This crate provides:
//!
//! - [`DeclaredStateSnapshot`] and [`Resource`]: the post-apply observed state
//!   produced by the declarative-configuration engine
//! - [`OutputSet`]: derived output values computed alongside a snapshot
//! - [`VerifyError`]: the full verification error taxonomy
//! - [`HarnessConfig`] and [`PollConfig`]: explicit, injectable configuration
//!   (no process-wide fixtures)
//!
//! Higher layers (`attest-remote`, `attest-runner`) build the lookup glue and
//! the scenario state machine on top of these types.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod state;

pub use config::{HarnessConfig, PollConfig, DEFAULT_TOKEN_ENV};
pub use error::{Result, VerifyError};
pub use state::{DeclaredStateSnapshot, OutputSet, Resource};
