// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # attest-remote
//!
//! Remote API boundary for the Attest verification engine.
//!
//! This crate provides:
//!
//! - [`EndpointApi`]: the point-lookup seam to the remote system
//! - [`HttpEndpointApi`]: a reqwest-backed implementation of that seam
//! - [`RemoteLookup`]: out-of-band existence checks with identifier parsing,
//!   NotFound-vs-transport discrimination, and a bounded poll for eventually
//!   consistent remotes
//!
//! The verification core never creates or destroys remote objects; every
//! call here is an idempotent read.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod http;
pub mod lookup;

pub use api::{ApiError, ApiResult, EndpointApi, RemoteEndpoint};
pub use http::HttpEndpointApi;
pub use lookup::RemoteLookup;
