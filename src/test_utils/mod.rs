//! Test-only helpers shared across crate unit tests.
//!
//! This module is only compiled for unit tests and provides a capturing
//! diagnostics sink plus in-memory transports so dispatcher tests can run
//! without a network.

pub mod collecting_sink;
pub mod transports;
