//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled when running tests
//! or with the `test-support` feature.

pub mod clock;
pub mod dispatch;
pub mod fixtures;
pub mod transport;
