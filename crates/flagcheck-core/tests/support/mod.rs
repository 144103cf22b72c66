// crates/flagcheck-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared result helpers and fixtures for engine integration tests.
// ============================================================================
//! ## Overview
//! Shared test helpers for consistent Result-based assertions and for building
//! standard resolvers against a baseline store.

#![allow(
    dead_code,
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only helpers are selectively used across suites."
)]

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use flagcheck_core::BufferedDiagnosticSink;
use flagcheck_core::Environment;
use flagcheck_core::InMemoryParameterStore;
use flagcheck_core::Mode;
use flagcheck_core::ParamValue;
use flagcheck_core::Resolver;
use flagcheck_core::StaticIntrinsicCatalog;
use flagcheck_core::ValueOrigin;
use flagcheck_core::standard_defaults;
use flagcheck_core::standard_registry;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across engine integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl TestError {
    /// Creates a new test error with the provided message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition { Ok(()) } else { Err(Box::new(TestError::new(message))) }
}

// ========================================================================
// Fixtures
// ========================================================================

/// Baseline store with the given command-line overrides applied.
pub fn store_with(overrides: &[(&str, ParamValue)]) -> InMemoryParameterStore {
    let mut store = standard_defaults();
    for (name, value) in overrides {
        store.insert(*name, value.clone(), ValueOrigin::CommandLine);
    }
    store
}

/// Standard resolver for `environment` in `mode`, buffering diagnostics.
///
/// # Errors
/// Returns an error when the standard registry cannot be built.
pub fn standard_resolver(
    environment: Environment,
    mode: Mode,
) -> TestResult<(Resolver, Arc<BufferedDiagnosticSink>)> {
    let registry = standard_registry(&environment, Arc::new(StaticIntrinsicCatalog::standard()))?;
    let sink = Arc::new(BufferedDiagnosticSink::new());
    let resolver = Resolver::new(registry, environment).with_mode(mode).with_sink(sink.clone());
    Ok((resolver, sink))
}
