// crates/flagcheck-core/src/diagnostics.rs
// ============================================================================
// Module: Resolution Diagnostics
// Description: Structured diagnostic records and sinks for resolution passes.
// Purpose: Emit JSON-line diagnostics without hard logging dependencies.
// Dependencies: crate::{identifiers, outcome}, serde, serde_json
// ============================================================================

//! ## Overview
//! The resolver turns each non-trivial [`crate::Outcome`] into a
//! [`Diagnostic`] and hands it to a [`DiagnosticSink`]. Sinks serialize
//! records as JSON lines so deployments can route them into their own
//! logging pipeline.
//!
//! ## Invariants
//! - Under [`Verbosity::Quiet`] only [`Severity::Error`] records are emitted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;

use crate::identifiers::ParamName;
use crate::outcome::Mode;
use crate::outcome::ViolationKind;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Severity of a diagnostic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational normalization notes.
    Info,
    /// A value was changed to satisfy a constraint.
    Warning,
    /// A constraint violation that fails the pass.
    Error,
}

/// How much the resolver reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// Report every repair, normalization, and violation.
    #[default]
    Verbose,
    /// Report fatal violations only.
    Quiet,
}

impl Verbosity {
    /// Returns whether a record of `severity` passes this verbosity.
    #[must_use]
    pub const fn admits(self, severity: Severity) -> bool {
        match self {
            Self::Verbose => true,
            Self::Quiet => matches!(severity, Severity::Error),
        }
    }
}

/// Diagnostic record payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Event identifier.
    pub event: String,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Parameter the record concerns.
    pub parameter: ParamName,
    /// Record severity.
    pub severity: Severity,
    /// Violation classification, when the record reports one.
    pub kind: Option<ViolationKind>,
    /// Human-readable message.
    pub message: String,
    /// Mode of the pass that produced the record.
    pub mode: Mode,
}

impl Diagnostic {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(
        event: &str,
        parameter: ParamName,
        severity: Severity,
        kind: Option<ViolationKind>,
        message: impl Into<String>,
        mode: Mode,
    ) -> Self {
        Self {
            event: event.to_string(),
            timestamp_ms: now_millis(),
            parameter,
            severity,
            kind,
            message: message.into(),
            mode,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Destination for diagnostic records.
pub trait DiagnosticSink: Send + Sync {
    /// Record a diagnostic.
    fn emit(&self, diagnostic: &Diagnostic);
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Sink that logs JSON lines to stderr.
pub struct StderrDiagnosticSink;

impl DiagnosticSink for StderrDiagnosticSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        if let Ok(payload) = serde_json::to_string(diagnostic) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Sink that appends JSON lines to a file.
pub struct FileDiagnosticSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileDiagnosticSink {
    /// Opens the diagnostic log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl DiagnosticSink for FileDiagnosticSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        if let Ok(payload) = serde_json::to_string(diagnostic)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Sink that keeps records in memory.
#[derive(Default)]
pub struct BufferedDiagnosticSink {
    /// Records in emission order.
    records: Mutex<Vec<Diagnostic>>,
}

impl BufferedDiagnosticSink {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the buffered records.
    #[must_use]
    pub fn records(&self) -> Vec<Diagnostic> {
        self.records.lock().map(|records| records.clone()).unwrap_or_default()
    }

    /// Removes and returns the buffered records.
    #[must_use]
    pub fn drain(&self) -> Vec<Diagnostic> {
        self.records.lock().map(|mut records| std::mem::take(&mut *records)).unwrap_or_default()
    }
}

impl DiagnosticSink for BufferedDiagnosticSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        if let Ok(mut records) = self.records.lock() {
            records.push(diagnostic.clone());
        }
    }
}

/// No-op sink.
pub struct NoopDiagnosticSink;

impl DiagnosticSink for NoopDiagnosticSink {
    fn emit(&self, _diagnostic: &Diagnostic) {}
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Milliseconds since the Unix epoch, or zero if the clock is before it.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|elapsed| elapsed.as_millis()).unwrap_or(0)
}
