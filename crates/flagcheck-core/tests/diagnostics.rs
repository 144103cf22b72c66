// crates/flagcheck-core/tests/diagnostics.rs
// ============================================================================
// Module: Diagnostics Tests
// Description: Sink output format and verbosity filtering.
// Purpose: Ensure diagnostics are machine-readable JSON lines.
// ============================================================================
//! ## Overview
//! Runs resolution passes into file and buffered sinks and parses what they
//! recorded.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use std::sync::Arc;

use flagcheck_core::Diagnostic;
use flagcheck_core::DiagnosticSink;
use flagcheck_core::Environment;
use flagcheck_core::FileDiagnosticSink;
use flagcheck_core::Mode;
use flagcheck_core::ParamValue;
use flagcheck_core::Resolver;
use flagcheck_core::Severity;
use flagcheck_core::StaticIntrinsicCatalog;
use flagcheck_core::Verbosity;
use flagcheck_core::ViolationKind;
use flagcheck_core::names;
use flagcheck_core::standard_registry;
use support::TestResult;
use support::ensure;
use support::store_with;

#[test]
fn quiet_admits_errors_only() {
    assert!(Verbosity::Quiet.admits(Severity::Error));
    assert!(!Verbosity::Quiet.admits(Severity::Warning));
    assert!(!Verbosity::Quiet.admits(Severity::Info));
    assert!(Verbosity::Verbose.admits(Severity::Info));
}

#[test]
fn file_sink_appends_json_lines() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("diagnostics.jsonl");
    let sink = Arc::new(FileDiagnosticSink::new(&path)?);
    let environment = Environment::default();
    let registry = standard_registry(&environment, Arc::new(StaticIntrinsicCatalog::standard()))?;
    let resolver = Resolver::new(registry, environment).with_mode(Mode::AutoRepair).with_sink(sink);

    let mut store = store_with(&[
        (names::CI_COMPILER_COUNT, ParamValue::Int(1)),
        (names::USE_RTM_LOCKING, ParamValue::Bool(true)),
        (names::RTM_TOTAL_COUNT_INCR_RATE, ParamValue::Int(3)),
    ]);
    resolver.resolve(&mut store)?;

    let contents = std::fs::read_to_string(&path)?;
    let records: Vec<Diagnostic> =
        contents.lines().map(serde_json::from_str).collect::<Result<_, _>>()?;
    ensure(records.len() == 2, format!("expected two records, got {}", records.len()))?;

    let repaired = records
        .iter()
        .find(|record| record.event == "parameter_repaired")
        .ok_or("missing repair record")?;
    ensure(repaired.parameter == names::CI_COMPILER_COUNT, "repair names the parameter")?;
    ensure(repaired.severity == Severity::Warning, "repairs are warnings")?;
    ensure(repaired.kind == Some(ViolationKind::OutOfRange), "repair carries its reason")?;
    ensure(repaired.message.ends_with("repaired to 2"), repaired.message.clone())?;

    let normalized = records
        .iter()
        .find(|record| record.event == "parameter_normalized")
        .ok_or("missing normalization record")?;
    ensure(normalized.severity == Severity::Info, "normalizations are informational")?;
    ensure(normalized.mode == Mode::AutoRepair, "records carry the pass mode")?;
    Ok(())
}

#[test]
fn file_sink_keeps_existing_lines() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("diagnostics.jsonl");
    std::fs::write(&path, "{}\n")?;
    let sink = FileDiagnosticSink::new(&path)?;
    sink.emit(&Diagnostic::new(
        "parameter_violation",
        names::AVX3_THRESHOLD.into(),
        Severity::Error,
        Some(ViolationKind::NotPowerOfTwo),
        "AVX3Threshold (3) must be 0 or a power of 2",
        Mode::Strict,
    ));
    let contents = std::fs::read_to_string(&path)?;
    ensure(contents.lines().count() == 2, "append keeps prior content")?;
    let last = contents.lines().last().ok_or("no lines")?;
    let value: serde_json::Value = serde_json::from_str(last)?;
    ensure(value["kind"] == "not_power_of_two", format!("kind: {}", value["kind"]))?;
    ensure(value["mode"] == "strict", "mode label")?;
    Ok(())
}
