// crates/flagcheck-core/tests/resolver.rs
// ============================================================================
// Module: Resolver Tests
// Description: Pass semantics over small custom registries.
// Purpose: Ensure short-circuiting, write-back, and infrastructure failures.
// ============================================================================
//! ## Overview
//! Integration tests for [`flagcheck_core::Resolver`] using hand-built
//! registries so each behavior is isolated.

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

use flagcheck_core::BufferedDiagnosticSink;
use flagcheck_core::ConstraintRule;
use flagcheck_core::Environment;
use flagcheck_core::InMemoryParameterStore;
use flagcheck_core::Mode;
use flagcheck_core::Outcome;
use flagcheck_core::ParamKind;
use flagcheck_core::ParamName;
use flagcheck_core::ParamValue;
use flagcheck_core::ParameterSpec;
use flagcheck_core::ParameterStore;
use flagcheck_core::Registry;
use flagcheck_core::ResolveError;
use flagcheck_core::Resolver;
use flagcheck_core::RuleContext;
use flagcheck_core::Severity;
use flagcheck_core::Verbosity;
use flagcheck_core::Violation;
use flagcheck_core::ViolationKind;
use flagcheck_core::rules::RuleCategory;
use flagcheck_core::rules::ordering::OrderingRule;
use flagcheck_core::rules::range::RangeRule;
use support::TestResult;
use support::ensure;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Chain `Base` <- `Middle` <- `Top`, where each must not exceed the one below.
fn chain_registry() -> Result<Registry, flagcheck_core::RegistryError> {
    Registry::builder()
        .with(ParameterSpec::new("Base", ParamKind::Int, RangeRule::between(0, 10)))
        .with(ParameterSpec::new("Middle", ParamKind::Int, OrderingRule::at_most("Base")))
        .with(ParameterSpec::new("Top", ParamKind::Int, OrderingRule::at_most("Middle")))
        .build()
}

fn chain_store(base: i64, middle: i64, top: i64) -> InMemoryParameterStore {
    InMemoryParameterStore::new()
        .with_command_line("Base", ParamValue::Int(base))
        .with_command_line("Middle", ParamValue::Int(middle))
        .with_command_line("Top", ParamValue::Int(top))
}

/// Rule that reads a parameter it never declared.
struct SneakyRule;

impl ConstraintRule for SneakyRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::BoundedRange
    }

    fn reads(&self) -> Vec<ParamName> {
        Vec::new()
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, _mode: Mode) -> Result<Outcome, ResolveError> {
        ctx.read_named("Hidden")?;
        Ok(Outcome::Accept)
    }
}

/// Rule that always repairs to zero, regardless of mode.
struct EagerRule;

impl ConstraintRule for EagerRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::BoundedRange
    }

    fn reads(&self) -> Vec<ParamName> {
        Vec::new()
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, _mode: Mode) -> Result<Outcome, ResolveError> {
        ctx.repaired(0, Violation::new(ViolationKind::OutOfRange, "always wrong"))
    }
}

/// Rule that normalizes a parameter it does not govern.
struct TrespassRule;

impl ConstraintRule for TrespassRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::Consistency
    }

    fn reads(&self) -> Vec<ParamName> {
        Vec::new()
    }

    fn evaluate(&self, _ctx: &RuleContext<'_>, _mode: Mode) -> Result<Outcome, ResolveError> {
        Ok(Outcome::Normalized {
            target: ParamName::from("Other"),
            value: ParamValue::Int(1),
            note: None,
        })
    }
}

fn single(rule: impl ConstraintRule + 'static) -> Result<Registry, flagcheck_core::RegistryError> {
    Registry::builder().with(ParameterSpec::new("Alpha", ParamKind::Int, rule)).build()
}

// ============================================================================
// SECTION: Short-Circuit
// ============================================================================

#[test]
fn failed_parameter_short_circuits_dependents() -> TestResult {
    let resolver = Resolver::new(chain_registry()?, Environment::default());
    let mut store = chain_store(20, 5, 1);
    let report = resolver.resolve(&mut store)?;

    ensure(!report.success, "expected failure")?;
    ensure(report.failed().len() == 3, "all three parameters fail")?;
    let middle = report.outcome("Middle").and_then(Outcome::violation_ref).ok_or("Middle")?;
    ensure(middle.kind == ViolationKind::DependencyInvalid, "Middle short-circuited")?;
    ensure(
        middle.message == "Middle cannot be validated because Base value is invalid",
        format!("message: {}", middle.message),
    )?;
    let top = report.outcome("Top").and_then(Outcome::violation_ref).ok_or("Top")?;
    ensure(top.message.contains("because Middle"), "Top blames its direct prerequisite")?;
    let failure = report.failure.ok_or("missing failure")?;
    ensure(failure.parameter == "Base", "first failure is the root cause")?;
    Ok(())
}

#[test]
fn repairs_are_visible_to_dependents() -> TestResult {
    let resolver =
        Resolver::new(chain_registry()?, Environment::default()).with_mode(Mode::AutoRepair);
    let mut store = chain_store(20, 15, 12);
    let report = resolver.resolve(&mut store)?;

    ensure(report.success, "expected repair pass to succeed")?;
    for name in ["Base", "Middle", "Top"] {
        ensure(store.entry(name).map(|entry| &entry.value) == Some(&ParamValue::Int(10)), name)?;
    }
    ensure(report.changes().count() == 3, "three repairs recorded")?;
    Ok(())
}

#[test]
fn strict_pass_leaves_store_untouched() -> TestResult {
    let resolver = Resolver::new(chain_registry()?, Environment::default());
    let mut store = chain_store(20, 15, 12);
    let before = store.clone();
    resolver.resolve(&mut store)?;
    ensure(store == before, "strict pass must not write")?;
    Ok(())
}

// ============================================================================
// SECTION: Manageable Passes
// ============================================================================

#[test]
fn manageable_pass_only_visits_manageable_parameters() -> TestResult {
    let registry = Registry::builder()
        .with(ParameterSpec::new("Fixed", ParamKind::Int, RangeRule::between(0, 10)))
        .with(ParameterSpec::new("Live", ParamKind::Int, RangeRule::between(0, 10)).manageable())
        .build()?;
    let resolver = Resolver::new(registry, Environment::default()).with_mode(Mode::AutoRepair);
    let mut store = InMemoryParameterStore::new()
        .with_command_line("Fixed", ParamValue::Int(50))
        .with_command_line("Live", ParamValue::Int(50));
    let report = resolver.resolve_manageable(&mut store)?;

    ensure(report.entries.len() == 1, "only the manageable parameter runs")?;
    ensure(store.get(&"Live".into()) == Some(ParamValue::Int(10)), "Live repaired")?;
    ensure(store.get(&"Fixed".into()) == Some(ParamValue::Int(50)), "Fixed untouched")?;
    Ok(())
}

// ============================================================================
// SECTION: Infrastructure Failures
// ============================================================================

#[test]
fn missing_parameter_is_an_error() -> TestResult {
    let resolver = Resolver::new(chain_registry()?, Environment::default());
    let mut store = InMemoryParameterStore::new().with_command_line("Base", ParamValue::Int(1));
    let result = resolver.resolve(&mut store);
    ensure(
        matches!(result, Err(ResolveError::MissingParameter(ref name)) if name == "Middle"),
        "expected missing Middle",
    )
}

#[test]
fn kind_mismatch_is_an_error() -> TestResult {
    let resolver = Resolver::new(chain_registry()?, Environment::default());
    let mut store = chain_store(1, 1, 1).with_command_line("Base", ParamValue::Bool(true));
    let result = resolver.resolve(&mut store);
    ensure(matches!(result, Err(ResolveError::KindMismatch { .. })), "expected kind mismatch")
}

#[test]
fn undeclared_read_is_an_error() -> TestResult {
    let resolver = Resolver::new(single(SneakyRule)?, Environment::default());
    let mut store = InMemoryParameterStore::new()
        .with_command_line("Alpha", ParamValue::Int(1))
        .with_command_line("Hidden", ParamValue::Int(1));
    let result = resolver.resolve(&mut store);
    ensure(
        matches!(result, Err(ResolveError::UndeclaredRead { ref param, .. }) if param == "Hidden"),
        "expected undeclared read of Hidden",
    )
}

#[test]
fn repair_in_strict_mode_is_an_error() -> TestResult {
    let resolver = Resolver::new(single(EagerRule)?, Environment::default());
    let mut store = InMemoryParameterStore::new().with_command_line("Alpha", ParamValue::Int(1));
    let result = resolver.resolve(&mut store);
    ensure(matches!(result, Err(ResolveError::RepairInStrictMode(_))), "expected strict repair error")
}

#[test]
fn normalizing_an_ungoverned_parameter_is_an_error() -> TestResult {
    let resolver = Resolver::new(single(TrespassRule)?, Environment::default());
    let mut store = InMemoryParameterStore::new()
        .with_command_line("Alpha", ParamValue::Int(1))
        .with_command_line("Other", ParamValue::Int(0));
    let result = resolver.resolve(&mut store);
    ensure(matches!(result, Err(ResolveError::UndeclaredWrite { .. })), "expected undeclared write")
}

#[test]
fn unrepresentable_repair_is_an_error() -> TestResult {
    let registry = Registry::builder()
        .with(ParameterSpec::new("Alpha", ParamKind::Uint, RangeRule::at_most(-1)))
        .build()?;
    let resolver = Resolver::new(registry, Environment::default()).with_mode(Mode::AutoRepair);
    let mut store = InMemoryParameterStore::new().with_command_line("Alpha", ParamValue::Uint(3));
    let result = resolver.resolve(&mut store);
    ensure(
        matches!(result, Err(ResolveError::UnrepresentableRepair { value: -1, .. })),
        "expected unrepresentable repair",
    )
}

// ============================================================================
// SECTION: Diagnostics
// ============================================================================

#[test]
fn quiet_verbosity_keeps_only_errors() -> TestResult {
    let sink = Arc::new(BufferedDiagnosticSink::new());
    let registry = Registry::builder()
        .with(ParameterSpec::new("Fixable", ParamKind::Int, RangeRule::between(0, 10)))
        .build()?;
    let resolver = Resolver::new(registry, Environment::default())
        .with_mode(Mode::AutoRepair)
        .with_verbosity(Verbosity::Quiet)
        .with_sink(sink.clone());
    let mut store = InMemoryParameterStore::new().with_command_line("Fixable", ParamValue::Int(99));
    resolver.resolve(&mut store)?;
    ensure(sink.records().is_empty(), "repairs are silent when quiet")?;

    let strict = Resolver::new(chain_registry()?, Environment::default())
        .with_verbosity(Verbosity::Quiet)
        .with_sink(sink.clone());
    strict.resolve(&mut chain_store(20, 0, 0))?;
    let records = sink.drain();
    ensure(!records.is_empty(), "violations are reported when quiet")?;
    ensure(
        records.iter().all(|record| record.severity == Severity::Error),
        "only errors when quiet",
    )?;
    Ok(())
}

#[test]
fn report_serializes_with_status_tags() -> TestResult {
    let resolver =
        Resolver::new(chain_registry()?, Environment::default()).with_mode(Mode::AutoRepair);
    let report = resolver.resolve(&mut chain_store(20, 0, 0))?;
    let json = serde_json::to_value(&report)?;
    ensure(json["mode"] == "auto_repair", "mode label")?;
    ensure(json["entries"][0]["outcome"]["status"] == "repaired", "repaired status tag")?;
    ensure(json["entries"][1]["outcome"]["status"] == "accept", "accept status tag")?;
    Ok(())
}
