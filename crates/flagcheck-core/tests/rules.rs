// crates/flagcheck-core/tests/rules.rs
// ============================================================================
// Module: Rule Tests
// Description: Platform- and dependency-driven rules of the standard catalog.
// Purpose: Pin derived bounds, composite repairs, and guarded checks.
// ============================================================================
//! ## Overview
//! Each test runs a standard pass with a few overrides and inspects the value
//! left in the store.

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

use flagcheck_core::CompilerSet;
use flagcheck_core::Environment;
use flagcheck_core::ExecutionMode;
use flagcheck_core::InMemoryParameterStore;
use flagcheck_core::Mode;
use flagcheck_core::ParamKind;
use flagcheck_core::ParamValue;
use flagcheck_core::ParameterSpec;
use flagcheck_core::ParameterStore;
use flagcheck_core::Platform;
use flagcheck_core::Registry;
use flagcheck_core::Resolver;
use flagcheck_core::ValueOrigin;
use flagcheck_core::ViolationKind;
use flagcheck_core::names;
use flagcheck_core::rules::compiler::LoopAlignmentRule;
use flagcheck_core::rules::compiler::node_limit_bounds;
use flagcheck_core::rules::compiler::osr_percentage_limit;
use support::TestResult;
use support::ensure;
use support::standard_resolver;
use support::store_with;

/// Runs an auto-repair pass and returns the final value of `target`.
fn repaired(
    environment: Environment,
    overrides: &[(&str, ParamValue)],
    target: &str,
) -> TestResult<Option<ParamValue>> {
    let (resolver, _sink) = standard_resolver(environment, Mode::AutoRepair)?;
    let mut store = store_with(overrides);
    let report = resolver.resolve(&mut store)?;
    ensure(report.success, format!("repair pass failed: {:?}", report.failure))?;
    Ok(store.get(&target.into()))
}

// ============================================================================
// SECTION: Compiler Threads
// ============================================================================

#[test]
fn thread_count_without_compilers_is_unavailable() -> TestResult {
    let environment = Environment::new(Platform::X86_64, CompilerSet::None, ExecutionMode::Tiered);
    let (resolver, _sink) = standard_resolver(environment, Mode::Strict)?;
    let mut store = store_with(&[(names::CI_COMPILER_COUNT, ParamValue::Int(4))]);
    let report = resolver.resolve(&mut store)?;
    let failure = report.failure.ok_or("missing failure")?;
    ensure(failure.kind == ViolationKind::CompilersUnavailable, "expected unavailable")?;

    let value = repaired(environment, &[(names::CI_COMPILER_COUNT, ParamValue::Int(4))], names::CI_COMPILER_COUNT)?;
    ensure(value == Some(ParamValue::Int(-1)), "expected -1 without compilers")?;
    Ok(())
}

#[test]
fn single_tier_and_interpreter_minimums() -> TestResult {
    let single = Environment::new(Platform::X86_64, CompilerSet::C2, ExecutionMode::SingleTier);
    let value = repaired(single, &[(names::CI_COMPILER_COUNT, ParamValue::Int(0))], names::CI_COMPILER_COUNT)?;
    ensure(value == Some(ParamValue::Int(1)), "single tier needs one thread")?;

    let interpreter =
        Environment::new(Platform::X86_64, CompilerSet::Both, ExecutionMode::InterpreterOnly);
    let value = repaired(interpreter, &[(names::CI_COMPILER_COUNT, ParamValue::Int(0))], names::CI_COMPILER_COUNT)?;
    ensure(value == Some(ParamValue::Int(0)), "interpreter-only accepts zero")?;
    Ok(())
}

// ============================================================================
// SECTION: On-Stack Replacement
// ============================================================================

#[test]
fn osr_limit_follows_profiling_and_threshold() {
    assert_eq!(osr_percentage_limit(10_000, false, 33), 10_737_418);
    assert_eq!(osr_percentage_limit(10_000, true, 33), 21_474_836 + 33);
    assert_eq!(osr_percentage_limit(0, false, 0), i128::from(i32::MAX >> 1) * 100);
}

#[test]
fn osr_percentage_clamps_to_derived_limit() -> TestResult {
    let value = repaired(
        Environment::default(),
        &[
            (names::PROFILE_INTERPRETER, ParamValue::Bool(false)),
            (names::ON_STACK_REPLACE_PERCENTAGE, ParamValue::Int(i64::MAX)),
        ],
        names::ON_STACK_REPLACE_PERCENTAGE,
    )?;
    ensure(value == Some(ParamValue::Int(10_737_418)), format!("got {value:?}"))?;
    Ok(())
}

#[test]
fn osr_percentage_must_cover_profile_percentage() -> TestResult {
    let value = repaired(
        Environment::default(),
        &[(names::ON_STACK_REPLACE_PERCENTAGE, ParamValue::Int(10))],
        names::ON_STACK_REPLACE_PERCENTAGE,
    )?;
    ensure(value == Some(ParamValue::Int(33)), "expected profile percentage as floor")?;
    Ok(())
}

#[test]
fn osr_percentage_uses_repaired_threshold() -> TestResult {
    let value = repaired(
        Environment::default(),
        &[
            (names::PROFILE_INTERPRETER, ParamValue::Bool(false)),
            (names::COMPILE_THRESHOLD, ParamValue::Int(-5)),
            (names::ON_STACK_REPLACE_PERCENTAGE, ParamValue::Int(i64::MAX)),
        ],
        names::ON_STACK_REPLACE_PERCENTAGE,
    )?;
    let expected = i64::from(i32::MAX >> 1) * 100;
    ensure(value == Some(ParamValue::Int(expected)), "zero threshold skips division")?;
    Ok(())
}

// ============================================================================
// SECTION: Code Layout
// ============================================================================

#[test]
fn loop_alignment_respects_instruction_unit() -> TestResult {
    let arm = Environment::new(Platform::Aarch64, CompilerSet::Both, ExecutionMode::Tiered);
    let value =
        repaired(arm, &[(names::OPTO_LOOP_ALIGNMENT, ParamValue::Int(2))], names::OPTO_LOOP_ALIGNMENT)?;
    ensure(value == Some(ParamValue::Int(4)), "expected NOP-size multiple")?;

    let value = repaired(
        Environment::default(),
        &[(names::OPTO_LOOP_ALIGNMENT, ParamValue::Int(100))],
        names::OPTO_LOOP_ALIGNMENT,
    )?;
    ensure(value == Some(ParamValue::Int(32)), "expected entry alignment cap")?;
    Ok(())
}

#[test]
fn loop_alignment_reports_nop_size_before_entry_cap() -> TestResult {
    let registry = Registry::builder()
        .with(ParameterSpec::new(names::OPTO_LOOP_ALIGNMENT, ParamKind::Int, LoopAlignmentRule::new()))
        .build()?;
    let arm = Environment::new(Platform::Aarch64, CompilerSet::Both, ExecutionMode::Tiered);
    let resolver = Resolver::new(registry, arm);
    let mut store = InMemoryParameterStore::new()
        .with_command_line(names::OPTO_LOOP_ALIGNMENT, ParamValue::Int(2))
        .with_default(names::CODE_ENTRY_ALIGNMENT, ParamValue::Int(1));
    let report = resolver.resolve(&mut store)?;
    let failure = report.failure.ok_or("missing failure")?;
    ensure(failure.kind == ViolationKind::NotMultipleOf, failure.message.clone())?;
    Ok(())
}

#[test]
fn interior_alignment_uses_platform_minimum() -> TestResult {
    let x86_32 = Environment::new(Platform::X86_32, CompilerSet::Both, ExecutionMode::Tiered);
    let value = repaired(
        x86_32,
        &[(names::INTERIOR_ENTRY_ALIGNMENT, ParamValue::Int(2))],
        names::INTERIOR_ENTRY_ALIGNMENT,
    )?;
    ensure(value == Some(ParamValue::Int(4)), "expected 32-bit x86 minimum")?;

    let value = repaired(
        Environment::default(),
        &[(names::INTERIOR_ENTRY_ALIGNMENT, ParamValue::Int(24))],
        names::INTERIOR_ENTRY_ALIGNMENT,
    )?;
    ensure(value == Some(ParamValue::Int(16)), "expected power-of-two round down")?;
    Ok(())
}

#[test]
fn node_limit_fudge_factor_bounds() -> TestResult {
    assert_eq!(node_limit_bounds(80_000), (1_600, 32_000));
    let value = repaired(
        Environment::default(),
        &[(names::NODE_LIMIT_FUDGE_FACTOR, ParamValue::Int(100))],
        names::NODE_LIMIT_FUDGE_FACTOR,
    )?;
    ensure(value == Some(ParamValue::Int(1_600)), "expected 2% floor")?;
    Ok(())
}

#[test]
fn negative_node_limit_repair_is_accepted_by_strict_pass() -> TestResult {
    assert_eq!(node_limit_bounds(-10), (0, 0));
    let overrides = [
        (names::MAX_NODE_LIMIT, ParamValue::Int(-10)),
        (names::NODE_LIMIT_FUDGE_FACTOR, ParamValue::Int(5)),
    ];
    let (resolver, _sink) = standard_resolver(Environment::default(), Mode::AutoRepair)?;
    let mut store = store_with(&overrides);
    ensure(resolver.resolve(&mut store)?.success, "repair pass succeeds")?;
    ensure(
        store.get(&names::NODE_LIMIT_FUDGE_FACTOR.into()) == Some(ParamValue::Int(0)),
        "fudge factor clamps to zero",
    )?;
    let resolver = resolver.with_mode(Mode::Strict);
    let report = resolver.resolve(&mut store)?;
    ensure(report.success, format!("strict pass rejected the repair: {:?}", report.failure))?;
    Ok(())
}

// ============================================================================
// SECTION: Platform-Specific
// ============================================================================

#[test]
fn avx3_threshold_rounds_down() -> TestResult {
    let value = repaired(
        Environment::default(),
        &[(names::AVX3_THRESHOLD, ParamValue::Int(3_000))],
        names::AVX3_THRESHOLD,
    )?;
    ensure(value == Some(ParamValue::Int(2_048)), "expected 2048")?;
    Ok(())
}

#[test]
fn prefetch_instr_is_bounded_on_x86_only() -> TestResult {
    let value = repaired(
        Environment::default(),
        &[(names::ALLOCATE_PREFETCH_INSTR, ParamValue::Int(7))],
        names::ALLOCATE_PREFETCH_INSTR,
    )?;
    ensure(value == Some(ParamValue::Int(3)), "x86 caps at 3")?;

    let arm = Environment::new(Platform::Aarch64, CompilerSet::Both, ExecutionMode::Tiered);
    let value =
        repaired(arm, &[(names::ALLOCATE_PREFETCH_INSTR, ParamValue::Int(7))], names::ALLOCATE_PREFETCH_INSTR)?;
    ensure(value == Some(ParamValue::Int(7)), "no cap elsewhere")?;
    Ok(())
}

#[test]
fn arraycopy_distance_checked_on_sparc() -> TestResult {
    let sparc = Environment::new(Platform::Sparc64, CompilerSet::C1, ExecutionMode::Tiered);
    let value = repaired(
        sparc,
        &[(names::ARRAYCOPY_SRC_PREFETCH_DISTANCE, ParamValue::Uint(5_000))],
        names::ARRAYCOPY_SRC_PREFETCH_DISTANCE,
    )?;
    ensure(value == Some(ParamValue::Uint(4_031)), "expected limit below 4032")?;
    Ok(())
}

// ============================================================================
// SECTION: G1
// ============================================================================

#[test]
fn g1_bucket_counts_checked_only_from_command_line() -> TestResult {
    let (resolver, _sink) = standard_resolver(Environment::default(), Mode::Strict)?;
    let mut store = store_with(&[]);
    store.insert(names::G1_REMSET_HOWL_NUM_BUCKETS, ParamValue::Uint(6), ValueOrigin::Default);
    ensure(resolver.resolve(&mut store)?.success, "defaults are not checked")?;

    let mut store = store_with(&[(names::G1_REMSET_HOWL_NUM_BUCKETS, ParamValue::Uint(6))]);
    let report = resolver.resolve(&mut store)?;
    let failure = report.failure.ok_or("missing failure")?;
    ensure(failure.kind == ViolationKind::NotPowerOfTwo, "expected power-of-two violation")?;

    let value = repaired(
        Environment::default(),
        &[(names::G1_REMSET_HOWL_NUM_BUCKETS, ParamValue::Uint(0))],
        names::G1_REMSET_HOWL_NUM_BUCKETS,
    )?;
    ensure(value == Some(ParamValue::Uint(1)), "zero buckets repair to one")?;
    Ok(())
}

#[test]
fn g1_rules_idle_without_g1() -> TestResult {
    let (resolver, _sink) = standard_resolver(Environment::default(), Mode::Strict)?;
    let mut store = store_with(&[
        (names::USE_G1_GC, ParamValue::Bool(false)),
        (names::G1_REMSET_HOWL_NUM_BUCKETS, ParamValue::Uint(6)),
        (names::G1_NEW_SIZE_PERCENT, ParamValue::Uint(90)),
    ]);
    ensure(resolver.resolve(&mut store)?.success, "G1 rules must not apply")?;
    Ok(())
}

#[test]
fn g1_new_size_percent_snaps_to_maximum() -> TestResult {
    let value = repaired(
        Environment::default(),
        &[
            (names::G1_NEW_SIZE_PERCENT, ParamValue::Uint(70)),
            (names::G1_MAX_NEW_SIZE_PERCENT, ParamValue::Uint(150)),
        ],
        names::G1_NEW_SIZE_PERCENT,
    )?;
    ensure(value == Some(ParamValue::Uint(70)), "max repaired to 100 first")?;

    let value = repaired(
        Environment::default(),
        &[(names::G1_NEW_SIZE_PERCENT, ParamValue::Uint(70))],
        names::G1_NEW_SIZE_PERCENT,
    )?;
    ensure(value == Some(ParamValue::Uint(60)), "snaps to G1MaxNewSizePercent")?;
    Ok(())
}

#[test]
fn pause_interval_requires_pause_goal() -> TestResult {
    let (resolver, _sink) = standard_resolver(Environment::default(), Mode::Strict)?;
    let mut store = store_with(&[(names::GC_PAUSE_INTERVAL_MILLIS, ParamValue::Uint(50))]);
    let report = resolver.resolve(&mut store)?;
    let failure = report.failure.ok_or("missing failure")?;
    ensure(failure.parameter.as_str() == names::GC_PAUSE_INTERVAL_MILLIS, "interval fails")?;
    ensure(failure.kind == ViolationKind::PartnerUnset, format!("unexpected {}", failure.message))?;

    let value = repaired(
        Environment::default(),
        &[(names::GC_PAUSE_INTERVAL_MILLIS, ParamValue::Uint(50))],
        names::GC_PAUSE_INTERVAL_MILLIS,
    )?;
    ensure(value == Some(ParamValue::Uint(201)), "falls back to goal plus one")?;
    Ok(())
}

#[test]
fn pause_interval_must_exceed_pause_goal() -> TestResult {
    let (resolver, _sink) = standard_resolver(Environment::default(), Mode::Strict)?;
    let mut store = store_with(&[
        (names::MAX_GC_PAUSE_MILLIS, ParamValue::Uint(100)),
        (names::GC_PAUSE_INTERVAL_MILLIS, ParamValue::Uint(100)),
    ]);
    let report = resolver.resolve(&mut store)?;
    let failure = report.failure.ok_or("missing failure")?;
    ensure(failure.kind == ViolationKind::OutOfRange, "expected ordering violation")?;
    ensure(
        failure.message == "GCPauseIntervalMillis (100) must be greater than MaxGCPauseMillis (100)",
        failure.message.clone(),
    )?;

    let value = repaired(
        Environment::default(),
        &[
            (names::MAX_GC_PAUSE_MILLIS, ParamValue::Uint(100)),
            (names::GC_PAUSE_INTERVAL_MILLIS, ParamValue::Uint(100)),
        ],
        names::GC_PAUSE_INTERVAL_MILLIS,
    )?;
    ensure(value == Some(ParamValue::Uint(101)), "interval moves above the goal")?;
    Ok(())
}

#[test]
fn zero_pause_interval_is_checked_first() -> TestResult {
    let (resolver, _sink) = standard_resolver(Environment::default(), Mode::Strict)?;
    let mut store = store_with(&[(names::GC_PAUSE_INTERVAL_MILLIS, ParamValue::Uint(0))]);
    let report = resolver.resolve(&mut store)?;
    let failure = report.failure.ok_or("missing failure")?;
    ensure(
        failure.message == "GCPauseIntervalMillis (0) must be greater than or equal to 1",
        failure.message.clone(),
    )?;

    let value = repaired(
        Environment::default(),
        &[
            (names::MAX_GC_PAUSE_MILLIS, ParamValue::Uint(300)),
            (names::GC_PAUSE_INTERVAL_MILLIS, ParamValue::Uint(0)),
        ],
        names::GC_PAUSE_INTERVAL_MILLIS,
    )?;
    ensure(value == Some(ParamValue::Uint(301)), "repair also clears the goal")?;
    Ok(())
}

#[test]
fn derived_pause_interval_is_not_checked() -> TestResult {
    let (resolver, _sink) = standard_resolver(Environment::default(), Mode::Strict)?;
    let mut store = store_with(&[(names::MAX_GC_PAUSE_MILLIS, ParamValue::Uint(500))]);
    ensure(resolver.resolve(&mut store)?.success, "default interval is ergonomic")?;

    let mut store = store_with(&[
        (names::USE_G1_GC, ParamValue::Bool(false)),
        (names::GC_PAUSE_INTERVAL_MILLIS, ParamValue::Uint(0)),
    ]);
    ensure(resolver.resolve(&mut store)?.success, "pair is G1 only")?;

    let value = repaired(
        Environment::default(),
        &[(names::MAX_GC_PAUSE_MILLIS, ParamValue::Uint(0))],
        names::MAX_GC_PAUSE_MILLIS,
    )?;
    ensure(value == Some(ParamValue::Uint(1)), "pause goal is at least one")?;
    Ok(())
}

#[test]
fn init_array_short_size_is_word_aligned() -> TestResult {
    let value = repaired(
        Environment::default(),
        &[(names::INIT_ARRAY_SHORT_SIZE, ParamValue::Int(5))],
        names::INIT_ARRAY_SHORT_SIZE,
    )?;
    ensure(value == Some(ParamValue::Int(8)), "sub-factor values become the factor")?;
    Ok(())
}
