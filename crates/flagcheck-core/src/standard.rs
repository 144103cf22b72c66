// crates/flagcheck-core/src/standard.rs
// ============================================================================
// Module: Standard Parameter Catalog
// Description: Registrations and baseline values for the known JIT parameters.
// Purpose: Build the registry a runtime uses at startup for a given environment.
// Dependencies: crate::{intrinsics, platform, registry, rules, store, value}
// ============================================================================

//! ## Overview
//! [`standard_registry`] registers one rule per governed parameter,
//! conditioned on the [`Environment`]: server-compiler rules only when C2 is
//! built, array-copy prefetch distances only on SPARC, the AVX-3 threshold
//! and RTM rate only on x86, and the new-size bound only on 64-bit targets.
//! G1 rules are always registered but only check while `UseG1GC` is set.
//! The pause time goal is range checked for every collector.
//!
//! [`standard_defaults`] provides a baseline store holding every parameter at
//! its default origin. Callers overlay their own values before resolving.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::codec::DigitLayout;
use crate::error::RegistryError;
use crate::identifiers::names;
use crate::intrinsics::IntrinsicCatalog;
use crate::intrinsics::ListSyntax;
use crate::platform::BYTES_PER_LONG;
use crate::platform::Environment;
use crate::registry::ParameterSpec;
use crate::registry::Registry;
use crate::registry::RegistryBuilder;
use crate::rules::Condition;
use crate::rules::RepairPolicy;
use crate::rules::collector::PauseIntervalRule;
use crate::rules::compiler::CompilerCountRule;
use crate::rules::compiler::InteriorAlignmentRule;
use crate::rules::compiler::LoopAlignmentRule;
use crate::rules::compiler::NodeLimitShareRule;
use crate::rules::compiler::OsrPercentageRule;
use crate::rules::compiler::SegmentSizeRule;
use crate::rules::consistency::RtmRateRule;
use crate::rules::consistency::StripMiningRule;
use crate::rules::list::IntrinsicListRule;
use crate::rules::multiple::MultipleOfRule;
use crate::rules::ordering::OrderingRule;
use crate::rules::packed::PackedDigitsRule;
use crate::rules::power_of_two::PowerOfTwoRule;
use crate::rules::range::RangeRule;
use crate::store::InMemoryParameterStore;
use crate::value::ParamKind;
use crate::value::ParamValue;
use crate::value::ValueOrigin;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Upper bound of the allocation prefetch distance.
pub const MAX_ALLOCATE_PREFETCH_DISTANCE: i128 = 512;

/// Array-copy prefetch distances must stay below this many bytes.
pub const ARRAYCOPY_PREFETCH_LIMIT: i128 = 4032;

/// Smallest code entry alignment.
pub const MIN_CODE_ENTRY_ALIGNMENT: i128 = 16;

/// Smallest explicit G1 heap region size.
pub const MIN_G1_REGION_SIZE: i128 = 1024 * 1024;

/// Largest pause time goal (`u64::MAX - 1`); leaves room for an interval one above it.
pub const MAX_GC_PAUSE_MILLIS_LIMIT: i128 = (1 << 64) - 2;

/// Width of the type profile level selector.
const TYPE_PROFILE_DIGITS: usize = 3;

/// Largest digit of the type profile level selector.
const TYPE_PROFILE_MAX_DIGIT: u8 = 2;

/// Width of the iterative GVN verification selector.
const VERIFY_GVN_DIGITS: usize = 2;

/// Largest digit of the iterative GVN verification selector.
const VERIFY_GVN_MAX_DIGIT: u8 = 1;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Builds the standard registry for `environment`.
///
/// # Errors
///
/// Returns [`RegistryError`] if the registrations conflict; the standard set
/// is acyclic and free of duplicates, so this indicates a programming error.
pub fn standard_registry(
    environment: &Environment,
    catalog: Arc<dyn IntrinsicCatalog>,
) -> Result<Registry, RegistryError> {
    let platform = environment.platform;
    let has_c2 = environment.compilers.has_c2();
    let mut builder = RegistryBuilder::new();

    builder.push(ParameterSpec::new(names::CI_COMPILER_COUNT, ParamKind::Int, CompilerCountRule));
    register_prefetch(&mut builder, environment);
    builder.push(ParameterSpec::new(
        names::COMPILE_THRESHOLD,
        ParamKind::Int,
        RangeRule::between(0, i128::from(i32::MAX >> 1)),
    ));
    builder.push(ParameterSpec::new(
        names::ON_STACK_REPLACE_PERCENTAGE,
        ParamKind::Int,
        OsrPercentageRule::new(),
    ));
    register_code_layout(&mut builder, has_c2);
    builder.push(ParameterSpec::new(
        names::TYPE_PROFILE_LEVEL,
        ParamKind::Packed,
        PackedDigitsRule::new(DigitLayout::uniform(TYPE_PROFILE_DIGITS, TYPE_PROFILE_MAX_DIGIT)),
    ));
    builder.push(ParameterSpec::new(
        names::VERIFY_ITERATIVE_GVN,
        ParamKind::Packed,
        PackedDigitsRule::new(DigitLayout::uniform(VERIFY_GVN_DIGITS, VERIFY_GVN_MAX_DIGIT)),
    ));
    builder.push(ParameterSpec::new(
        names::INIT_ARRAY_SHORT_SIZE,
        ParamKind::Int,
        MultipleOfRule::new(BYTES_PER_LONG),
    ));
    builder.push(ParameterSpec::new(
        names::DISABLE_INTRINSIC,
        ParamKind::List,
        IntrinsicListRule::new(ListSyntax::Disable, Arc::clone(&catalog)),
    ));
    builder.push(ParameterSpec::new(
        names::CONTROL_INTRINSIC,
        ParamKind::List,
        IntrinsicListRule::new(ListSyntax::Control, catalog),
    ));

    if has_c2 {
        builder.push(ParameterSpec::new(
            names::NODE_LIMIT_FUDGE_FACTOR,
            ParamKind::Int,
            NodeLimitShareRule::new(),
        ));
        builder.push(ParameterSpec::new(
            names::LOOP_STRIP_MINING_ITER,
            ParamKind::Uint,
            StripMiningRule::new(),
        ));
    }
    if platform.has_arraycopy_prefetch() {
        for name in [names::ARRAYCOPY_SRC_PREFETCH_DISTANCE, names::ARRAYCOPY_DST_PREFETCH_DISTANCE] {
            builder.push(ParameterSpec::new(
                name,
                ParamKind::Uint,
                RangeRule::at_most(ARRAYCOPY_PREFETCH_LIMIT - 1),
            ));
        }
    }
    if platform.has_avx3_threshold() {
        builder.push(ParameterSpec::new(
            names::AVX3_THRESHOLD,
            ParamKind::Int,
            PowerOfTwoRule::new().allowing_zero().with_max(i128::from(i32::MAX)),
        ));
    }
    if platform.has_rtm() {
        builder.push(ParameterSpec::new(
            names::RTM_TOTAL_COUNT_INCR_RATE,
            ParamKind::Int,
            RtmRateRule::new(),
        ));
    }
    register_g1(&mut builder, environment);

    builder.build()
}

/// Registers the allocation prefetch parameters.
fn register_prefetch(builder: &mut RegistryBuilder, environment: &Environment) {
    let platform = environment.platform;
    builder.push(ParameterSpec::new(
        names::ALLOCATE_PREFETCH_DISTANCE,
        ParamKind::Int,
        RangeRule::between(0, MAX_ALLOCATE_PREFETCH_DISTANCE),
    ));
    builder.push(ParameterSpec::new(
        names::ALLOCATE_PREFETCH_STEP_SIZE,
        ParamKind::Int,
        MultipleOfRule::new(platform.word_size())
            .when(Condition::equals(names::ALLOCATE_PREFETCH_STYLE, 3)),
    ));
    let instr = match platform.max_prefetch_instr() {
        Some(max) => RangeRule::between(0, max),
        None => RangeRule::at_least(0),
    };
    builder.push(ParameterSpec::new(names::ALLOCATE_PREFETCH_INSTR, ParamKind::Int, instr));
}

/// Registers code cache layout parameters.
fn register_code_layout(builder: &mut RegistryBuilder, has_c2: bool) {
    builder.push(ParameterSpec::new(
        names::CODE_ENTRY_ALIGNMENT,
        ParamKind::Int,
        PowerOfTwoRule::new()
            .with_min(MIN_CODE_ENTRY_ALIGNMENT)
            .with_policy(RepairPolicy::ViolationOnly),
    ));
    builder.push(ParameterSpec::new(
        names::CODE_CACHE_SEGMENT_SIZE,
        ParamKind::Uint,
        SegmentSizeRule::new(has_c2),
    ));
    if has_c2 {
        builder.push(ParameterSpec::new(
            names::OPTO_LOOP_ALIGNMENT,
            ParamKind::Int,
            LoopAlignmentRule::new(),
        ));
        builder.push(ParameterSpec::new(
            names::INTERIOR_ENTRY_ALIGNMENT,
            ParamKind::Int,
            InteriorAlignmentRule::new(),
        ));
    }
}

/// Registers G1 collector parameters.
fn register_g1(builder: &mut RegistryBuilder, environment: &Environment) {
    let explicit_g1 =
        || Condition::All(vec![Condition::flag(names::USE_G1_GC), Condition::SetOnCommandLine]);
    builder.push(ParameterSpec::new(
        names::G1_REMSET_ARRAY_OF_CARDS_ENTRIES,
        ParamKind::Uint,
        RangeRule::at_least(1).when(explicit_g1()),
    ));
    builder.push(ParameterSpec::new(
        names::G1_REMSET_HOWL_NUM_BUCKETS,
        ParamKind::Uint,
        PowerOfTwoRule::new().with_min(1).when(explicit_g1()),
    ));
    builder.push(ParameterSpec::new(
        names::G1_REMSET_HOWL_MAX_NUM_BUCKETS,
        ParamKind::Uint,
        PowerOfTwoRule::new().when(explicit_g1()),
    ));
    builder.push(ParameterSpec::new(
        names::G1_HEAP_REGION_SIZE,
        ParamKind::Uint,
        RangeRule::at_least(MIN_G1_REGION_SIZE).when(explicit_g1()),
    ));
    builder.push(ParameterSpec::new(
        names::G1_MAX_NEW_SIZE_PERCENT,
        ParamKind::Uint,
        RangeRule::between(0, 100).when(Condition::flag(names::USE_G1_GC)),
    ));
    builder.push(ParameterSpec::new(
        names::G1_NEW_SIZE_PERCENT,
        ParamKind::Uint,
        OrderingRule::at_most(names::G1_MAX_NEW_SIZE_PERCENT)
            .when(Condition::flag(names::USE_G1_GC)),
    ));
    builder.push(ParameterSpec::new(
        names::MAX_GC_PAUSE_MILLIS,
        ParamKind::Uint,
        RangeRule::between(1, MAX_GC_PAUSE_MILLIS_LIMIT),
    ));
    builder.push(ParameterSpec::new(
        names::GC_PAUSE_INTERVAL_MILLIS,
        ParamKind::Uint,
        PauseIntervalRule::new(),
    ));
    if environment.platform.is_64_bit() {
        builder.push(ParameterSpec::new(
            names::NEW_SIZE,
            ParamKind::Uint,
            RangeRule::at_most(i128::from(u32::MAX) * MIN_G1_REGION_SIZE)
                .when(Condition::flag(names::USE_G1_GC)),
        ));
    }
}

// ============================================================================
// SECTION: Baseline Values
// ============================================================================

/// Baseline value of every known parameter.
fn baseline_values() -> Vec<(&'static str, ParamValue)> {
    vec![
        (names::CI_COMPILER_COUNT, ParamValue::Int(4)),
        (names::ALLOCATE_PREFETCH_DISTANCE, ParamValue::Int(192)),
        (names::ALLOCATE_PREFETCH_STYLE, ParamValue::Int(1)),
        (names::ALLOCATE_PREFETCH_STEP_SIZE, ParamValue::Int(64)),
        (names::ALLOCATE_PREFETCH_INSTR, ParamValue::Int(0)),
        (names::COMPILE_THRESHOLD, ParamValue::Int(10_000)),
        (names::ON_STACK_REPLACE_PERCENTAGE, ParamValue::Int(140)),
        (names::PROFILE_INTERPRETER, ParamValue::Bool(true)),
        (names::INTERPRETER_PROFILE_PERCENTAGE, ParamValue::Int(33)),
        (names::CODE_CACHE_SEGMENT_SIZE, ParamValue::Uint(64)),
        (names::CODE_ENTRY_ALIGNMENT, ParamValue::Int(32)),
        (names::OPTO_LOOP_ALIGNMENT, ParamValue::Int(16)),
        (names::INTERIOR_ENTRY_ALIGNMENT, ParamValue::Int(16)),
        (names::MAX_NODE_LIMIT, ParamValue::Int(80_000)),
        (names::NODE_LIMIT_FUDGE_FACTOR, ParamValue::Int(2_000)),
        (names::ARRAYCOPY_SRC_PREFETCH_DISTANCE, ParamValue::Uint(0)),
        (names::ARRAYCOPY_DST_PREFETCH_DISTANCE, ParamValue::Uint(0)),
        (names::AVX3_THRESHOLD, ParamValue::Int(4_096)),
        (names::TYPE_PROFILE_LEVEL, ParamValue::Packed(111)),
        (names::VERIFY_ITERATIVE_GVN, ParamValue::Packed(0)),
        (names::INIT_ARRAY_SHORT_SIZE, ParamValue::Int(64)),
        (names::USE_RTM_LOCKING, ParamValue::Bool(false)),
        (names::RTM_TOTAL_COUNT_INCR_RATE, ParamValue::Int(64)),
        (names::USE_COUNTED_LOOP_SAFEPOINTS, ParamValue::Bool(true)),
        (names::LOOP_STRIP_MINING_ITER, ParamValue::Uint(1_000)),
        (names::DISABLE_INTRINSIC, ParamValue::List(String::new())),
        (names::CONTROL_INTRINSIC, ParamValue::List(String::new())),
        (names::USE_G1_GC, ParamValue::Bool(true)),
        (names::G1_REMSET_ARRAY_OF_CARDS_ENTRIES, ParamValue::Uint(0)),
        (names::G1_REMSET_HOWL_NUM_BUCKETS, ParamValue::Uint(4)),
        (names::G1_REMSET_HOWL_MAX_NUM_BUCKETS, ParamValue::Uint(8)),
        (names::G1_HEAP_REGION_SIZE, ParamValue::Uint(0)),
        (names::G1_NEW_SIZE_PERCENT, ParamValue::Uint(5)),
        (names::G1_MAX_NEW_SIZE_PERCENT, ParamValue::Uint(60)),
        (names::NEW_SIZE, ParamValue::Uint(1_048_576)),
        (names::MAX_GC_PAUSE_MILLIS, ParamValue::Uint(200)),
        (names::GC_PAUSE_INTERVAL_MILLIS, ParamValue::Uint(201)),
    ]
}

/// Returns a store holding every known parameter at its baseline default.
#[must_use]
pub fn standard_defaults() -> InMemoryParameterStore {
    let mut store = InMemoryParameterStore::new();
    for (name, value) in baseline_values() {
        store.insert(name, value, ValueOrigin::Default);
    }
    store
}

/// Returns the kind of every known parameter, governed or plain input.
#[must_use]
pub fn standard_parameter_kinds() -> Vec<(&'static str, ParamKind)> {
    baseline_values().into_iter().map(|(name, value)| (name, value.kind())).collect()
}
