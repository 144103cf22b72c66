// crates/flagcheck-core/src/identifiers.rs
// ============================================================================
// Module: Parameter Identifiers
// Description: Canonical names for governed and input tuning parameters.
// Purpose: Provide a strongly typed, serializable parameter name.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Parameter names are opaque strings that serialize transparently. The
//! [`names`] module lists every parameter the standard registry knows about
//! so rules and tests never spell a name twice.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Borrow;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Name of a tuning parameter held in a parameter store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamName(String);

impl ParamName {
    /// Creates a new parameter name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ParamName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ParamName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl Borrow<str> for ParamName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ParamName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ParamName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ============================================================================
// SECTION: Well-Known Names
// ============================================================================

/// Names of the parameters known to the standard registry.
pub mod names {
    /// Number of compiler threads.
    pub const CI_COMPILER_COUNT: &str = "CICompilerCount";
    /// Allocation prefetch distance in bytes.
    pub const ALLOCATE_PREFETCH_DISTANCE: &str = "AllocatePrefetchDistance";
    /// Allocation prefetch style selector.
    pub const ALLOCATE_PREFETCH_STYLE: &str = "AllocatePrefetchStyle";
    /// Allocation prefetch step size in bytes.
    pub const ALLOCATE_PREFETCH_STEP_SIZE: &str = "AllocatePrefetchStepSize";
    /// Allocation prefetch instruction selector.
    pub const ALLOCATE_PREFETCH_INSTR: &str = "AllocatePrefetchInstr";
    /// Invocation count that triggers compilation.
    pub const COMPILE_THRESHOLD: &str = "CompileThreshold";
    /// On-stack replacement threshold as a percentage of the compile threshold.
    pub const ON_STACK_REPLACE_PERCENTAGE: &str = "OnStackReplacePercentage";
    /// Whether the interpreter collects profiles.
    pub const PROFILE_INTERPRETER: &str = "ProfileInterpreter";
    /// Interpreter profiling threshold as a percentage of the compile threshold.
    pub const INTERPRETER_PROFILE_PERCENTAGE: &str = "InterpreterProfilePercentage";
    /// Code cache segment size in bytes.
    pub const CODE_CACHE_SEGMENT_SIZE: &str = "CodeCacheSegmentSize";
    /// Alignment of compiled method entry points.
    pub const CODE_ENTRY_ALIGNMENT: &str = "CodeEntryAlignment";
    /// Alignment of inner loop heads.
    pub const OPTO_LOOP_ALIGNMENT: &str = "OptoLoopAlignment";
    /// Alignment of interior entry points.
    pub const INTERIOR_ENTRY_ALIGNMENT: &str = "InteriorEntryAlignment";
    /// Upper bound on IR graph nodes.
    pub const MAX_NODE_LIMIT: &str = "MaxNodeLimit";
    /// Slack subtracted from the node limit before bailing out.
    pub const NODE_LIMIT_FUDGE_FACTOR: &str = "NodeLimitFudgeFactor";
    /// Source prefetch distance for array copies.
    pub const ARRAYCOPY_SRC_PREFETCH_DISTANCE: &str = "ArraycopySrcPrefetchDistance";
    /// Destination prefetch distance for array copies.
    pub const ARRAYCOPY_DST_PREFETCH_DISTANCE: &str = "ArraycopyDstPrefetchDistance";
    /// Minimum length for AVX-512 code paths.
    pub const AVX3_THRESHOLD: &str = "AVX3Threshold";
    /// Packed per-tier type profiling levels.
    pub const TYPE_PROFILE_LEVEL: &str = "TypeProfileLevel";
    /// Packed iterative value-numbering verification phases.
    pub const VERIFY_ITERATIVE_GVN: &str = "VerifyIterativeGVN";
    /// Largest array size initialized with inline stores.
    pub const INIT_ARRAY_SHORT_SIZE: &str = "InitArrayShortSize";
    /// Whether RTM locking is in use.
    pub const USE_RTM_LOCKING: &str = "UseRTMLocking";
    /// Sampling rate for RTM total counts.
    pub const RTM_TOTAL_COUNT_INCR_RATE: &str = "RTMTotalCountIncrRate";
    /// Whether counted loops keep safepoint polls.
    pub const USE_COUNTED_LOOP_SAFEPOINTS: &str = "UseCountedLoopSafepoints";
    /// Iterations between safepoint polls in strip-mined loops.
    pub const LOOP_STRIP_MINING_ITER: &str = "LoopStripMiningIter";
    /// Intrinsics to disable.
    pub const DISABLE_INTRINSIC: &str = "DisableIntrinsic";
    /// Intrinsics to enable or disable with `+`/`-` markers.
    pub const CONTROL_INTRINSIC: &str = "ControlIntrinsic";
    /// Whether the G1 collector is selected.
    pub const USE_G1_GC: &str = "UseG1GC";
    /// Entries per remembered-set card array.
    pub const G1_REMSET_ARRAY_OF_CARDS_ENTRIES: &str = "G1RemSetArrayOfCardsEntries";
    /// Initial remembered-set howl bucket count.
    pub const G1_REMSET_HOWL_NUM_BUCKETS: &str = "G1RemSetHowlNumBuckets";
    /// Maximum remembered-set howl bucket count.
    pub const G1_REMSET_HOWL_MAX_NUM_BUCKETS: &str = "G1RemSetHowlMaxNumBuckets";
    /// G1 heap region size in bytes.
    pub const G1_HEAP_REGION_SIZE: &str = "G1HeapRegionSize";
    /// Minimum young generation share of the heap.
    pub const G1_NEW_SIZE_PERCENT: &str = "G1NewSizePercent";
    /// Maximum young generation share of the heap.
    pub const G1_MAX_NEW_SIZE_PERCENT: &str = "G1MaxNewSizePercent";
    /// Initial young generation size in bytes.
    pub const NEW_SIZE: &str = "NewSize";
    /// Pause time goal in milliseconds.
    pub const MAX_GC_PAUSE_MILLIS: &str = "MaxGCPauseMillis";
    /// Time slice in milliseconds that the pause goal applies to.
    pub const GC_PAUSE_INTERVAL_MILLIS: &str = "GCPauseIntervalMillis";
}
