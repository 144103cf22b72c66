// crates/flagcheck-core/src/platform.rs
// ============================================================================
// Module: Platform Capabilities
// Description: Architecture family and compiler build/execution inputs.
// Purpose: Replace compile-time platform branching with explicit inputs.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Platform-conditional bounds (prefetch instruction classes, instruction
//! units, minimum interior alignment) are read from a [`Platform`] value
//! supplied when the registry is built. [`Environment`] bundles it with the
//! compiler build and execution mode.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Bits of the invocation counter reserved for state rather than counts.
pub const INVOCATION_COUNT_SHIFT: u32 = 1;

/// Size in bytes of a double constant placed in the code cache.
pub const CONSTANT_ALIGNMENT: i128 = 8;

/// Size in bytes of a long word used for array initialization.
pub const BYTES_PER_LONG: i128 = 8;

// ============================================================================
// SECTION: Platform
// ============================================================================

/// Architecture family the runtime was built for.
///
/// # Invariants
/// - Variants are stable for configuration labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// 64-bit x86.
    X86_64,
    /// 32-bit x86.
    X86_32,
    /// 64-bit ARM.
    Aarch64,
    /// 64-bit POWER.
    Ppc64,
    /// 64-bit IBM Z.
    S390x,
    /// 64-bit RISC-V.
    Riscv64,
    /// 64-bit SPARC.
    Sparc64,
}

impl Platform {
    /// Returns a stable label for the platform.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::X86_32 => "x86_32",
            Self::Aarch64 => "aarch64",
            Self::Ppc64 => "ppc64",
            Self::S390x => "s390x",
            Self::Riscv64 => "riscv64",
            Self::Sparc64 => "sparc64",
        }
    }

    /// Returns whether this is an x86 family member.
    #[must_use]
    pub const fn is_x86(self) -> bool {
        matches!(self, Self::X86_64 | Self::X86_32)
    }

    /// Returns whether pointers are 64 bits wide.
    #[must_use]
    pub const fn is_64_bit(self) -> bool {
        !matches!(self, Self::X86_32)
    }

    /// Machine word size in bytes.
    #[must_use]
    pub const fn word_size(self) -> i128 {
        if self.is_64_bit() { 8 } else { 4 }
    }

    /// Largest valid prefetch instruction selector, if the family bounds it.
    #[must_use]
    pub const fn max_prefetch_instr(self) -> Option<i128> {
        if self.is_x86() { Some(3) } else { None }
    }

    /// Granularity of code addresses, which is also the NOP size.
    #[must_use]
    pub const fn instruction_unit(self) -> i128 {
        match self {
            Self::X86_64 | Self::X86_32 => 1,
            Self::S390x | Self::Riscv64 => 2,
            Self::Aarch64 | Self::Ppc64 | Self::Sparc64 => 4,
        }
    }

    /// Smallest interior entry alignment the code emitter accepts.
    #[must_use]
    pub const fn min_interior_entry_alignment(self) -> i128 {
        match self {
            Self::X86_32 => 4,
            Self::S390x => 2,
            _ => 16,
        }
    }

    /// Whether array-copy stubs take prefetch distances.
    #[must_use]
    pub const fn has_arraycopy_prefetch(self) -> bool {
        matches!(self, Self::Sparc64)
    }

    /// Whether AVX-512 length thresholds apply.
    #[must_use]
    pub const fn has_avx3_threshold(self) -> bool {
        self.is_x86()
    }

    /// Whether restricted transactional memory locking is available.
    #[must_use]
    pub const fn has_rtm(self) -> bool {
        self.is_x86()
    }
}

// ============================================================================
// SECTION: Compiler Build and Execution
// ============================================================================

/// Compilers the runtime was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompilerSet {
    /// No JIT compiler.
    None,
    /// Client compiler only.
    C1,
    /// Server compiler only.
    C2,
    /// Both compilers.
    Both,
}

impl CompilerSet {
    /// Returns whether the server compiler is present.
    #[must_use]
    pub const fn has_c2(self) -> bool {
        matches!(self, Self::C2 | Self::Both)
    }

    /// Returns whether any compiler is present.
    #[must_use]
    pub const fn any(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// How the runtime executes code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Multiple compilation tiers.
    Tiered,
    /// A single compiler tier.
    SingleTier,
    /// Interpreter only; compilers idle.
    InterpreterOnly,
}

/// Inputs describing the platform and compiler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Architecture family.
    pub platform: Platform,
    /// Compilers present in the build.
    pub compilers: CompilerSet,
    /// Execution mode chosen at startup.
    pub execution: ExecutionMode,
}

impl Environment {
    /// Creates an environment description.
    #[must_use]
    pub const fn new(platform: Platform, compilers: CompilerSet, execution: ExecutionMode) -> Self {
        Self {
            platform,
            compilers,
            execution,
        }
    }

    /// Minimum compiler thread count, or `None` when no compiler is built.
    #[must_use]
    pub const fn min_compiler_threads(&self) -> Option<i128> {
        if !self.compilers.any() {
            return None;
        }
        Some(match self.execution {
            ExecutionMode::Tiered => 2,
            ExecutionMode::SingleTier => 1,
            ExecutionMode::InterpreterOnly => 0,
        })
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(Platform::X86_64, CompilerSet::Both, ExecutionMode::Tiered)
    }
}
