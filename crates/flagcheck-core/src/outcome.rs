// crates/flagcheck-core/src/outcome.rs
// ============================================================================
// Module: Rule Outcomes
// Description: Resolution mode, violation taxonomy, and rule outcomes.
// Purpose: Unify accept/reject/repair results into one sum type.
// Dependencies: crate::{identifiers, value}, serde
// ============================================================================

//! ## Overview
//! Every rule returns an [`Outcome`]. Presentation (diagnostic severity, the
//! pass report) is derived from the outcome and the active [`Mode`], never
//! decided inside the rule.
//!
//! ## Invariants
//! - A `Repaired` value fed back into the same rule under [`Mode::Strict`]
//!   yields [`Outcome::Accept`].
//! - Rules never return `Repaired` under [`Mode::Strict`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::identifiers::ParamName;
use crate::value::ParamValue;

// ============================================================================
// SECTION: Mode
// ============================================================================

/// Resolution mode for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Any violation is fatal.
    #[default]
    Strict,
    /// Violations with a repair path are clamped into range.
    AutoRepair,
}

impl Mode {
    /// Returns a stable label for the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::AutoRepair => "auto_repair",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Violations
// ============================================================================

/// Classification of a constraint violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Value lies outside its bounds or ordering.
    OutOfRange,
    /// Value is not a power of two.
    NotPowerOfTwo,
    /// Value is not a multiple of the required factor.
    NotMultipleOf,
    /// A prerequisite parameter failed earlier in the pass.
    DependencyInvalid,
    /// A list token is not a recognized intrinsic.
    UnrecognizedToken,
    /// A packed digit exceeds its position's maximum.
    DigitOutOfRange {
        /// Zero-based digit position, least significant first.
        position: usize,
    },
    /// A packed value has more digits than declared.
    TooManyDigits,
    /// A compiler thread count was set but no compiler is built.
    CompilersUnavailable,
    /// A parameter was set explicitly without the parameter it pairs with.
    PartnerUnset,
}

impl ViolationKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OutOfRange => "out_of_range",
            Self::NotPowerOfTwo => "not_power_of_two",
            Self::NotMultipleOf => "not_multiple_of",
            Self::DependencyInvalid => "dependency_invalid",
            Self::UnrecognizedToken => "unrecognized_token",
            Self::DigitOutOfRange {
                ..
            } => "digit_out_of_range",
            Self::TooManyDigits => "too_many_digits",
            Self::CompilersUnavailable => "compilers_unavailable",
            Self::PartnerUnset => "partner_unset",
        }
    }
}

/// A diagnosed constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Violation classification.
    pub kind: ViolationKind,
    /// Human-readable explanation naming the values involved.
    pub message: String,
}

impl Violation {
    /// Creates a violation.
    #[must_use]
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates the synthesized violation for a dependent of a failed parameter.
    #[must_use]
    pub fn dependency_invalid(name: &ParamName, prerequisite: &ParamName) -> Self {
        Self::new(
            ViolationKind::DependencyInvalid,
            format!("{name} cannot be validated because {prerequisite} value is invalid"),
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Result of evaluating one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The current value satisfies the rule.
    Accept,
    /// The current value violates the rule and is left unchanged.
    Violation {
        /// Diagnosed violation.
        violation: Violation,
    },
    /// The current value violated the rule and is replaced.
    Repaired {
        /// Replacement for the governed parameter.
        value: ParamValue,
        /// Violation that triggered the repair.
        reason: Violation,
    },
    /// A consistency rule brought a governed pair into agreement.
    Normalized {
        /// Parameter whose value changes.
        target: ParamName,
        /// Replacement value.
        value: ParamValue,
        /// Informational note, present when the caller set either side.
        note: Option<String>,
    },
}

impl Outcome {
    /// Wraps a violation.
    #[must_use]
    pub const fn violation(violation: Violation) -> Self {
        Self::Violation {
            violation,
        }
    }

    /// Returns whether the outcome leaves the parameter failed.
    #[must_use]
    pub const fn is_violation(&self) -> bool {
        matches!(self, Self::Violation { .. })
    }

    /// Returns the violation carried by the outcome, if any.
    #[must_use]
    pub const fn violation_ref(&self) -> Option<&Violation> {
        match self {
            Self::Violation {
                violation,
            } => Some(violation),
            Self::Repaired {
                reason, ..
            } => Some(reason),
            Self::Accept | Self::Normalized { .. } => None,
        }
    }

    /// Returns a stable status label.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Violation { .. } => "violation",
            Self::Repaired { .. } => "repaired",
            Self::Normalized { .. } => "normalized",
        }
    }
}
