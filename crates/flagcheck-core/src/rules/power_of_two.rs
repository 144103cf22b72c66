// crates/flagcheck-core/src/rules/power_of_two.rs
// ============================================================================
// Module: Power-of-Two Rule
// Description: Requires a power of two, optionally zero, within optional bounds.
// Purpose: Validate alignments, bucket counts, and thresholds.
// Dependencies: crate::rules
// ============================================================================

//! ## Overview
//! The shape check runs before the bounds. Repair rounds down to a power of
//! two, then pulls the result under the maximum, then lifts it to the
//! minimum; the minimum wins when both cannot hold.
//!
//! ## Invariants
//! - When zero is allowed, `0` is accepted regardless of the bounds.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::error::ResolveError;
use crate::identifiers::ParamName;
use crate::outcome::Mode;
use crate::outcome::Outcome;
use crate::outcome::Violation;
use crate::outcome::ViolationKind;
use crate::rules::Condition;
use crate::rules::ConstraintRule;
use crate::rules::RepairPolicy;
use crate::rules::RuleCategory;
use crate::rules::RuleContext;
use crate::rules::reject_or_repair;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns whether `value` is a positive power of two.
#[must_use]
pub const fn is_power_of_two(value: i128) -> bool {
    value > 0 && value & (value - 1) == 0
}

/// Largest power of two not exceeding `value`; `1` for non-positive input.
#[must_use]
pub const fn round_down_power_of_two(value: i128) -> i128 {
    if value <= 1 {
        return 1;
    }
    1 << (127 - value.leading_zeros())
}

/// Smallest power of two not below `value`; `1` for non-positive input.
#[must_use]
pub const fn round_up_power_of_two(value: i128) -> i128 {
    let down = round_down_power_of_two(value);
    if down >= value { down } else { down << 1 }
}

// ============================================================================
// SECTION: Rule
// ============================================================================

/// Value must be a power of two within optional bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerOfTwoRule {
    /// Whether `0` is accepted.
    allow_zero: bool,
    /// Inclusive minimum.
    min: Option<i128>,
    /// Inclusive maximum.
    max: Option<i128>,
    /// Repair policy.
    policy: RepairPolicy,
    /// Guard for the check.
    when: Condition,
}

impl PowerOfTwoRule {
    /// Creates an unbounded rule that rejects zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            allow_zero: false,
            min: None,
            max: None,
            policy: RepairPolicy::Repairable,
            when: Condition::Always,
        }
    }

    /// Accepts zero in addition to powers of two.
    #[must_use]
    pub const fn allowing_zero(mut self) -> Self {
        self.allow_zero = true;
        self
    }

    /// Sets an inclusive minimum.
    #[must_use]
    pub const fn with_min(mut self, min: i128) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets an inclusive maximum.
    #[must_use]
    pub const fn with_max(mut self, max: i128) -> Self {
        self.max = Some(max);
        self
    }

    /// Overrides the repair policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: RepairPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Applies the check only when `condition` holds.
    #[must_use]
    pub fn when(mut self, condition: Condition) -> Self {
        self.when = condition;
        self
    }

    /// Single-step repair for `value`.
    #[must_use]
    pub fn repair(&self, value: i128) -> i128 {
        let mut repaired = if value <= 0 {
            if self.allow_zero { 0 } else { 1 }
        } else {
            round_down_power_of_two(value)
        };
        if let Some(max) = self.max
            && repaired > max
        {
            repaired = round_down_power_of_two(max);
        }
        if let Some(min) = self.min
            && repaired < min
        {
            repaired = round_up_power_of_two(min);
        }
        repaired
    }

    /// Describes the first failed check, if any.
    fn check(&self, name: &ParamName, value: i128) -> Option<Violation> {
        if !is_power_of_two(value) {
            let shape = if self.allow_zero { "0 or a power of 2" } else { "a power of 2" };
            return Some(Violation::new(
                ViolationKind::NotPowerOfTwo,
                format!("{name} ({value}) must be {shape}"),
            ));
        }
        if let Some(min) = self.min
            && value < min
        {
            return Some(Violation::new(
                ViolationKind::OutOfRange,
                format!("{name} ({value}) must be greater than or equal to {min}"),
            ));
        }
        if let Some(max) = self.max
            && value > max
        {
            return Some(Violation::new(
                ViolationKind::OutOfRange,
                format!("{name} ({value}) must be less than or equal to {max}"),
            ));
        }
        None
    }
}

impl Default for PowerOfTwoRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintRule for PowerOfTwoRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::PowerOfTwo
    }

    fn reads(&self) -> Vec<ParamName> {
        self.when.reads()
    }

    fn repair_policy(&self) -> RepairPolicy {
        self.policy
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, mode: Mode) -> Result<Outcome, ResolveError> {
        if !self.when.holds(ctx)? {
            return Ok(Outcome::Accept);
        }
        let value = ctx.integer()?;
        if value == 0 && self.allow_zero {
            return Ok(Outcome::Accept);
        }
        match self.check(ctx.governed(), value) {
            None => Ok(Outcome::Accept),
            Some(violation) => {
                reject_or_repair(ctx, mode, self.policy, violation, || self.repair(value))
            }
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
