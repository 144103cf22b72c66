// crates/flagcheck-core/src/rules/multiple.rs
// ============================================================================
// Module: Multiple-of Rule
// Description: Requires an integer parameter to be a multiple of a factor.
// Purpose: Enforce alignment-style granularity on sizes and strides.
// Dependencies: crate::rules
// ============================================================================

//! ## Overview
//! Repair subtracts the remainder. A value that would repair to zero becomes
//! the factor itself, so the repaired value is never smaller than one step.

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
// SECTION: Rule
// ============================================================================

/// Value must be a multiple of `factor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleOfRule {
    /// Required factor; non-positive factors disable the check.
    factor: i128,
    /// Repair policy.
    policy: RepairPolicy,
    /// Guard for the check.
    when: Condition,
}

impl MultipleOfRule {
    /// Creates a rule for `factor`.
    #[must_use]
    pub const fn new(factor: i128) -> Self {
        Self {
            factor,
            policy: RepairPolicy::Repairable,
            when: Condition::Always,
        }
    }

    /// Applies the check only when `condition` holds.
    #[must_use]
    pub fn when(mut self, condition: Condition) -> Self {
        self.when = condition;
        self
    }

    /// Overrides the repair policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: RepairPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Rounds `value` toward zero onto a multiple of `factor`, never returning zero.
#[must_use]
pub fn round_to_multiple(value: i128, factor: i128) -> i128 {
    if factor <= 0 {
        return value;
    }
    let rounded = value - value % factor;
    if rounded == 0 { factor } else { rounded }
}

impl ConstraintRule for MultipleOfRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::MultipleOf
    }

    fn reads(&self) -> Vec<ParamName> {
        self.when.reads()
    }

    fn repair_policy(&self) -> RepairPolicy {
        self.policy
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, mode: Mode) -> Result<Outcome, ResolveError> {
        if self.factor <= 0 || !self.when.holds(ctx)? {
            return Ok(Outcome::Accept);
        }
        let value = ctx.integer()?;
        if value % self.factor == 0 {
            return Ok(Outcome::Accept);
        }
        let violation = Violation::new(
            ViolationKind::NotMultipleOf,
            format!("{} ({value}) must be a multiple of {}", ctx.governed(), self.factor),
        );
        reject_or_repair(ctx, mode, self.policy, violation, || {
            round_to_multiple(value, self.factor)
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
