// crates/flagcheck-core/src/rules/range.rs
// ============================================================================
// Module: Bounded Range Rule
// Description: Inclusive lower and upper bounds on an integer parameter.
// Purpose: Clamp or reject values outside a fixed interval.
// Dependencies: crate::rules
// ============================================================================

//! ## Overview
//! Either bound may be absent. The lower bound is checked first, so a value
//! below an inverted interval reports the lower bound.

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

/// Value must lie in `[lo, hi]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRule {
    /// Inclusive lower bound.
    lo: Option<i128>,
    /// Inclusive upper bound.
    hi: Option<i128>,
    /// Repair policy.
    policy: RepairPolicy,
    /// Guard for the check.
    when: Condition,
}

impl RangeRule {
    /// Creates a rule with both bounds.
    #[must_use]
    pub fn between(lo: i128, hi: i128) -> Self {
        Self {
            lo: Some(lo),
            hi: Some(hi),
            policy: RepairPolicy::Repairable,
            when: Condition::Always,
        }
    }

    /// Creates a rule with only a lower bound.
    #[must_use]
    pub fn at_least(lo: i128) -> Self {
        Self {
            lo: Some(lo),
            hi: None,
            policy: RepairPolicy::Repairable,
            when: Condition::Always,
        }
    }

    /// Creates a rule with only an upper bound.
    #[must_use]
    pub fn at_most(hi: i128) -> Self {
        Self {
            lo: None,
            hi: Some(hi),
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

    /// Describes the violated interval.
    fn describe(&self, name: &ParamName, value: i128) -> String {
        match (self.lo, self.hi) {
            (Some(lo), Some(hi)) => format!("{name} ({value}) must be between {lo} and {hi}"),
            (Some(lo), None) => {
                format!("{name} ({value}) must be greater than or equal to {lo}")
            }
            (None, Some(hi)) => format!("{name} ({value}) must be less than or equal to {hi}"),
            (None, None) => format!("{name} ({value}) is out of range"),
        }
    }
}

impl ConstraintRule for RangeRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::BoundedRange
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
        let target = match (self.lo, self.hi) {
            (Some(lo), _) if value < lo => lo,
            (_, Some(hi)) if value > hi => hi,
            _ => return Ok(Outcome::Accept),
        };
        let violation =
            Violation::new(ViolationKind::OutOfRange, self.describe(ctx.governed(), value));
        reject_or_repair(ctx, mode, self.policy, violation, || target)
    }
}
