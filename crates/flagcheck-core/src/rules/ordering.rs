// crates/flagcheck-core/src/rules/ordering.rs
// ============================================================================
// Module: Cross-Parameter Ordering Rule
// Description: Orders one integer parameter relative to another.
// Purpose: Keep paired limits such as minimum and maximum percentages consistent.
// Dependencies: crate::rules
// ============================================================================

//! ## Overview
//! The referenced parameter is a declared read, so the registry resolves it
//! first. Repair snaps the governed value to the referenced value.

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

/// Required relation between the governed and referenced values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Governed value must not exceed the referenced one.
    AtMost,
    /// Governed value must not fall below the referenced one.
    AtLeast,
}

impl Relation {
    /// Returns whether `value` relates correctly to `other`.
    const fn holds(self, value: i128, other: i128) -> bool {
        match self {
            Self::AtMost => value <= other,
            Self::AtLeast => value >= other,
        }
    }

    /// Phrase used in violation messages.
    const fn phrase(self) -> &'static str {
        match self {
            Self::AtMost => "less than or equal to",
            Self::AtLeast => "greater than or equal to",
        }
    }
}

/// Governed value must stand in `relation` to another parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingRule {
    /// Referenced parameter.
    other: ParamName,
    /// Required relation.
    relation: Relation,
    /// Repair policy.
    policy: RepairPolicy,
    /// Guard for the check.
    when: Condition,
}

impl OrderingRule {
    /// Governed value must be at most `other`.
    #[must_use]
    pub fn at_most(other: &str) -> Self {
        Self::new(other, Relation::AtMost)
    }

    /// Governed value must be at least `other`.
    #[must_use]
    pub fn at_least(other: &str) -> Self {
        Self::new(other, Relation::AtLeast)
    }

    /// Creates a rule for an arbitrary relation.
    #[must_use]
    pub fn new(other: &str, relation: Relation) -> Self {
        Self {
            other: ParamName::from(other),
            relation,
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
    pub fn with_policy(mut self, policy: RepairPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl ConstraintRule for OrderingRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::CrossOrdering
    }

    fn reads(&self) -> Vec<ParamName> {
        let mut reads = vec![self.other.clone()];
        reads.extend(self.when.reads());
        reads
    }

    fn repair_policy(&self) -> RepairPolicy {
        self.policy
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, mode: Mode) -> Result<Outcome, ResolveError> {
        if !self.when.holds(ctx)? {
            return Ok(Outcome::Accept);
        }
        let value = ctx.integer()?;
        let other = ctx.read_integer(&self.other)?;
        if self.relation.holds(value, other) {
            return Ok(Outcome::Accept);
        }
        let violation = Violation::new(
            ViolationKind::OutOfRange,
            format!(
                "{} ({value}) must be {} {} ({other})",
                ctx.governed(),
                self.relation.phrase(),
                self.other
            ),
        );
        reject_or_repair(ctx, mode, self.policy, violation, || other)
    }
}
