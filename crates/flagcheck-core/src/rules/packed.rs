// crates/flagcheck-core/src/rules/packed.rs
// ============================================================================
// Module: Digit-Packed Rule
// Description: Validates integers that pack per-digit settings.
// Purpose: Check profiling and verification level selectors digit by digit.
// Dependencies: crate::{codec, rules}
// ============================================================================

//! ## Overview
//! Decoding and repair are delegated to [`crate::codec`]. Negative inputs
//! cannot be decoded and repair to `0`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::codec::DigitFault;
use crate::codec::DigitLayout;
use crate::error::ResolveError;
use crate::identifiers::ParamName;
use crate::outcome::Mode;
use crate::outcome::Outcome;
use crate::outcome::Violation;
use crate::outcome::ViolationKind;
use crate::rules::ConstraintRule;
use crate::rules::RepairPolicy;
use crate::rules::RuleCategory;
use crate::rules::RuleContext;
use crate::rules::reject_or_repair;

// ============================================================================
// SECTION: Rule
// ============================================================================

/// Every digit must respect its position's maximum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedDigitsRule {
    /// Width and per-position maxima.
    layout: DigitLayout,
    /// Repair policy.
    policy: RepairPolicy,
}

impl PackedDigitsRule {
    /// Creates a rule for `layout`.
    #[must_use]
    pub const fn new(layout: DigitLayout) -> Self {
        Self {
            layout,
            policy: RepairPolicy::Repairable,
        }
    }

    /// Overrides the repair policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RepairPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Layout checked by this rule.
    #[must_use]
    pub const fn layout(&self) -> &DigitLayout {
        &self.layout
    }
}

impl ConstraintRule for PackedDigitsRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::DigitPacked
    }

    fn reads(&self) -> Vec<ParamName> {
        Vec::new()
    }

    fn repair_policy(&self) -> RepairPolicy {
        self.policy
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, mode: Mode) -> Result<Outcome, ResolveError> {
        let value = ctx.integer()?;
        let name = ctx.governed();
        let Ok(raw) = u64::try_from(value) else {
            let violation = Violation::new(
                ViolationKind::OutOfRange,
                format!("{name} ({value}) must be non-negative"),
            );
            return reject_or_repair(ctx, mode, self.policy, violation, || 0);
        };
        let decoded = self.layout.decode(raw);
        let violation = match decoded.first_fault(&self.layout) {
            None => return Ok(Outcome::Accept),
            Some(DigitFault::OutOfRange {
                position,
                digit,
                max,
            }) => Violation::new(
                ViolationKind::DigitOutOfRange {
                    position,
                },
                format!(
                    "Invalid value ({value}) in {name} at position {position}: digit {digit} \
                     exceeds {max}"
                ),
            ),
            Some(DigitFault::TooManyDigits {
                width,
            }) => Violation::new(
                ViolationKind::TooManyDigits,
                format!("Invalid value ({value}) for {name}: maximal {width} digits"),
            ),
        };
        reject_or_repair(ctx, mode, self.policy, violation, || {
            i128::from(decoded.repaired(&self.layout))
        })
    }
}
