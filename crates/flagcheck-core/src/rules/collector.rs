// crates/flagcheck-core/src/rules/collector.rs
// ============================================================================
// Module: Collector Rules
// Description: Pause-time goal pairing for the G1 collector.
// Purpose: Keep an explicit pause interval consistent with the pause goal.
// Dependencies: crate::rules
// ============================================================================

//! ## Overview
//! G1 derives `GCPauseIntervalMillis` as `MaxGCPauseMillis + 1` unless the
//! caller sets it, so the pair is only checked when the interval came from the
//! command line. The interval reads the pause goal, which resolves first.
//!
//! Checks run in this order:
//! 1. The interval is at least 1.
//! 2. The pause goal was set too.
//! 3. The interval exceeds the pause goal.
//!
//! Every repair sets the interval to `MaxGCPauseMillis + 1`, the value G1
//! would have chosen.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::error::ResolveError;
use crate::identifiers::ParamName;
use crate::identifiers::names;
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
// SECTION: Pause Interval
// ============================================================================

/// Explicit G1 pause interval must be positive and exceed the pause goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PauseIntervalRule {
    /// Pause time goal.
    max_pause: ParamName,
    /// Guard for the check.
    when: Condition,
}

impl PauseIntervalRule {
    /// Creates the rule for the standard parameter names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_pause: ParamName::from(names::MAX_GC_PAUSE_MILLIS),
            when: Condition::All(vec![
                Condition::flag(names::USE_G1_GC),
                Condition::SetOnCommandLine,
            ]),
        }
    }
}

impl Default for PauseIntervalRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintRule for PauseIntervalRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::Composite
    }

    fn reads(&self) -> Vec<ParamName> {
        let mut reads = vec![self.max_pause.clone()];
        reads.extend(self.when.reads());
        reads
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, mode: Mode) -> Result<Outcome, ResolveError> {
        if !self.when.holds(ctx)? {
            return Ok(Outcome::Accept);
        }
        let value = ctx.integer()?;
        let name = ctx.governed();
        let max_pause = ctx.read_integer(&self.max_pause)?;

        let violation = if value < 1 {
            Violation::new(
                ViolationKind::OutOfRange,
                format!("{name} ({value}) must be greater than or equal to 1"),
            )
        } else if ctx.is_default(&self.max_pause)? {
            Violation::new(
                ViolationKind::PartnerUnset,
                format!("{name} cannot be set without setting {}", self.max_pause),
            )
        } else if value <= max_pause {
            Violation::new(
                ViolationKind::OutOfRange,
                format!("{name} ({value}) must be greater than {} ({max_pause})", self.max_pause),
            )
        } else {
            return Ok(Outcome::Accept);
        };
        reject_or_repair(ctx, mode, RepairPolicy::Repairable, violation, || max_pause + 1)
    }
}
