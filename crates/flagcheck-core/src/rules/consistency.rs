// crates/flagcheck-core/src/rules/consistency.rs
// ============================================================================
// Module: Consistency Rules
// Description: Mode-independent normalizations of coupled parameters.
// Purpose: Bring paired settings into agreement without failing the pass.
// Dependencies: crate::rules
// ============================================================================

//! ## Overview
//! Consistency rules return [`Outcome::Normalized`] instead of violations and
//! behave the same in strict and auto-repair mode.
//!
//! - [`StripMiningRule`] couples the counted-loop safepoint flag with the
//!   strip-mining iteration count. The side left at its default follows the
//!   side the caller set; when both were set, the count follows the flag.
//! - [`RtmRateRule`] resets a non power-of-two RTM increment rate to `64`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::error::ResolveError;
use crate::identifiers::ParamName;
use crate::identifiers::names;
use crate::outcome::Mode;
use crate::outcome::Outcome;
use crate::rules::ConstraintRule;
use crate::rules::RuleCategory;
use crate::rules::RuleContext;
use crate::rules::power_of_two::is_power_of_two;
use crate::value::ParamValue;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Replacement for an invalid RTM increment rate.
pub const RTM_DEFAULT_INCR_RATE: i128 = 64;

// ============================================================================
// SECTION: Strip Mining
// ============================================================================

/// Keeps `UseCountedLoopSafepoints` and `LoopStripMiningIter` in agreement.
///
/// Governs the iteration count; the safepoint flag is its partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripMiningRule {
    /// Partner boolean flag.
    flag: ParamName,
}

impl StripMiningRule {
    /// Creates the rule for the standard parameter names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flag: ParamName::from(names::USE_COUNTED_LOOP_SAFEPOINTS),
        }
    }
}

impl Default for StripMiningRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintRule for StripMiningRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::Consistency
    }

    fn reads(&self) -> Vec<ParamName> {
        vec![self.flag.clone()]
    }

    fn partners(&self) -> Vec<ParamName> {
        vec![self.flag.clone()]
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, _mode: Mode) -> Result<Outcome, ResolveError> {
        let iter_name = ctx.governed();
        let flag_default = ctx.is_default(&self.flag)?;
        let iter_default = ctx.is_default(iter_name)?;
        if flag_default && iter_default {
            return Ok(Outcome::Accept);
        }
        let safepoints = ctx.read_bool(&self.flag)?;
        let iterations = ctx.integer()?;
        if safepoints == (iterations > 0) {
            return Ok(Outcome::Accept);
        }

        if iter_default || !flag_default {
            let kind = ctx.value()?.kind();
            let adjusted = i128::from(safepoints);
            let value = ParamValue::from_integer(kind, adjusted).ok_or_else(|| {
                ResolveError::UnrepresentableRepair {
                    name: iter_name.clone(),
                    value: adjusted,
                    kind,
                }
            })?;
            return Ok(Outcome::Normalized {
                target: iter_name.clone(),
                value,
                note: Some(format!(
                    "{iter_name} set to {adjusted} to match {} ({safepoints})",
                    self.flag
                )),
            });
        }

        let enabled = iterations > 0;
        Ok(Outcome::Normalized {
            target: self.flag.clone(),
            value: ParamValue::Bool(enabled),
            note: Some(format!("{} set to {enabled} to match {iter_name} ({iterations})", self.flag)),
        })
    }
}

// ============================================================================
// SECTION: RTM Increment Rate
// ============================================================================

/// Resets `RTMTotalCountIncrRate` to 64 when RTM locking uses a bad rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtmRateRule {
    /// Flag enabling RTM locking.
    locking: ParamName,
}

impl RtmRateRule {
    /// Creates the rule for the standard parameter names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            locking: ParamName::from(names::USE_RTM_LOCKING),
        }
    }
}

impl Default for RtmRateRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintRule for RtmRateRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::Consistency
    }

    fn reads(&self) -> Vec<ParamName> {
        vec![self.locking.clone()]
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, _mode: Mode) -> Result<Outcome, ResolveError> {
        if !ctx.read_bool(&self.locking)? {
            return Ok(Outcome::Accept);
        }
        let rate = ctx.integer()?;
        if is_power_of_two(rate) {
            return Ok(Outcome::Accept);
        }
        let name = ctx.governed();
        let kind = ctx.value()?.kind();
        let value = ParamValue::from_integer(kind, RTM_DEFAULT_INCR_RATE).ok_or_else(|| {
            ResolveError::UnrepresentableRepair {
                name: name.clone(),
                value: RTM_DEFAULT_INCR_RATE,
                kind,
            }
        })?;
        Ok(Outcome::Normalized {
            target: name.clone(),
            value,
            note: Some(format!(
                "{name} ({rate}) must be a power of 2, resetting it to {RTM_DEFAULT_INCR_RATE}"
            )),
        })
    }
}

