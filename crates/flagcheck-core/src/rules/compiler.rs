// crates/flagcheck-core/src/rules/compiler.rs
// ============================================================================
// Module: Compiler Rules
// Description: Rules whose bounds derive from the environment or several inputs.
// Purpose: Validate thread counts, OSR limits, code layout, and IR node budgets.
// Dependencies: crate::{platform, rules}
// ============================================================================

//! ## Overview
//! These rules combine several checks or compute their bounds from other
//! parameters and the [`crate::Environment`]. All arithmetic is widened to
//! `i128`, so derived bounds cannot overflow.
//!
//! ## Invariants
//! - Composite repairs satisfy every check of their rule in one step.
//! - Code layout rules read `CodeEntryAlignment`, which is a root rule and
//!   is always resolved before them.

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
use crate::platform::CONSTANT_ALIGNMENT;
use crate::platform::INVOCATION_COUNT_SHIFT;
use crate::rules::ConstraintRule;
use crate::rules::RepairPolicy;
use crate::rules::RuleCategory;
use crate::rules::RuleContext;
use crate::rules::power_of_two::is_power_of_two;
use crate::rules::power_of_two::round_down_power_of_two;
use crate::rules::reject_or_repair;

// ============================================================================
// SECTION: Compiler Threads
// ============================================================================

/// Compiler thread count must match the compilers and execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompilerCountRule;

impl ConstraintRule for CompilerCountRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::BoundedRange
    }

    fn reads(&self) -> Vec<ParamName> {
        Vec::new()
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, mode: Mode) -> Result<Outcome, ResolveError> {
        let value = ctx.integer()?;
        let name = ctx.governed();
        match ctx.environment().min_compiler_threads() {
            None if value > 0 => {
                let violation = Violation::new(
                    ViolationKind::CompilersUnavailable,
                    format!("{name} ({value}) cannot be set because no JIT compiler is available"),
                );
                reject_or_repair(ctx, mode, RepairPolicy::Repairable, violation, || -1)
            }
            Some(min) if value < min => {
                let violation = Violation::new(
                    ViolationKind::OutOfRange,
                    format!("{name} ({value}) must be at least {min}"),
                );
                reject_or_repair(ctx, mode, RepairPolicy::Repairable, violation, || min)
            }
            _ => Ok(Outcome::Accept),
        }
    }
}

// ============================================================================
// SECTION: On-Stack Replacement
// ============================================================================

/// OSR percentage bounded by a limit derived from the compile threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsrPercentageRule {
    /// Compile threshold.
    threshold: ParamName,
    /// Interpreter profiling switch.
    profiling: ParamName,
    /// Interpreter profile percentage.
    profile_percentage: ParamName,
}

impl OsrPercentageRule {
    /// Creates the rule for the standard parameter names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            threshold: ParamName::from(names::COMPILE_THRESHOLD),
            profiling: ParamName::from(names::PROFILE_INTERPRETER),
            profile_percentage: ParamName::from(names::INTERPRETER_PROFILE_PERCENTAGE),
        }
    }
}

impl Default for OsrPercentageRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Upper bound of the OSR percentage.
///
/// `i32::MAX`, shifted right by the invocation-count shift when profiling is
/// off, times 100, divided by a nonzero threshold, plus the profile
/// percentage when profiling is on.
#[must_use]
pub fn osr_percentage_limit(threshold: i128, profiling: bool, profile_percentage: i128) -> i128 {
    let mut limit = i128::from(i32::MAX);
    if !profiling {
        limit >>= INVOCATION_COUNT_SHIFT;
    }
    limit *= 100;
    limit = limit.checked_div(threshold).unwrap_or(limit);
    if profiling {
        limit += profile_percentage;
    }
    limit
}

impl ConstraintRule for OsrPercentageRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::BoundedRange
    }

    fn reads(&self) -> Vec<ParamName> {
        vec![self.threshold.clone(), self.profiling.clone(), self.profile_percentage.clone()]
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, mode: Mode) -> Result<Outcome, ResolveError> {
        let value = ctx.integer()?;
        let threshold = ctx.read_integer(&self.threshold)?;
        let profiling = ctx.read_bool(&self.profiling)?;
        let percentage = ctx.read_integer(&self.profile_percentage)?;
        let name = ctx.governed();

        let limit = osr_percentage_limit(threshold, profiling, percentage);
        let lo = if profiling { percentage } else { 0 };
        if value < lo {
            let message = if profiling {
                format!(
                    "{name} ({value}) must be larger than {} ({percentage})",
                    self.profile_percentage
                )
            } else {
                format!("{name} ({value}) must be between 0 and {limit}")
            };
            let violation = Violation::new(ViolationKind::OutOfRange, message);
            return reject_or_repair(ctx, mode, RepairPolicy::Repairable, violation, || lo);
        }
        if value > limit {
            let violation = Violation::new(
                ViolationKind::OutOfRange,
                format!(
                    "{name} ({value}) must be between {lo} and {limit}, try changing {} \
                     ({threshold})",
                    self.threshold
                ),
            );
            return reject_or_repair(ctx, mode, RepairPolicy::Repairable, violation, || limit);
        }
        Ok(Outcome::Accept)
    }
}

// ============================================================================
// SECTION: Code Cache Layout
// ============================================================================

/// Code cache segment size must hold entry alignment, doubles, and loop alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentSizeRule {
    /// Code entry alignment.
    entry_alignment: ParamName,
    /// Loop alignment, present only with the server compiler.
    loop_alignment: Option<ParamName>,
}

impl SegmentSizeRule {
    /// Creates the rule, checking loop alignment when `with_loop_alignment`.
    #[must_use]
    pub fn new(with_loop_alignment: bool) -> Self {
        Self {
            entry_alignment: ParamName::from(names::CODE_ENTRY_ALIGNMENT),
            loop_alignment: with_loop_alignment
                .then(|| ParamName::from(names::OPTO_LOOP_ALIGNMENT)),
        }
    }
}

impl ConstraintRule for SegmentSizeRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::Composite
    }

    fn reads(&self) -> Vec<ParamName> {
        let mut reads = vec![self.entry_alignment.clone()];
        reads.extend(self.loop_alignment.iter().cloned());
        reads
    }

    fn repair_policy(&self) -> RepairPolicy {
        RepairPolicy::ViolationOnly
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, _mode: Mode) -> Result<Outcome, ResolveError> {
        let value = ctx.integer()?;
        let name = ctx.governed();
        let entry = ctx.read_integer(&self.entry_alignment)?;
        if value < entry {
            return Ok(Outcome::violation(Violation::new(
                ViolationKind::OutOfRange,
                format!(
                    "{name} ({value}) must be larger than or equal to {} ({entry}) to align \
                     entry points",
                    self.entry_alignment
                ),
            )));
        }
        if value < CONSTANT_ALIGNMENT {
            return Ok(Outcome::violation(Violation::new(
                ViolationKind::OutOfRange,
                format!(
                    "{name} ({value}) must be at least {CONSTANT_ALIGNMENT} to align constants"
                ),
            )));
        }
        if let Some(loop_alignment) = &self.loop_alignment {
            let alignment = ctx.read_integer(loop_alignment)?;
            if value < alignment {
                return Ok(Outcome::violation(Violation::new(
                    ViolationKind::OutOfRange,
                    format!(
                        "{name} ({value}) must be larger than or equal to {loop_alignment} \
                         ({alignment}) to align inner loops"
                    ),
                )));
            }
        }
        Ok(Outcome::Accept)
    }
}

/// Loop alignment checked in order: power of two, NOP-size multiple, entry alignment cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopAlignmentRule {
    /// Code entry alignment.
    entry_alignment: ParamName,
}

impl LoopAlignmentRule {
    /// Creates the rule for the standard parameter names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entry_alignment: ParamName::from(names::CODE_ENTRY_ALIGNMENT),
        }
    }
}

impl Default for LoopAlignmentRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintRule for LoopAlignmentRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::Composite
    }

    fn reads(&self) -> Vec<ParamName> {
        vec![self.entry_alignment.clone()]
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, mode: Mode) -> Result<Outcome, ResolveError> {
        let value = ctx.integer()?;
        let name = ctx.governed();
        let entry = ctx.read_integer(&self.entry_alignment)?;
        let unit = ctx.environment().platform.instruction_unit();

        let violation = if !is_power_of_two(value) {
            Violation::new(
                ViolationKind::NotPowerOfTwo,
                format!("{name} ({value}) must be a power of two"),
            )
        } else if value % unit != 0 {
            Violation::new(
                ViolationKind::NotMultipleOf,
                format!("{name} ({value}) must be a multiple of NOP size ({unit})"),
            )
        } else if value > entry {
            Violation::new(
                ViolationKind::OutOfRange,
                format!(
                    "{name} ({value}) must be less than or equal to {} ({entry})",
                    self.entry_alignment
                ),
            )
        } else {
            return Ok(Outcome::Accept);
        };
        reject_or_repair(ctx, mode, RepairPolicy::Repairable, violation, || {
            let rounded = if value <= 0 { unit } else { round_down_power_of_two(value) };
            rounded.min(entry).max(unit)
        })
    }
}

/// Interior entry alignment: at most entry alignment, power of two, platform minimum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteriorAlignmentRule {
    /// Code entry alignment.
    entry_alignment: ParamName,
}

impl InteriorAlignmentRule {
    /// Creates the rule for the standard parameter names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entry_alignment: ParamName::from(names::CODE_ENTRY_ALIGNMENT),
        }
    }
}

impl Default for InteriorAlignmentRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintRule for InteriorAlignmentRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::Composite
    }

    fn reads(&self) -> Vec<ParamName> {
        vec![self.entry_alignment.clone()]
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, mode: Mode) -> Result<Outcome, ResolveError> {
        let value = ctx.integer()?;
        let name = ctx.governed();
        let entry = ctx.read_integer(&self.entry_alignment)?;
        let minimum = ctx.environment().platform.min_interior_entry_alignment();

        let violation = if value > entry {
            Violation::new(
                ViolationKind::OutOfRange,
                format!(
                    "{name} ({value}) must be less than or equal to {} ({entry})",
                    self.entry_alignment
                ),
            )
        } else if !is_power_of_two(value) {
            Violation::new(
                ViolationKind::NotPowerOfTwo,
                format!("{name} ({value}) must be a power of two"),
            )
        } else if value < minimum {
            Violation::new(
                ViolationKind::OutOfRange,
                format!("{name} ({value}) must be greater than or equal to {minimum}"),
            )
        } else {
            return Ok(Outcome::Accept);
        };
        reject_or_repair(ctx, mode, RepairPolicy::Repairable, violation, || {
            let capped = value.min(entry);
            let rounded = if capped <= 0 { minimum } else { round_down_power_of_two(capped) };
            rounded.max(minimum)
        })
    }
}

// ============================================================================
// SECTION: Node Limits
// ============================================================================

/// Node limit fudge factor between 2% and 40% of the maximum node limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLimitShareRule {
    /// Maximum node limit.
    max_nodes: ParamName,
}

impl NodeLimitShareRule {
    /// Creates the rule for the standard parameter names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_nodes: ParamName::from(names::MAX_NODE_LIMIT),
        }
    }
}

impl Default for NodeLimitShareRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Inclusive fudge factor bounds for `max_nodes`.
///
/// A negative node limit counts as zero, so the bounds never cross.
#[must_use]
pub const fn node_limit_bounds(max_nodes: i128) -> (i128, i128) {
    let max_nodes = if max_nodes < 0 { 0 } else { max_nodes };
    (max_nodes * 2 / 100, max_nodes * 40 / 100)
}

impl ConstraintRule for NodeLimitShareRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::BoundedRange
    }

    fn reads(&self) -> Vec<ParamName> {
        vec![self.max_nodes.clone()]
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, mode: Mode) -> Result<Outcome, ResolveError> {
        let value = ctx.integer()?;
        let max_nodes = ctx.read_integer(&self.max_nodes)?;
        let (lo, hi) = node_limit_bounds(max_nodes);
        if (lo ..= hi).contains(&value) {
            return Ok(Outcome::Accept);
        }
        let violation = Violation::new(
            ViolationKind::OutOfRange,
            format!(
                "{} ({value}) must be between 2% and 40% of {} ({max_nodes})",
                ctx.governed(),
                self.max_nodes
            ),
        );
        reject_or_repair(ctx, mode, RepairPolicy::Repairable, violation, || value.max(lo).min(hi))
    }
}
