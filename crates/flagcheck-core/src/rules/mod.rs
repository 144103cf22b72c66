// crates/flagcheck-core/src/rules/mod.rs
// ============================================================================
// Module: Constraint Rules
// Description: Rule contract, evaluation context, guards, and shared helpers.
// Purpose: Define how a rule reads the store and reports an outcome.
// Dependencies: crate::{error, identifiers, outcome, platform, store, value}
// ============================================================================

//! ## Overview
//! A [`ConstraintRule`] governs one parameter (consistency rules govern a
//! pair). It declares the parameters it reads; the registry turns those
//! declarations into dependency edges and the [`RuleContext`] refuses any
//! read outside them. Rules are pure: they return an [`Outcome`] and the
//! resolver applies it.
//!
//! Generic categories live in submodules ([`range`], [`multiple`],
//! [`power_of_two`], [`ordering`], [`packed`], [`list`], [`consistency`]);
//! rules with compiler-specific composite logic live in [`compiler`], and
//! the G1 pause-time pair lives in [`collector`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod collector;
pub mod compiler;
pub mod consistency;
pub mod list;
pub mod multiple;
pub mod ordering;
pub mod packed;
pub mod power_of_two;
pub mod range;

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::error::ResolveError;
use crate::identifiers::ParamName;
use crate::outcome::Mode;
use crate::outcome::Outcome;
use crate::outcome::Violation;
use crate::platform::Environment;
use crate::store::ParameterStore;
use crate::value::ParamKind;
use crate::value::ParamValue;
use crate::value::ValueOrigin;

// ============================================================================
// SECTION: Rule Contract
// ============================================================================

/// Category of a constraint rule, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Value within bounds.
    BoundedRange,
    /// Value is a multiple of a factor.
    MultipleOf,
    /// Value is a power of two.
    PowerOfTwo,
    /// Value ordered relative to another parameter.
    CrossOrdering,
    /// Digit-packed value.
    DigitPacked,
    /// Token list checked against the intrinsic catalog.
    TokenList,
    /// Mode-independent normalization.
    Consistency,
    /// Several checks of different categories in a fixed order.
    Composite,
}

/// Whether a rule may repair values under [`Mode::AutoRepair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RepairPolicy {
    /// Violations are repaired in auto-repair mode.
    #[default]
    Repairable,
    /// Violations are reported in every mode.
    ViolationOnly,
}

/// Constraint evaluated for one governed parameter.
pub trait ConstraintRule: Send + Sync {
    /// Returns the category of this rule.
    fn category(&self) -> RuleCategory;

    /// Returns the parameters this rule reads besides the ones it governs.
    fn reads(&self) -> Vec<ParamName>;

    /// Returns additional parameters this rule may write, beyond the governed one.
    fn partners(&self) -> Vec<ParamName> {
        Vec::new()
    }

    /// Returns whether this rule can repair violations.
    fn repair_policy(&self) -> RepairPolicy {
        RepairPolicy::Repairable
    }

    /// Evaluates the governed parameter's current value.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the store is missing a parameter, holds a
    /// value of the wrong kind, or the rule reads an undeclared parameter.
    fn evaluate(&self, ctx: &RuleContext<'_>, mode: Mode) -> Result<Outcome, ResolveError>;
}

// ============================================================================
// SECTION: Rule Context
// ============================================================================

/// Read-only view of the store for one rule evaluation.
pub struct RuleContext<'a> {
    /// Parameter governed by the rule.
    governed: &'a ParamName,
    /// Parameters the rule may read, governed ones included.
    readable: &'a [ParamName],
    /// Backing store.
    store: &'a dyn ParameterStore,
    /// Platform and compiler inputs.
    environment: &'a Environment,
}

impl<'a> RuleContext<'a> {
    /// Creates a context for the rule governing `governed`.
    #[must_use]
    pub fn new(
        governed: &'a ParamName,
        readable: &'a [ParamName],
        store: &'a dyn ParameterStore,
        environment: &'a Environment,
    ) -> Self {
        Self {
            governed,
            readable,
            store,
            environment,
        }
    }

    /// Name of the governed parameter.
    #[must_use]
    pub const fn governed(&self) -> &ParamName {
        self.governed
    }

    /// Platform and compiler inputs.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        self.environment
    }

    /// Current value of the governed parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MissingParameter`] when the store lacks it.
    pub fn value(&self) -> Result<ParamValue, ResolveError> {
        self.read(self.governed)
    }

    /// Current value of the governed parameter as a widened integer.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the value is missing or not an integer.
    pub fn integer(&self) -> Result<i128, ResolveError> {
        self.read_integer(self.governed)
    }

    /// Reads a declared parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UndeclaredRead`] for parameters the rule did not
    /// declare and [`ResolveError::MissingParameter`] when the store lacks it.
    pub fn read(&self, name: &ParamName) -> Result<ParamValue, ResolveError> {
        self.check_declared(name)?;
        self.store.get(name).ok_or_else(|| ResolveError::MissingParameter(name.clone()))
    }

    /// Reads a declared parameter by its string name.
    ///
    /// # Errors
    ///
    /// See [`RuleContext::read`].
    pub fn read_named(&self, name: &str) -> Result<ParamValue, ResolveError> {
        self.read(&ParamName::from(name))
    }

    /// Reads a declared integer parameter as a widened integer.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::KindMismatch`] for non-integer values.
    pub fn read_integer(&self, name: &ParamName) -> Result<i128, ResolveError> {
        let value = self.read(name)?;
        value.as_integer().ok_or_else(|| ResolveError::KindMismatch {
            name: name.clone(),
            expected: ParamKind::Int,
            found: value.kind(),
        })
    }

    /// Reads a declared boolean parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::KindMismatch`] for non-boolean values.
    pub fn read_bool(&self, name: &ParamName) -> Result<bool, ResolveError> {
        let value = self.read(name)?;
        value.as_bool().ok_or_else(|| ResolveError::KindMismatch {
            name: name.clone(),
            expected: ParamKind::Bool,
            found: value.kind(),
        })
    }

    /// Returns where a declared parameter's value came from.
    ///
    /// # Errors
    ///
    /// See [`RuleContext::read`].
    pub fn origin(&self, name: &ParamName) -> Result<ValueOrigin, ResolveError> {
        self.check_declared(name)?;
        self.store.origin(name).ok_or_else(|| ResolveError::MissingParameter(name.clone()))
    }

    /// Returns whether a declared parameter still holds its default.
    ///
    /// # Errors
    ///
    /// See [`RuleContext::read`].
    pub fn is_default(&self, name: &ParamName) -> Result<bool, ResolveError> {
        Ok(self.origin(name)? == ValueOrigin::Default)
    }

    /// Converts a widened repair into an outcome for the governed parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnrepresentableRepair`] when the value does not
    /// fit the governed parameter's kind.
    pub fn repaired(&self, value: i128, reason: Violation) -> Result<Outcome, ResolveError> {
        let kind = self.value()?.kind();
        let value = ParamValue::from_integer(kind, value).ok_or_else(|| {
            ResolveError::UnrepresentableRepair {
                name: self.governed.clone(),
                value,
                kind,
            }
        })?;
        Ok(Outcome::Repaired {
            value,
            reason,
        })
    }

    /// Rejects reads outside the declared set.
    fn check_declared(&self, name: &ParamName) -> Result<(), ResolveError> {
        if name == self.governed || self.readable.contains(name) {
            Ok(())
        } else {
            Err(ResolveError::UndeclaredRead {
                rule: self.governed.clone(),
                param: name.clone(),
            })
        }
    }
}

// ============================================================================
// SECTION: Guards
// ============================================================================

/// Precondition that must hold for a rule to check anything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Condition {
    /// Always applies.
    #[default]
    Always,
    /// Applies when a boolean parameter is `true`.
    FlagSet(ParamName),
    /// Applies when an integer parameter equals a value.
    IntEquals(ParamName, i128),
    /// Applies when the governed parameter was set on the command line.
    SetOnCommandLine,
    /// Applies when every inner condition applies.
    All(Vec<Self>),
}

impl Condition {
    /// Builds a condition requiring a boolean parameter to be set.
    #[must_use]
    pub fn flag(name: &str) -> Self {
        Self::FlagSet(ParamName::from(name))
    }

    /// Builds a condition requiring an integer parameter to equal `value`.
    #[must_use]
    pub fn equals(name: &str, value: i128) -> Self {
        Self::IntEquals(ParamName::from(name), value)
    }

    /// Parameters the condition reads.
    #[must_use]
    pub fn reads(&self) -> Vec<ParamName> {
        match self {
            Self::Always | Self::SetOnCommandLine => Vec::new(),
            Self::FlagSet(name) | Self::IntEquals(name, _) => vec![name.clone()],
            Self::All(inner) => inner.iter().flat_map(Self::reads).collect(),
        }
    }

    /// Evaluates the condition.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when a read parameter is missing or mistyped.
    pub fn holds(&self, ctx: &RuleContext<'_>) -> Result<bool, ResolveError> {
        match self {
            Self::Always => Ok(true),
            Self::FlagSet(name) => ctx.read_bool(name),
            Self::IntEquals(name, expected) => Ok(ctx.read_integer(name)? == *expected),
            Self::SetOnCommandLine => {
                Ok(ctx.origin(ctx.governed())? == ValueOrigin::CommandLine)
            }
            Self::All(inner) => {
                for condition in inner {
                    if !condition.holds(ctx)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }
}

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Returns the violation, or the repair when the mode and policy allow it.
///
/// # Errors
///
/// Returns [`ResolveError`] when the repair does not fit the parameter kind.
pub fn reject_or_repair(
    ctx: &RuleContext<'_>,
    mode: Mode,
    policy: RepairPolicy,
    violation: Violation,
    repair: impl FnOnce() -> i128,
) -> Result<Outcome, ResolveError> {
    if mode == Mode::AutoRepair && policy == RepairPolicy::Repairable {
        ctx.repaired(repair(), violation)
    } else {
        Ok(Outcome::violation(violation))
    }
}
