// crates/flagcheck-core/src/error.rs
// ============================================================================
// Module: Engine Errors
// Description: Infrastructure failures of registry construction and resolution.
// Purpose: Keep programming and wiring errors apart from constraint violations.
// Dependencies: crate::{identifiers, store, value}, thiserror
// ============================================================================

//! ## Overview
//! Constraint violations are ordinary [`crate::Outcome`] values. The errors in
//! this module describe a broken setup instead: a dependency cycle, a rule
//! reading a parameter it never declared, a store missing a parameter, or a
//! repair that cannot be represented in the parameter's kind.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::identifiers::ParamName;
use crate::store::StoreError;
use crate::value::ParamKind;

// ============================================================================
// SECTION: Registry Errors
// ============================================================================

/// Failures detected while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two registrations govern the same parameter.
    #[error("parameter {0} is governed by more than one rule")]
    DuplicateParameter(ParamName),
    /// The dependency graph contains a cycle through the listed parameters.
    #[error("dependency cycle among parameters: {}", join_names(.0))]
    DependencyCycle(Vec<ParamName>),
}

// ============================================================================
// SECTION: Resolution Errors
// ============================================================================

/// Failures that abort a resolution pass outright.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The store does not hold a parameter a rule needs.
    #[error("parameter {0} is missing from the store")]
    MissingParameter(ParamName),
    /// A parameter holds a value of an unexpected kind.
    #[error("parameter {name} must hold a {expected} value, found {found}")]
    KindMismatch {
        /// Parameter being read.
        name: ParamName,
        /// Kind the rule requires.
        expected: ParamKind,
        /// Kind found in the store.
        found: ParamKind,
    },
    /// A rule read a parameter outside its declared dependencies.
    #[error("rule for {rule} read undeclared parameter {param}")]
    UndeclaredRead {
        /// Parameter governed by the offending rule.
        rule: ParamName,
        /// Parameter it tried to read.
        param: ParamName,
    },
    /// A rule produced a value for a parameter it does not govern.
    #[error("rule for {rule} wrote undeclared parameter {param}")]
    UndeclaredWrite {
        /// Parameter governed by the offending rule.
        rule: ParamName,
        /// Parameter it tried to write.
        param: ParamName,
    },
    /// A repaired value does not fit the parameter's kind.
    #[error("repair of {name} to {value} does not fit a {kind} value")]
    UnrepresentableRepair {
        /// Parameter being repaired.
        name: ParamName,
        /// Widened repair value.
        value: i128,
        /// Kind of the parameter.
        kind: ParamKind,
    },
    /// A rule produced a repair while the pass was strict.
    #[error("rule for {0} produced a repair in strict mode")]
    RepairInStrictMode(ParamName),
    /// Writing a repair back into the store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Joins parameter names for display.
fn join_names(names: &[ParamName]) -> String {
    names.iter().map(ParamName::as_str).collect::<Vec<_>>().join(", ")
}
