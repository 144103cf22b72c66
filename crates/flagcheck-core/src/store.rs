// crates/flagcheck-core/src/store.rs
// ============================================================================
// Module: Parameter Store
// Description: Storage contract for named parameter values and their origins.
// Purpose: Decouple constraint evaluation from how values are held.
// Dependencies: crate::{identifiers, value}, serde, thiserror
// ============================================================================

//! ## Overview
//! The parameter store is owned by the configuration subsystem. The resolver
//! reads through it and writes repairs back into it; rules only ever see it
//! through a read-only [`crate::rules::RuleContext`].
//!
//! ## Invariants
//! - A parameter's kind is fixed at insertion; `set` rejects other kinds.
//! - Writes made through `set` are recorded as [`ValueOrigin::Ergonomic`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::identifiers::ParamName;
use crate::value::ParamKind;
use crate::value::ParamValue;
use crate::value::ValueOrigin;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Parameter store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The parameter is not held by the store.
    #[error("unknown parameter: {0}")]
    UnknownParameter(ParamName),
    /// The written value does not match the parameter's kind.
    #[error("parameter {name} holds {expected} values, got {found}")]
    KindMismatch {
        /// Parameter being written.
        name: ParamName,
        /// Kind the parameter was declared with.
        expected: ParamKind,
        /// Kind of the rejected value.
        found: ParamKind,
    },
}

// ============================================================================
// SECTION: Store Contract
// ============================================================================

/// Storage for named parameter values.
pub trait ParameterStore {
    /// Returns the current value of a parameter.
    fn get(&self, name: &ParamName) -> Option<ParamValue>;

    /// Returns where the current value of a parameter came from.
    fn origin(&self, name: &ParamName) -> Option<ValueOrigin>;

    /// Replaces the value of an existing parameter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the parameter is unknown or the kind differs.
    fn set(&mut self, name: &ParamName, value: ParamValue) -> Result<(), StoreError>;

    /// Returns whether a parameter still holds its unmodified default.
    fn is_default(&self, name: &ParamName) -> bool {
        self.origin(name) == Some(ValueOrigin::Default)
    }
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Stored value plus its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredParam {
    /// Current value.
    pub value: ParamValue,
    /// Where the current value came from.
    pub origin: ValueOrigin,
}

/// Ordered in-memory parameter store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryParameterStore {
    /// Parameters keyed by name.
    entries: BTreeMap<ParamName, StoredParam>,
}

impl InMemoryParameterStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a parameter with an explicit origin.
    pub fn insert(&mut self, name: impl Into<ParamName>, value: ParamValue, origin: ValueOrigin) {
        self.entries.insert(
            name.into(),
            StoredParam {
                value,
                origin,
            },
        );
    }

    /// Builder-style insert of a parameter still at its default.
    #[must_use]
    pub fn with_default(mut self, name: impl Into<ParamName>, value: ParamValue) -> Self {
        self.insert(name, value, ValueOrigin::Default);
        self
    }

    /// Builder-style insert of a parameter set on the command line.
    #[must_use]
    pub fn with_command_line(mut self, name: impl Into<ParamName>, value: ParamValue) -> Self {
        self.insert(name, value, ValueOrigin::CommandLine);
        self
    }

    /// Returns the stored entry for a parameter.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&StoredParam> {
        self.entries.get(name)
    }

    /// Returns the number of stored parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates stored parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParamName, &StoredParam)> {
        self.entries.iter()
    }
}

impl ParameterStore for InMemoryParameterStore {
    fn get(&self, name: &ParamName) -> Option<ParamValue> {
        self.entries.get(name).map(|entry| entry.value.clone())
    }

    fn origin(&self, name: &ParamName) -> Option<ValueOrigin> {
        self.entries.get(name).map(|entry| entry.origin)
    }

    fn set(&mut self, name: &ParamName, value: ParamValue) -> Result<(), StoreError> {
        let entry =
            self.entries.get_mut(name).ok_or_else(|| StoreError::UnknownParameter(name.clone()))?;
        if entry.value.kind() != value.kind() {
            return Err(StoreError::KindMismatch {
                name: name.clone(),
                expected: entry.value.kind(),
                found: value.kind(),
            });
        }
        entry.value = value;
        entry.origin = ValueOrigin::Ergonomic;
        Ok(())
    }
}
