// crates/flagcheck-core/src/registry.rs
// ============================================================================
// Module: Parameter Registry
// Description: Registration of governed parameters and their resolution order.
// Purpose: Turn declared rule reads into an acyclic, deterministic order.
// Dependencies: crate::{error, identifiers, rules, value}
// ============================================================================

//! ## Overview
//! Each registration names a governed parameter, its kind, and its rule.
//! A rule's [`ConstraintRule::reads`] become dependency edges when the read
//! parameter is governed by another registration; reads of plain inputs add
//! no edge. [`RegistryBuilder::build`] orders registrations with Kahn's
//! algorithm, picking ready parameters in name order so the order never
//! depends on registration order.
//!
//! ## Invariants
//! - Every parameter is governed by at most one registration, partners
//!   included.
//! - A built registry is acyclic; cycles fail construction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::error::RegistryError;
use crate::identifiers::ParamName;
use crate::rules::ConstraintRule;
use crate::value::ParamKind;

// ============================================================================
// SECTION: Registrations
// ============================================================================

/// One governed parameter before ordering.
pub struct ParameterSpec {
    /// Governed parameter.
    name: ParamName,
    /// Declared value kind.
    kind: ParamKind,
    /// Constraint rule.
    rule: Box<dyn ConstraintRule>,
    /// Whether the parameter may be re-resolved at runtime.
    manageable: bool,
}

impl ParameterSpec {
    /// Creates a registration.
    #[must_use]
    pub fn new(name: &str, kind: ParamKind, rule: impl ConstraintRule + 'static) -> Self {
        Self {
            name: ParamName::from(name),
            kind,
            rule: Box::new(rule),
            manageable: false,
        }
    }

    /// Marks the parameter as manageable.
    #[must_use]
    pub const fn manageable(mut self) -> Self {
        self.manageable = true;
        self
    }
}

/// A registration placed in resolution order.
pub struct RegisteredParameter {
    /// Governed parameter.
    name: ParamName,
    /// Declared value kind.
    kind: ParamKind,
    /// Constraint rule.
    rule: Box<dyn ConstraintRule>,
    /// Whether the parameter may be re-resolved at runtime.
    manageable: bool,
    /// Parameters the rule may read.
    reads: Vec<ParamName>,
    /// Additional parameters the rule may write.
    partners: Vec<ParamName>,
    /// Governed parameters that must resolve first.
    prerequisites: Vec<ParamName>,
}

impl RegisteredParameter {
    /// Governed parameter.
    #[must_use]
    pub const fn name(&self) -> &ParamName {
        &self.name
    }

    /// Declared value kind.
    #[must_use]
    pub const fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Constraint rule.
    #[must_use]
    pub fn rule(&self) -> &dyn ConstraintRule {
        self.rule.as_ref()
    }

    /// Whether the parameter may be re-resolved at runtime.
    #[must_use]
    pub const fn is_manageable(&self) -> bool {
        self.manageable
    }

    /// Parameters the rule may read.
    #[must_use]
    pub fn reads(&self) -> &[ParamName] {
        &self.reads
    }

    /// Additional parameters the rule may write.
    #[must_use]
    pub fn partners(&self) -> &[ParamName] {
        &self.partners
    }

    /// Returns whether the rule may write `target`.
    #[must_use]
    pub fn may_write(&self, target: &ParamName) -> bool {
        target == &self.name || self.partners.contains(target)
    }

    /// Governed parameters that resolve before this one.
    #[must_use]
    pub fn prerequisites(&self) -> &[ParamName] {
        &self.prerequisites
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Collects registrations and builds an ordered [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    /// Registrations in insertion order.
    specs: Vec<ParameterSpec>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a registration.
    #[must_use]
    pub fn with(mut self, spec: ParameterSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Adds a registration in place.
    pub fn push(&mut self, spec: ParameterSpec) {
        self.specs.push(spec);
    }

    /// Orders the registrations.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateParameter`] when a parameter is
    /// governed twice and [`RegistryError::DependencyCycle`] when the reads
    /// form a cycle.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut governor: BTreeMap<ParamName, usize> = BTreeMap::new();
        for (index, spec) in self.specs.iter().enumerate() {
            let governed = std::iter::once(spec.name.clone()).chain(spec.rule.partners());
            for name in governed {
                if governor.insert(name.clone(), index).is_some() {
                    return Err(RegistryError::DuplicateParameter(name));
                }
            }
        }

        let count = self.specs.len();
        let mut prerequisites: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); count];
        let mut dependents: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); count];
        for (index, spec) in self.specs.iter().enumerate() {
            for read in spec.rule.reads() {
                if let Some(&source) = governor.get(&read)
                    && source != index
                {
                    prerequisites[index].insert(source);
                    dependents[source].insert(index);
                }
            }
        }

        let mut in_degree: Vec<usize> = prerequisites.iter().map(BTreeSet::len).collect();
        let mut ready: BTreeSet<(ParamName, usize)> = BTreeSet::new();
        for (index, degree) in in_degree.iter().enumerate() {
            if *degree == 0 {
                ready.insert((self.specs[index].name.clone(), index));
            }
        }

        let mut order = Vec::with_capacity(count);
        while let Some((_, index)) = ready.pop_first() {
            order.push(index);
            for &dependent in &dependents[index] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.insert((self.specs[dependent].name.clone(), dependent));
                }
            }
        }

        if order.len() != count {
            let placed: BTreeSet<usize> = order.iter().copied().collect();
            let cycle: Vec<ParamName> = (0 .. count)
                .filter(|index| !placed.contains(index))
                .map(|index| self.specs[index].name.clone())
                .collect();
            return Err(RegistryError::DependencyCycle(cycle));
        }

        let names: Vec<ParamName> = self.specs.iter().map(|spec| spec.name.clone()).collect();
        let mut slots: Vec<Option<ParameterSpec>> = self.specs.into_iter().map(Some).collect();
        let mut entries = Vec::with_capacity(count);
        for index in order {
            let Some(spec) = slots[index].take() else {
                continue;
            };
            let mut reads = spec.rule.reads();
            reads.sort();
            reads.dedup();
            let partners = spec.rule.partners();
            entries.push(RegisteredParameter {
                name: spec.name,
                kind: spec.kind,
                manageable: spec.manageable,
                reads,
                partners,
                prerequisites: prerequisites[index].iter().map(|source| names[*source].clone()).collect(),
                rule: spec.rule,
            });
        }

        Ok(Registry {
            entries,
        })
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Registrations in resolution order.
pub struct Registry {
    /// Ordered registrations.
    entries: Vec<RegisteredParameter>,
}

impl Registry {
    /// Starts a new builder.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registrations in resolution order.
    #[must_use]
    pub fn entries(&self) -> &[RegisteredParameter] {
        &self.entries
    }

    /// Governed parameter names in resolution order.
    #[must_use]
    pub fn order(&self) -> Vec<&ParamName> {
        self.entries.iter().map(RegisteredParameter::name).collect()
    }

    /// Finds the registration governing `name`, partners included.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegisteredParameter> {
        self.entries
            .iter()
            .find(|entry| entry.name == name || entry.partners.iter().any(|partner| partner == name))
    }

    /// Number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
