// crates/flagcheck-core/src/resolver.rs
// ============================================================================
// Module: Resolver
// Description: Runs every registered rule once, in dependency order.
// Purpose: Apply repairs and normalizations and aggregate the pass result.
// Dependencies: crate::{diagnostics, registry, rules, store}, serde
// ============================================================================

//! ## Overview
//! A pass walks the registry's order once. Each parameter's rule sees the
//! store as left by everything before it: repairs and normalizations are
//! written back immediately. A parameter whose prerequisite failed is not
//! evaluated; it receives a synthesized `DependencyInvalid` violation.
//!
//! ## Invariants
//! - The pass succeeds only if no parameter ends in a violation.
//! - The resolver keeps no state between passes.
//! - Under [`Mode::Strict`] no value changes except through consistency
//!   normalization.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::diagnostics::Diagnostic;
use crate::diagnostics::DiagnosticSink;
use crate::diagnostics::NoopDiagnosticSink;
use crate::diagnostics::Severity;
use crate::diagnostics::Verbosity;
use crate::error::ResolveError;
use crate::identifiers::ParamName;
use crate::outcome::Mode;
use crate::outcome::Outcome;
use crate::outcome::Violation;
use crate::outcome::ViolationKind;
use crate::platform::Environment;
use crate::registry::RegisteredParameter;
use crate::registry::Registry;
use crate::rules::RuleContext;
use crate::store::ParameterStore;

// ============================================================================
// SECTION: Pass Report
// ============================================================================

/// Outcome recorded for one parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionEntry {
    /// Governed parameter.
    pub parameter: ParamName,
    /// Outcome of its rule, or the synthesized dependency violation.
    pub outcome: Outcome,
}

/// First failure of a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassFailure {
    /// Failing parameter.
    pub parameter: ParamName,
    /// Violation classification.
    pub kind: ViolationKind,
    /// Violation message.
    pub message: String,
}

/// Result of one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassReport {
    /// Mode of the pass.
    pub mode: Mode,
    /// Whether every parameter ended without a violation.
    pub success: bool,
    /// Outcomes in resolution order.
    pub entries: Vec<ResolutionEntry>,
    /// First failing parameter, when the pass failed.
    pub failure: Option<PassFailure>,
}

impl PassReport {
    /// Returns the outcome recorded for `name`.
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.entries.iter().find(|entry| entry.parameter == name).map(|entry| &entry.outcome)
    }

    /// Parameters that ended in a violation, in resolution order.
    #[must_use]
    pub fn failed(&self) -> Vec<&ParamName> {
        self.entries
            .iter()
            .filter(|entry| entry.outcome.is_violation())
            .map(|entry| &entry.parameter)
            .collect()
    }

    /// Entries whose rule changed a value.
    pub fn changes(&self) -> impl Iterator<Item = &ResolutionEntry> {
        self.entries.iter().filter(|entry| {
            matches!(entry.outcome, Outcome::Repaired { .. } | Outcome::Normalized { .. })
        })
    }
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Evaluates a registry against a store.
pub struct Resolver {
    /// Ordered registrations.
    registry: Registry,
    /// Platform and compiler inputs handed to rules.
    environment: Environment,
    /// Mode of every pass.
    mode: Mode,
    /// Diagnostic filter.
    verbosity: Verbosity,
    /// Diagnostic destination.
    sink: Arc<dyn DiagnosticSink>,
}

impl Resolver {
    /// Creates a strict, verbose resolver that discards diagnostics.
    #[must_use]
    pub fn new(registry: Registry, environment: Environment) -> Self {
        Self {
            registry,
            environment,
            mode: Mode::Strict,
            verbosity: Verbosity::Verbose,
            sink: Arc::new(NoopDiagnosticSink),
        }
    }

    /// Sets the pass mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the diagnostic verbosity.
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Sets the diagnostic sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Ordered registrations.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mode of every pass.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Runs a complete pass over every registered parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] on infrastructure failures: a missing or
    /// mistyped parameter, an undeclared read or write, or a repair that does
    /// not fit its parameter. Constraint violations are reported in the
    /// [`PassReport`], not as errors.
    pub fn resolve(&self, store: &mut dyn ParameterStore) -> Result<PassReport, ResolveError> {
        self.run(store, |_| true)
    }

    /// Runs a complete pass over the manageable parameters only.
    ///
    /// Parameters that are not manageable are treated as already resolved.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve`].
    pub fn resolve_manageable(
        &self,
        store: &mut dyn ParameterStore,
    ) -> Result<PassReport, ResolveError> {
        self.run(store, RegisteredParameter::is_manageable)
    }

    /// Walks the selected registrations in order.
    fn run(
        &self,
        store: &mut dyn ParameterStore,
        select: impl Fn(&RegisteredParameter) -> bool,
    ) -> Result<PassReport, ResolveError> {
        let mut failed: BTreeSet<ParamName> = BTreeSet::new();
        let mut entries = Vec::new();
        let mut failure = None;

        for entry in self.registry.entries().iter().filter(|entry| select(entry)) {
            let blocked = entry.prerequisites().iter().find(|name| failed.contains(*name));
            let outcome = match blocked {
                Some(prerequisite) => {
                    Outcome::violation(Violation::dependency_invalid(entry.name(), prerequisite))
                }
                None => self.evaluate(store, entry)?,
            };
            self.apply(store, entry, &outcome)?;
            self.report(entry.name(), &outcome);

            if let Outcome::Violation {
                violation,
            } = &outcome
            {
                failed.insert(entry.name().clone());
                if failure.is_none() {
                    failure = Some(PassFailure {
                        parameter: entry.name().clone(),
                        kind: violation.kind,
                        message: violation.message.clone(),
                    });
                }
            }
            entries.push(ResolutionEntry {
                parameter: entry.name().clone(),
                outcome,
            });
        }

        Ok(PassReport {
            mode: self.mode,
            success: failure.is_none(),
            entries,
            failure,
        })
    }

    /// Runs one rule against the current store.
    fn evaluate(
        &self,
        store: &dyn ParameterStore,
        entry: &RegisteredParameter,
    ) -> Result<Outcome, ResolveError> {
        let value = store.get(entry.name()).ok_or_else(|| {
            ResolveError::MissingParameter(entry.name().clone())
        })?;
        if value.kind() != entry.kind() {
            return Err(ResolveError::KindMismatch {
                name: entry.name().clone(),
                expected: entry.kind(),
                found: value.kind(),
            });
        }
        let ctx = RuleContext::new(entry.name(), entry.reads(), store, &self.environment);
        entry.rule().evaluate(&ctx, self.mode)
    }

    /// Writes repaired and normalized values back to the store.
    fn apply(
        &self,
        store: &mut dyn ParameterStore,
        entry: &RegisteredParameter,
        outcome: &Outcome,
    ) -> Result<(), ResolveError> {
        match outcome {
            Outcome::Accept
            | Outcome::Violation {
                ..
            } => Ok(()),
            Outcome::Repaired {
                value, ..
            } => {
                if self.mode == Mode::Strict {
                    return Err(ResolveError::RepairInStrictMode(entry.name().clone()));
                }
                store.set(entry.name(), value.clone())?;
                Ok(())
            }
            Outcome::Normalized {
                target,
                value,
                ..
            } => {
                if !entry.may_write(target) {
                    return Err(ResolveError::UndeclaredWrite {
                        rule: entry.name().clone(),
                        param: target.clone(),
                    });
                }
                store.set(target, value.clone())?;
                Ok(())
            }
        }
    }

    /// Emits the diagnostic for an outcome, if any.
    fn report(&self, name: &ParamName, outcome: &Outcome) {
        let diagnostic = match outcome {
            Outcome::Accept => return,
            Outcome::Violation {
                violation,
            } => Diagnostic::new(
                "parameter_violation",
                name.clone(),
                Severity::Error,
                Some(violation.kind),
                violation.message.clone(),
                self.mode,
            ),
            Outcome::Repaired {
                value,
                reason,
            } => Diagnostic::new(
                "parameter_repaired",
                name.clone(),
                Severity::Warning,
                Some(reason.kind),
                format!("{reason}; repaired to {value}"),
                self.mode,
            ),
            Outcome::Normalized {
                target,
                note,
                ..
            } => {
                let Some(note) = note else {
                    return;
                };
                Diagnostic::new(
                    "parameter_normalized",
                    target.clone(),
                    Severity::Info,
                    None,
                    note.clone(),
                    self.mode,
                )
            }
        };
        if self.verbosity.admits(diagnostic.severity) {
            self.sink.emit(&diagnostic);
        }
    }
}
