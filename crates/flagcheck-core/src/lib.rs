// crates/flagcheck-core/src/lib.rs
// ============================================================================
// Module: Flagcheck Core
// Description: Constraint and normalization engine for JIT tuning parameters.
// Purpose: Validate, and optionally repair, compiler parameters before use.
// Dependencies: serde, serde_json, smallvec, thiserror
// ============================================================================

//! ## Overview
//! A [`Registry`] holds one [`ConstraintRule`] per governed parameter, ordered
//! so that every rule runs after the parameters it reads. A [`Resolver`]
//! walks that order once per pass against a [`ParameterStore`], in
//! [`Mode::Strict`] (violations fail the pass) or [`Mode::AutoRepair`]
//! (violations are repaired where a repair exists).
//! Invariants:
//! - A repaired value accepts when fed back to its rule under strict mode.
//! - A failed parameter short-circuits every dependent in the same pass.
//! - Infrastructure failures are [`ResolveError`]s, never outcomes.
//!
//! [`standard_registry`] builds the rules for the known JIT parameters on a
//! given [`Environment`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod codec;
pub mod diagnostics;
pub mod error;
pub mod identifiers;
pub mod intrinsics;
pub mod outcome;
pub mod platform;
pub mod registry;
pub mod resolver;
pub mod rules;
pub mod standard;
pub mod store;
pub mod value;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use codec::DigitLayout;
pub use diagnostics::BufferedDiagnosticSink;
pub use diagnostics::Diagnostic;
pub use diagnostics::DiagnosticSink;
pub use diagnostics::FileDiagnosticSink;
pub use diagnostics::NoopDiagnosticSink;
pub use diagnostics::Severity;
pub use diagnostics::StderrDiagnosticSink;
pub use diagnostics::Verbosity;
pub use error::RegistryError;
pub use error::ResolveError;
pub use identifiers::ParamName;
pub use identifiers::names;
pub use intrinsics::IntrinsicCatalog;
pub use intrinsics::ListSyntax;
pub use intrinsics::StaticIntrinsicCatalog;
pub use outcome::Mode;
pub use outcome::Outcome;
pub use outcome::Violation;
pub use outcome::ViolationKind;
pub use platform::CompilerSet;
pub use platform::Environment;
pub use platform::ExecutionMode;
pub use platform::Platform;
pub use registry::ParameterSpec;
pub use registry::Registry;
pub use registry::RegistryBuilder;
pub use resolver::PassFailure;
pub use resolver::PassReport;
pub use resolver::ResolutionEntry;
pub use resolver::Resolver;
pub use rules::ConstraintRule;
pub use rules::RuleContext;
pub use standard::standard_defaults;
pub use standard::standard_parameter_kinds;
pub use standard::standard_registry;
pub use store::InMemoryParameterStore;
pub use store::ParameterStore;
pub use store::StoreError;
pub use value::ParamKind;
pub use value::ParamValue;
pub use value::ValueOrigin;
