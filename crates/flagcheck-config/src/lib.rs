// crates/flagcheck-config/src/lib.rs
// ============================================================================
// Module: flagcheck Config Library
// Description: Canonical config model, validation, and example payloads.
// Purpose: Single source of truth for flagcheck.toml semantics.
// Dependencies: flagcheck-core, serde, toml
// ============================================================================

//! ## Overview
//! `flagcheck-config` defines the configuration model for a flagcheck run:
//! resolver mode and verbosity, the target environment, the diagnostic sink,
//! extra intrinsic identifiers, and the parameter values to check. Loading is
//! strict and fail-closed; a loaded config converts directly into a
//! parameter store and a ready [`flagcheck_core::Resolver`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
