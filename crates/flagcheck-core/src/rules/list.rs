// crates/flagcheck-core/src/rules/list.rs
// ============================================================================
// Module: Intrinsic List Rule
// Description: Checks list parameters against the intrinsic catalog.
// Purpose: Reject enable/disable lists that name unknown intrinsics.
// Dependencies: crate::{intrinsics, rules}
// ============================================================================

//! ## Overview
//! Lists have no repair path. The first unrecognized token is reported in
//! every mode.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::error::ResolveError;
use crate::identifiers::ParamName;
use crate::intrinsics::IntrinsicCatalog;
use crate::intrinsics::ListSyntax;
use crate::intrinsics::validate_intrinsic_list;
use crate::outcome::Mode;
use crate::outcome::Outcome;
use crate::outcome::Violation;
use crate::outcome::ViolationKind;
use crate::rules::ConstraintRule;
use crate::rules::RepairPolicy;
use crate::rules::RuleCategory;
use crate::rules::RuleContext;
use crate::value::ParamKind;

// ============================================================================
// SECTION: Rule
// ============================================================================

/// Every token must name a cataloged intrinsic.
pub struct IntrinsicListRule {
    /// Expected token syntax.
    syntax: ListSyntax,
    /// Recognized identifiers.
    catalog: Arc<dyn IntrinsicCatalog>,
}

impl IntrinsicListRule {
    /// Creates a rule for `syntax` backed by `catalog`.
    #[must_use]
    pub fn new(syntax: ListSyntax, catalog: Arc<dyn IntrinsicCatalog>) -> Self {
        Self {
            syntax,
            catalog,
        }
    }
}

impl ConstraintRule for IntrinsicListRule {
    fn category(&self) -> RuleCategory {
        RuleCategory::TokenList
    }

    fn reads(&self) -> Vec<ParamName> {
        Vec::new()
    }

    fn repair_policy(&self) -> RepairPolicy {
        RepairPolicy::ViolationOnly
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, _mode: Mode) -> Result<Outcome, ResolveError> {
        let value = ctx.value()?;
        let Some(raw) = value.as_list() else {
            return Err(ResolveError::KindMismatch {
                name: ctx.governed().clone(),
                expected: ParamKind::List,
                found: value.kind(),
            });
        };
        match validate_intrinsic_list(raw, self.syntax, self.catalog.as_ref()) {
            Ok(_) => Ok(Outcome::Accept),
            Err(token) => Ok(Outcome::violation(Violation::new(
                ViolationKind::UnrecognizedToken,
                format!("Unrecognized intrinsic detected in {}: {token}", ctx.governed()),
            ))),
        }
    }
}
