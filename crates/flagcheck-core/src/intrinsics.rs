// crates/flagcheck-core/src/intrinsics.rs
// ============================================================================
// Module: Intrinsic Catalog and List Validator
// Description: Recognized intrinsic identifiers and token-list validation.
// Purpose: Reject intrinsic control lists that name unknown intrinsics.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Intrinsic lists come in two syntaxes. A *disable* list names intrinsics to
//! turn off (`_dsin,_dcos`). A *control* list marks each intrinsic with `+`
//! or `-` (`+_dsin,-_dcos`). Tokens are separated by commas or newlines and
//! surrounding whitespace is ignored.
//!
//! ## Invariants
//! - Validation stops at the first unrecognized token and reports it verbatim.
//! - There is no repair for lists; a list is valid or it is not.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Characters that separate tokens in an intrinsic list.
const LIST_SEPARATORS: [char; 2] = [',', '\n'];

/// Intrinsic identifiers recognized by the default catalog.
const DEFAULT_INTRINSICS: &[&str] = &[
    "_hashCode",
    "_getClass",
    "_identityHashCode",
    "_currentTimeMillis",
    "_nanoTime",
    "_arraycopy",
    "_copyOf",
    "_copyOfRange",
    "_equalsB",
    "_equalsC",
    "_compareToL",
    "_compareToU",
    "_indexOfL",
    "_indexOfU",
    "_dabs",
    "_fabs",
    "_dsqrt",
    "_dsin",
    "_dcos",
    "_dtan",
    "_datan2",
    "_dexp",
    "_dlog",
    "_dlog10",
    "_dpow",
    "_min",
    "_max",
    "_multiplyExactI",
    "_multiplyExactL",
    "_addExactI",
    "_addExactL",
    "_onSpinWait",
    "_compareAndSetInt",
    "_compareAndSetLong",
    "_compareAndSetReference",
    "_getAndAddInt",
    "_getAndAddLong",
    "_updateCRC32",
    "_updateBytesCRC32",
    "_updateBytesCRC32C",
    "_aescrypt_encryptBlock",
    "_aescrypt_decryptBlock",
    "_sha_implCompress",
    "_sha2_implCompress",
    "_sha5_implCompress",
    "_base64_encodeBlock",
    "_base64_decodeBlock",
    "_vectorizedMismatch",
    "_Reference_get",
    "_isInstance",
];

// ============================================================================
// SECTION: Catalog Contract
// ============================================================================

/// The set of recognized intrinsic identifiers.
pub trait IntrinsicCatalog: Send + Sync {
    /// Returns whether `token` names a recognized intrinsic.
    fn contains(&self, token: &str) -> bool;
}

/// Catalog backed by an ordered set of identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticIntrinsicCatalog {
    /// Recognized identifiers.
    ids: BTreeSet<String>,
}

impl StaticIntrinsicCatalog {
    /// Creates a catalog from the given identifiers.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates the default catalog of common intrinsics.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(DEFAULT_INTRINSICS.iter().copied())
    }

    /// Adds identifiers to the catalog.
    #[must_use]
    pub fn with_extra<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Number of recognized identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl IntrinsicCatalog for StaticIntrinsicCatalog {
    fn contains(&self, token: &str) -> bool {
        self.ids.contains(token)
    }
}

// ============================================================================
// SECTION: List Syntax
// ============================================================================

/// Syntax of an intrinsic list parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListSyntax {
    /// Bare identifiers, all disabled.
    Disable,
    /// `+`/`-` marked identifiers.
    Control,
}

/// One validated entry of an intrinsic list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrinsicDirective {
    /// Intrinsic identifier.
    pub id: String,
    /// Whether the list enables (`true`) or disables the intrinsic.
    pub enabled: bool,
}

/// Splits a raw list into trimmed, non-empty tokens.
pub fn list_tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(LIST_SEPARATORS).map(str::trim).filter(|token| !token.is_empty())
}

/// Validates a raw list against a catalog.
///
/// # Errors
///
/// Returns the first token that is malformed for `syntax` or names an
/// intrinsic the catalog does not recognize.
pub fn validate_intrinsic_list(
    raw: &str,
    syntax: ListSyntax,
    catalog: &dyn IntrinsicCatalog,
) -> Result<Vec<IntrinsicDirective>, String> {
    let mut directives = Vec::new();
    for token in list_tokens(raw) {
        let (id, enabled) = match syntax {
            ListSyntax::Disable => (token, false),
            ListSyntax::Control => match split_marker(token) {
                Some(parts) => parts,
                None => return Err(token.to_string()),
            },
        };
        if !catalog.contains(id) {
            return Err(token.to_string());
        }
        directives.push(IntrinsicDirective {
            id: id.to_string(),
            enabled,
        });
    }
    Ok(directives)
}

/// Splits a control token into its identifier and enable flag.
fn split_marker(token: &str) -> Option<(&str, bool)> {
    if let Some(id) = token.strip_prefix('+') {
        return Some((id, true));
    }
    token.strip_prefix('-').map(|id| (id, false))
}
