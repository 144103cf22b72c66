// crates/flagcheck-core/src/value.rs
// ============================================================================
// Module: Parameter Values
// Description: Typed parameter values, kinds, and value origins.
// Purpose: Give every stored parameter a declared kind and a lossless integer view.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Values arrive already typed from the configuration-loading stage. Rules do
//! their arithmetic on a widened `i128` view of integer kinds so bounds can be
//! derived without overflow, then convert repairs back into the declared kind.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Kinds
// ============================================================================

/// Semantic type of a parameter.
///
/// # Invariants
/// - Variants are stable for configuration and report labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Boolean switch.
    Bool,
    /// Signed machine-word integer.
    Int,
    /// Unsigned machine-word integer.
    Uint,
    /// Unsigned 32-bit integer read as base-10 digits.
    Packed,
    /// Separator-delimited token list.
    List,
}

impl ParamKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Packed => "packed",
            Self::List => "list",
        }
    }

    /// Returns whether the kind has an integer view.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Int | Self::Uint | Self::Packed)
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Values
// ============================================================================

/// Current value of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    /// Boolean switch value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value.
    Uint(u64),
    /// Digit-packed value.
    Packed(u32),
    /// Raw token list.
    List(String),
}

impl ParamValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ParamKind {
        match self {
            Self::Bool(_) => ParamKind::Bool,
            Self::Int(_) => ParamKind::Int,
            Self::Uint(_) => ParamKind::Uint,
            Self::Packed(_) => ParamKind::Packed,
            Self::List(_) => ParamKind::List,
        }
    }

    /// Returns the widened integer view of integer kinds.
    #[must_use]
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Self::Int(value) => Some(i128::from(*value)),
            Self::Uint(value) => Some(i128::from(*value)),
            Self::Packed(value) => Some(i128::from(*value)),
            Self::Bool(_) | Self::List(_) => None,
        }
    }

    /// Returns the boolean value of a switch.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the raw token list.
    #[must_use]
    pub fn as_list(&self) -> Option<&str> {
        match self {
            Self::List(value) => Some(value),
            _ => None,
        }
    }

    /// Builds a value of `kind` from a widened integer.
    ///
    /// Returns `None` when `kind` is not an integer kind or the value does not
    /// fit its range.
    #[must_use]
    pub fn from_integer(kind: ParamKind, value: i128) -> Option<Self> {
        match kind {
            ParamKind::Int => i64::try_from(value).ok().map(Self::Int),
            ParamKind::Uint => u64::try_from(value).ok().map(Self::Uint),
            ParamKind::Packed => u32::try_from(value).ok().map(Self::Packed),
            ParamKind::Bool | ParamKind::List => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => value.fmt(f),
            Self::Int(value) => value.fmt(f),
            Self::Uint(value) => value.fmt(f),
            Self::Packed(value) => value.fmt(f),
            Self::List(value) => f.write_str(value),
        }
    }
}

// ============================================================================
// SECTION: Origins
// ============================================================================

/// Where the current value of a parameter came from.
///
/// # Invariants
/// - Only [`ValueOrigin::Default`] counts as "still at its default".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueOrigin {
    /// Untouched built-in default.
    #[default]
    Default,
    /// Set explicitly on the command line.
    CommandLine,
    /// Set at runtime through the management interface.
    Management,
    /// Chosen by the runtime itself, including resolver repairs.
    Ergonomic,
}

impl ValueOrigin {
    /// Returns whether the caller set the value explicitly.
    #[must_use]
    pub const fn is_explicit(self) -> bool {
        matches!(self, Self::CommandLine | Self::Management)
    }
}
