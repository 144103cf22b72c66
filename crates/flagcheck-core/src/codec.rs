// crates/flagcheck-core/src/codec.rs
// ============================================================================
// Module: Digit-Packed Codec
// Description: Decode and encode integers that pack small settings as decimal digits.
// Purpose: Share digit handling between packed-value rules.
// Dependencies: smallvec, serde
// ============================================================================

//! ## Overview
//! A packed value such as `212` stores one small setting per decimal digit,
//! least significant digit first: position 0 is `2`, position 1 is `1`,
//! position 2 is `2`. A [`DigitLayout`] fixes how many positions exist and the
//! maximum of each one.
//!
//! ## Invariants
//! - Digits beyond the declared width must be zero for acceptance.
//! - [`DecodedDigits::repaired`] always produces a value with no faults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Inline digit storage; packed parameters have at most a handful of digits.
pub type Digits = SmallVec<[u8; 4]>;

/// Per-position digit maxima, least significant position first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitLayout {
    /// Maximum digit allowed at each position.
    maxima: Digits,
}

impl DigitLayout {
    /// Creates a layout from explicit per-position maxima.
    ///
    /// Maxima above `9` are capped at `9`.
    #[must_use]
    pub fn new(maxima: &[u8]) -> Self {
        Self {
            maxima: maxima.iter().map(|max| (*max).min(9)).collect(),
        }
    }

    /// Creates a layout of `width` positions sharing one maximum.
    #[must_use]
    pub fn uniform(width: usize, max: u8) -> Self {
        Self {
            maxima: std::iter::repeat_n(max.min(9), width).collect(),
        }
    }

    /// Number of declared digit positions.
    #[must_use]
    pub fn width(&self) -> usize {
        self.maxima.len()
    }

    /// Maximum digit allowed at `position`.
    #[must_use]
    pub fn max_at(&self, position: usize) -> Option<u8> {
        self.maxima.get(position).copied()
    }

    /// Splits `value` into the declared digit positions.
    #[must_use]
    pub fn decode(&self, value: u64) -> DecodedDigits {
        let mut remaining = value;
        let mut digits = Digits::new();
        for _ in 0 .. self.width() {
            digits.push(low_digit(remaining));
            remaining /= 10;
        }
        DecodedDigits {
            digits,
            excess: remaining,
        }
    }
}

/// Problem found in a decoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitFault {
    /// A digit exceeds its position's maximum.
    OutOfRange {
        /// Zero-based position, least significant first.
        position: usize,
        /// Digit found at the position.
        digit: u8,
        /// Maximum allowed at the position.
        max: u8,
    },
    /// Nonzero digits remain beyond the declared width.
    TooManyDigits {
        /// Declared width.
        width: usize,
    },
}

/// Digits of a packed value plus whatever lies beyond the declared width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDigits {
    /// Declared positions, least significant first.
    digits: Digits,
    /// Higher-order remainder after the declared positions.
    excess: u64,
}

impl DecodedDigits {
    /// Digits at the declared positions.
    #[must_use]
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    /// Higher-order remainder beyond the declared positions.
    #[must_use]
    pub const fn excess(&self) -> u64 {
        self.excess
    }

    /// Returns the first fault, checking positions from least significant up
    /// and the excess last.
    #[must_use]
    pub fn first_fault(&self, layout: &DigitLayout) -> Option<DigitFault> {
        for (position, digit) in self.digits.iter().copied().enumerate() {
            let max = layout.max_at(position).unwrap_or(0);
            if digit > max {
                return Some(DigitFault::OutOfRange {
                    position,
                    digit,
                    max,
                });
            }
        }
        if self.excess != 0 {
            return Some(DigitFault::TooManyDigits {
                width: layout.width(),
            });
        }
        None
    }

    /// Clamps every digit to its maximum, drops the excess, and re-encodes.
    #[must_use]
    pub fn repaired(&self, layout: &DigitLayout) -> u64 {
        let clamped: Digits = self
            .digits
            .iter()
            .enumerate()
            .map(|(position, digit)| (*digit).min(layout.max_at(position).unwrap_or(0)))
            .collect();
        encode(&clamped)
    }

    /// Re-encodes the declared positions, dropping the excess.
    #[must_use]
    pub fn encoded(&self) -> u64 {
        encode(&self.digits)
    }
}

// ============================================================================
// SECTION: Encoding
// ============================================================================

/// Encodes digits (least significant first) as `Σ digit[i] * 10^i`.
#[must_use]
pub fn encode(digits: &[u8]) -> u64 {
    digits
        .iter()
        .rev()
        .fold(0u64, |acc, digit| acc.saturating_mul(10).saturating_add(u64::from(*digit)))
}

/// Returns the least significant decimal digit of `value`.
fn low_digit(value: u64) -> u8 {
    // value % 10 < 10 always fits.
    u8::try_from(value % 10).unwrap_or(0)
}
