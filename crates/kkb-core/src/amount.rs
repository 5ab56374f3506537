//! # Amount Module
//!
//! Provides the `Amount` type for prices, shares and totals.
//!
//! ## Why a Real Number?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SPLITTING IS DIVISION                                                  │
//! │                                                                         │
//! │  A 100.00 pizza shared by 3 people is 33.333... each.                  │
//! │  Rounding each share to cents loses a cent; keeping the exact share    │
//! │  lets the per-person totals add back up to the whole bill:             │
//! │                                                                         │
//! │    Σ person totals == subtotal + service charge   (within 1e-6)        │
//! │                                                                         │
//! │  Rounding happens ONLY when an amount is displayed (2 decimals).       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kkb_core::amount::Amount;
//!
//! let price = Amount::parse("12.50").unwrap();
//! let share = price / 3.0;
//! assert_eq!(share.format_with("₱"), "₱4.17");
//!
//! // Anything unparsable becomes zero where the bill asks for it
//! assert!(Amount::parse_or_zero("n/a").is_zero());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Amount Type
// =============================================================================

/// A monetary value in a currency-agnostic unit.
///
/// ## Design Decisions
/// - **f64**: shares are exact fractions of a price; see module docs
/// - **Newtype serde**: serializes as a bare JSON number
/// - **No clamping**: negative amounts flow through arithmetic untouched
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Amount(f64);

impl Amount {
    /// Creates an amount from a raw value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Amount(value)
    }

    /// Returns the raw value.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Zero amount.
    #[inline]
    pub const fn zero() -> Self {
        Amount(0.0)
    }

    /// Checks if the value is exactly zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Checks if the value is greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }

    /// Parses user input the way a browser's `parseFloat` does.
    ///
    /// ## Rules
    /// - Surrounding whitespace is ignored
    /// - The longest leading decimal number is taken (`"12.5kg"` → 12.5)
    /// - No leading number at all (`""`, `"abc"`, `"."`) → `None`
    /// - Non-finite results (`"1e999"`) → `None`
    ///
    /// ## Example
    /// ```rust
    /// use kkb_core::amount::Amount;
    ///
    /// assert_eq!(Amount::parse(" 10 ").unwrap().value(), 10.0);
    /// assert_eq!(Amount::parse("-.5").unwrap().value(), -0.5);
    /// assert_eq!(Amount::parse("2e3 pesos").unwrap().value(), 2000.0);
    /// assert!(Amount::parse("ten").is_none());
    /// ```
    pub fn parse(input: &str) -> Option<Amount> {
        let prefix = numeric_prefix(input.trim())?;
        prefix
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Amount)
    }

    /// Parses user input, treating anything unparsable as zero.
    ///
    /// This is the service-charge coercion rule: an empty or garbled value
    /// is never an error, it is simply no charge.
    #[inline]
    pub fn parse_or_zero(input: &str) -> Amount {
        Amount::parse(input).unwrap_or_default()
    }

    /// Compares two amounts within an absolute tolerance.
    #[inline]
    pub fn approx_eq(&self, other: Amount, epsilon: f64) -> bool {
        (self.0 - other.0).abs() <= epsilon
    }

    /// Formats with a leading currency symbol and two decimals.
    ///
    /// ## Example
    /// ```rust
    /// use kkb_core::amount::Amount;
    ///
    /// assert_eq!(Amount::new(1099.5).format_with("€"), "€1099.50");
    /// assert_eq!(Amount::new(-5.5).format_with("$"), "-$5.50");
    /// ```
    pub fn format_with(&self, symbol: &str) -> String {
        let rounded = display_value(self.0);
        let sign = if rounded < 0.0 { "-" } else { "" };
        format!("{}{}{:.2}", sign, symbol, rounded.abs())
    }
}

/// Rounds to cents for display and folds `-0.00` into `0.00`.
fn display_value(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Returns the longest leading `[+-]?digits[.digits][(e|E)[+-]?digits]`.
fn numeric_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when it carries at least one digit
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    Some(&s[..end])
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two decimals, no currency symbol.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", display_value(self.0))
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount(value)
    }
}

impl Add for Amount {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Amount(self.0 + other.0)
    }
}

impl AddAssign for Amount {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Amount {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Amount(self.0 - other.0)
    }
}

/// Scaling by a ratio (percentages, proportional shares).
impl Mul<f64> for Amount {
    type Output = Self;

    #[inline]
    fn mul(self, factor: f64) -> Self {
        Amount(self.0 * factor)
    }
}

/// Splitting into equal parts.
impl Div<f64> for Amount {
    type Output = Self;

    #[inline]
    fn div(self, divisor: f64) -> Self {
        Amount(self.0 / divisor)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
