//! # Money Module
//!
//! Provides the `Money` type for ticket and product prices.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A basket of 40 lines at € 0,35 summed as floats drifts by fractions   │
//! │  of a cent, and rounding each line before summing compounds the drift. │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every line total and sum is exact. The only place a value is        │
//! │    turned into "2 decimals" is the display formatter.                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use basket_core::money::{CurrencyFormat, Money};
//!
//! let price = Money::from_cents(1000); // € 10,00
//! let fee = Money::from_cents(35);     // € 0,35
//!
//! let total = price * 2 + fee;
//! assert_eq!(total.format(&CurrencyFormat::default()), "€ 20,35");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (euro cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction stays total, even though basket prices are
///   never negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialized as an integer**: persisted baskets round-trip exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (euros and cents).
    ///
    /// For negative amounts only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is −5.50, not −4.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Parses a decimal amount such as `"10"`, `"10.5"`, `"0,35"`.
    ///
    /// ## Rules
    /// - `.` and `,` are both accepted as the decimal separator
    /// - At most two fractional digits (no silent rounding on input)
    /// - Negative amounts are rejected: prices are never below zero
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::money::Money;
    ///
    /// assert_eq!(Money::parse("10.35").unwrap().cents(), 1035);
    /// assert_eq!(Money::parse("0,5").unwrap().cents(), 50);
    /// assert!(Money::parse("1.005").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::Required {
                field: "amount".to_string(),
            });
        }
        if input.starts_with('-') {
            return Err(ValidationError::MustBeNonNegative {
                field: "amount".to_string(),
            });
        }

        let (whole, fraction) = match input.split_once(['.', ',']) {
            Some((whole, fraction)) => (whole, fraction),
            None => (input, ""),
        };

        if fraction.len() > 2 {
            return Err(invalid("at most two decimal places are allowed"));
        }
        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if !all_digits(whole) || !all_digits(fraction) || (whole.is_empty() && fraction.is_empty()) {
            return Err(invalid("must be a decimal number"));
        }

        let major: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount is too large"))?
        };
        let minor: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid("must be a decimal number"))? * 10,
            _ => fraction.parse().map_err(|_| invalid("must be a decimal number"))?,
        };

        major
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(minor))
            .map(Money)
            .ok_or_else(|| invalid("amount is too large"))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (euros) portion.
    #[inline]
    pub const fn euros(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a basket amount, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::money::Money;
    ///
    /// let unit_cost = Money::from_cents(299);
    /// assert_eq!(unit_cost.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }

    /// Formats the amount for display using the given currency format.
    ///
    /// This is the single point where an amount is presented with exactly
    /// two decimals.
    pub fn format(&self, format: &CurrencyFormat) -> String {
        format.format(*self)
    }

    /// Returns the amount as a plain decimal string (`"10.35"`), the shape
    /// HTML number inputs expect.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.euros().abs(), self.cents_part())
    }
}

// =============================================================================
// Currency Format
// =============================================================================

/// How amounts are rendered in the basket table.
///
/// The default matches the event pages: `€ 10,35`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CurrencyFormat {
    /// Currency symbol placed before the amount.
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Decimal separator.
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,

    /// Whether a space separates the symbol from the amount.
    #[serde(default = "default_symbol_spacing")]
    pub symbol_spacing: bool,
}

fn default_symbol() -> String {
    "€".to_string()
}

fn default_decimal_separator() -> char {
    ','
}

fn default_symbol_spacing() -> bool {
    true
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            symbol: default_symbol(),
            decimal_separator: default_decimal_separator(),
            symbol_spacing: default_symbol_spacing(),
        }
    }
}

impl CurrencyFormat {
    /// Formats a money value.
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::money::{CurrencyFormat, Money};
    ///
    /// let format = CurrencyFormat::default();
    /// assert_eq!(format.format(Money::from_cents(1035)), "€ 10,35");
    /// assert_eq!(format.format(Money::zero()), "€ 0,00");
    /// ```
    pub fn format(&self, money: Money) -> String {
        format!(
            "{}{}{}{}{}{:02}",
            if money.is_negative() { "-" } else { "" },
            self.symbol,
            if self.symbol_spacing { " " } else { "" },
            money.euros().abs(),
            self.decimal_separator,
            money.cents_part()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses the default euro format. Use [`CurrencyFormat`] for
/// deployment-specific rendering.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&CurrencyFormat::default().format(*self))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// Arithmetic saturates instead of wrapping, so a total can never flip sign.

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Multiplication by a basket amount.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.euros(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("10.00").unwrap().cents(), 1000);
        assert_eq!(Money::parse("0,35").unwrap().cents(), 35);
        assert_eq!(Money::parse("2.5").unwrap().cents(), 250);
        assert_eq!(Money::parse(".5").unwrap().cents(), 50);
        assert_eq!(Money::parse(" 7 ").unwrap().cents(), 700);

        assert!(Money::parse("").is_err());
        assert!(Money::parse("-1").is_err());
        assert!(Money::parse("1.005").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("1.2.3").is_err());
    }

    #[test]
    fn test_display_uses_euro_format() {
        assert_eq!(Money::from_cents(1035).to_string(), "€ 10,35");
        assert_eq!(Money::from_cents(500).to_string(), "€ 5,00");
        assert_eq!(Money::from_cents(-550).to_string(), "-€ 5,50");
        assert_eq!(Money::zero().to_string(), "€ 0,00");
    }

    #[test]
    fn test_custom_format() {
        let format = CurrencyFormat {
            symbol: "$".to_string(),
            decimal_separator: '.',
            symbol_spacing: false,
        };
        assert_eq!(Money::from_cents(1234).format(&format), "$12.34");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(250).to_decimal_string(), "2.50");
        assert_eq!(Money::from_cents(3).to_decimal_string(), "0.03");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_cents(i64::MAX);

        assert_eq!((max + Money::from_cents(35)).cents(), i64::MAX);
        assert_eq!(max.multiply_quantity(2).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - Money::from_cents(1)).cents(), i64::MIN);

        let mut total = max;
        total += max;
        assert!(total.is_positive());
    }

    /// Summing many small prices stays exact: no rounding before display.
    #[test]
    fn test_accumulation_is_exact() {
        let total: Money = std::iter::repeat(Money::from_cents(35)).take(1000).sum();
        assert_eq!(total.cents(), 35_000);
        assert_eq!(total.to_string(), "€ 350,00");
    }
}
