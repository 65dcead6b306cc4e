// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fixed-point monetary amounts.
//!
//! All prices and refunds in the system are whole cents. Percentage
//! calculations round half-up at cent precision, so a 50% refund of
//! $333.33 is exactly $166.67 — never a floating-point neighbour.

use serde::{Deserialize, Serialize};

/// A monetary amount in whole cents.
///
/// Amounts are signed to allow difference calculations, but all persisted
/// prices are non-negative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money {
    cents: i64,
}

impl Money {
    /// A zero amount.
    pub const ZERO: Self = Self { cents: 0 };

    /// Creates a `Money` from a cent count.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Creates a `Money` from whole currency units (e.g., dollars).
    #[must_use]
    pub const fn from_units(units: i64) -> Self {
        Self { cents: units * 100 }
    }

    /// Returns the amount in cents.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Adds two amounts, saturating at the numeric bounds.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self {
            cents: self.cents.saturating_add(other.cents),
        }
    }

    /// Subtracts an amount, clamping at zero.
    ///
    /// Used for discount application: a discount larger than the price
    /// yields a free night, never a negative one.
    #[must_use]
    pub const fn saturating_sub_floor_zero(self, other: Self) -> Self {
        let diff: i64 = self.cents.saturating_sub(other.cents);
        if diff < 0 { Self::ZERO } else { Self { cents: diff } }
    }

    /// Multiplies the amount by a non-negative integer count.
    #[must_use]
    pub fn times(self, count: u32) -> Self {
        Self {
            cents: self.cents.saturating_mul(i64::from(count)),
        }
    }

    /// Computes `percentage`% of this amount, rounding half-up at cent
    /// precision.
    ///
    /// Half-up means the midpoint rounds away from zero: 50% of 33333
    /// cents is 16666.5, which rounds to 16667.
    #[must_use]
    pub fn percentage(self, percentage: u8) -> Self {
        let numerator: i64 = self.cents.saturating_mul(i64::from(percentage));
        // Half-up rounding of numerator / 100.
        let cents: i64 = if numerator >= 0 {
            (numerator + 50) / 100
        } else {
            (numerator - 50) / 100
        };
        Self { cents }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign: &str = if self.cents < 0 { "-" } else { "" };
        let abs: i64 = self.cents.abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_half_up_rounding() {
        // 50% of $333.33 must be exactly $166.67
        let total: Money = Money::from_cents(33333);
        assert_eq!(total.percentage(50), Money::from_cents(16667));
    }

    #[test]
    fn test_percentage_full_and_none() {
        let total: Money = Money::from_cents(35000);
        assert_eq!(total.percentage(100), total);
        assert_eq!(total.percentage(0), Money::ZERO);
    }

    #[test]
    fn test_percentage_exact_half() {
        // 50% of $3.50 = $1.75, no rounding needed
        assert_eq!(Money::from_cents(350).percentage(50), Money::from_cents(175));
    }

    #[test]
    fn test_deposit_style_percentage() {
        // 30% of $199.99 = 5999.7 cents, rounds to $60.00
        assert_eq!(
            Money::from_cents(19999).percentage(30),
            Money::from_cents(6000)
        );
    }

    #[test]
    fn test_discount_floors_at_zero() {
        let price: Money = Money::from_units(50);
        let discount: Money = Money::from_units(80);
        assert_eq!(price.saturating_sub_floor_zero(discount), Money::ZERO);
    }

    #[test]
    fn test_times() {
        assert_eq!(Money::from_units(120).times(3), Money::from_units(360));
        assert_eq!(Money::from_units(120).times(0), Money::ZERO);
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(Money::from_cents(16667).to_string(), "$166.67");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::ZERO.to_string(), "$0.00");
        assert_eq!(Money::from_cents(-250).to_string(), "-$2.50");
    }
}
