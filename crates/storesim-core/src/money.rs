//! # Money Module
//!
//! Provides the `Money` type used for every price and checkout total.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │  and a surcharge compounded per cart line drifts further each step.    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Prices and totals are whole cents. While surcharges compound, the   │
//! │    running total is carried in nano-cents (`RunningTotal`) and only    │
//! │    rounded half-up to the cent when it is read back as `Money`.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storesim_core::money::{Money, RunningTotal};
//! use storesim_core::types::SurchargeRate;
//!
//! let mut total = RunningTotal::zero();
//! total += Money::from_dollars(300);
//! total.apply_surcharge(SurchargeRate::from_bps(700));
//! assert_eq!(total.to_money().cents(), 32_100); // $321.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

use crate::types::SurchargeRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► Store::checkout_member ──► running total
///                                                  │
///                               non-premium? ──► apply_surcharge(7%)
///                                                  │
///                                                  ▼
///                                  RunningTotal::to_money ──► Receipt.total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use storesim_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole dollars.
    ///
    /// ```rust
    /// use storesim_core::money::Money;
    ///
    /// assert_eq!(Money::from_dollars(350).cents(), 35_000);
    /// ```
    #[inline]
    pub const fn from_dollars(dollars: i64) -> Self {
        Money(dollars * 100)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
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
}

// =============================================================================
// Running Total
// =============================================================================

/// Sub-cent units per cent carried by [`RunningTotal`].
const NANOS_PER_CENT: i128 = 1_000_000_000;

/// A checkout total kept at nano-cent precision.
///
/// A surcharge compounded after every cart line would drift if each step
/// were rounded to the cent, since every rounding error is multiplied by the
/// next step. The running total therefore stays at sub-cent precision and is
/// rounded once, half-up, by [`RunningTotal::to_money`].
///
/// ```rust
/// use storesim_core::money::{Money, RunningTotal};
/// use storesim_core::types::SurchargeRate;
///
/// let rate = SurchargeRate::from_bps(700);
/// let mut total = RunningTotal::zero();
/// for _ in 0..10 {
///     total += Money::from_cents(1);
///     total.apply_surcharge(rate);
/// }
/// // Σ 0.01 × 1.07^k for k = 1..=10 is $0.1478
/// assert_eq!(total.to_money().cents(), 15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct RunningTotal(i128);

impl RunningTotal {
    #[inline]
    pub const fn zero() -> Self {
        RunningTotal(0)
    }

    /// Multiplies the whole running total by `1 + rate`.
    ///
    /// ## Implementation
    /// `(nanos * (10000 + bps) + 5000) / 10000`, rounded half-up at the
    /// nano-cent.
    pub fn apply_surcharge(&mut self, rate: SurchargeRate) {
        let factor = 10_000 + rate.bps() as i128;
        self.0 = (self.0 * factor + 5_000).div_euclid(10_000);
    }

    /// Rounds the running total half-up to whole cents.
    pub fn to_money(&self) -> Money {
        let cents = (self.0 + NANOS_PER_CENT / 2).div_euclid(NANOS_PER_CENT);
        Money::from_cents(cents as i64)
    }
}

impl AddAssign<Money> for RunningTotal {
    #[inline]
    fn add_assign(&mut self, amount: Money) {
        self.0 += amount.cents() as i128 * NANOS_PER_CENT;
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents_and_dollars() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);

        assert_eq!(Money::from_dollars(400), Money::from_cents(40_000));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
        assert_eq!(format!("{}", Money::from_cents(119_997)), "$1199.97");
    }

    #[test]
    fn test_arithmetic() {
        let mut total = Money::from_cents(1000);
        total += Money::from_cents(500);
        assert_eq!(total.cents(), 1500);
        assert_eq!((total + Money::from_cents(1)).cents(), 1501);
    }

    #[test]
    fn test_running_total_rounds_half_up_once() {
        let rate = SurchargeRate::from_bps(700);

        // 50 cents × 1.07 = 53.5 cents → 54
        let mut total = RunningTotal::zero();
        total += Money::from_cents(50);
        total.apply_surcharge(rate);
        assert_eq!(total.to_money().cents(), 54);

        // 49 cents × 1.07 = 52.43 cents → 52
        let mut total = RunningTotal::zero();
        total += Money::from_cents(49);
        total.apply_surcharge(rate);
        assert_eq!(total.to_money().cents(), 52);

        let mut total = RunningTotal::zero();
        total.apply_surcharge(rate);
        assert!(total.to_money().is_zero());
    }

    #[test]
    fn test_running_total_compounds() {
        let rate = SurchargeRate::from_bps(700);
        let mut total = RunningTotal::zero();

        for (price, expected) in [(30_000, 32_100), (40_000, 77_147), (35_000, 119_997)] {
            total += Money::from_cents(price);
            total.apply_surcharge(rate);
            assert_eq!(total.to_money().cents(), expected);
        }

        let mut untouched = RunningTotal::zero();
        untouched += Money::from_dollars(10);
        untouched.apply_surcharge(SurchargeRate::zero());
        assert_eq!(untouched.to_money(), Money::from_dollars(10));
    }

    #[test]
    fn test_running_total_does_not_drift_over_many_lines() {
        let rate = SurchargeRate::from_bps(700);
        let mut total = RunningTotal::zero();
        for _ in 0..10 {
            total += Money::from_cents(1);
            total.apply_surcharge(rate);
        }

        let exact: f64 = (1..=10).map(|k| 0.01 * 1.07f64.powi(k)).sum();
        let charged = total.to_money().cents() as f64 / 100.0;
        assert!((charged - exact).abs() < 0.005, "{} vs {}", charged, exact);
        assert_eq!(total.to_money().cents(), 15);
    }
}
