//! Money type for representing monetary values.
//!
//! Amounts are integers in the currency's minor unit (paise for INR, cents
//! for USD). All arithmetic is checked; mixing currencies yields `None`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    INR,
    USD,
}

impl Currency {
    /// Get the currency code (e.g., "INR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
        }
    }

    /// Get the currency symbol (e.g., "₹").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::INR => "\u{20b9}",
            Currency::USD => "$",
        }
    }

    /// Number of minor-unit decimal places.
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "INR" => Some(Currency::INR),
            "USD" => Some(Currency::USD),
            _ => None,
        }
    }

    fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Currency every price, fee and discount in the store is kept in.
pub const STORE_CURRENCY: Currency = Currency::INR;

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount_minor: i64,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Create a Money value from a decimal amount, rounding to the minor unit.
    ///
    /// ```
    /// use hyno_commerce::money::{Currency, Money};
    /// let price = Money::from_decimal(15.99, Currency::INR);
    /// assert_eq!(price.amount_minor, 1599);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let minor = (amount * currency.minor_per_major() as f64).round() as i64;
        Self::new(minor, currency)
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    pub fn is_positive(&self) -> bool {
        self.amount_minor > 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    pub fn to_decimal(&self) -> f64 {
        self.amount_minor as f64 / self.currency.minor_per_major() as f64
    }

    /// Format with symbol, e.g. "₹1000.00".
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format without symbol, e.g. "1000.00".
    pub fn display_amount(&self) -> String {
        let per = self.currency.minor_per_major();
        let sign = if self.amount_minor < 0 { "-" } else { "" };
        let abs = self.amount_minor.unsigned_abs();
        let places = self.currency.decimal_places() as usize;
        format!(
            "{sign}{}.{:0places$}",
            abs / per as u64,
            abs % per as u64
        )
    }

    pub fn checked_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let amount = self.amount_minor.checked_add(other.amount_minor)?;
        Some(Money::new(amount, self.currency))
    }

    pub fn checked_sub(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let amount = self.amount_minor.checked_sub(other.amount_minor)?;
        Some(Money::new(amount, self.currency))
    }

    pub fn checked_mul(&self, factor: i64) -> Option<Money> {
        let amount = self.amount_minor.checked_mul(factor)?;
        Some(Money::new(amount, self.currency))
    }

    /// `percent`% of this amount, rounded half away from zero.
    pub fn percentage(&self, percent: f64) -> Money {
        let amount = (self.amount_minor as f64 * percent / 100.0).round() as i64;
        Money::new(amount, self.currency)
    }

    /// Clamp negative amounts to zero.
    pub fn non_negative(&self) -> Money {
        Money::new(self.amount_minor.max(0), self.currency)
    }

    /// The smaller of `self` and `cap`. A cap in another currency does not
    /// apply and `self` is returned.
    pub fn at_most(&self, cap: &Money) -> Money {
        match self.partial_cmp(cap) {
            Some(Ordering::Greater) => *cap,
            _ => *self,
        }
    }

    /// Convert into another currency at `rate` target units per source unit.
    pub fn convert(&self, to: Currency, rate: f64) -> Money {
        Money::from_decimal(self.to_decimal() * rate, to)
    }

    /// Sum an iterator of Money values, `None` on overflow or mixed currencies.
    pub fn try_sum<'a>(
        mut iter: impl Iterator<Item = &'a Money>,
        currency: Currency,
    ) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.checked_add(m))
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.currency != other.currency {
            return None;
        }
        Some(self.amount_minor.cmp(&other.amount_minor))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inr(major: f64) -> Money {
        Money::from_decimal(major, Currency::INR)
    }

    #[test]
    fn test_from_decimal_rounds() {
        assert_eq!(inr(15.99).amount_minor, 1599);
        assert_eq!(inr(4150.0).amount_minor, 415000);
    }

    #[test]
    fn test_display() {
        assert_eq!(inr(1000.0).display(), "\u{20b9}1000.00");
        assert_eq!(Money::new(49717, Currency::INR).display_amount(), "497.17");
        assert_eq!(Money::new(-5, Currency::INR).display_amount(), "-0.05");
        assert_eq!(Money::new(599, Currency::USD).to_string(), "$5.99");
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = inr(10.0);
        let b = inr(2.5);
        assert_eq!(a.checked_add(&b), Some(inr(12.5)));
        assert_eq!(b.checked_sub(&a), Some(inr(-7.5)));
        assert_eq!(b.checked_mul(4), Some(inr(10.0)));
        assert_eq!(Money::new(i64::MAX, Currency::INR).checked_add(&b), None);
    }

    #[test]
    fn test_currency_mismatch_is_none() {
        let usd = Money::new(100, Currency::USD);
        assert_eq!(inr(1.0).checked_add(&usd), None);
        assert_eq!(inr(1.0).partial_cmp(&usd), None);
    }

    #[test]
    fn test_at_most_ignores_foreign_cap() {
        let amount = Money::new(5_000, Currency::INR);
        assert_eq!(amount.at_most(&Money::new(3_000, Currency::INR)).amount_minor, 3_000);
        assert_eq!(amount.at_most(&Money::new(100, Currency::USD)), amount);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(inr(1000.0).percentage(10.0), inr(100.0));
        assert_eq!(inr(333.33).percentage(15.0), Money::new(5000, Currency::INR));
    }

    #[test]
    fn test_convert_usd_to_inr() {
        let fee = Money::new(599, Currency::USD).convert(Currency::INR, 83.0);
        assert_eq!(fee, Money::new(49717, Currency::INR));
    }

    #[test]
    fn test_try_sum() {
        let items = [inr(1.0), inr(2.0), inr(3.5)];
        assert_eq!(Money::try_sum(items.iter(), Currency::INR), Some(inr(6.5)));
        assert_eq!(
            Money::try_sum(std::iter::empty(), Currency::INR),
            Some(Money::zero(Currency::INR))
        );
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("inr"), Some(Currency::INR));
        assert_eq!(Currency::from_code("EUR"), None);
    }
}
