//! Money type for representing currency amounts
//!
//! Internally stores amounts in minor units (kopecks) as i64 to avoid
//! floating-point drift in balances. Calculators that need fractional math
//! convert through `as_units_f64`/`from_units_f64`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Default currency symbol used by `Display`
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₽";

/// Represents a monetary amount stored as minor units (hundredths of the currency unit)
///
/// The arithmetic operators saturate at the `i64` bounds. Balance changes use
/// `checked_add`/`checked_sub` so an out-of-range result is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from minor units
    ///
    /// # Examples
    /// ```
    /// use minibank_cli::models::Money;
    /// let amount = Money::from_minor(1050); // 10.50
    /// assert_eq!(amount.units(), 10);
    /// ```
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Create a Money amount from whole currency units
    ///
    /// # Examples
    /// ```
    /// use minibank_cli::models::Money;
    /// let amount = Money::from_units(1500);
    /// assert_eq!(amount.minor(), 150_000);
    /// ```
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Create a Money amount from a fractional unit value, rounding to the nearest minor unit
    pub fn from_units_f64(units: f64) -> Self {
        Self((units * 100.0).round() as i64)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in minor units
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the minor portion (0-99)
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// The amount as fractional currency units
    pub fn as_units_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Parse a money amount from a string
    ///
    /// Accepts "1500", "1500.50", "1500,50", "1 500", "-20", "1500 ₽".
    /// Integers are whole currency units.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let cleaned: String = s
            .trim()
            .trim_end_matches(DEFAULT_CURRENCY_SYMBOL)
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
            .map(|c| if c == ',' { '.' } else { c })
            .collect();

        let (negative, body) = match cleaned.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, cleaned.as_str()),
        };

        if body.is_empty() || body.starts_with(['+', '-']) {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let (whole, frac) = body.split_once('.').unwrap_or((body, ""));
        if frac.contains('.') || frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }
        if whole.is_empty() && frac.is_empty() {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else if !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        } else {
            whole
                .parse()
                .map_err(|_| MoneyParseError::OutOfRange(s.to_string()))?
        };
        let frac_value: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().unwrap_or(0) * 10,
            _ => frac.parse::<i64>().unwrap_or(0),
        };

        let minor = whole
            .checked_mul(100)
            .and_then(|m| m.checked_add(frac_value))
            .ok_or_else(|| MoneyParseError::OutOfRange(s.to_string()))?;

        Ok(Self(if negative { -minor } else { minor }))
    }

    /// Addition that reports overflow instead of wrapping
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Subtraction that reports overflow instead of wrapping
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Format with a currency symbol placed after the amount
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}.{:02} {}", self.units().abs(), self.minor_part(), symbol)
        } else {
            format!("{}.{:02} {}", self.units(), self.minor_part(), symbol)
        }
    }

    /// Plain decimal representation without a symbol ("-12.50")
    pub fn to_decimal_string(&self) -> String {
        if self.is_negative() {
            format!("-{}.{:02}", self.units().abs(), self.minor_part())
        } else {
            format!("{}.{:02}", self.units(), self.minor_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol(DEFAULT_CURRENCY_SYMBOL))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::OutOfRange(s) => write!(f, "Amount is too large: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let m = Money::from_minor(1050);
        assert_eq!(m.minor(), 1050);
        assert_eq!(m.units(), 10);
        assert_eq!(m.minor_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(1050).to_string(), "10.50 ₽");
        assert_eq!(Money::zero().to_string(), "0.00 ₽");
        assert_eq!(Money::from_minor(-1050).to_string(), "-10.50 ₽");
        assert_eq!(Money::from_minor(5).to_string(), "0.05 ₽");
        assert_eq!(Money::from_minor(-5).to_decimal_string(), "-0.05");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(10);
        let b = Money::from_units(5);

        assert_eq!((a + b).units(), 15);
        assert_eq!((a - b).units(), 5);
        assert_eq!((-a).units(), -10);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().minor(), 1050);
        assert_eq!(Money::parse("10,5").unwrap().minor(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().minor(), -1050);
        assert_eq!(Money::parse("1 500").unwrap().minor(), 150_000);
        assert_eq!(Money::parse("1500 ₽").unwrap().minor(), 150_000);
        assert_eq!(Money::parse("0.05").unwrap().minor(), 5);
        assert!(Money::parse("").is_err());
        assert!(Money::parse("12.345").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("--5").is_err());
        assert!(Money::parse(".").is_err());
        assert_eq!(Money::parse(".5").unwrap().minor(), 50);
    }

    #[test]
    fn test_parse_rejects_amounts_beyond_range() {
        assert_eq!(
            Money::parse("184467440737095517"),
            Err(MoneyParseError::OutOfRange("184467440737095517".into()))
        );
        assert_eq!(
            Money::parse("92233720368547758.08"),
            Err(MoneyParseError::OutOfRange("92233720368547758.08".into()))
        );
        assert!(matches!(
            Money::parse("99999999999999999999"),
            Err(MoneyParseError::OutOfRange(_))
        ));
        assert_eq!(
            Money::parse("92233720368547758.07").unwrap().minor(),
            i64::MAX
        );
    }

    #[test]
    fn test_checked_arithmetic() {
        let max = Money::from_minor(i64::MAX);
        assert_eq!(max.checked_add(Money::from_minor(1)), None);
        assert_eq!(Money::from_minor(i64::MIN).checked_sub(Money::from_minor(1)), None);
        assert_eq!(
            Money::from_units(10).checked_add(Money::from_units(5)),
            Some(Money::from_units(15))
        );
        assert_eq!(max + Money::from_minor(1), max);
    }

    #[test]
    fn test_from_units_f64_rounds() {
        assert_eq!(Money::from_units_f64(8884.878).minor(), 888_488);
        assert_eq!(Money::from_units_f64(0.004).minor(), 0);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 200, 300].into_iter().map(Money::from_minor).sum();
        assert_eq!(total.minor(), 600);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_minor(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");
    }
}
