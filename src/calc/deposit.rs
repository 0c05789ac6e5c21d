//! Simple deposit interest
//!
//! Non-compounding estimate: amount × rate × months / 12, rounded to whole
//! currency units.

use crate::models::Money;

/// Interest earned on `amount` at `annual_rate` percent over `months`
pub fn simple_interest(amount: Money, annual_rate: f64, months: u32) -> Money {
    let units = amount.as_units_f64() * (annual_rate / 100.0) * (months as f64 / 12.0);
    Money::from_units(units.round() as i64)
}

/// Principal plus interest at the end of the term
pub fn value_at_maturity(amount: Money, annual_rate: f64, months: u32) -> Money {
    amount + simple_interest(amount, annual_rate, months)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_year() {
        let interest = simple_interest(Money::from_units(500_000), 15.0, 12);
        assert_eq!(interest, Money::from_units(75_000));
    }

    #[test]
    fn test_half_year() {
        let interest = simple_interest(Money::from_units(500_000), 15.0, 6);
        assert_eq!(interest, Money::from_units(37_500));
    }

    #[test]
    fn test_rounds_to_whole_units() {
        // 1000 * 0.07 * 1/12 = 5.833...
        assert_eq!(simple_interest(Money::from_units(1000), 7.0, 1), Money::from_units(6));
        assert_eq!(simple_interest(Money::from_units(1000), 7.0, 0), Money::zero());
    }

    #[test]
    fn test_value_at_maturity() {
        assert_eq!(
            value_at_maturity(Money::from_units(100_000), 10.0, 12),
            Money::from_units(110_000)
        );
    }
}
