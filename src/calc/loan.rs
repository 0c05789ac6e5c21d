//! Loan annuity calculator
//!
//! Monthly payment for a fixed-rate loan repaid in equal installments, plus
//! the derived totals and a month-by-month schedule.

use serde::Serialize;

use crate::error::{BankError, BankResult};

/// Validated loan parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanTerms {
    /// Amount borrowed, in currency units
    pub principal: f64,
    /// Annual rate in percent
    pub annual_rate: f64,
    /// Term in months
    pub months: u32,
}

/// One row of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub remaining: f64,
}

impl LoanTerms {
    /// Validate and build loan terms
    pub fn new(principal: f64, annual_rate: f64, months: u32) -> BankResult<Self> {
        if !principal.is_finite() || principal <= 0.0 {
            return Err(BankError::Validation(format!(
                "Loan amount must be positive, got {}",
                principal
            )));
        }
        if !annual_rate.is_finite() || annual_rate < 0.0 {
            return Err(BankError::Validation(format!(
                "Loan rate cannot be negative, got {}",
                annual_rate
            )));
        }
        if months == 0 {
            return Err(BankError::Validation(
                "Loan term must be at least one month".into(),
            ));
        }
        Ok(Self {
            principal,
            annual_rate,
            months,
        })
    }

    /// Monthly rate as a fraction
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 100.0 / 12.0
    }

    /// Equal monthly installment
    pub fn monthly_payment(&self) -> f64 {
        let r = self.monthly_rate();
        let n = self.months as f64;
        if r == 0.0 {
            return self.principal / n;
        }
        let growth = (1.0 + r).powf(n);
        self.principal * r * growth / (growth - 1.0)
    }

    /// Sum of all installments
    pub fn total_paid(&self) -> f64 {
        self.monthly_payment() * self.months as f64
    }

    /// Interest paid over the whole term
    pub fn overpayment(&self) -> f64 {
        self.total_paid() - self.principal
    }

    /// Month-by-month split of each payment into interest and principal
    ///
    /// The last row absorbs floating-point residue so the balance ends at zero.
    pub fn schedule(&self) -> Vec<ScheduleRow> {
        let payment = self.monthly_payment();
        let r = self.monthly_rate();
        let mut remaining = self.principal;

        (1..=self.months)
            .map(|month| {
                let interest = remaining * r;
                let mut principal = payment - interest;
                let mut row_payment = payment;
                if month == self.months {
                    principal = remaining;
                    row_payment = principal + interest;
                }
                remaining = (remaining - principal).max(0.0);
                ScheduleRow {
                    month,
                    payment: row_payment,
                    interest,
                    principal,
                    remaining,
                }
            })
            .collect()
    }
}
