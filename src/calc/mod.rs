//! Financial calculators
//!
//! Pure arithmetic with no storage access: loan annuity payments, simple
//! deposit interest and spending alert tiers.

pub mod alerts;
pub mod deposit;
pub mod loan;

pub use alerts::{classify, usage_percent, AlertLevel};
pub use deposit::simple_interest;
pub use loan::{LoanTerms, ScheduleRow};
