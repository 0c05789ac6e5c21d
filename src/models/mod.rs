//! Core data models for minibank
//!
//! This module contains all the data structures of the banking domain:
//! accounts, transactions, budgets, limits, recurring payments and deposits.

pub mod account;
pub mod auto_payment;
pub mod budget;
pub mod deposit;
pub mod ids;
pub mod money;
pub mod period;
pub mod subscription;
pub mod transaction;

pub use account::{Account, AccountKind};
pub use auto_payment::{AutoPayment, PaymentFrequency, PaymentTemplate};
pub use budget::{Budget, SpendingLimit};
pub use deposit::Deposit;
pub use ids::{
    AccountId, AutoPaymentId, BudgetId, DepositId, SpendingLimitId, SubscriptionId, TemplateId,
    TransactionId,
};
pub use money::Money;
pub use period::{months_ago, Period};
pub use subscription::{BillingCycle, Subscription};
pub use transaction::{Direction, Transaction};
