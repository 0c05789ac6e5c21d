//! Service layer for minibank
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, computed fields, and cross-entity operations.

pub mod account;
pub mod analytics;
pub mod auto_payment;
pub mod budget;
pub mod deposit;
pub mod import;
pub mod ledger;
pub mod limits;
pub mod security;
pub mod subscription;
pub mod template;
pub mod transaction;

pub use account::{AccountService, BalanceOverview};
pub use analytics::{AnalyticsReport, AnalyticsService, CategoryShare, MonthTotals};
pub use auto_payment::{AutoPaymentService, AutoPaymentUpdate, RunOutcome};
pub use budget::{BudgetService, BudgetStatus};
pub use deposit::{DepositQuote, DepositService, DepositSummary};
pub use import::{ImportResult, ImportService};
pub use ledger::{LedgerAction, LedgerOutcome, LedgerService};
pub use limits::{LimitService, LimitStatus, SpendingAlert};
pub use security::SecurityService;
pub use subscription::{SubscriptionService, SubscriptionUpdate, UpcomingCharge};
pub use template::{TemplateService, TemplateUpdate};
pub use transaction::{TransactionFilter, TransactionService};
