//! Subscriptions, auto-payments and payment templates

use std::collections::HashMap;

use tabled::Tabled;

use crate::config::Settings;
use crate::models::{AccountId, AutoPayment, Money, PaymentTemplate, Subscription};
use crate::services::{RunOutcome, UpcomingCharge};

use super::render_table;

#[derive(Tabled)]
struct SubscriptionRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Cycle")]
    cycle: String,
    #[tabled(rename = "Next charge")]
    next: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Per month")]
    monthly: String,
}

#[derive(Tabled)]
struct AutoPaymentRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Frequency")]
    frequency: String,
    #[tabled(rename = "Next payment")]
    next: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Recipient")]
    recipient: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

fn account_name(names: &HashMap<AccountId, String>, id: &AccountId) -> String {
    names.get(id).cloned().unwrap_or_else(|| id.to_string())
}

fn with_paused(name: &str, active: bool) -> String {
    if active {
        name.to_string()
    } else {
        format!("{} (paused)", name)
    }
}

pub fn format_subscription_list(
    subscriptions: &[Subscription],
    total_monthly: Money,
    settings: &Settings,
) -> String {
    if subscriptions.is_empty() {
        return "No subscriptions tracked.".to_string();
    }

    let rows: Vec<SubscriptionRow> = subscriptions
        .iter()
        .map(|s| SubscriptionRow {
            name: with_paused(&s.name, s.active),
            category: s.category.clone(),
            cycle: s.cycle.to_string(),
            next: settings.format_date(s.next_billing_date),
            amount: settings.format_money(s.amount),
            monthly: settings.format_money(s.monthly_cost()),
        })
        .collect();

    let mut output = render_table(rows, 4);
    output.push_str(&format!(
        "\n\n  Total per month:  {}\n",
        settings.format_money(total_monthly)
    ));
    output
}

/// Charges coming up soon, nearest first
pub fn format_upcoming(charges: &[UpcomingCharge], days: u32, settings: &Settings) -> String {
    if charges.is_empty() {
        return format!("No charges in the next {} days.", days);
    }

    let mut output = format!("Upcoming charges (next {} days):\n", days);
    for charge in charges {
        let when = match charge.days_left {
            0 => "today".to_string(),
            1 => "tomorrow".to_string(),
            n => format!("in {} days", n),
        };
        output.push_str(&format!(
            "  {}  {:<24} {:>14}  {}\n",
            settings.format_date(charge.date),
            charge.subscription.name,
            settings.format_money(charge.subscription.amount),
            when
        ));
    }
    output
}

pub fn format_auto_payment_list(
    payments: &[AutoPayment],
    account_names: &HashMap<AccountId, String>,
    settings: &Settings,
) -> String {
    if payments.is_empty() {
        return "No auto-payments set up.".to_string();
    }

    let rows: Vec<AutoPaymentRow> = payments
        .iter()
        .map(|p| AutoPaymentRow {
            name: with_paused(&p.name, p.enabled),
            provider: p.provider.clone(),
            account: account_name(account_names, &p.account_id),
            frequency: p.frequency.to_string(),
            next: settings.format_date(p.next_payment_date),
            amount: settings.format_money(p.amount),
        })
        .collect();

    render_table(rows, 5)
}

/// What happened on an auto-payment run
pub fn format_run_outcomes(outcomes: &[RunOutcome], settings: &Settings) -> String {
    if outcomes.is_empty() {
        return "No auto-payments due.".to_string();
    }

    let mut output = String::new();
    for outcome in outcomes {
        match outcome {
            RunOutcome::Paid {
                payment,
                transaction,
            } => output.push_str(&format!(
                "Paid    {} {} (next: {})\n",
                payment.name,
                settings.format_money(transaction.amount),
                settings.format_date(payment.next_payment_date)
            )),
            RunOutcome::Failed { payment, error } => {
                output.push_str(&format!("Failed  {}: {}\n", payment.name, error))
            }
        }
    }

    let paid = outcomes.iter().filter(|o| o.is_paid()).count();
    output.push_str(&format!("\n{} paid, {} failed\n", paid, outcomes.len() - paid));
    output
}

pub fn format_template_list(
    templates: &[PaymentTemplate],
    account_names: &HashMap<AccountId, String>,
    settings: &Settings,
) -> String {
    if templates.is_empty() {
        return "No payment templates saved.".to_string();
    }

    let rows: Vec<TemplateRow> = templates
        .iter()
        .map(|t| TemplateRow {
            name: t.name.clone(),
            recipient: t.recipient.clone(),
            category: t.category.clone(),
            account: t
                .account_id
                .map(|id| account_name(account_names, &id))
                .unwrap_or_else(|| "ask".to_string()),
            amount: t
                .amount
                .map(|m| settings.format_money(m))
                .unwrap_or_else(|| "ask".to_string()),
        })
        .collect();

    render_table(rows, 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BankError;
    use crate::models::{BillingCycle, PaymentFrequency, Transaction};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_subscription_list_shows_total() {
        let mut paused = Subscription::new("Cloud", Money::from_units(99), BillingCycle::Monthly, d(2026, 11, 2));
        paused.active = false;
        let output = format_subscription_list(&[paused], Money::zero(), &Settings::default());
        assert!(output.contains("Cloud (paused)"));
        assert!(output.contains("Total per month:  0.00 ₽"));
    }

    #[test]
    fn test_upcoming_wording() {
        let sub = Subscription::new("Music", Money::from_units(169), BillingCycle::Monthly, d(2026, 10, 18));
        let charges = vec![UpcomingCharge {
            subscription: sub,
            date: d(2026, 10, 18),
            days_left: 1,
        }];
        let output = format_upcoming(&charges, 7, &Settings::default());
        assert!(output.contains("tomorrow"));
        assert_eq!(format_upcoming(&[], 7, &Settings::default()), "No charges in the next 7 days.");
    }

    #[test]
    fn test_run_outcomes_summary() {
        let account = AccountId::new();
        let payment = AutoPayment::new("Internet", "Utilities", Money::from_units(600), account, PaymentFrequency::Monthly, d(2026, 11, 1));
        let transaction = Transaction::outgoing(account, "Internet", "Utilities", Money::from_units(600), d(2026, 10, 1));
        let outcomes = vec![
            RunOutcome::Paid {
                payment: payment.clone(),
                transaction,
            },
            RunOutcome::Failed {
                payment,
                error: BankError::Validation("boom".into()),
            },
        ];
        let output = format_run_outcomes(&outcomes, &Settings::default());
        assert!(output.contains("Paid    Internet 600.00 ₽ (next: 01.11.2026)"));
        assert!(output.contains("1 paid, 1 failed"));
    }

    #[test]
    fn test_template_without_amount() {
        let template = PaymentTemplate::new("Mobile", "Mobile");
        let output = format_template_list(&[template], &HashMap::new(), &Settings::default());
        assert!(output.contains("ask"));
    }
}
