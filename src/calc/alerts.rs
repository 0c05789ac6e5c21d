//! Spending percentage alerts
//!
//! Classifies how much of a monthly cap has been used. Shared by spending
//! limits (which raise alerts) and budgets (which only show the tier).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::settings::AlertThresholds;
use crate::models::Money;

/// Alert tier for a capped category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// Spending is approaching the cap (amber)
    Warning,
    /// Spending reached or passed the cap (red)
    Exceeded,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Exceeded => write!(f, "exceeded"),
        }
    }
}

/// Percentage of `limit` used by `spent`
///
/// A non-positive limit yields 0 so that unset caps never alert.
pub fn usage_percent(spent: Money, limit: Money) -> f64 {
    if !limit.is_positive() {
        return 0.0;
    }
    spent.minor() as f64 / limit.minor() as f64 * 100.0
}

/// Tier for a usage percentage
pub fn classify_percent(percent: f64, thresholds: &AlertThresholds) -> Option<AlertLevel> {
    if percent >= thresholds.exceeded_percent {
        Some(AlertLevel::Exceeded)
    } else if percent >= thresholds.warning_percent {
        Some(AlertLevel::Warning)
    } else {
        None
    }
}

/// Tier for `spent` against `limit`
pub fn classify(spent: Money, limit: Money, thresholds: &AlertThresholds) -> Option<AlertLevel> {
    classify_percent(usage_percent(spent, limit), thresholds)
}
