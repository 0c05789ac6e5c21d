//! User settings for minibank
//!
//! Display preferences, export format and alert thresholds.

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::paths::BankPaths;
use crate::error::BankError;
use crate::models::Money;

/// Field delimiter for CSV exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CsvDelimiter {
    /// `;`, what spreadsheet apps in comma-decimal locales expect
    #[default]
    Semicolon,
    Comma,
}

impl CsvDelimiter {
    pub fn as_byte(&self) -> u8 {
        match self {
            Self::Semicolon => b';',
            Self::Comma => b',',
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "semicolon" | ";" => Some(Self::Semicolon),
            "comma" | "," => Some(Self::Comma),
            _ => None,
        }
    }
}

/// Percentages at which spending alerts fire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    #[serde(default = "default_warning_percent")]
    pub warning_percent: f64,
    #[serde(default = "default_exceeded_percent")]
    pub exceeded_percent: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            warning_percent: default_warning_percent(),
            exceeded_percent: default_exceeded_percent(),
        }
    }
}

fn default_warning_percent() -> f64 {
    80.0
}

fn default_exceeded_percent() -> f64 {
    100.0
}

/// User settings for minibank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub csv_delimiter: CsvDelimiter,

    #[serde(default)]
    pub alert_thresholds: AlertThresholds,

    /// How many days ahead "upcoming" subscription charges look
    #[serde(default = "default_upcoming_days")]
    pub upcoming_days: u32,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    crate::models::money::DEFAULT_CURRENCY_SYMBOL.to_string()
}

fn default_date_format() -> String {
    "%d.%m.%Y".to_string()
}

fn default_upcoming_days() -> u32 {
    7
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            csv_delimiter: CsvDelimiter::default(),
            alert_thresholds: AlertThresholds::default(),
            upcoming_days: default_upcoming_days(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &BankPaths) -> Result<Self, BankError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| BankError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| BankError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BankPaths) -> Result<(), BankError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BankError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BankError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject threshold combinations that would never alert sensibly
    pub fn validate(&self) -> Result<(), BankError> {
        let t = &self.alert_thresholds;
        if t.warning_percent <= 0.0 || t.warning_percent >= t.exceeded_percent {
            return Err(BankError::Config(format!(
                "Warning threshold ({}%) must be positive and below the exceeded threshold ({}%)",
                t.warning_percent, t.exceeded_percent
            )));
        }
        if StrftimeItems::new(&self.date_format).any(|item| item == Item::Error) {
            return Err(BankError::Config(format!(
                "Invalid date format '{}'",
                self.date_format
            )));
        }
        Ok(())
    }

    /// Names accepted by [`Settings::set`]
    pub const KEYS: [&'static str; 6] = [
        "currency",
        "date-format",
        "csv-delimiter",
        "warning-percent",
        "exceeded-percent",
        "upcoming-days",
    ];

    /// Change one setting from its command-line form
    ///
    /// The result is validated; on error `self` is left unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), BankError> {
        let invalid = || BankError::Config(format!("Invalid value for {}: '{}'", key, value));
        let mut updated = self.clone();

        match key {
            "currency" => updated.currency_symbol = value.trim().to_string(),
            "date-format" => updated.date_format = value.to_string(),
            "csv-delimiter" => {
                updated.csv_delimiter = CsvDelimiter::parse(value).ok_or_else(invalid)?
            }
            "warning-percent" => {
                updated.alert_thresholds.warning_percent = value.parse().map_err(|_| invalid())?
            }
            "exceeded-percent" => {
                updated.alert_thresholds.exceeded_percent = value.parse().map_err(|_| invalid())?
            }
            "upcoming-days" => updated.upcoming_days = value.parse().map_err(|_| invalid())?,
            _ => {
                return Err(BankError::Config(format!(
                    "Unknown setting '{}'. Known settings: {}",
                    key,
                    Self::KEYS.join(", ")
                )))
            }
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Render a date with the configured format
    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }

    /// Render an amount with the configured currency symbol
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}
