//! User settings for fairshare
//!
//! Manages the currency symbol, ledger limits, rounding tolerances and the
//! default handling of unknown people.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::paths::FairsharePaths;
use crate::error::FairshareError;
use crate::models::{LedgerLimits, Tolerances};

/// What to do when an expense names someone who is not registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingPersonMode {
    /// Ask interactively
    #[default]
    Prompt,
    /// Register them without asking
    Create,
    /// Reject the expense
    Reject,
}

/// User settings for fairshare
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when displaying amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    #[serde(default)]
    pub limits: LedgerLimits,

    #[serde(default)]
    pub tolerances: Tolerances,

    #[serde(default)]
    pub missing_person: MissingPersonMode,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "£".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            limits: LedgerLimits::default(),
            tolerances: Tolerances::default(),
            missing_person: MissingPersonMode::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &FairsharePaths) -> Result<Self, FairshareError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not persisted until the caller asks
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| FairshareError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            FairshareError::Config(format!("Failed to parse settings file: {}", e))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FairsharePaths) -> Result<(), FairshareError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            FairshareError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FairshareError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject limits and tolerances that would make every expense invalid
    pub fn validate(&self) -> Result<(), FairshareError> {
        let limits = &self.limits;
        if limits.max_name_length == 0 || limits.max_people == 0 || limits.max_participants == 0
        {
            return Err(FairshareError::Config(
                "Ledger limits must be greater than zero".into(),
            ));
        }
        if !limits.max_amount.is_positive() {
            return Err(FairshareError::Config(
                "Maximum expense amount must be positive".into(),
            ));
        }
        if self.tolerances.settlement.is_negative() || self.tolerances.percentage.is_sign_negative()
        {
            return Err(FairshareError::Config(
                "Tolerances cannot be negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "£");
        assert_eq!(settings.missing_person, MissingPersonMode::Prompt);
        assert_eq!(settings.limits.max_people, 1000);
        assert_eq!(settings.tolerances.settlement, Money::from_cents(1));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FairsharePaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FairsharePaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.currency_symbol = "€".into();
        settings.missing_person = MissingPersonMode::Reject;
        settings.limits.max_participants = 12;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FairsharePaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.settings_file(),
            r#"{"currency_symbol": "$", "missing_person": "create"}"#,
        )
        .unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "$");
        assert_eq!(loaded.missing_person, MissingPersonMode::Create);
        assert_eq!(loaded.limits, LedgerLimits::default());
    }

    #[test]
    fn test_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FairsharePaths::with_base_dir(temp_dir.path().to_path_buf());

        std::fs::write(paths.settings_file(), "not json").unwrap();
        assert!(matches!(
            Settings::load_or_create(&paths),
            Err(FairshareError::Config(_))
        ));

        std::fs::write(paths.settings_file(), r#"{"limits": {"max_people": 0}}"#).unwrap();
        assert!(matches!(
            Settings::load_or_create(&paths),
            Err(FairshareError::Config(_))
        ));
    }
}
