//! Form-wide settings
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional `schemaform.{toml,json,yaml}` file under a root directory, then
//! `SCHEMAFORM_*` environment variables.
//!
//! ```toml
//! date_format = "%d %b %Y"
//! date_locale = "nl_NL"
//! row_height = 40
//! ```

use chrono::{Locale, NaiveDate};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dates::{locale_from_name, DateFormatter};

pub const DEFAULT_DATE_FORMAT: &str = "%d %b %Y";
pub const DEFAULT_DATE_LOCALE: &str = "en_US";

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("Missing required setting: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormSettings {
    /// chrono pattern used to display and commit dates
    pub date_format: String,
    /// Locale name used when formatting dates
    pub date_locale: String,
    /// Strings with a larger `maxLength` get a multi-line widget
    pub textarea_threshold: u64,
    pub textarea_rows: u32,
    pub action_column_width: u32,
    pub row_height: u32,
    pub header_height: u32,
    /// Space reserved for the grid's vertical scrollbar
    pub scrollbar_gutter: u32,
    /// Extra rows/columns rendered beyond the viewport
    pub overscan: usize,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            date_locale: DEFAULT_DATE_LOCALE.to_string(),
            textarea_threshold: 100,
            textarea_rows: 6,
            action_column_width: 95,
            row_height: 36,
            header_height: 40,
            scrollbar_gutter: 16,
            overscan: 2,
        }
    }
}

impl FormSettings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_root(".")
    }

    pub fn from_root(root: &str) -> Result<Self, anyhow::Error> {
        let config_path = std::path::Path::new(root).join("schemaform");
        let defaults = FormSettings::default();

        let s = Config::builder()
            .set_default("date_format", defaults.date_format)?
            .set_default("date_locale", defaults.date_locale)?
            .set_default("textarea_threshold", defaults.textarea_threshold as i64)?
            .set_default("textarea_rows", defaults.textarea_rows as i64)?
            .set_default("action_column_width", defaults.action_column_width as i64)?
            .set_default("row_height", defaults.row_height as i64)?
            .set_default("header_height", defaults.header_height as i64)?
            .set_default("scrollbar_gutter", defaults.scrollbar_gutter as i64)?
            .set_default("overscan", defaults.overscan as i64)?
            .add_source(File::from(config_path).required(false))
            .add_source(Environment::with_prefix("SCHEMAFORM").try_parsing(true))
            .build()?;

        let settings: FormSettings = s.try_deserialize()?;

        settings.validate().map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!("Settings validation failed:\n{}", error_messages.join("\n"))
        })?;

        tracing::debug!(root, date_format = %settings.date_format, "Loaded form settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), Vec<SettingsError>> {
        let mut errors = Vec::new();

        if self.date_format.trim().is_empty() {
            errors.push(SettingsError::MissingField("date_format".to_string()));
        }

        let locale = locale_from_name(&self.date_locale);
        if locale.is_none() {
            errors.push(SettingsError::InvalidValue {
                field: "date_locale".to_string(),
                reason: format!("unknown locale '{}'", self.date_locale),
            });
        }

        if !self.date_format.trim().is_empty() {
            let formatter = DateFormatter::new(&self.date_format, locale.unwrap_or(Locale::en_US));
            let sample = NaiveDate::from_ymd_opt(2000, 1, 31).and_then(|d| d.and_hms_opt(0, 0, 0));
            match sample.and_then(|s| formatter.format(s)) {
                None => errors.push(SettingsError::InvalidValue {
                    field: "date_format".to_string(),
                    reason: format!("invalid pattern '{}'", self.date_format),
                }),
                Some(text) if text.trim().is_empty() => errors.push(SettingsError::InvalidValue {
                    field: "date_format".to_string(),
                    reason: "pattern produces empty output".to_string(),
                }),
                Some(_) => {}
            }
        }

        if self.textarea_rows == 0 {
            errors.push(SettingsError::InvalidValue {
                field: "textarea_rows".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.row_height == 0 {
            errors.push(SettingsError::InvalidValue {
                field: "row_height".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Locale for date formatting, falling back to `en_US` when unknown
    pub fn locale(&self) -> Locale {
        locale_from_name(&self.date_locale).unwrap_or(Locale::en_US)
    }

    pub fn date_formatter(&self) -> DateFormatter<'_> {
        DateFormatter::new(&self.date_format, self.locale())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(FormSettings::default().validate().is_ok());
    }

    #[test]
    fn test_zero_rows_rejected() {
        let settings = FormSettings { textarea_rows: 0, row_height: 0, ..Default::default() };
        let errors = settings.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_unknown_locale_rejected() {
        let settings = FormSettings { date_locale: "zz_ZZ".to_string(), ..Default::default() };
        let errors = settings.validate().unwrap_err();
        assert!(matches!(&errors[0], SettingsError::InvalidValue { field, .. } if field == "date_locale"));
        assert_eq!(settings.locale(), Locale::en_US);
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let settings = FormSettings { date_format: "%Q".to_string(), ..Default::default() };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let settings = FormSettings { date_format: " ".to_string(), ..Default::default() };
        assert_eq!(
            settings.validate().unwrap_err(),
            vec![SettingsError::MissingField("date_format".to_string())]
        );
    }
}
