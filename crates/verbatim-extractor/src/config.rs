//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound for themes requested per group
pub const MAX_THEMES_PER_GROUP: u32 = 10;

/// Upper bound for quotes requested per participant per theme
pub const MAX_QUOTES_PER_THEME: u32 = 5;

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Model identifier sent with every request
    pub model: String,

    /// Themes to propose per group (1-10)
    pub theme_max_count: u32,

    /// Sampling temperature for theme definition
    pub theme_temperature: f32,

    /// Quotes to extract per participant per theme (1-5)
    pub quote_max_count: u32,

    /// Sampling temperature for quote extraction
    pub quote_temperature: f32,

    /// Sampling temperature for free-form chat
    pub chat_temperature: f32,

    /// Extra instructions appended to every quote prompt
    pub additional_notes: String,

    /// Maximum time for a single model call (seconds)
    pub request_timeout_secs: u64,

    /// Quote extraction calls allowed in flight at once; 1 runs documents
    /// sequentially
    pub max_concurrent_requests: usize,
}

impl ExtractorConfig {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if !(1..=MAX_THEMES_PER_GROUP).contains(&self.theme_max_count) {
            return Err(format!(
                "theme_max_count must be between 1 and {}",
                MAX_THEMES_PER_GROUP
            ));
        }
        if !(1..=MAX_QUOTES_PER_THEME).contains(&self.quote_max_count) {
            return Err(format!(
                "quote_max_count must be between 1 and {}",
                MAX_QUOTES_PER_THEME
            ));
        }
        for (name, value) in [
            ("theme_temperature", self.theme_temperature),
            ("quote_temperature", self.quote_temperature),
            ("chat_temperature", self.chat_temperature),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} {} out of range [0.0, 1.0]", name, value));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.max_concurrent_requests == 0 {
            return Err("max_concurrent_requests must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            theme_max_count: 5,
            theme_temperature: 1.0,
            quote_max_count: 1,
            quote_temperature: 0.3,
            chat_temperature: 1.0,
            additional_notes: String::new(),
            request_timeout_secs: 120,
            max_concurrent_requests: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_theme_count_bounds() {
        let mut config = ExtractorConfig::default();
        config.theme_max_count = 0;
        assert!(config.validate().is_err());
        config.theme_max_count = 11;
        assert!(config.validate().is_err());
        config.theme_max_count = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_quote_count_bounds() {
        let mut config = ExtractorConfig::default();
        config.quote_max_count = 6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_temperature_out_of_range() {
        let mut config = ExtractorConfig::default();
        config.quote_temperature = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.contains("quote_temperature"));

        let mut config = ExtractorConfig::default();
        config.chat_temperature = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_and_concurrency_rejected() {
        let mut config = ExtractorConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.max_concurrent_requests = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_model_rejected() {
        let mut config = ExtractorConfig::default();
        config.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ExtractorConfig::default();
        config.additional_notes = "Prefer short quotes".to_string();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ExtractorConfig::from_toml("model = \"gpt-4o\"\nquote_max_count = 3\n").unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.quote_max_count, 3);
        assert_eq!(config.theme_max_count, 5);
    }
}
