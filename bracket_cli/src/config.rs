//! CLI configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use bracket_engine::bracket::{BracketConfig, ByePolicy, GrandFinalsMode};
use std::str::FromStr;

/// Complete CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Rules for newly built brackets
    pub bracket: BracketConfig,
    /// Pretty-print bracket JSON
    pub pretty_json: bool,
    /// Largest accepted entrant list
    pub max_competitors: usize,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Returns
    ///
    /// * `Result<CliConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to an unrecognised value
    pub fn from_env() -> Result<Self, ConfigError> {
        let bye_policy: ByePolicy = parse_choice("BRACKET_BYE_POLICY")?.unwrap_or_default();
        let grand_finals: GrandFinalsMode =
            parse_choice("BRACKET_GRAND_FINALS")?.unwrap_or_default();

        let config = CliConfig {
            bracket: BracketConfig::default()
                .with_bye_policy(bye_policy)
                .with_grand_finals(grand_finals),
            pretty_json: parse_env_or("BRACKET_PRETTY_JSON", true),
            max_competitors: parse_env_or("BRACKET_MAX_COMPETITORS", 1024),
        };
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_competitors < 2 {
            return Err(ConfigError::Invalid {
                var: "BRACKET_MAX_COMPETITORS".to_string(),
                reason: "Must be at least 2".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            bracket: BracketConfig::default(),
            pretty_json: true,
            max_competitors: 1024,
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Enum-valued variable: unset is `None`, unknown values are errors
fn parse_choice<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr<Err = String>,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|reason| ConfigError::Invalid {
                var: key.to_string(),
                reason,
            }),
        Err(_) => Ok(None),
    }
}
