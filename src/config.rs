//! # Unified Application Configuration
//!
//! This module consolidates the configurable surface of the receipt-footprint
//! binary into a single structured configuration object loaded from
//! environment variables, with validation before any work is done.

use crate::errors::{AppError, AppResult};
use crate::text_processing::ExtractionConfig;
use std::env;
use tracing::debug;

/// Application configuration for the receipt-footprint binary
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Line-item extraction options
    pub extraction: ExtractionConfig,
    /// Explicit category table path (`CATEGORY_TABLE_PATH`), if set
    pub category_table_path: Option<String>,
    /// Emit the summary as JSON instead of the human report (`JSON_OUTPUT`)
    pub json_output: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig::default(),
            category_table_path: None,
            json_output: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Recognized variables:
    /// - `ITEM_PATTERN` — custom extraction regex
    /// - `MAX_ITEM_NAME_LENGTH` — name truncation limit (default 100)
    /// - `CATEGORY_TABLE_PATH` — JSON category table override
    /// - `JSON_OUTPUT` — `1`/`true` for JSON output
    pub fn from_env() -> AppResult<Self> {
        let custom_pattern = env::var("ITEM_PATTERN").ok().filter(|p| !p.is_empty());

        let max_name_length = match env::var("MAX_ITEM_NAME_LENGTH") {
            Ok(value) => value.parse::<usize>().map_err(|_| {
                AppError::Config(format!(
                    "MAX_ITEM_NAME_LENGTH '{}' must be a valid number",
                    value
                ))
            })?,
            Err(_) => ExtractionConfig::default().max_name_length,
        };

        let category_table_path = env::var("CATEGORY_TABLE_PATH").ok();

        let json_output = matches!(
            env::var("JSON_OUTPUT").as_deref(),
            Ok("1") | Ok("true") | Ok("TRUE")
        );

        let config = Self {
            extraction: ExtractionConfig {
                custom_pattern,
                max_name_length,
            },
            category_table_path,
            json_output,
        };

        debug!(?config, "Loaded application configuration from environment");
        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.extraction.validate()?;

        if let Some(path) = &self.category_table_path {
            if path.trim().is_empty() {
                return Err(AppError::Config(
                    "CATEGORY_TABLE_PATH cannot be empty if set".to_string(),
                ));
            }
        }

        Ok(())
    }
}
