//! # Text Processing Module
//!
//! This module provides text processing utilities for receipt analysis,
//! including OCR text normalization and regex-based line-item extraction.
//!
//! ## Features
//!
//! - OCR cleanup: restricts raw text to a safe character alphabet and
//!   canonicalizes whitespace so pattern matching is reliable
//! - Item extraction using a compiled regex pattern with named capture groups
//! - **Greedy name matching**: a run of letters/spaces before a price is the
//!   item name, so adjacent items whose separator was destroyed by OCR noise
//!   merge into a single name (known limitation, preserved deliberately)
//! - Configurable extraction pattern and name-length cap

use crate::errors::{AppError, AppResult};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

/// A single (name, price) pair extracted from normalized receipt text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedItem {
    /// The item name as it appeared on the receipt, trimmed (e.g., "MILK")
    pub name: String,
    /// The price in receipt currency units (e.g., 2.50)
    pub price: f64,
}

/// Configuration options for line-item extraction
#[derive(Clone, Debug)]
pub struct ExtractionConfig {
    /// Custom regex pattern for items. If None, uses the default pattern
    pub custom_pattern: Option<String>,
    /// Maximum length for item names in characters (truncated if longer)
    pub max_name_length: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            custom_pattern: None,
            max_name_length: 100,
        }
    }
}

impl ExtractionConfig {
    /// Validate extraction configuration parameters
    pub fn validate(&self) -> AppResult<()> {
        if self.max_name_length == 0 {
            return Err(AppError::Config(
                "max_name_length must be greater than 0".to_string(),
            ));
        }

        if let Some(pattern) = &self.custom_pattern {
            if pattern.trim().is_empty() {
                return Err(AppError::Config(
                    "custom_pattern cannot be empty if provided".to_string(),
                ));
            }
            if Regex::new(pattern).is_err() {
                return Err(AppError::Config(format!(
                    "custom_pattern '{}' is not a valid regex",
                    pattern
                )));
            }
        }

        Ok(())
    }
}

// Characters outside the receipt alphabet {A-Z a-z 0-9 . whitespace $} are
// replaced with a space before matching. Keeping '.' is what makes price
// detection possible; keeping '$' lets currency markers survive as gaps.
lazy_static! {
    static ref DISALLOWED_CHARS: Regex =
        Regex::new(r"[^a-zA-Z0-9.\s$]").expect("Disallowed-character pattern should be valid");
    static ref WHITESPACE_RUNS: Regex =
        Regex::new(r"\s+").expect("Whitespace pattern should be valid");
}

// Default item pattern: a run of letters/spaces (the name), required
// whitespace, then a price with exactly two fractional digits. Matching is
// greedy and non-overlapping, scanning left to right.
const DEFAULT_ITEM_PATTERN: &str = r"(?P<name>[a-zA-Z ]+)\s+(?P<price>\d+\.\d{2})";

// Lazy static regex for the default pattern to avoid recompilation
lazy_static! {
    static ref DEFAULT_REGEX: Regex =
        Regex::new(DEFAULT_ITEM_PATTERN).expect("Default item pattern should be valid");
}

/// Normalize raw OCR text into the restricted receipt alphabet.
///
/// Every character outside {A-Z, a-z, 0-9, `.`, whitespace, `$`} is replaced
/// with a single space, runs of whitespace are collapsed to one space, and
/// leading/trailing whitespace is trimmed.
///
/// This function is pure, total and idempotent: it never fails, empty input
/// yields empty output, and `normalize(normalize(s)) == normalize(s)`.
///
/// # Examples
///
/// ```rust
/// use receipt_footprint::text_processing::normalize;
///
/// assert_eq!(normalize("MILK***2.50\n\nBREAD  3.00"), "MILK 2.50 BREAD 3.00");
/// assert_eq!(normalize("   "), "");
/// ```
pub fn normalize(raw: &str) -> String {
    let stripped = DISALLOWED_CHARS.replace_all(raw, " ");
    let collapsed = WHITESPACE_RUNS.replace_all(&stripped, " ");
    let result = collapsed.trim().to_string();
    trace!(
        raw_len = raw.len(),
        normalized_len = result.len(),
        "Normalized receipt text"
    );
    result
}

/// Line-item extractor using a compiled regex pattern
pub struct ItemExtractor {
    /// Compiled regex pattern for detecting items
    pattern: Regex,
    /// Configuration options
    config: ExtractionConfig,
}

impl ItemExtractor {
    /// Create a new item extractor with the default pattern
    ///
    /// The pattern matches a name (letters and spaces), required whitespace,
    /// and a price with exactly two fractional digits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use receipt_footprint::text_processing::ItemExtractor;
    ///
    /// let extractor = ItemExtractor::new().unwrap();
    /// ```
    pub fn new() -> Result<Self, regex::Error> {
        debug!("Creating new ItemExtractor with default configuration");
        Ok(Self {
            pattern: DEFAULT_REGEX.clone(),
            config: ExtractionConfig::default(),
        })
    }

    /// Create an item extractor with a custom regex pattern
    ///
    /// # Arguments
    ///
    /// * `pattern` - Custom regex pattern string
    ///
    /// # Examples
    ///
    /// ```rust
    /// use receipt_footprint::text_processing::ItemExtractor;
    ///
    /// let extractor = ItemExtractor::with_pattern(r"(?P<name>[A-Z ]+)\s+(?P<price>\d+\.\d{2})")?;
    /// # Ok::<(), regex::Error>(())
    /// ```
    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(pattern)?;
        Ok(Self {
            pattern,
            config: ExtractionConfig::default(),
        })
    }

    /// Create an item extractor with custom configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration options for the extractor
    pub fn with_config(config: ExtractionConfig) -> Result<Self, regex::Error> {
        // Validate configuration first
        if let Err(e) = config.validate() {
            crate::errors::error_logging::log_validation_error(
                &e,
                "with_config",
                "extraction_config",
                config.custom_pattern.as_deref(),
            );
            return Err(regex::Error::Syntax(format!(
                "Invalid configuration: {}",
                e
            )));
        }

        let pattern = if let Some(custom_pattern) = &config.custom_pattern {
            debug!("Using custom item pattern: {}", custom_pattern);
            Regex::new(custom_pattern)?
        } else {
            debug!("Using default item pattern");
            DEFAULT_REGEX.clone()
        };

        info!(
            max_name_length = config.max_name_length,
            "Creating ItemExtractor with custom config"
        );

        Ok(Self { pattern, config })
    }

    /// Extract all (name, price) line items from normalized receipt text
    ///
    /// Scans left to right for non-overlapping matches of the item pattern.
    /// The name portion is greedy: alphabetic content between two prices is
    /// folded into the name preceding the second price. Names are trimmed and
    /// truncated to the configured maximum length.
    ///
    /// Absence of matches is a valid, non-exceptional result: the function
    /// returns an empty vector and never errors.
    ///
    /// # Arguments
    ///
    /// * `text` - Normalized receipt text (see [`normalize`])
    ///
    /// # Examples
    ///
    /// ```rust
    /// use receipt_footprint::text_processing::ItemExtractor;
    ///
    /// let extractor = ItemExtractor::new().unwrap();
    /// let items = extractor.extract("MILK 2.50 BREAD 3.00");
    ///
    /// assert_eq!(items.len(), 2);
    /// assert_eq!(items[0].name, "MILK");
    /// assert_eq!(items[0].price, 2.50);
    /// ```
    pub fn extract(&self, text: &str) -> Vec<ExtractedItem> {
        let mut items = Vec::new();

        debug!(text_len = text.len(), "Scanning text for line items");

        for capture in self.pattern.captures_iter(text) {
            let name_match = capture.name("name").map(|m| m.as_str()).unwrap_or("");
            let price_str = capture.name("price").map(|m| m.as_str()).unwrap_or("");

            trace!(name = %name_match, price = %price_str, "Found item candidate");

            let price: f64 = match price_str.parse() {
                Ok(p) => p,
                Err(e) => {
                    // Unreachable with the default pattern, but a custom
                    // pattern may capture something f64 cannot parse.
                    warn!(price = %price_str, error = %e, "Skipping item with unparseable price");
                    continue;
                }
            };

            let mut name = name_match.trim().to_string();
            if name.chars().count() > self.config.max_name_length {
                name = name.chars().take(self.config.max_name_length).collect();
                name = name.trim_end().to_string();
                debug!(name = %name, "Truncated over-long item name");
            }

            items.push(ExtractedItem { name, price });
        }

        debug!(item_count = items.len(), "Item extraction complete");
        items
    }

    /// Check whether the text contains at least one extractable line item
    pub fn has_items(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Get the pattern string used by this extractor
    pub fn pattern_str(&self) -> &str {
        self.pattern.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_config_validation() {
        let mut config = ExtractionConfig::default();

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Test invalid max_name_length
        config.max_name_length = 0;
        assert!(config.validate().is_err());
        config.max_name_length = 100;

        // Test invalid custom pattern (empty)
        config.custom_pattern = Some("".to_string());
        assert!(config.validate().is_err());

        // Test invalid custom pattern (invalid regex)
        config.custom_pattern = Some("[invalid".to_string());
        assert!(config.validate().is_err());

        // Test valid custom pattern
        config.custom_pattern = Some(r"(?P<name>\w+)\s+(?P<price>\d+\.\d{2})".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_extractor_with_invalid_config() {
        let invalid_config = ExtractionConfig {
            max_name_length: 0,
            ..Default::default()
        };
        assert!(ItemExtractor::with_config(invalid_config).is_err());

        let invalid_config = ExtractionConfig {
            custom_pattern: Some("[invalid".to_string()),
            ..Default::default()
        };
        assert!(ItemExtractor::with_config(invalid_config).is_err());
    }

    #[test]
    fn test_name_truncation() {
        let config = ExtractionConfig {
            max_name_length: 4,
            ..Default::default()
        };
        let extractor = ItemExtractor::with_config(config).unwrap();

        let items = extractor.extract("CHOCOLATE 4.20");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "CHOC");
    }

    #[test]
    fn test_normalize_strips_currency_noise() {
        assert_eq!(normalize("MILK $2.50"), "MILK $2.50");
        assert_eq!(normalize("MILK €2.50"), "MILK 2.50");
        assert_eq!(normalize("BREAD*#!3.00"), "BREAD 3.00");
    }
}
