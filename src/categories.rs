//! # Category Table Module
//!
//! This module provides the spending-category configuration for receipt
//! analysis: an explicitly ordered list of category rules, each carrying a
//! keyword set and a carbon factor (estimated kg CO2 per unit currency).
//!
//! ## Features
//!
//! - Fixed category set with a deterministic declaration order
//! - First-match substring classification: when a name matches keywords from
//!   two categories, the earlier-declared category wins
//! - Optional JSON config file overriding keywords, factors and order
//!   (`CATEGORY_TABLE_PATH` or `config/category_table.json`)
//!
//! The table is read-only after construction and safe to share across threads.

use crate::errors::{AppError, AppResult};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use tracing::{debug, info, trace, warn};

/// Carbon factor applied when a classified category has no table entry.
///
/// Classification as designed never produces such a category; this exists for
/// config files that omit an entry.
pub const DEFAULT_CARBON_FACTOR: f64 = 0.2;

/// A spending category for receipt line items.
///
/// The declaration order is significant: it is the classification tie-break
/// order, and the derived `Ord` follows it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Category {
    Alcohol,
    Bakery,
    Produce,
    Dairy,
    PersonalCare,
    Household,
    /// Catch-all default for items matching no keyword
    Other,
}

impl Category {
    /// All categories in declaration (tie-break) order
    pub const ALL: [Category; 7] = [
        Category::Alcohol,
        Category::Bakery,
        Category::Produce,
        Category::Dairy,
        Category::PersonalCare,
        Category::Household,
        Category::Other,
    ];

    /// Category name as used in config files and presentation
    pub fn name(&self) -> &'static str {
        match self {
            Category::Alcohol => "Alcohol",
            Category::Bakery => "Bakery",
            Category::Produce => "Produce",
            Category::Dairy => "Dairy",
            Category::PersonalCare => "PersonalCare",
            Category::Household => "Household",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of the category table: category, keywords and carbon factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// The category this rule assigns
    pub category: Category,
    /// Lowercase keywords matched as substrings of the lowercased item name
    pub keywords: Vec<String>,
    /// Estimated kg CO2 emitted per unit currency spent in this category
    pub carbon_factor: f64,
}

/// Category table configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTableConfig {
    pub categories: Vec<CategoryRule>,
}

impl CategoryTableConfig {
    /// Validate category table configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.categories.is_empty() {
            return Err(AppError::Config(
                "category table cannot be empty".to_string(),
            ));
        }

        let mut seen: HashSet<Category> = HashSet::new();
        for (i, rule) in self.categories.iter().enumerate() {
            if !seen.insert(rule.category) {
                return Err(AppError::Config(format!(
                    "categories[{}] duplicates category '{}'",
                    i, rule.category
                )));
            }

            if !rule.carbon_factor.is_finite() || rule.carbon_factor <= 0.0 {
                return Err(AppError::Config(format!(
                    "categories[{}] '{}' carbon_factor must be a positive finite number",
                    i, rule.category
                )));
            }

            if rule.category == Category::Other {
                if !rule.keywords.is_empty() {
                    return Err(AppError::Config(format!(
                        "categories[{}] 'Other' is the default category and cannot carry keywords",
                        i
                    )));
                }
                continue;
            }

            if rule.keywords.is_empty() {
                return Err(AppError::Config(format!(
                    "categories[{}] '{}' must have at least one keyword",
                    i, rule.category
                )));
            }

            for (j, keyword) in rule.keywords.iter().enumerate() {
                if keyword.trim().is_empty() {
                    return Err(AppError::Config(format!(
                        "categories[{}].keywords[{}] cannot be empty",
                        i, j
                    )));
                }
                if keyword.chars().any(|c| c.is_control()) {
                    return Err(AppError::Config(format!(
                        "categories[{}].keywords[{}] '{}' contains control characters",
                        i, j, keyword
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Immutable, explicitly ordered category table
///
/// Classification walks the rules sequentially so that the declared order is
/// the tie-break order. Never backed by a hash map.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
}

lazy_static! {
    static ref DEFAULT_TABLE: CategoryTable = CategoryTable {
        rules: vec![
            CategoryRule {
                category: Category::Alcohol,
                keywords: to_strings(&["beer", "wine", "vodka", "whiskey", "rum", "gin", "coronita"]),
                carbon_factor: 0.7,
            },
            CategoryRule {
                category: Category::Bakery,
                keywords: to_strings(&["bread", "croiss", "bagel", "donut", "cake"]),
                carbon_factor: 0.5,
            },
            CategoryRule {
                category: Category::Produce,
                keywords: to_strings(&[
                    "apple", "banana", "orange", "nectarine", "mandarin", "spinach", "mango",
                ]),
                carbon_factor: 0.3,
            },
            CategoryRule {
                category: Category::Dairy,
                keywords: to_strings(&["milk", "cheese", "butter", "yogurt", "cow", "cream"]),
                carbon_factor: 0.8,
            },
            CategoryRule {
                category: Category::PersonalCare,
                keywords: to_strings(&["shampoo", "soap", "toothpaste", "lotion", "deodorant"]),
                carbon_factor: 0.4,
            },
            CategoryRule {
                category: Category::Household,
                keywords: to_strings(&["detergent", "cleaner", "towel", "napkin"]),
                carbon_factor: 0.6,
            },
            CategoryRule {
                category: Category::Other,
                keywords: vec![],
                carbon_factor: DEFAULT_CARBON_FACTOR,
            },
        ],
    };
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for CategoryTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}

impl CategoryTable {
    /// Build a table from a validated configuration
    ///
    /// Keywords are lowercased here so classification only has to lowercase
    /// the item name.
    pub fn from_config(config: CategoryTableConfig) -> AppResult<Self> {
        config.validate()?;

        let rules = config
            .categories
            .into_iter()
            .map(|rule| CategoryRule {
                category: rule.category,
                keywords: rule.keywords.iter().map(|k| k.to_lowercase()).collect(),
                carbon_factor: rule.carbon_factor,
            })
            .collect();

        Ok(Self { rules })
    }

    /// The rules in declared (tie-break) order
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Classify an item name into a category.
    ///
    /// Lowercases the name and walks the rules in declared order, returning
    /// the first category with a keyword occurring as a substring of the
    /// name. Falls back to [`Category::Other`]. Total: every string,
    /// including the empty string, gets exactly one category.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use receipt_footprint::categories::{Category, CategoryTable};
    ///
    /// let table = CategoryTable::default();
    /// assert_eq!(table.classify("WHOLE MILK"), Category::Dairy);
    /// assert_eq!(table.classify("WIDGET"), Category::Other);
    /// ```
    pub fn classify(&self, name: &str) -> Category {
        let lowered = name.to_lowercase();
        for rule in &self.rules {
            if rule
                .keywords
                .iter()
                .any(|keyword| lowered.contains(keyword.as_str()))
            {
                trace!(name = %name, category = %rule.category, "Classified item");
                return rule.category;
            }
        }
        trace!(name = %name, "No keyword match, defaulting to Other");
        Category::Other
    }

    /// Carbon factor for a category, with the documented 0.2 fallback when
    /// the table has no entry for it
    pub fn carbon_factor(&self, category: Category) -> f64 {
        self.rules
            .iter()
            .find(|rule| rule.category == category)
            .map(|rule| rule.carbon_factor)
            .unwrap_or(DEFAULT_CARBON_FACTOR)
    }
}

/// Load the category table from a JSON config file, falling back to the
/// built-in default table.
///
/// Resolution order: the `CATEGORY_TABLE_PATH` environment variable, then
/// `config/category_table.json`, then `../config/category_table.json`. A file
/// that cannot be read, parsed or validated is skipped with a warning; if no
/// usable file is found the built-in table is returned.
pub fn load_category_table() -> CategoryTable {
    if let Ok(config_path) = std::env::var("CATEGORY_TABLE_PATH") {
        info!(
            "Loading category table from environment variable: {}",
            config_path
        );
        match read_table_file(&config_path) {
            Ok(table) => {
                info!("Successfully loaded category table from: {}", config_path);
                return table;
            }
            Err(e) => {
                crate::errors::error_logging::log_config_error(
                    &e,
                    "CATEGORY_TABLE_PATH",
                    "load_category_table",
                );
                warn!(
                    "Failed to load category table from '{}'. Falling back to default paths.",
                    config_path
                );
            }
        }
    }

    let possible_paths = [
        "config/category_table.json",    // Local development path
        "../config/category_table.json", // Test path
    ];

    for config_path in &possible_paths {
        match read_table_file(config_path) {
            Ok(table) => {
                info!(
                    "Successfully loaded category table from fallback path: {}",
                    config_path
                );
                return table;
            }
            Err(e) => {
                debug!(
                    "Category table not usable at '{}': {}. Trying next path.",
                    config_path, e
                );
                continue;
            }
        }
    }

    debug!("No category table config file found. Using built-in default table.");
    CategoryTable::default()
}

fn read_table_file(path: &str) -> AppResult<CategoryTable> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("failed to read '{}': {}", path, e)))?;
    let config: CategoryTableConfig = serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("failed to parse '{}': {}", path, e)))?;
    CategoryTable::from_config(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> CategoryTableConfig {
        CategoryTableConfig {
            categories: vec![
                CategoryRule {
                    category: Category::Dairy,
                    keywords: vec!["milk".to_string()],
                    carbon_factor: 0.8,
                },
                CategoryRule {
                    category: Category::Other,
                    keywords: vec![],
                    carbon_factor: 0.2,
                },
            ],
        }
    }

    #[test]
    fn test_category_table_config_validation() {
        let mut config = sample_config();

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Empty table
        let empty = CategoryTableConfig { categories: vec![] };
        assert!(empty.validate().is_err());

        // Duplicate category
        config.categories.push(config.categories[0].clone());
        assert!(config.validate().is_err());
        config.categories.pop();

        // Non-positive carbon factor
        config.categories[0].carbon_factor = 0.0;
        assert!(config.validate().is_err());
        config.categories[0].carbon_factor = f64::NAN;
        assert!(config.validate().is_err());
        config.categories[0].carbon_factor = 0.8;

        // Empty keyword list on a non-default category
        config.categories[0].keywords = vec![];
        assert!(config.validate().is_err());
        config.categories[0].keywords = vec!["milk".to_string()];

        // Empty keyword string
        config.categories[0].keywords = vec!["".to_string()];
        assert!(config.validate().is_err());

        // Keyword with control characters
        config.categories[0].keywords = vec!["mi\nlk".to_string()];
        assert!(config.validate().is_err());
        config.categories[0].keywords = vec!["milk".to_string()];

        // Keywords on the default category
        config.categories[1].keywords = vec!["stuff".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_keywords_lowercased_on_load() {
        let mut config = sample_config();
        config.categories[0].keywords = vec!["MILK".to_string()];

        let table = CategoryTable::from_config(config).unwrap();
        assert_eq!(table.classify("milk"), Category::Dairy);
        assert_eq!(table.classify("MILK"), Category::Dairy);
    }

    #[test]
    fn test_default_table_declaration_order() {
        let table = CategoryTable::default();
        let order: Vec<Category> = table.rules().iter().map(|r| r.category).collect();
        assert_eq!(order, Category::ALL);
    }

    #[test]
    fn test_carbon_factor_fallback() {
        let table = CategoryTable::from_config(sample_config()).unwrap();
        assert_eq!(table.carbon_factor(Category::Dairy), 0.8);
        // Household has no entry in the sample config
        assert_eq!(table.carbon_factor(Category::Household), DEFAULT_CARBON_FACTOR);
    }
}
