//! # Receipt Analysis Module
//!
//! This module drives the full receipt pipeline: normalize the raw OCR text,
//! extract (name, price) line items, classify each item into a spending
//! category, and accumulate per-category and grand totals for spending and
//! estimated carbon footprint.
//!
//! Data flows strictly forward through the stages; every call computes a
//! fresh [`ReceiptSummary`] from scratch, so a degenerate input can only
//! produce an empty summary, never partial or inconsistent state.

use crate::categories::{Category, CategoryTable};
use crate::errors::{AppError, AppResult};
use crate::text_processing::{normalize, ItemExtractor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A classified receipt line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// The item name as extracted from the receipt
    pub name: String,
    /// The price in receipt currency units
    pub price: f64,
    /// The spending category assigned by classification
    pub category: Category,
}

/// Structured summary of a single receipt
///
/// `items` preserves extraction order. The per-category maps only contain
/// categories that actually occurred on the receipt; their values sum to the
/// corresponding grand total within floating-point tolerance. Amounts carry
/// full precision; rounding is a presentation concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptSummary {
    /// Classified line items in extraction order
    pub items: Vec<LineItem>,
    /// Money spent per category
    pub spending_by_category: BTreeMap<Category, f64>,
    /// Estimated kg CO2 per category
    pub carbon_by_category: BTreeMap<Category, f64>,
    /// Total money spent
    pub total_spending: f64,
    /// Total estimated kg CO2
    pub total_carbon: f64,
}

impl ReceiptSummary {
    fn empty() -> Self {
        Self {
            items: Vec::new(),
            spending_by_category: BTreeMap::new(),
            carbon_by_category: BTreeMap::new(),
            total_spending: 0.0,
            total_carbon: 0.0,
        }
    }
}

/// Receipt analyzer holding the compiled extractor and the category table
///
/// Immutable after construction and safe to share across threads; `analyze`
/// takes `&self` and performs no I/O.
pub struct ReceiptAnalyzer {
    extractor: ItemExtractor,
    table: CategoryTable,
}

impl ReceiptAnalyzer {
    /// Create an analyzer with the default extraction pattern and the
    /// built-in category table
    pub fn new() -> AppResult<Self> {
        let extractor = ItemExtractor::new()
            .map_err(|e| AppError::Internal(format!("failed to build item extractor: {}", e)))?;
        Ok(Self {
            extractor,
            table: CategoryTable::default(),
        })
    }

    /// Create an analyzer from explicit parts
    pub fn with_parts(extractor: ItemExtractor, table: CategoryTable) -> Self {
        Self { extractor, table }
    }

    /// The category table this analyzer classifies with
    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Analyze raw receipt text into a structured summary.
    ///
    /// Runs normalize → extract → classify → aggregate in a single pass over
    /// the extracted items, in extraction order. Total: any string input,
    /// including binary garbage, degrades to fewer or zero items rather than
    /// an error. Zero extractable items is a valid result with an empty item
    /// list and zero totals.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use receipt_footprint::analysis::ReceiptAnalyzer;
    /// use receipt_footprint::categories::Category;
    ///
    /// let analyzer = ReceiptAnalyzer::new().unwrap();
    /// let summary = analyzer.analyze("MILK 2.50 BREAD 3.00");
    ///
    /// assert_eq!(summary.items.len(), 2);
    /// assert_eq!(summary.items[0].category, Category::Dairy);
    /// assert!((summary.total_spending - 5.50).abs() < 1e-9);
    /// ```
    pub fn analyze(&self, raw_text: &str) -> ReceiptSummary {
        let normalized = normalize(raw_text);
        if normalized.is_empty() {
            debug!("Normalized receipt text is empty");
            return ReceiptSummary::empty();
        }

        let extracted = self.extractor.extract(&normalized);
        debug!(item_count = extracted.len(), "Extracted line items");

        let mut summary = ReceiptSummary::empty();

        for raw_item in extracted {
            let category = self.table.classify(&raw_item.name);
            let carbon = raw_item.price * self.table.carbon_factor(category);

            summary.total_spending += raw_item.price;
            summary.total_carbon += carbon;
            *summary.spending_by_category.entry(category).or_insert(0.0) += raw_item.price;
            *summary.carbon_by_category.entry(category).or_insert(0.0) += carbon;

            summary.items.push(LineItem {
                name: raw_item.name,
                price: raw_item.price,
                category,
            });
        }

        info!(
            items = summary.items.len(),
            total_spending = summary.total_spending,
            total_carbon = summary.total_carbon,
            "Receipt analysis complete"
        );

        summary
    }
}

/// Analyze raw receipt text with the default extractor and category table
pub fn analyze_receipt(raw_text: &str) -> AppResult<ReceiptSummary> {
    Ok(ReceiptAnalyzer::new()?.analyze(raw_text))
}
