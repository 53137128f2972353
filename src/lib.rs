//! # Receipt Footprint
//!
//! Converts raw, noisy text recovered from a photographed receipt into a
//! structured financial and environmental-impact summary: extracted line
//! items with prices, a spending category for each, and per-category plus
//! grand totals for money spent and estimated carbon footprint.
//!
//! The OCR step that produces the raw text, the rendering of results, and
//! any charting of category sums are external collaborators; this crate
//! takes a single string and returns a [`analysis::ReceiptSummary`].

pub mod analysis;
pub mod categories;
pub mod config;
pub mod errors;
pub mod text_processing;

// Re-export types for easier access
pub use analysis::{analyze_receipt, LineItem, ReceiptAnalyzer, ReceiptSummary};
pub use categories::{load_category_table, Category, CategoryRule, CategoryTable};
pub use text_processing::{normalize, ExtractedItem, ExtractionConfig, ItemExtractor};
