use anyhow::{Context, Result};
use receipt_footprint::analysis::{ReceiptAnalyzer, ReceiptSummary};
use receipt_footprint::categories::load_category_table;
use receipt_footprint::config::AppConfig;
use receipt_footprint::text_processing::ItemExtractor;
use std::env;
use std::io::Read;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Read receipt text from the file given as the first non-flag argument, or
/// from stdin when no file is given
fn read_input() -> Result<String> {
    let path = env::args().skip(1).find(|arg| !arg.starts_with("--"));

    match path {
        Some(path) => {
            info!(path = %path, "Reading receipt text from file");
            std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read receipt text from '{}'", path))
        }
        None => {
            info!("Reading receipt text from stdin");
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read receipt text from stdin")?;
            Ok(buffer)
        }
    }
}

/// Print the human-readable report. Rounding to two decimals happens here
/// and nowhere else; the summary carries full precision.
fn print_report(summary: &ReceiptSummary) {
    println!("Receipt Analysis");
    println!("================");
    println!();
    println!("Total Spent:            ${:.2}", summary.total_spending);
    println!(
        "Total Carbon Footprint: {:.2} kg CO2",
        summary.total_carbon
    );
    println!();
    println!("Items");
    println!("-----");
    for item in &summary.items {
        println!("{} - ${:.2} [{}]", item.name, item.price, item.category);
    }
    println!();
    println!("Spending by Category");
    println!("--------------------");
    for (category, amount) in &summary.spending_by_category {
        let carbon = summary.carbon_by_category.get(category).unwrap_or(&0.0);
        println!("{}: ${:.2} ({:.2} kg CO2)", category, amount, carbon);
    }
}

fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    // Validate configuration before doing any work
    let app_config = AppConfig::from_env()?;
    app_config
        .validate()
        .context("application configuration validation failed")?;

    let extractor = ItemExtractor::with_config(app_config.extraction.clone())
        .context("failed to build item extractor")?;
    let table = load_category_table();
    let analyzer = ReceiptAnalyzer::with_parts(extractor, table);

    let raw_text = read_input()?;
    let summary = analyzer.analyze(&raw_text);

    if summary.items.is_empty() {
        // Whether this counts as "no receipt text found" is the caller's call
        warn!("No line items could be extracted from the input");
    }

    let json_output = app_config.json_output || env::args().any(|arg| arg == "--json");
    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_report(&summary);
    }

    Ok(())
}
