//! Basic example: resolving generator costs from JSON inputs
//!
//! This example demonstrates:
//! - Decoding a definition table and a market snapshot
//! - Resolving tiered costs with the default configuration
//! - Reading the per-ingredient breakdown and data issues
//!
//! Run with `RUST_LOG=warn` to see every zero-cost default as it happens.

use recipecost::resolved::PriceOrigin;
use recipecost::*;

const CATALOG: &str = r#"{
    "WHEAT_GENERATOR_1": {
        "recipe": {
            "A1": "WHEAT:10", "A2": "WHEAT:10", "A3": "WHEAT:10",
            "B1": "WHEAT:10", "B2": "WOOD_HOE:1", "B3": "WHEAT:10",
            "C1": "WHEAT:10", "C2": "WHEAT:10", "C3": "WHEAT:10"
        }
    },
    "WHEAT_GENERATOR_2": {
        "recipe": ["WHEAT:20", "WHEAT:20", "WHEAT:20", "WHEAT:20", "WHEAT_GENERATOR_1:1"]
    },
    "WHEAT_GENERATOR_3": {
        "recipe": ["WHEAT:40", "WHEAT_GENERATOR_2:1", "SEEDS:16"]
    },
    "ENCHANTED_BREAD": { "recipe": ["WHEAT:60"] }
}"#;

const SNAPSHOT: &str = r#"{
    "WHEAT": { "quick_status": { "buyPrice": 2.4 } },
    "WOOD_HOE": { "quick_status": { "buyPrice": 15.0 } }
}"#;

fn main() -> Result<(), CostError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Loading inputs...");
    let raw = RawCatalog::from_json_str(CATALOG)?;
    let prices = PriceTable::from_json_str(SNAPSHOT)?;
    println!("  - {} definitions", raw.len());
    println!("  - {} priced commodities", prices.len());

    let resolver = CostResolver::default();
    let index = resolver.resolve_raw(&raw, &prices)?;

    println!("\n=== Resolved Costs ===");
    for (id, record) in index.iter() {
        println!("\n{}: {:.2} ({:?})", id, record.cost, record.status);
        for contribution in &record.breakdown {
            let source = match contribution.origin {
                PriceOrigin::Market { unit_price } => format!("market @ {:.2}", unit_price),
                PriceOrigin::Entity { entity_cost } => format!("entity @ {:.2}", entity_cost),
                PriceOrigin::Unpriced => "unpriced".to_string(),
            };
            println!(
                "  {} x{}: {:.2} ({})",
                contribution.ingredient, contribution.quantity, contribution.amount, source
            );
        }
        for issue in &record.issues {
            println!("  ! {}", issue);
        }
    }

    if let Some((id, record)) = index.most_expensive() {
        println!("\nMost expensive: {} at {:.2}", id, record.cost);
    }

    println!("\n=== JSON ===");
    println!("{}", index.to_json_string()?);

    Ok(())
}
