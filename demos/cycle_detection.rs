//! Cycle detection example: topological ordering on a circular catalog
//!
//! This example shows:
//! - How topological ordering reports a recipe cycle
//! - That the tier heuristic never inspects the graph
//! - A valid chain resolving under both orderings

use recipecost::config::Ordering;
use recipecost::*;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let topological =
        CostResolver::new(ResolverConfig::new().with_ordering(Ordering::Topological));

    println!("=== Setting up circular recipes ===\n");

    let circular: Catalog = vec![
        Entity::from_slots("A_1", ["C_3:1", "IRON:4"]),
        Entity::from_slots("B_2", ["A_1:1"]),
        Entity::from_slots("C_3", ["B_2:1"]),
    ]
    .into_iter()
    .collect();
    println!("A_1: C_3 + 4 IRON");
    println!("B_2: A_1");
    println!("C_3: B_2");

    let prices: PriceTable = vec![("IRON", 3.0)].into_iter().collect();

    println!("\n=== Attempting topological resolution (should detect cycle) ===\n");

    match topological.resolve(&circular, &prices) {
        Err(CostError::Cycle { path }) => {
            println!("✓ Cycle detected successfully!");
            let names: Vec<&str> = path.iter().map(EntityId::as_str).collect();
            println!("\nCycle path: {}", names.join(" -> "));
        }
        Err(e) => {
            println!("✗ Unexpected error: {}", e);
        }
        Ok(_) => {
            println!("✗ ERROR: Cycle was not detected! This should not happen.");
        }
    }

    println!("\n=== Same catalog under tier ordering ===\n");

    match resolve_costs(&circular, &prices) {
        Ok(index) => {
            for (id, record) in index.iter() {
                println!("  {}: {:.2} ({:?})", id, record.cost, record.status);
            }
            println!("\nA_1 only counts its IRON: C_3 was not resolved yet.");
        }
        Err(e) => println!("✗ Unexpected error: {}", e),
    }

    println!("\n=== Valid chain (no cycle) ===\n");

    let chain: Catalog = vec![
        Entity::from_slots("X_1", ["IRON:10"]),
        Entity::from_slots("X_2", ["X_1:1", "IRON:20"]),
        Entity::from_slots("X_3", ["X_2:1", "IRON:30"]),
    ]
    .into_iter()
    .collect();

    match topological.resolve(&chain, &prices) {
        Ok(index) => {
            println!("Results:");
            println!("  X_1: {:.2}", index.cost("X_1").unwrap_or_default());
            println!("  X_2: {:.2} (X_1 + 60)", index.cost("X_2").unwrap_or_default());
            println!("  X_3: {:.2} (X_2 + 90)", index.cost("X_3").unwrap_or_default());
            println!("\n✓ Valid chain resolved successfully!");
        }
        Err(e) => println!("✗ Unexpected error: {}", e),
    }
}
