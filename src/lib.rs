//! # recipecost - Deterministic Recipe Cost Resolution
//!
//! Computes the acquisition cost of every craftable entity in a catalog
//! from a table of market prices, including entities whose recipes
//! consume other, lower-tier entities of the same catalog.
//!
//! ## Core Concepts
//!
//! ### Resolution Pipeline
//!
//! ```text
//! [RawCatalog] → [Catalog] → [CostResolver] ← [PriceSource]
//!                                  ↓
//!                             [CostIndex]
//! ```
//!
//! 1. **Catalog** selects entities and normalizes their recipes
//! 2. **Ordering** puts every entity after the entities it consumes
//! 3. **Aggregation** sums market prices and already resolved entity costs
//! 4. **CostIndex** holds every total with a per-ingredient breakdown
//!
//! ### Key Features
//!
//! - **Deterministic**: same catalog and prices give byte-identical output
//! - **Partial-data tolerant**: an unknown price contributes zero and is
//!   reported on the entity, it never fails the run
//! - **Two orderings**: tier-suffix heuristic, or a real topological sort
//!   with cycle detection
//! - **Run-scoped cache**: nothing carries over between calls
//!
//! ## Example
//!
//! ```rust
//! use recipecost::*;
//!
//! let catalog: Catalog = vec![
//!     Entity::from_slots("X_1", ["A:2"]),
//!     Entity::from_slots("X_2", ["X_1:1", "B:3"]),
//! ]
//! .into_iter()
//! .collect();
//!
//! let prices: PriceTable = vec![("A", 10.0), ("B", 5.0)].into_iter().collect();
//!
//! let index = resolve_costs(&catalog, &prices).unwrap();
//! assert_eq!(index.cost("X_1"), Some(20.0));
//! assert_eq!(index.cost("X_2"), Some(35.0)); // 20 (X_1) + 3 * 5
//! ```
//!
//! ## Modules
//!
//! - [`entity_id`] - Entity identifier type
//! - [`recipe`] - Slot parsing and recipe normalization
//! - [`catalog`] - Raw definitions and the entity catalog
//! - [`price`] - Price sources
//! - [`config`] - Resolver configuration
//! - [`graph`] - Recipe dependency graph
//! - [`cache`] - Run-scoped resolution cache
//! - [`resolver`] - Main cost resolver
//! - [`resolved`] - Cost records and the cost index
//! - [`error`] - Error types

pub mod cache;
pub mod catalog;
pub mod config;
pub mod entity_id;
pub mod error;
pub mod graph;
pub mod price;
pub mod recipe;
pub mod resolved;
pub mod resolver;

// Re-export main types for convenience
pub use catalog::{Catalog, Entity, RawCatalog};
pub use config::ResolverConfig;
pub use entity_id::EntityId;
pub use error::{CostError, RecipeIssue};
pub use price::{PriceSource, PriceTable};
pub use recipe::Recipe;
pub use resolved::{CostIndex, CostRecord, CostStatus};
pub use resolver::{resolve_costs, CostResolver};
