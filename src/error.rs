//! Error types for cost resolution.
//!
//! Two kinds of failure exist. `CostError` aborts a whole resolution run
//! (bad input, bad configuration, dependency cycle). `RecipeIssue` is a
//! per-entity data problem that degrades that entity's cost without
//! stopping the batch.

use crate::entity_id::EntityId;
use serde::Serialize;
use thiserror::Error;

/// Format a cycle path as a readable string.
fn format_cycle_path(path: &[EntityId]) -> String {
    if path.is_empty() {
        return String::from("(empty cycle)");
    }
    path.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors that abort a resolution run.
///
/// No partial cost index is ever produced alongside one of these.
///
/// # Examples
///
/// ```rust
/// use recipecost::{CostError, EntityId};
///
/// let err = CostError::Cycle {
///     path: vec![EntityId::from_str("A_1"), EntityId::from_str("A_1")],
/// };
/// assert_eq!(err.to_string(), "Cycle detected: A_1 -> A_1");
/// ```
#[derive(Debug, Error)]
pub enum CostError {
    /// A dependency cycle was found while building a topological order.
    ///
    /// The path is closed: its first and last elements are the same entity.
    #[error("Cycle detected: {}", format_cycle_path(.path))]
    Cycle { path: Vec<EntityId> },

    /// An input document could not be decoded.
    #[error("Invalid {input} input: {source}")]
    InvalidInput {
        input: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// An input document could not be read.
    #[error("Failed to read {input} input: {source}")]
    Io {
        input: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The resolver configuration was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A cost index could not be encoded.
    #[error("Failed to encode cost index: {0}")]
    Output(#[source] serde_json::Error),
}

/// A data problem attached to one entity's cost record.
///
/// Every issue means the entity's cost is understated by whatever the
/// affected ingredient would have contributed.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecipeIssue {
    /// A recipe slot could not be parsed into an identifier and quantity.
    #[error("Malformed recipe slot {slot:?}: {reason}")]
    MalformedSlot { slot: String, reason: String },

    /// No market price is known for the ingredient.
    #[error("No price for ingredient {ingredient}")]
    UnknownPrice { ingredient: EntityId },

    /// The ingredient is a catalog entity without a recipe.
    #[error("Ingredient {ingredient} is a catalog entity without a recipe")]
    MissingRecipe { ingredient: EntityId },

    /// The ingredient is a catalog entity with no cost available when its
    /// dependent was resolved: ordered after it, or itself unresolved.
    #[error("Ingredient {ingredient} was not resolved before its dependent")]
    UnresolvedEntity { ingredient: EntityId },
}

impl RecipeIssue {
    pub(crate) fn malformed(slot: &str, reason: impl Into<String>) -> Self {
        Self::MalformedSlot {
            slot: slot.to_string(),
            reason: reason.into(),
        }
    }
}
