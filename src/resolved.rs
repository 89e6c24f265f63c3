//! Cost resolution results.
//!
//! Contains the `CostRecord` of a single entity and the `CostIndex`
//! mapping every entity to its record. Records carry a breakdown of every
//! ingredient contribution so understated costs can be traced.

use crate::entity_id::EntityId;
use crate::error::{CostError, RecipeIssue};
use crate::recipe::Recipe;
use indexmap::IndexMap;
use serde::Serialize;

/// How complete an entity's cost is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostStatus {
    /// Every ingredient, direct or transitive, had a price.
    Complete,
    /// At least one ingredient contributed a zero default somewhere in the
    /// dependency chain, so the cost is a lower bound.
    Partial,
    /// The entity was not costed; its cost is zero and dependents cannot use it.
    Unresolved,
}

/// Where an ingredient's contribution came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PriceOrigin {
    /// Market unit price times quantity.
    Market { unit_price: f64 },
    /// Cost of an entity resolved earlier in the run.
    Entity { entity_cost: f64 },
    /// No price available; contributed zero.
    Unpriced,
}

/// One ingredient's share of an entity's cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub ingredient: EntityId,
    pub quantity: u32,
    pub origin: PriceOrigin,
    /// The amount added to the entity's cost.
    pub amount: f64,
}

/// The resolved cost of one entity.
///
/// Serializes as `{ "recipeIngredients": {..}, "cost": n, ... }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostRecord {
    pub recipe_ingredients: Recipe,
    pub cost: f64,
    pub status: CostStatus,
    pub breakdown: Vec<Contribution>,
    pub issues: Vec<RecipeIssue>,
}

impl CostRecord {
    /// Create an empty, complete record for a recipe.
    pub fn new(recipe_ingredients: Recipe) -> Self {
        Self {
            recipe_ingredients,
            cost: 0.0,
            status: CostStatus::Complete,
            breakdown: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Add a contribution to the breakdown and the running cost.
    pub fn add_contribution(&mut self, contribution: Contribution) {
        self.cost += contribution.amount;
        self.breakdown.push(contribution);
    }

    /// Attach a data issue and downgrade a complete record to partial.
    pub fn add_issue(&mut self, issue: RecipeIssue) {
        self.issues.push(issue);
        self.mark_partial();
    }

    /// Downgrade a complete record to partial.
    pub fn mark_partial(&mut self) {
        if self.status == CostStatus::Complete {
            self.status = CostStatus::Partial;
        }
    }

    /// Whether every contribution was priced.
    pub fn is_complete(&self) -> bool {
        self.status == CostStatus::Complete
    }
}

/// Every entity's cost record, in catalog order.
///
/// # Examples
///
/// ```rust
/// use recipecost::*;
///
/// let catalog: Catalog = vec![
///     Entity::from_slots("X_1", ["A:2"]),
///     Entity::from_slots("X_2", ["X_1:1", "B:3"]),
/// ]
/// .into_iter()
/// .collect();
/// let prices: PriceTable = vec![("A", 10.0), ("B", 5.0)].into_iter().collect();
///
/// let index = resolve_costs(&catalog, &prices).unwrap();
/// assert_eq!(index.cost("X_1"), Some(20.0));
/// assert_eq!(index.cost("X_2"), Some(35.0));
/// assert_eq!(index.total_cost(), 55.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CostIndex {
    records: IndexMap<EntityId, CostRecord>,
}

impl CostIndex {
    pub(crate) fn from_records(records: IndexMap<EntityId, CostRecord>) -> Self {
        Self { records }
    }

    /// Get an entity's record.
    pub fn get(&self, id: &str) -> Option<&CostRecord> {
        self.records.get(id)
    }

    /// Get an entity's cost.
    pub fn cost(&self, id: &str) -> Option<f64> {
        self.records.get(id).map(|record| record.cost)
    }

    /// Iterate records in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &CostRecord)> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of all entity costs.
    pub fn total_cost(&self) -> f64 {
        self.records.values().map(|record| record.cost).sum()
    }

    /// The entity with the highest cost; the earliest in catalog order wins ties.
    pub fn most_expensive(&self) -> Option<(&EntityId, &CostRecord)> {
        self.records.iter().fold(None, |best, (id, record)| match best {
            Some((_, top)) if top.cost >= record.cost => best,
            _ => Some((id, record)),
        })
    }

    /// Records whose status is not `Complete`.
    pub fn incomplete(&self) -> impl Iterator<Item = (&EntityId, &CostRecord)> {
        self.records.iter().filter(|(_, record)| !record.is_complete())
    }

    /// Encode the index as pretty JSON.
    pub fn to_json_string(&self) -> Result<String, CostError> {
        serde_json::to_string_pretty(self).map_err(CostError::Output)
    }
}
