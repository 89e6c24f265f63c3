//! Cost resolver module.
//!
//! Provides the `CostResolver` type, the main entry point for computing
//! entity costs. A resolution run orders the catalog, walks it once,
//! and returns a fresh [`CostIndex`]. Nothing survives between runs.

use crate::cache::ResolutionCache;
use crate::catalog::{Catalog, Entity, RawCatalog};
use crate::config::{EntityQuantity, MalformedSlotPolicy, Ordering, ResolverConfig};
use crate::entity_id::EntityId;
use crate::error::{CostError, RecipeIssue};
use crate::graph::RecipeGraph;
use crate::price::PriceSource;
use crate::resolved::{Contribution, CostIndex, CostRecord, CostStatus, PriceOrigin};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Order catalog entities by ascending tier suffix.
///
/// Entities with equal tiers keep catalog order, and entities without a
/// tier come after every tiered entity, also in catalog order.
///
/// # Examples
///
/// ```rust
/// use recipecost::*;
/// use recipecost::resolver::tier_order;
///
/// let catalog: Catalog = vec![
///     Entity::from_slots("X_GENERATOR_7", ["A:1"]),
///     Entity::from_slots("X_GENERATOR_3", ["A:1"]),
///     Entity::from_slots("X_GENERATOR", ["A:1"]),
///     Entity::from_slots("Y_GENERATOR_3", ["A:1"]),
/// ]
/// .into_iter()
/// .collect();
///
/// let order: Vec<String> = tier_order(&catalog).iter().map(|id| id.to_string()).collect();
/// assert_eq!(order, ["X_GENERATOR_3", "Y_GENERATOR_3", "X_GENERATOR_7", "X_GENERATOR"]);
/// ```
pub fn tier_order(catalog: &Catalog) -> Vec<EntityId> {
    let mut ids: Vec<EntityId> = catalog.ids().cloned().collect();
    ids.sort_by_key(|id| {
        let tier = id.tier();
        (tier.is_none(), tier)
    });
    ids
}

/// Resolve every entity cost with the default configuration.
///
/// # Examples
///
/// ```rust
/// use recipecost::*;
///
/// let catalog: Catalog = vec![Entity::from_slots("Y_1", ["Z:5"])].into_iter().collect();
/// let prices = PriceTable::new();
///
/// let index = resolve_costs(&catalog, &prices).unwrap();
/// assert_eq!(index.cost("Y_1"), Some(0.0));
/// ```
pub fn resolve_costs<P>(catalog: &Catalog, prices: &P) -> Result<CostIndex, CostError>
where
    P: PriceSource + ?Sized,
{
    CostResolver::default().resolve(catalog, prices)
}

/// Computes entity costs from a catalog and a price source.
///
/// The resolver holds configuration only. Each call to
/// [`CostResolver::resolve`] builds its own [`ResolutionCache`]:
///
/// 1. Orders the entities (tier suffix or recipe graph)
/// 2. Walks them once, summing ingredient contributions
/// 3. Caches each total for entities later in the order
///
/// # Examples
///
/// ```rust
/// use recipecost::*;
/// use recipecost::config::{EntityQuantity, ResolverConfig};
///
/// let catalog: Catalog = vec![
///     Entity::from_slots("X_1", ["A:2"]),
///     Entity::from_slots("X_2", ["X_1:4"]),
/// ]
/// .into_iter()
/// .collect();
/// let prices: PriceTable = vec![("A", 10.0)].into_iter().collect();
///
/// // Default: an entity-ingredient's cost is added once.
/// let index = CostResolver::default().resolve(&catalog, &prices).unwrap();
/// assert_eq!(index.cost("X_2"), Some(20.0));
///
/// // Scaled: multiplied by the slot quantity.
/// let config = ResolverConfig::new().with_entity_quantity(EntityQuantity::Scale);
/// let index = CostResolver::new(config).resolve(&catalog, &prices).unwrap();
/// assert_eq!(index.cost("X_2"), Some(80.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CostResolver {
    config: ResolverConfig,
}

impl CostResolver {
    /// Create a resolver with the given configuration.
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Build a catalog from a raw definition table using the configured filter.
    pub fn build_catalog(&self, raw: &RawCatalog) -> Result<Catalog, CostError> {
        self.config.validate()?;
        Ok(Catalog::build(raw, &self.config.filter))
    }

    /// Build the catalog and resolve it in one call.
    pub fn resolve_raw<P>(&self, raw: &RawCatalog, prices: &P) -> Result<CostIndex, CostError>
    where
        P: PriceSource + ?Sized,
    {
        let catalog = self.build_catalog(raw)?;
        self.resolve(&catalog, prices)
    }

    /// The order in which entities will be resolved.
    ///
    /// # Errors
    ///
    /// `CostError::Cycle` under topological ordering when entities depend
    /// on each other in a loop.
    pub fn resolution_order(&self, catalog: &Catalog) -> Result<Vec<EntityId>, CostError> {
        match self.config.ordering {
            Ordering::TierSuffix => Ok(tier_order(catalog)),
            Ordering::Topological => RecipeGraph::from_catalog(catalog).topological_sort(),
        }
    }

    /// Resolve the cost of every entity in the catalog.
    ///
    /// Same catalog, prices and configuration give the same index. Data
    /// problems in single entities are recorded on their records; only a
    /// rejected configuration or a dependency cycle fails the call.
    pub fn resolve<P>(&self, catalog: &Catalog, prices: &P) -> Result<CostIndex, CostError>
    where
        P: PriceSource + ?Sized,
    {
        self.config.validate()?;

        let order = self.resolution_order(catalog)?;
        debug!(ordering = ?self.config.ordering, entities = order.len(), "resolution order ready");

        let mut cache = ResolutionCache::new();
        let mut resolved: HashMap<EntityId, CostRecord> = HashMap::with_capacity(order.len());

        for id in &order {
            let Some(entity) = catalog.get(id.as_str()) else {
                continue;
            };
            let record = self.resolve_entity(entity, catalog, prices, &cache);
            if record.status != CostStatus::Unresolved {
                cache.insert(id.clone(), record.cost, record.is_complete());
            }
            debug!(entity = %id, cost = record.cost, status = ?record.status, "resolved entity");
            resolved.insert(id.clone(), record);
        }

        let mut records = IndexMap::with_capacity(resolved.len());
        for id in catalog.ids() {
            if let Some(record) = resolved.remove(id) {
                records.insert(id.clone(), record);
            }
        }
        let index = CostIndex::from_records(records);

        info!(
            entities = index.len(),
            incomplete = index.incomplete().count(),
            "resolved recipe costs"
        );
        Ok(index)
    }

    fn resolve_entity<P>(
        &self,
        entity: &Entity,
        catalog: &Catalog,
        prices: &P,
        cache: &ResolutionCache,
    ) -> CostRecord
    where
        P: PriceSource + ?Sized,
    {
        let mut record = CostRecord::new(entity.recipe.clone());
        for issue in &entity.issues {
            record.add_issue(issue.clone());
        }

        if entity.has_malformed_slots()
            && self.config.malformed_slots == MalformedSlotPolicy::Unresolve
        {
            warn!(entity = %entity.id, "malformed recipe, leaving entity unresolved");
            record.status = CostStatus::Unresolved;
            return record;
        }

        for (ingredient, quantity) in entity.recipe.iter() {
            let contribution = if let Some(cached) = cache.get(ingredient.as_str()) {
                if !cached.complete {
                    record.mark_partial();
                }
                let amount = match self.config.entity_quantity {
                    EntityQuantity::Ignore => cached.cost,
                    EntityQuantity::Scale => cached.cost * f64::from(quantity),
                };
                Contribution {
                    ingredient: ingredient.clone(),
                    quantity,
                    origin: PriceOrigin::Entity {
                        entity_cost: cached.cost,
                    },
                    amount,
                }
            } else if let Some(unit_price) = prices.buy_price(ingredient.as_str()) {
                Contribution {
                    ingredient: ingredient.clone(),
                    quantity,
                    origin: PriceOrigin::Market { unit_price },
                    amount: unit_price * f64::from(quantity),
                }
            } else {
                let issue = if catalog.is_recipeless(ingredient.as_str()) {
                    RecipeIssue::MissingRecipe {
                        ingredient: ingredient.clone(),
                    }
                } else if catalog.contains(ingredient.as_str()) {
                    RecipeIssue::UnresolvedEntity {
                        ingredient: ingredient.clone(),
                    }
                } else {
                    RecipeIssue::UnknownPrice {
                        ingredient: ingredient.clone(),
                    }
                };
                warn!(
                    entity = %entity.id,
                    ingredient = %ingredient,
                    quantity,
                    %issue,
                    "ingredient contributes zero cost"
                );
                record.add_issue(issue);
                Contribution {
                    ingredient: ingredient.clone(),
                    quantity,
                    origin: PriceOrigin::Unpriced,
                    amount: 0.0,
                }
            };
            record.add_contribution(contribution);
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RawDefinition;
    use crate::config::EntityFilter;
    use crate::price::PriceTable;

    fn catalog(entities: Vec<(&str, Vec<&str>)>) -> Catalog {
        entities
            .into_iter()
            .map(|(id, slots)| Entity::from_slots(id, slots))
            .collect()
    }

    fn prices(entries: Vec<(&str, f64)>) -> PriceTable {
        entries.into_iter().collect()
    }

    #[test]
    fn test_tiered_propagation() {
        let catalog = catalog(vec![("X_1", vec!["A:2"]), ("X_2", vec!["X_1:1", "B:3"])]);
        let prices = prices(vec![("A", 10.0), ("B", 5.0)]);

        let index = resolve_costs(&catalog, &prices).unwrap();

        assert_eq!(index.cost("X_1"), Some(20.0));
        assert_eq!(index.cost("X_2"), Some(35.0));
        assert!(index.get("X_2").unwrap().is_complete());
    }

    #[test]
    fn test_entity_quantity_is_not_applied_by_default() {
        let catalog = catalog(vec![("X_1", vec!["A:2"]), ("X_2", vec!["X_1:3"])]);
        let prices = prices(vec![("A", 10.0)]);

        let index = resolve_costs(&catalog, &prices).unwrap();

        // X_1 costs 20; three of them still add 20.
        assert_eq!(index.cost("X_2"), Some(20.0));
        let contribution = &index.get("X_2").unwrap().breakdown[0];
        assert_eq!(contribution.quantity, 3);
        assert_eq!(contribution.amount, 20.0);
    }

    #[test]
    fn test_unknown_commodity_contributes_zero() {
        let catalog = catalog(vec![("Y_1", vec!["Z:5"])]);

        let index = resolve_costs(&catalog, &PriceTable::new()).unwrap();
        let record = index.get("Y_1").unwrap();

        assert_eq!(record.cost, 0.0);
        assert_eq!(record.status, CostStatus::Partial);
        assert_eq!(
            record.issues,
            vec![RecipeIssue::UnknownPrice {
                ingredient: EntityId::from_str("Z")
            }]
        );
        assert_eq!(record.breakdown[0].origin, PriceOrigin::Unpriced);
    }

    #[test]
    fn test_resolution_order_sorts_by_tier() {
        let catalog = catalog(vec![
            ("X_10", vec!["A:1"]),
            ("X_2", vec!["A:1"]),
            ("X_1", vec!["A:1"]),
        ]);
        let order = CostResolver::default().resolution_order(&catalog).unwrap();
        let order: Vec<&str> = order.iter().map(EntityId::as_str).collect();
        assert_eq!(order, vec!["X_1", "X_2", "X_10"]);
    }

    #[test]
    fn test_output_keeps_catalog_order() {
        let catalog = catalog(vec![("X_3", vec!["A:1"]), ("X_1", vec!["A:1"])]);
        let index = resolve_costs(&catalog, &prices(vec![("A", 1.0)])).unwrap();
        let ids: Vec<&str> = index.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["X_3", "X_1"]);
    }

    #[test]
    fn test_higher_tier_dependency_is_not_resolved_under_tier_ordering() {
        // Violates the tier precondition: X_1 consumes X_2.
        let catalog = catalog(vec![("X_1", vec!["X_2:1"]), ("X_2", vec!["A:1"])]);
        let prices = prices(vec![("A", 7.0)]);

        let index = resolve_costs(&catalog, &prices).unwrap();
        let record = index.get("X_1").unwrap();

        assert_eq!(record.cost, 0.0);
        assert_eq!(
            record.issues,
            vec![RecipeIssue::UnresolvedEntity {
                ingredient: EntityId::from_str("X_2")
            }]
        );
    }

    #[test]
    fn test_topological_ordering_fixes_mislabelled_tiers() {
        let catalog = catalog(vec![("X_1", vec!["X_2:1"]), ("X_2", vec!["A:1"])]);
        let prices = prices(vec![("A", 7.0)]);

        let resolver =
            CostResolver::new(ResolverConfig::new().with_ordering(Ordering::Topological));
        let index = resolver.resolve(&catalog, &prices).unwrap();

        assert_eq!(index.cost("X_1"), Some(7.0));
        assert!(index.get("X_1").unwrap().is_complete());
    }

    #[test]
    fn test_topological_ordering_rejects_cycles() {
        let catalog = catalog(vec![("X_1", vec!["X_2:1"]), ("X_2", vec!["X_1:1"])]);
        let resolver =
            CostResolver::new(ResolverConfig::new().with_ordering(Ordering::Topological));

        let result = resolver.resolve(&catalog, &PriceTable::new());
        assert!(matches!(result, Err(CostError::Cycle { .. })));
    }

    #[test]
    fn test_missing_recipe_reference() {
        let raw: RawCatalog = vec![
            ("X_GENERATOR_1", RawDefinition::without_recipe()),
            (
                "X_GENERATOR_2",
                RawDefinition::with_recipe(vec!["X_GENERATOR_1:1", "A:1"]),
            ),
        ]
        .into_iter()
        .collect();
        let prices = prices(vec![("A", 4.0)]);

        let index = CostResolver::default().resolve_raw(&raw, &prices).unwrap();
        let record = index.get("X_GENERATOR_2").unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(record.cost, 4.0);
        assert_eq!(
            record.issues,
            vec![RecipeIssue::MissingRecipe {
                ingredient: EntityId::from_str("X_GENERATOR_1")
            }]
        );
    }

    #[test]
    fn test_malformed_slot_skip_policy() {
        let catalog = catalog(vec![("X_1", vec!["A:2", "B:many"])]);
        let index = resolve_costs(&catalog, &prices(vec![("A", 1.5), ("B", 100.0)])).unwrap();
        let record = index.get("X_1").unwrap();

        assert_eq!(record.cost, 3.0);
        assert_eq!(record.status, CostStatus::Partial);
        assert!(matches!(record.issues[0], RecipeIssue::MalformedSlot { .. }));
    }

    #[test]
    fn test_malformed_slot_unresolve_policy() {
        let catalog = catalog(vec![
            ("X_1", vec!["A:2", "B:many"]),
            ("X_2", vec!["X_1:1", "A:1"]),
            ("Y_1", vec!["A:1"]),
        ]);
        let config = ResolverConfig::new().with_malformed_slots(MalformedSlotPolicy::Unresolve);
        let index = CostResolver::new(config)
            .resolve(&catalog, &prices(vec![("A", 1.0)]))
            .unwrap();

        let broken = index.get("X_1").unwrap();
        assert_eq!(broken.status, CostStatus::Unresolved);
        assert_eq!(broken.cost, 0.0);
        assert!(broken.breakdown.is_empty());

        let dependent = index.get("X_2").unwrap();
        assert_eq!(dependent.cost, 1.0);
        assert_eq!(dependent.status, CostStatus::Partial);

        let independent = index.get("Y_1").unwrap();
        assert_eq!(independent.cost, 1.0);
        assert!(independent.is_complete());
    }

    #[test]
    fn test_partial_status_propagates_to_dependents() {
        let catalog = catalog(vec![("X_1", vec!["UNKNOWN:1", "A:1"]), ("X_2", vec!["X_1:1"])]);
        let index = resolve_costs(&catalog, &prices(vec![("A", 2.0)])).unwrap();

        let dependent = index.get("X_2").unwrap();
        assert_eq!(dependent.cost, 2.0);
        assert!(dependent.issues.is_empty());
        assert_eq!(dependent.status, CostStatus::Partial);
    }

    #[test]
    fn test_entity_priced_on_market_when_not_yet_resolved() {
        // Y_1 is tier 1 but listed after X_1; on a tie X_1 goes first and
        // sees Y_1 only through the market.
        let catalog = catalog(vec![("X_1", vec!["Y_1:2"]), ("Y_1", vec!["A:1"])]);
        let prices = prices(vec![("A", 1.0), ("Y_1", 50.0)]);

        let index = resolve_costs(&catalog, &prices).unwrap();
        assert_eq!(index.cost("X_1"), Some(100.0));
        assert_eq!(index.cost("Y_1"), Some(1.0));
    }

    #[test]
    fn test_build_catalog_validates_config() {
        let config = ResolverConfig::new().with_filter(EntityFilter::Prefix(String::new()));
        let result = CostResolver::new(config).build_catalog(&RawCatalog::new());
        assert!(matches!(result, Err(CostError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_catalog() {
        let index = resolve_costs(&Catalog::new(), &PriceTable::new()).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.total_cost(), 0.0);
    }
}
