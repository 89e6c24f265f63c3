//! Resolver configuration.
//!
//! `ResolverConfig` carries the inputs that are domain decisions rather
//! than algorithm: which catalog identifiers are entities, how entities
//! are ordered, and how degraded data is treated.

use crate::error::CostError;
use serde::{Deserialize, Serialize};

/// Inclusion predicate selecting which catalog identifiers are entities.
///
/// # Examples
///
/// ```rust
/// use recipecost::config::EntityFilter;
///
/// let filter = EntityFilter::Contains("GENERATOR".into());
/// assert!(filter.matches("WHEAT_GENERATOR_1"));
/// assert!(!filter.matches("ENCHANTED_BREAD"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityFilter {
    /// Every identifier is an entity.
    All,
    /// Identifiers containing the given substring.
    Contains(String),
    /// Identifiers starting with the given prefix.
    Prefix(String),
    /// Identifiers ending with the given suffix.
    Suffix(String),
    /// Identifiers matched by at least one of the nested filters.
    AnyOf(Vec<EntityFilter>),
}

impl EntityFilter {
    /// Check whether an identifier is selected.
    pub fn matches(&self, id: &str) -> bool {
        match self {
            EntityFilter::All => true,
            EntityFilter::Contains(needle) => id.contains(needle.as_str()),
            EntityFilter::Prefix(prefix) => id.starts_with(prefix.as_str()),
            EntityFilter::Suffix(suffix) => id.ends_with(suffix.as_str()),
            EntityFilter::AnyOf(filters) => filters.iter().any(|f| f.matches(id)),
        }
    }

    fn validate(&self) -> Result<(), CostError> {
        match self {
            EntityFilter::All => Ok(()),
            EntityFilter::Contains(s) | EntityFilter::Prefix(s) | EntityFilter::Suffix(s) => {
                if s.is_empty() {
                    Err(CostError::InvalidConfig(
                        "entity filter pattern must not be empty".to_string(),
                    ))
                } else {
                    Ok(())
                }
            }
            EntityFilter::AnyOf(filters) => {
                if filters.is_empty() {
                    return Err(CostError::InvalidConfig(
                        "any_of filter needs at least one member".to_string(),
                    ));
                }
                filters.iter().try_for_each(EntityFilter::validate)
            }
        }
    }
}

impl Default for EntityFilter {
    fn default() -> Self {
        EntityFilter::Contains("GENERATOR".to_string())
    }
}

/// How entities are ordered before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ordering {
    /// Ascending tier suffix, catalog order on ties.
    ///
    /// Assumes every entity-ingredient carries a strictly lower tier than
    /// the entity consuming it. Nothing checks this.
    #[default]
    TierSuffix,
    /// Topological order of the recipe graph, catalog order on ties.
    ///
    /// A cycle among entities fails the run with `CostError::Cycle`.
    Topological,
}

/// How the quantity of an entity-ingredient is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityQuantity {
    /// The resolved cost of an entity-ingredient is added once, whatever
    /// quantity the slot asks for. Market ingredients are still scaled.
    #[default]
    Ignore,
    /// The resolved cost is multiplied by the slot quantity.
    Scale,
}

/// What a malformed recipe slot does to its entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedSlotPolicy {
    /// Drop the slot; the entity resolves from its remaining ingredients.
    #[default]
    Skip,
    /// Mark the entity unresolved and keep it out of the resolution cache.
    Unresolve,
}

/// Configuration for building catalogs and resolving costs.
///
/// # Examples
///
/// ```rust
/// use recipecost::config::{Ordering, ResolverConfig};
///
/// let config = ResolverConfig::from_json_str(r#"{ "ordering": "topological" }"#).unwrap();
/// assert_eq!(config.ordering, Ordering::Topological);
/// assert!(config.filter.matches("CLAY_GENERATOR_4"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub filter: EntityFilter,
    pub ordering: Ordering,
    pub entity_quantity: EntityQuantity,
    pub malformed_slots: MalformedSlotPolicy,
}

impl ResolverConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entity filter.
    pub fn with_filter(mut self, filter: EntityFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Replace the ordering strategy.
    pub fn with_ordering(mut self, ordering: Ordering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Replace the entity-ingredient quantity rule.
    pub fn with_entity_quantity(mut self, entity_quantity: EntityQuantity) -> Self {
        self.entity_quantity = entity_quantity;
        self
    }

    /// Replace the malformed slot policy.
    pub fn with_malformed_slots(mut self, policy: MalformedSlotPolicy) -> Self {
        self.malformed_slots = policy;
        self
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, CostError> {
        let config: ResolverConfig =
            serde_json::from_str(json).map_err(|source| CostError::InvalidInput {
                input: "config",
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values that cannot select anything sensible.
    pub fn validate(&self) -> Result<(), CostError> {
        self.filter.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.ordering, Ordering::TierSuffix);
        assert_eq!(config.entity_quantity, EntityQuantity::Ignore);
        assert_eq!(config.malformed_slots, MalformedSlotPolicy::Skip);
        assert!(config.filter.matches("SNOW_GENERATOR_2"));
        assert!(!config.filter.matches("SNOW_BLOCK"));
    }

    #[test]
    fn test_filter_variants() {
        assert!(EntityFilter::All.matches("ANYTHING"));
        assert!(EntityFilter::Prefix("X_".into()).matches("X_1"));
        assert!(!EntityFilter::Prefix("X_".into()).matches("Y_1"));
        assert!(EntityFilter::Suffix("_1".into()).matches("X_1"));

        let any = EntityFilter::AnyOf(vec![
            EntityFilter::Prefix("X_".into()),
            EntityFilter::Prefix("Y_".into()),
        ]);
        assert!(any.matches("Y_2"));
        assert!(!any.matches("Z_2"));
    }

    #[test]
    fn test_config_from_json() {
        let config = ResolverConfig::from_json_str(
            r#"{
                "filter": { "any_of": [{ "prefix": "X_" }, { "contains": "MINION" }] },
                "ordering": "topological",
                "entity_quantity": "scale",
                "malformed_slots": "unresolve"
            }"#,
        )
        .unwrap();

        assert_eq!(config.ordering, Ordering::Topological);
        assert_eq!(config.entity_quantity, EntityQuantity::Scale);
        assert_eq!(config.malformed_slots, MalformedSlotPolicy::Unresolve);
        assert!(config.filter.matches("X_9"));
        assert!(config.filter.matches("COW_MINION"));
    }

    #[test]
    fn test_config_rejects_empty_pattern() {
        let result = ResolverConfig::from_json_str(r#"{ "filter": { "contains": "" } }"#);
        assert!(matches!(result, Err(CostError::InvalidConfig(_))));

        let result = ResolverConfig::from_json_str(r#"{ "filter": { "any_of": [] } }"#);
        assert!(matches!(result, Err(CostError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_rejects_bad_json() {
        let result = ResolverConfig::from_json_str(r#"{ "ordering": "sideways" }"#);
        assert!(matches!(
            result,
            Err(CostError::InvalidInput { input: "config", .. })
        ));
    }

    #[test]
    fn test_builder_methods() {
        let config = ResolverConfig::new()
            .with_filter(EntityFilter::All)
            .with_ordering(Ordering::Topological)
            .with_entity_quantity(EntityQuantity::Scale)
            .with_malformed_slots(MalformedSlotPolicy::Unresolve);
        assert_eq!(config.filter, EntityFilter::All);
        assert_eq!(config.ordering, Ordering::Topological);
    }
}
