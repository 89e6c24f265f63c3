//! Run-scoped resolution cache.
//!
//! A `ResolutionCache` is created at the start of one resolution call and
//! dropped at its end. Entries are only ever added, never replaced.

use crate::entity_id::EntityId;
use std::collections::HashMap;

/// A cached entity cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedCost {
    pub cost: f64,
    /// False when the cost includes a zero-contribution default somewhere
    /// in the entity's dependency chain.
    pub complete: bool,
}

/// Memo of already resolved entity costs for a single run.
///
/// # Examples
///
/// ```rust
/// use recipecost::cache::ResolutionCache;
/// use recipecost::EntityId;
///
/// let mut cache = ResolutionCache::new();
/// cache.insert(EntityId::from_str("X_1"), 20.0, true);
///
/// assert_eq!(cache.cost("X_1"), Some(20.0));
/// assert!(cache.get("X_2").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResolutionCache {
    entries: HashMap<EntityId, CachedCost>,
}

impl ResolutionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the cost of a resolved entity.
    ///
    /// An entity already present keeps its first cost.
    pub fn insert(&mut self, id: EntityId, cost: f64, complete: bool) {
        self.entries
            .entry(id)
            .or_insert(CachedCost { cost, complete });
    }

    /// Look up a resolved entity.
    pub fn get(&self, id: &str) -> Option<CachedCost> {
        self.entries.get(id).copied()
    }

    /// Look up only the cost of a resolved entity.
    pub fn cost(&self, id: &str) -> Option<f64> {
        self.get(id).map(|entry| entry.cost)
    }

    /// Whether the entity has been resolved in this run.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of resolved entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_insert_and_lookup() {
        let mut cache = ResolutionCache::new();
        assert!(cache.is_empty());

        cache.insert(EntityId::from_str("X_1"), 20.0, false);

        assert!(cache.contains("X_1"));
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get("X_1"),
            Some(CachedCost {
                cost: 20.0,
                complete: false
            })
        );
    }

    #[test]
    fn test_cache_is_never_overwritten() {
        let mut cache = ResolutionCache::new();
        cache.insert(EntityId::from_str("X_1"), 20.0, true);
        cache.insert(EntityId::from_str("X_1"), 99.0, false);
        assert_eq!(cache.cost("X_1"), Some(20.0));
    }
}
