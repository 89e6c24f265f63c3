//! Entity identifier module.
//!
//! Provides the `EntityId` type, an interned string identifier shared by
//! catalog entities and base commodities. Uses `Arc<str>` so identifiers
//! can be cloned freely between the catalog, the graph and the results.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Interned string identifier for entities and commodities.
///
/// # Examples
///
/// ```rust
/// use recipecost::EntityId;
///
/// let id = EntityId::from_str("COBBLESTONE_GENERATOR_3");
/// let id2: EntityId = "COBBLESTONE_GENERATOR_3".into();
///
/// assert_eq!(id, id2);
/// assert_eq!(id.tier(), Some(3));
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntityId(Arc<str>);

impl Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(EntityId::from(s))
    }
}

impl EntityId {
    /// Create a new `EntityId` from a string slice.
    pub fn from_str(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the string representation of this `EntityId`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The tier encoded in the identifier.
    ///
    /// The tier is the run of leading decimal digits in the segment after
    /// the last `_`. `WHEAT_GENERATOR_11` is tier 11, `WHEAT_GENERATOR_2b`
    /// is tier 2, and `ENCHANTED_BREAD` or `WHEAT_GENERATOR_` have no tier.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipecost::EntityId;
    ///
    /// assert_eq!(EntityId::from_str("CLAY_GENERATOR_7").tier(), Some(7));
    /// assert_eq!(EntityId::from_str("CLAY").tier(), None);
    /// ```
    pub fn tier(&self) -> Option<u32> {
        let (_, suffix) = self.0.rsplit_once('_')?;
        let end = suffix
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(suffix.len());
        suffix[..end].parse().ok()
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl std::borrow::Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_creation() {
        let id1 = EntityId::from_str("WHEAT_GENERATOR_1");
        let id2 = EntityId::from_str("WHEAT_GENERATOR_1");
        assert_eq!(id1, id2);
        assert_eq!(id1.as_str(), "WHEAT_GENERATOR_1");
    }

    #[test]
    fn test_entity_id_from_string() {
        let id: EntityId = String::from("INK_SACK:3").into();
        assert_eq!(id.as_str(), "INK_SACK:3");
    }

    #[test]
    fn test_tier_parsing() {
        assert_eq!(EntityId::from_str("X_1").tier(), Some(1));
        assert_eq!(EntityId::from_str("SNOW_GENERATOR_11").tier(), Some(11));
        assert_eq!(EntityId::from_str("A_B_3x").tier(), Some(3));
        assert_eq!(EntityId::from_str("NO_TIER").tier(), None);
        assert_eq!(EntityId::from_str("TRAILING_").tier(), None);
        assert_eq!(EntityId::from_str("PLAIN").tier(), None);
    }

    #[test]
    fn test_tier_overflow_is_untiered() {
        let id = EntityId::from_str("HUGE_99999999999999999999");
        assert_eq!(id.tier(), None);
    }

    #[test]
    fn test_borrow_lookup() {
        let mut map = std::collections::HashMap::new();
        map.insert(EntityId::from_str("SUGAR_CANE"), 3);
        assert_eq!(map.get("SUGAR_CANE"), Some(&3));
    }
}
