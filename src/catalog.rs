//! Entity catalog construction.
//!
//! A [`RawCatalog`] is the definition table as supplied by the outside
//! world. [`Catalog::build`] selects the entities relevant to costing and
//! normalizes their recipes. Both keep document order, which later
//! decides ties during resolution.

use crate::config::EntityFilter;
use crate::entity_id::EntityId;
use crate::error::{CostError, RecipeIssue};
use crate::recipe::{RawRecipe, Recipe};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// One definition from the raw catalog. Fields other than `recipe` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDefinition {
    #[serde(default)]
    pub recipe: Option<RawRecipe>,
}

impl RawDefinition {
    /// A definition with a list recipe.
    pub fn with_recipe(slots: Vec<&str>) -> Self {
        Self {
            recipe: Some(RawRecipe::from(slots)),
        }
    }

    /// A definition with no recipe.
    pub fn without_recipe() -> Self {
        Self::default()
    }
}

/// The raw definition table, keyed by identifier, in document order.
///
/// # Examples
///
/// ```rust
/// use recipecost::RawCatalog;
///
/// let raw = RawCatalog::from_json_str(r#"{
///     "X_1": { "recipe": ["A:2"] },
///     "X_2": { "recipe": { "A1": "X_1:1", "A2": "B:3" } }
/// }"#).unwrap();
/// assert_eq!(raw.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RawCatalog {
    definitions: IndexMap<String, RawDefinition>,
}

impl RawCatalog {
    /// Create an empty raw catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a definition.
    pub fn insert(&mut self, id: impl Into<String>, definition: RawDefinition) {
        self.definitions.insert(id.into(), definition);
    }

    /// Decode a catalog from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, CostError> {
        serde_json::from_str(json).map_err(|source| CostError::InvalidInput {
            input: "catalog",
            source,
        })
    }

    /// Decode a catalog from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CostError> {
        serde_json::from_reader(reader).map_err(|source| CostError::InvalidInput {
            input: "catalog",
            source,
        })
    }

    /// Read and decode a catalog from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CostError> {
        let file = std::fs::File::open(path).map_err(|source| CostError::Io {
            input: "catalog",
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Iterate `(identifier, definition)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawDefinition)> {
        self.definitions.iter().map(|(id, def)| (id.as_str(), def))
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Definitions are decoded one at a time. A definition that is not an
/// object is kept without a recipe, so only that identifier is affected.
impl<'de> Deserialize<'de> for RawCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = IndexMap::<String, Value>::deserialize(deserializer)?;
        let definitions = entries
            .into_iter()
            .map(|(id, value)| {
                let definition = serde_json::from_value(value).unwrap_or_else(|error| {
                    warn!(definition = %id, %error, "ignoring unreadable definition");
                    RawDefinition::default()
                });
                (id, definition)
            })
            .collect();
        Ok(Self { definitions })
    }
}

impl<K: Into<String>> FromIterator<(K, RawDefinition)> for RawCatalog {
    fn from_iter<T: IntoIterator<Item = (K, RawDefinition)>>(iter: T) -> Self {
        Self {
            definitions: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// A craftable entity with its normalized recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub recipe: Recipe,
    /// Slots dropped during normalization.
    pub issues: Vec<RecipeIssue>,
}

impl Entity {
    /// Create an entity from an already normalized recipe.
    pub fn new(id: impl Into<EntityId>, recipe: Recipe) -> Self {
        Self {
            id: id.into(),
            recipe,
            issues: Vec::new(),
        }
    }

    /// Create an entity by normalizing slot strings.
    pub fn from_slots<'a, I>(id: impl Into<EntityId>, slots: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let (recipe, issues) = Recipe::from_slots(slots);
        Self {
            id: id.into(),
            recipe,
            issues,
        }
    }

    /// Create an entity from a raw recipe as decoded from a catalog document.
    pub fn from_raw(id: impl Into<EntityId>, raw: &RawRecipe) -> Self {
        let (recipe, issues) = Recipe::from_raw(raw);
        Self {
            id: id.into(),
            recipe,
            issues,
        }
    }

    /// Whether any slot of this entity was malformed.
    pub fn has_malformed_slots(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// The immutable set of entities taking part in cost resolution.
///
/// Selected identifiers without a recipe are not entities, but are
/// remembered so that references to them can be reported precisely.
///
/// # Examples
///
/// ```rust
/// use recipecost::{Catalog, RawCatalog};
/// use recipecost::catalog::RawDefinition;
/// use recipecost::config::EntityFilter;
///
/// let raw: RawCatalog = vec![
///     ("WHEAT_GENERATOR_1", RawDefinition::with_recipe(vec!["WHEAT:10"])),
///     ("WHEAT_GENERATOR_2", RawDefinition::without_recipe()),
///     ("ENCHANTED_WHEAT", RawDefinition::with_recipe(vec!["WHEAT:160"])),
/// ]
/// .into_iter()
/// .collect();
///
/// let catalog = Catalog::build(&raw, &EntityFilter::Contains("GENERATOR".into()));
/// assert_eq!(catalog.len(), 1);
/// assert!(catalog.is_recipeless("WHEAT_GENERATOR_2"));
/// assert!(catalog.get("ENCHANTED_WHEAT").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entities: IndexMap<EntityId, Entity>,
    recipeless: IndexSet<EntityId>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select and normalize the entities of a raw catalog.
    pub fn build(raw: &RawCatalog, filter: &EntityFilter) -> Self {
        let mut catalog = Catalog::new();

        for (id, definition) in raw.iter() {
            if !filter.matches(id) {
                continue;
            }
            let Some(raw_recipe) = &definition.recipe else {
                catalog.insert_recipeless(id);
                continue;
            };

            let entity = Entity::from_raw(id, raw_recipe);
            for issue in &entity.issues {
                warn!(entity = %entity.id, %issue, "dropping malformed recipe slot");
            }
            catalog.insert(entity);
        }

        debug!(
            definitions = raw.len(),
            entities = catalog.len(),
            recipeless = catalog.recipeless.len(),
            "built entity catalog"
        );
        catalog
    }

    /// Add or replace an entity.
    pub fn insert(&mut self, entity: Entity) {
        self.recipeless.shift_remove(&entity.id);
        self.entities.insert(entity.id.clone(), entity);
    }

    /// Record a selected identifier that has no recipe.
    pub fn insert_recipeless(&mut self, id: impl Into<EntityId>) {
        let id = id.into();
        if !self.entities.contains_key(&id) {
            self.recipeless.insert(id);
        }
    }

    /// Look up an entity.
    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Whether the identifier is an entity of this catalog.
    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    /// Whether the identifier was selected but has no recipe.
    pub fn is_recipeless(&self, id: &str) -> bool {
        self.recipeless.contains(id)
    }

    /// Iterate entities in catalog order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Entity identifiers in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.entities.keys()
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the catalog has no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl FromIterator<Entity> for Catalog {
    fn from_iter<T: IntoIterator<Item = Entity>>(iter: T) -> Self {
        let mut catalog = Catalog::new();
        for entity in iter {
            catalog.insert(entity);
        }
        catalog
    }
}
