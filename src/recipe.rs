//! Recipe slot parsing and normalization.
//!
//! A raw recipe is a sequence of slot strings such as `"WHEAT:32"` or
//! `"INK_SACK-3:2"`. Normalization turns it into a [`Recipe`]: a mapping
//! from ingredient to total quantity, with duplicate ingredients summed.

use crate::entity_id::EntityId;
use crate::error::RecipeIssue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One raw recipe slot.
///
/// Slots are expected to be strings. Anything else decodes into `Other` so
/// that a single odd cell stays local to its entity; `null` counts as an
/// empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSlot {
    Text(String),
    Other(Value),
}

impl RawSlot {
    /// Parse this slot, see [`parse_slot`].
    pub fn parse(&self) -> Result<Option<(EntityId, u32)>, RecipeIssue> {
        match self {
            RawSlot::Text(slot) => parse_slot(slot),
            RawSlot::Other(Value::Null) => Ok(None),
            RawSlot::Other(value) => Err(RecipeIssue::malformed(
                &value.to_string(),
                "slot is not a string",
            )),
        }
    }
}

impl From<&str> for RawSlot {
    fn from(slot: &str) -> Self {
        RawSlot::Text(slot.to_string())
    }
}

/// Raw recipe slots as they appear in a catalog document.
///
/// Either a plain list of slots or a crafting grid keyed by slot name
/// (`A1` .. `C3`). Grid order is document order. Any other JSON value is
/// kept as `Other` and reported as malformed when the entity is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRecipe {
    List(Vec<RawSlot>),
    Grid(IndexMap<String, RawSlot>),
    Other(Value),
}

impl RawRecipe {
    /// Iterate the slots in order. An `Other` recipe has none.
    pub fn slots(&self) -> Box<dyn Iterator<Item = &RawSlot> + '_> {
        match self {
            RawRecipe::List(slots) => Box::new(slots.iter()),
            RawRecipe::Grid(grid) => Box::new(grid.values()),
            RawRecipe::Other(_) => Box::new(std::iter::empty()),
        }
    }
}

impl From<Vec<&str>> for RawRecipe {
    fn from(slots: Vec<&str>) -> Self {
        RawRecipe::List(slots.into_iter().map(RawSlot::from).collect())
    }
}

/// Parse one slot string into an ingredient and quantity.
///
/// The quantity follows the last `:`, or the last `-` when the slot has no
/// `:`. Every `-` left in the identifier becomes `:`, the canonical
/// namespace separator. Blank slots (empty grid cells) yield `Ok(None)`.
///
/// # Examples
///
/// ```rust
/// use recipecost::recipe::parse_slot;
/// use recipecost::EntityId;
///
/// let (id, qty) = parse_slot("INK_SACK-3:2").unwrap().unwrap();
/// assert_eq!(id, EntityId::from_str("INK_SACK:3"));
/// assert_eq!(qty, 2);
///
/// assert!(parse_slot("").unwrap().is_none());
/// assert!(parse_slot("WHEAT").is_err());
/// ```
pub fn parse_slot(slot: &str) -> Result<Option<(EntityId, u32)>, RecipeIssue> {
    let trimmed = slot.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let (ident, amount) = trimmed
        .rsplit_once(':')
        .or_else(|| trimmed.rsplit_once('-'))
        .ok_or_else(|| RecipeIssue::malformed(slot, "missing quantity separator"))?;

    let ident = ident.trim();
    if ident.is_empty() {
        return Err(RecipeIssue::malformed(slot, "empty ingredient identifier"));
    }

    let amount = amount.trim();
    if amount.is_empty() {
        return Err(RecipeIssue::malformed(slot, "missing quantity"));
    }
    let quantity: u32 = amount.parse().map_err(|_| {
        let reason = if amount.bytes().all(|b| b.is_ascii_digit()) {
            format!("quantity {amount} is out of range")
        } else {
            format!("quantity {amount:?} is not a whole number")
        };
        RecipeIssue::malformed(slot, reason)
    })?;
    if quantity == 0 {
        return Err(RecipeIssue::malformed(slot, "quantity must be positive"));
    }

    Ok(Some((EntityId::from(ident.replace('-', ":")), quantity)))
}

/// A normalized recipe: ingredient to total required quantity.
///
/// Ingredients keep the order of their first slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipe {
    ingredients: IndexMap<EntityId, u32>,
}

impl Recipe {
    /// Create an empty recipe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a sequence of slot strings.
    ///
    /// Malformed slots are left out of the recipe and returned as issues,
    /// in slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipecost::recipe::Recipe;
    ///
    /// let (recipe, issues) = Recipe::from_slots(["WHEAT:2", "WHEAT:3", "BAD"]);
    /// assert_eq!(recipe.quantity("WHEAT"), Some(5));
    /// assert_eq!(issues.len(), 1);
    /// ```
    pub fn from_slots<'a, I>(slots: I) -> (Self, Vec<RecipeIssue>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut recipe = Recipe::new();
        let mut issues = Vec::new();
        for slot in slots {
            match parse_slot(slot) {
                Ok(Some((ingredient, quantity))) => recipe.add(ingredient, quantity),
                Ok(None) => {}
                Err(issue) => issues.push(issue),
            }
        }
        (recipe, issues)
    }

    /// Normalize a raw recipe as decoded from a catalog document.
    pub fn from_raw(raw: &RawRecipe) -> (Self, Vec<RecipeIssue>) {
        if let RawRecipe::Other(value) = raw {
            let issue = RecipeIssue::malformed(
                &value.to_string(),
                "recipe is neither a slot list nor a grid",
            );
            return (Recipe::new(), vec![issue]);
        }

        let mut recipe = Recipe::new();
        let mut issues = Vec::new();
        for slot in raw.slots() {
            match slot.parse() {
                Ok(Some((ingredient, quantity))) => recipe.add(ingredient, quantity),
                Ok(None) => {}
                Err(issue) => issues.push(issue),
            }
        }
        (recipe, issues)
    }

    /// Add a quantity of an ingredient, summing with any existing amount.
    pub fn add(&mut self, ingredient: EntityId, quantity: u32) {
        let total = self.ingredients.entry(ingredient).or_insert(0);
        *total = total.saturating_add(quantity);
    }

    /// Total quantity required of an ingredient.
    pub fn quantity(&self, ingredient: &str) -> Option<u32> {
        self.ingredients.get(ingredient).copied()
    }

    /// Iterate `(ingredient, quantity)` pairs in first-slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, u32)> {
        self.ingredients.iter().map(|(id, qty)| (id, *qty))
    }

    /// Ingredient identifiers in first-slot order.
    pub fn ingredients(&self) -> impl Iterator<Item = &EntityId> {
        self.ingredients.keys()
    }

    /// Number of distinct ingredients.
    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    /// Whether the recipe has no ingredients.
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }
}

impl FromIterator<(EntityId, u32)> for Recipe {
    fn from_iter<T: IntoIterator<Item = (EntityId, u32)>>(iter: T) -> Self {
        let mut recipe = Recipe::new();
        for (ingredient, quantity) in iter {
            recipe.add(ingredient, quantity);
        }
        recipe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_colon_slot() {
        let (id, qty) = parse_slot("ENCHANTED_WHEAT:16").unwrap().unwrap();
        assert_eq!(id.as_str(), "ENCHANTED_WHEAT");
        assert_eq!(qty, 16);
    }

    #[test]
    fn test_parse_dash_slot() {
        let (id, qty) = parse_slot("WHEAT-10").unwrap().unwrap();
        assert_eq!(id.as_str(), "WHEAT");
        assert_eq!(qty, 10);
    }

    #[test]
    fn test_parse_namespaced_identifier() {
        let (id, qty) = parse_slot("LOG-2:8").unwrap().unwrap();
        assert_eq!(id.as_str(), "LOG:2");
        assert_eq!(qty, 8);

        // An identifier already in canonical form keeps its namespace.
        let (id, qty) = parse_slot("LOG:2:8").unwrap().unwrap();
        assert_eq!(id.as_str(), "LOG:2");
        assert_eq!(qty, 8);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let (id, qty) = parse_slot("  SAND : 4 ").unwrap().unwrap();
        assert_eq!(id.as_str(), "SAND");
        assert_eq!(qty, 4);
    }

    #[test]
    fn test_blank_slot_is_skipped() {
        assert_eq!(parse_slot("").unwrap(), None);
        assert_eq!(parse_slot("   ").unwrap(), None);
    }

    #[test]
    fn test_malformed_slots() {
        for slot in ["WHEAT", "WHEAT:", ":3", "WHEAT:abc", "WHEAT:-1", "WHEAT:1.5", "WHEAT:0"] {
            let result = parse_slot(slot);
            assert!(
                matches!(result, Err(RecipeIssue::MalformedSlot { .. })),
                "slot {slot:?} should be malformed, got {result:?}"
            );
        }
    }

    #[test]
    fn test_duplicate_ingredients_are_summed() {
        let (recipe, issues) = Recipe::from_slots(["CLAY:2", "SAND:1", "CLAY:3"]);
        assert!(issues.is_empty());
        assert_eq!(recipe.len(), 2);
        assert_eq!(recipe.quantity("CLAY"), Some(5));
        assert_eq!(recipe.quantity("SAND"), Some(1));
    }

    #[test]
    fn test_first_slot_order_is_kept() {
        let (recipe, _) = Recipe::from_slots(["B:1", "A:1", "B:1"]);
        let order: Vec<&str> = recipe.ingredients().map(EntityId::as_str).collect();
        assert_eq!(order, vec!["B", "A"]);
    }

    #[test]
    fn test_malformed_slot_does_not_stop_normalization() {
        let (recipe, issues) = Recipe::from_slots(["A:1", "oops", "B:2"]);
        assert_eq!(recipe.len(), 2);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_quantity_overflow_is_out_of_range() {
        match parse_slot("WHEAT:4294967296") {
            Err(RecipeIssue::MalformedSlot { reason, .. }) => {
                assert_eq!(reason, "quantity 4294967296 is out of range");
            }
            other => panic!("expected malformed slot, got {other:?}"),
        }
        match parse_slot("WHEAT:1.5") {
            Err(RecipeIssue::MalformedSlot { reason, .. }) => {
                assert!(reason.contains("not a whole number"));
            }
            other => panic!("expected malformed slot, got {other:?}"),
        }
    }

    #[test]
    fn test_raw_recipe_shapes() {
        let list: RawRecipe = serde_json::from_str(r#"["A:1", "B:2"]"#).unwrap();
        assert_eq!(
            list.slots().cloned().collect::<Vec<_>>(),
            vec![RawSlot::from("A:1"), RawSlot::from("B:2")]
        );

        let grid: RawRecipe =
            serde_json::from_str(r#"{ "A1": "B:2", "A2": "", "A3": "A:1" }"#).unwrap();
        assert_eq!(grid.slots().count(), 3);
        assert!(matches!(grid, RawRecipe::Grid(_)));
    }

    #[test]
    fn test_non_string_slots_are_malformed() {
        let raw: RawRecipe = serde_json::from_str(r#"["A:1", 5, null, "B:2"]"#).unwrap();
        let (recipe, issues) = Recipe::from_raw(&raw);

        assert_eq!(recipe.quantity("A"), Some(1));
        assert_eq!(recipe.quantity("B"), Some(2));
        assert_eq!(
            issues,
            vec![RecipeIssue::MalformedSlot {
                slot: "5".to_string(),
                reason: "slot is not a string".to_string(),
            }]
        );
    }

    #[test]
    fn test_null_grid_cell_is_blank() {
        let raw: RawRecipe =
            serde_json::from_str(r#"{ "A1": "WHEAT:60", "A2": null }"#).unwrap();
        let (recipe, issues) = Recipe::from_raw(&raw);
        assert_eq!(recipe.quantity("WHEAT"), Some(60));
        assert!(issues.is_empty());
    }

    #[test]
    fn test_scalar_recipe_is_one_issue() {
        let raw: RawRecipe = serde_json::from_str("7").unwrap();
        assert_eq!(raw, RawRecipe::Other(serde_json::json!(7)));

        let (recipe, issues) = Recipe::from_raw(&raw);
        assert!(recipe.is_empty());
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_recipe_from_iterator() {
        let recipe: Recipe = vec![
            (EntityId::from_str("A"), 1),
            (EntityId::from_str("A"), 2),
        ]
        .into_iter()
        .collect();
        assert_eq!(recipe.quantity("A"), Some(3));
    }
}
