//! Market prices for base commodities.
//!
//! Prices come from a [`PriceSource`]. The resolver only ever asks one
//! question of it: the current unit buy price of a commodity, or `None`
//! when that price is unknown. Unknown is never the same as zero.

use crate::entity_id::EntityId;
use crate::error::CostError;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use serde_json::Value;
use tracing::{debug, warn};

/// Trait for anything that can price a base commodity.
///
/// Implementations must be deterministic for the duration of a
/// resolution run.
///
/// # Examples
///
/// ```rust
/// use recipecost::{PriceSource, PriceTable};
///
/// let mut prices = PriceTable::new();
/// prices.insert("WHEAT", 2.5);
///
/// assert_eq!(prices.buy_price("WHEAT"), Some(2.5));
/// assert_eq!(prices.buy_price("CARROT"), None);
/// ```
pub trait PriceSource {
    /// Unit buy price of a commodity, `None` if unknown.
    fn buy_price(&self, commodity: &str) -> Option<f64>;
}

/// Usable prices are finite and non-negative; anything else is unknown.
fn usable(price: f64) -> Option<f64> {
    (price.is_finite() && price >= 0.0).then_some(price)
}

#[derive(Debug, Deserialize)]
struct MarketEntry {
    #[serde(default)]
    quick_status: Option<QuickStatus>,
}

#[derive(Debug, Deserialize)]
struct QuickStatus {
    #[serde(rename = "buyPrice", default)]
    buy_price: Option<f64>,
}

/// A snapshot of market buy prices.
///
/// Decodes the market snapshot format, where every commodity maps to an
/// object whose `quick_status.buyPrice` is the current buy price:
///
/// ```rust
/// use recipecost::{PriceSource, PriceTable};
///
/// let prices = PriceTable::from_json_str(r#"{
///     "WHEAT": { "quick_status": { "buyPrice": 2.5, "sellPrice": 2.1 } },
///     "CARROT_ITEM": { "quick_status": {} },
///     "POTATO_ITEM": {}
/// }"#).unwrap();
///
/// assert_eq!(prices.buy_price("WHEAT"), Some(2.5));
/// assert_eq!(prices.buy_price("CARROT_ITEM"), None);
/// assert_eq!(prices.buy_price("POTATO_ITEM"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    prices: IndexMap<EntityId, f64>,
}

impl PriceTable {
    /// Create an empty price table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the buy price of a commodity.
    pub fn insert(&mut self, commodity: impl Into<EntityId>, price: f64) {
        self.prices.insert(commodity.into(), price);
    }

    /// Forget the price of a commodity, returning it if present.
    pub fn remove(&mut self, commodity: &str) -> Option<f64> {
        self.prices.shift_remove(commodity)
    }

    /// Decode a market snapshot from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, CostError> {
        let entries: IndexMap<String, Value> =
            serde_json::from_str(json).map_err(|source| CostError::InvalidInput {
                input: "price table",
                source,
            })?;
        Ok(Self::from_entries(entries))
    }

    /// Decode a market snapshot from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CostError> {
        let entries: IndexMap<String, Value> =
            serde_json::from_reader(reader).map_err(|source| CostError::InvalidInput {
                input: "price table",
                source,
            })?;
        Ok(Self::from_entries(entries))
    }

    /// Read and decode a market snapshot from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CostError> {
        let file = std::fs::File::open(path).map_err(|source| CostError::Io {
            input: "price table",
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Entries are decoded one at a time; an entry that does not match the
    /// snapshot format leaves only that commodity unpriced.
    fn from_entries(entries: IndexMap<String, Value>) -> Self {
        let listed = entries.len();
        let prices: IndexMap<EntityId, f64> = entries
            .into_iter()
            .filter_map(|(id, value)| {
                let entry = match serde_json::from_value::<MarketEntry>(value) {
                    Ok(entry) => entry,
                    Err(error) => {
                        warn!(commodity = %id, %error, "ignoring unreadable market entry");
                        return None;
                    }
                };
                let price = entry.quick_status?.buy_price?;
                Some((EntityId::from(id), price))
            })
            .collect();
        debug!(listed, priced = prices.len(), "loaded market snapshot");
        Self { prices }
    }

    /// Number of commodities with a recorded price.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether no prices are recorded.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl PriceSource for PriceTable {
    fn buy_price(&self, commodity: &str) -> Option<f64> {
        self.prices.get(commodity).copied().and_then(usable)
    }
}

impl<K: Into<EntityId>> FromIterator<(K, f64)> for PriceTable {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Self {
            prices: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl PriceSource for HashMap<String, f64> {
    fn buy_price(&self, commodity: &str) -> Option<f64> {
        self.get(commodity).copied().and_then(usable)
    }
}
