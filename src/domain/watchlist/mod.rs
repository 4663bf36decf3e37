//! Watchlist domain: per-category watched symbols and snapshot filtering.

#[cfg(feature = "http")]
pub mod client;
pub mod wire;

use crate::domain::market::CategorySnapshot;
use crate::shared::{Category, Symbol};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Symbols the user watches, grouped by category.
///
/// Each list is ordered and duplicate-free. The whole value is replaced by
/// every successful server round-trip; it is never patched locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watchlist {
    #[serde(default, deserialize_with = "dedup_symbols")]
    pub stocks: Vec<Symbol>,
    #[serde(default, deserialize_with = "dedup_symbols")]
    pub etfs: Vec<Symbol>,
    #[serde(default, deserialize_with = "dedup_symbols")]
    pub bonds: Vec<Symbol>,
}

impl Watchlist {
    pub fn symbols(&self, category: Category) -> &[Symbol] {
        match category {
            Category::Stocks => &self.stocks,
            Category::Etfs => &self.etfs,
            Category::Bonds => &self.bonds,
        }
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.category_of(symbol).is_some()
    }

    /// The category a watched symbol is filed under.
    pub fn category_of(&self, symbol: &Symbol) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|&c| self.symbols(c).contains(symbol))
    }

    pub fn all_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.stocks.iter().chain(&self.etfs).chain(&self.bonds)
    }

    pub fn len(&self) -> usize {
        self.stocks.len() + self.etfs.len() + self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn dedup_symbols<'de, D>(deserializer: D) -> Result<Vec<Symbol>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Symbol>>::deserialize(deserializer)?.unwrap_or_default();
    let mut seen = HashSet::new();
    Ok(raw
        .into_iter()
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .collect())
}

/// The watched subset of a category snapshot, in snapshot order.
///
/// An empty `watched` list always yields an empty snapshot.
pub fn filter(snapshot: &CategorySnapshot, watched: &[Symbol]) -> CategorySnapshot {
    snapshot.filtered(watched)
}
