//! Category snapshot: app-owned, SDK-provided merge logic.

use super::PriceTick;
use crate::shared::{Category, Symbol};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// Outcome of merging one tick into a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merge {
    /// First tick for this symbol; appended at the end.
    Inserted,
    /// Replaced the previous tick in place.
    Replaced,
}

/// Latest tick per symbol for one category, in order of first appearance.
///
/// Holds at most one entry per symbol, always the most recently applied tick.
/// Updating a known symbol keeps its position; a new symbol is appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySnapshot {
    pub category: Category,
    ticks: Vec<PriceTick>,
    /// Symbol → position in `ticks`.
    index: HashMap<Symbol, usize>,
}

impl CategorySnapshot {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            ticks: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a snapshot by applying `ticks` in order to an empty one.
    pub fn from_ticks(category: Category, ticks: impl IntoIterator<Item = PriceTick>) -> Self {
        let mut snapshot = Self::new(category);
        for tick in ticks {
            snapshot.apply(tick);
        }
        snapshot
    }

    /// Merge one tick (last write wins).
    pub fn apply(&mut self, tick: PriceTick) -> Merge {
        match self.index.get(&tick.symbol) {
            Some(&idx) => {
                self.ticks[idx] = tick;
                Merge::Replaced
            }
            None => {
                self.index.insert(tick.symbol.clone(), self.ticks.len());
                self.ticks.push(tick);
                Merge::Inserted
            }
        }
    }

    pub fn ticks(&self) -> &[PriceTick] {
        &self.ticks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceTick> {
        self.ticks.iter()
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&PriceTick> {
        self.index.get(symbol).map(|&idx| &self.ticks[idx])
    }

    pub fn price_of(&self, symbol: &Symbol) -> Option<Decimal> {
        self.get(symbol).map(|t| t.price)
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.index.contains_key(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.ticks.iter().map(|t| &t.symbol)
    }

    /// Only the entries whose symbol is in `watched`, in snapshot order.
    ///
    /// An empty `watched` list yields an empty snapshot.
    pub fn filtered(&self, watched: &[Symbol]) -> CategorySnapshot {
        let keep: HashSet<&Symbol> = watched.iter().collect();
        CategorySnapshot::from_ticks(
            self.category,
            self.ticks
                .iter()
                .filter(|t| keep.contains(&t.symbol))
                .cloned(),
        )
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn clear(&mut self) {
        self.ticks.clear();
        self.index.clear();
    }
}

impl<'a> IntoIterator for &'a CategorySnapshot {
    type Item = &'a PriceTick;
    type IntoIter = std::slice::Iter<'a, PriceTick>;

    fn into_iter(self) -> Self::IntoIter {
        self.ticks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(symbol: &str, price: i64) -> PriceTick {
        PriceTick {
            symbol: Symbol::from(symbol),
            price: Decimal::new(price, 0),
            change: Decimal::ZERO,
            change_percent: Decimal::ZERO,
        }
    }

    fn order(snapshot: &CategorySnapshot) -> Vec<&str> {
        snapshot.symbols().map(|s| s.as_str()).collect()
    }

    #[test]
    fn test_new_symbols_append() {
        let mut snap = CategorySnapshot::new(Category::Stocks);
        assert_eq!(snap.apply(tick("AAPL", 190)), Merge::Inserted);
        assert_eq!(snap.apply(tick("MSFT", 410)), Merge::Inserted);
        assert_eq!(order(&snap), ["AAPL", "MSFT"]);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut snap = CategorySnapshot::new(Category::Stocks);
        snap.apply(tick("AAPL", 190));
        snap.apply(tick("MSFT", 410));
        snap.apply(tick("NVDA", 900));
        assert_eq!(snap.apply(tick("AAPL", 195)), Merge::Replaced);

        assert_eq!(snap.len(), 3);
        assert_eq!(order(&snap), ["AAPL", "MSFT", "NVDA"]);
        assert_eq!(snap.price_of(&Symbol::from("AAPL")), Some(Decimal::new(195, 0)));
    }

    #[test]
    fn test_same_symbol_last_write_wins() {
        let snap = CategorySnapshot::from_ticks(
            Category::Etfs,
            vec![tick("SPY", 1), tick("SPY", 2), tick("SPY", 3)],
        );
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.ticks()[0].price, Decimal::new(3, 0));
    }

    #[test]
    fn test_filtered_keeps_snapshot_order() {
        let snap = CategorySnapshot::from_ticks(
            Category::Stocks,
            vec![tick("AAPL", 1), tick("MSFT", 2), tick("TSLA", 3)],
        );
        let watched = vec![Symbol::from("TSLA"), Symbol::from("AAPL")];
        let view = snap.filtered(&watched);
        assert_eq!(order(&view), ["AAPL", "TSLA"]);
        assert_eq!(view.category, Category::Stocks);
    }

    #[test]
    fn test_filtered_empty_watchlist_is_empty() {
        let snap = CategorySnapshot::from_ticks(Category::Bonds, vec![tick("TLT", 90)]);
        assert!(snap.filtered(&[]).is_empty());
    }

    #[test]
    fn test_filtered_ignores_unknown_symbols() {
        let snap = CategorySnapshot::from_ticks(Category::Bonds, vec![tick("TLT", 90)]);
        assert!(snap.filtered(&[Symbol::from("BND")]).is_empty());
    }

    #[test]
    fn test_clear() {
        let mut snap = CategorySnapshot::from_ticks(Category::Stocks, vec![tick("AAPL", 1)]);
        snap.clear();
        assert!(snap.is_empty());
        assert!(!snap.contains(&Symbol::from("AAPL")));
    }
}
