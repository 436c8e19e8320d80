use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::{species_key, Category};

/// Reference buy/sell price for one (category, species, year) triple,
/// denominated per kilogram.
///
/// The triple is the entry's natural key: at most one entry exists per
/// triple, enforced by [`PriceBook::upsert`]. Ledger records copy the price
/// values at creation time — there is no live reference, so later price
/// edits never rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    /// Unique identifier (stable across upserts of the same triple)
    pub id: Uuid,

    pub category: Category,

    /// Species display string; matching is case-insensitive
    pub species: String,

    /// Calendar year the prices apply to
    pub year: i32,

    /// Acquisition price, currency per kilogram (>= 0)
    pub buy_price: f64,

    /// Selling price, currency per kilogram (>= 0)
    pub sell_price: f64,

    /// Refreshed on every upsert or update of this entry
    pub updated_at: DateTime<Utc>,
}

impl PriceEntry {
    /// Normalized species key used for natural-key matching.
    pub fn species_key(&self) -> String {
        species_key(&self.species)
    }
}

/// The reference price table: all known (category, species, year) price
/// entries, upserted by natural key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBook {
    pub entries: Vec<PriceEntry>,
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite by natural key. An existing entry for the triple
    /// keeps its id; its prices are overwritten and `updated_at` refreshed.
    /// Returns the id of the affected entry.
    pub fn upsert(
        &mut self,
        category: Category,
        species: &str,
        year: i32,
        buy_price: f64,
        sell_price: f64,
    ) -> Uuid {
        let key = species_key(species);
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.category == category && e.year == year && e.species_key() == key)
        {
            entry.buy_price = buy_price;
            entry.sell_price = sell_price;
            entry.updated_at = Utc::now();
            return entry.id;
        }
        let entry = PriceEntry {
            id: Uuid::new_v4(),
            category,
            species: species.trim().to_string(),
            year,
            buy_price,
            sell_price,
            updated_at: Utc::now(),
        };
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<&PriceEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut PriceEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// Remove an entry by id. Returns true if one existed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() < before
    }

    /// The "most recent" price for a (category, species) pair, as seen from
    /// `current_year`: prefers an entry for exactly that year, otherwise the
    /// entry with the highest year among matches. A tie on year (possible
    /// only via imported data, since upsert deduplicates) is broken by the
    /// most recent `updated_at`.
    pub fn current_for_year(
        &self,
        category: Category,
        species: &str,
        current_year: i32,
    ) -> Option<&PriceEntry> {
        let key = species_key(species);
        let matches: Vec<&PriceEntry> = self
            .entries
            .iter()
            .filter(|e| e.category == category && e.species_key() == key)
            .collect();

        if let Some(exact) = matches
            .iter()
            .copied()
            .filter(|e| e.year == current_year)
            .max_by_key(|e| e.updated_at)
        {
            return Some(exact);
        }
        matches
            .into_iter()
            .max_by(|a, b| (a.year, a.updated_at).cmp(&(b.year, b.updated_at)))
    }

    /// All entries, optionally restricted by year and/or (category, species).
    pub fn query(
        &self,
        year: Option<i32>,
        species: Option<(Category, &str)>,
    ) -> Vec<&PriceEntry> {
        let key = species.map(|(c, s)| (c, species_key(s)));
        self.entries
            .iter()
            .filter(|e| year.map_or(true, |y| e.year == y))
            .filter(|e| {
                key.as_ref()
                    .map_or(true, |(c, k)| e.category == *c && e.species_key() == *k)
            })
            .collect()
    }

    /// Distinct years present in the table, descending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.entries.iter().map(|e| e.year).collect();
        years.sort_unstable();
        years.dedup();
        years.reverse();
        years
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
