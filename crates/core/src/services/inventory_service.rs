use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::books::Books;
use crate::models::category::{species_key, Category, RecordKind};
use crate::models::report::InventoryLine;

/// Derives available inventory per (category, species) by netting purchase
/// quantities against sale quantities in the ledger.
///
/// Purchases add to `total_purchased`, sales add to `total_sold` — including
/// anomalous sales recorded without a cost basis, which still move goods out.
/// The available figure is purchased minus sold and may go negative; that is
/// a reporting signal, not an enforced constraint at this layer.
pub struct InventoryService;

impl InventoryService {
    pub fn new() -> Self {
        Self
    }

    pub fn available(
        &self,
        books: &Books,
        user_id: Uuid,
        category: Option<Category>,
        species: Option<&str>,
    ) -> Vec<InventoryLine> {
        let wanted_species = species.map(species_key);

        // Keyed by (category, normalized species) for deterministic output order.
        let mut groups: BTreeMap<(Category, String), InventoryLine> = BTreeMap::new();

        for record in books.records.iter().filter(|r| r.user_id == user_id) {
            if category.map_or(false, |c| c != record.category) {
                continue;
            }
            let key = species_key(&record.species);
            if wanted_species.as_ref().map_or(false, |s| *s != key) {
                continue;
            }

            let line = groups
                .entry((record.category, key))
                .or_insert_with(|| InventoryLine {
                    category: record.category,
                    species: record.species.trim().to_string(),
                    total_purchased: 0.0,
                    total_sold: 0.0,
                    available: 0.0,
                });
            match record.kind {
                RecordKind::Purchase => line.total_purchased += record.quantity,
                RecordKind::Sale => line.total_sold += record.quantity,
            }
        }

        let mut lines: Vec<InventoryLine> = groups.into_values().collect();
        for line in &mut lines {
            line.available = line.total_purchased - line.total_sold;
        }
        lines
    }
}

impl Default for InventoryService {
    fn default() -> Self {
        Self::new()
    }
}
