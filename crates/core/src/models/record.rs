use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::{Category, RecordKind};

/// Grams per kilogram: quantities are recorded in grams, prices per
/// kilogram, so every monetary total divides by this.
pub const GRAMS_PER_KG: f64 = 1000.0;

/// A single purchase or sale in the ledger — the central entity of the
/// library.
///
/// The three `total_*` fields are derived from quantity and the per-kg
/// prices and are stored on the record. They are recomputed as a unit on
/// every create and on every update that touches quantity or a price;
/// reporting always reads the stored values and never re-derives them from
/// current market prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Unique identifier
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Purchase or Sale
    pub kind: RecordKind,

    /// Berry or Mushroom
    pub category: Category,

    /// Free-text species within the category (e.g., "blueberry")
    pub species: String,

    /// Quantity in grams (> 0 at creation)
    pub quantity: f64,

    /// Acquisition price, currency per kilogram (>= 0)
    pub buy_price: f64,

    /// Selling price, currency per kilogram (>= 0; 0 for purchases)
    pub sell_price: f64,

    /// Optional free-text location where the goods were bought/sold
    #[serde(default)]
    pub location: Option<String>,

    /// Optional free-text notes
    #[serde(default)]
    pub notes: Option<String>,

    /// When the record was created; aggregation buckets by its calendar year
    pub created_at: DateTime<Utc>,

    /// quantity * sell_price / 1000
    pub total_revenue: f64,

    /// quantity * buy_price / 1000
    pub total_cost: f64,

    /// total_revenue - total_cost
    pub total_profit: f64,
}

impl LedgerRecord {
    pub fn new(
        user_id: Uuid,
        kind: RecordKind,
        category: Category,
        species: impl Into<String>,
        quantity: f64,
        buy_price: f64,
        sell_price: f64,
    ) -> Self {
        let mut record = Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            category,
            species: species.into(),
            quantity,
            buy_price,
            sell_price,
            location: None,
            notes: None,
            created_at: Utc::now(),
            total_revenue: 0.0,
            total_cost: 0.0,
            total_profit: 0.0,
        };
        record.recompute_totals();
        record
    }

    /// Recompute all three derived fields from the current quantity and
    /// prices. Always updates the full set — recomputing only one of them
    /// would let the fields drift apart.
    pub fn recompute_totals(&mut self) {
        self.total_revenue = self.quantity * self.sell_price / GRAMS_PER_KG;
        self.total_cost = self.quantity * self.buy_price / GRAMS_PER_KG;
        self.total_profit = self.total_revenue - self.total_cost;
    }

    /// Calendar year the record was created in.
    pub fn year(&self) -> i32 {
        self.created_at.year()
    }

    /// A sale that also carries a cost basis. Only these qualify for the
    /// report service's profit aggregation; sales with buy_price == 0 have
    /// no cost to net against and are excluded there (but still count as
    /// sold quantity for inventory).
    pub fn is_proper_sale(&self) -> bool {
        self.kind == RecordKind::Sale && self.buy_price > 0.0 && self.sell_price > 0.0
    }

    /// Sale recorded without a cost basis — flagged by the audit service as
    /// a possible miscategorization.
    pub fn is_sale_without_cost(&self) -> bool {
        self.sell_price > 0.0 && self.buy_price == 0.0
    }
}

/// Wire shape accepted by the JSON import path. Old exports carried no
/// explicit kind and used aliased field names (`unitPrice` for the sell
/// price, `totalPrice` for revenue); the aliases live only here, at the
/// interchange boundary, and never reach the core model.
///
/// Stored totals in the input are ignored — totals are recomputed on import
/// so a freshly imported ledger is always internally consistent.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordImport {
    pub user_id: Uuid,
    pub category: Category,
    pub species: String,
    pub quantity: f64,
    #[serde(default)]
    pub buy_price: f64,
    #[serde(default, alias = "unit_price", alias = "unitPrice")]
    pub sell_price: f64,
    #[serde(default)]
    pub kind: Option<RecordKind>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl RecordImport {
    /// Build a full record. A missing kind is classified from the legacy
    /// zero-price convention.
    pub fn into_record(self) -> LedgerRecord {
        let kind = self
            .kind
            .unwrap_or_else(|| RecordKind::classify(self.sell_price));
        let mut record = LedgerRecord::new(
            self.user_id,
            kind,
            self.category,
            self.species,
            self.quantity,
            self.buy_price,
            self.sell_price,
        );
        record.location = self.location;
        record.notes = self.notes;
        if let Some(created_at) = self.created_at {
            record.created_at = created_at;
        }
        record
    }
}

/// Partial update for a ledger record. `None` fields keep their prior
/// values. Patching quantity or either price triggers a full recomputation
/// of the derived totals on the merged record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordUpdate {
    pub quantity: Option<f64>,
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl RecordUpdate {
    /// Whether this patch touches any field the derived totals depend on.
    pub fn touches_totals(&self) -> bool {
        self.quantity.is_some() || self.buy_price.is_some() || self.sell_price.is_some()
    }
}
