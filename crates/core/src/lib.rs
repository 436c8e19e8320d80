pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use chrono::Datelike;
use std::collections::BTreeMap;
use uuid::Uuid;

use models::{
    books::Books,
    category::{Category, RecordKind},
    price::PriceEntry,
    record::{LedgerRecord, RecordImport, RecordUpdate},
    report::{AuditReport, InventoryLine, SalesOverview, YearlyTotals},
    user::{User, UserSummary},
};
use services::{
    audit_service::AuditService, inventory_service::InventoryService,
    ledger_service::LedgerService, registry_service::RegistryService,
    report_service::ReportService,
};
use storage::manager::StorageManager;

use errors::CoreError;

/// Main entry point for the Forage Tracker core library.
/// Owns the in-memory books and all services that operate on them.
///
/// Every mutation goes through `&mut self`, so writers against any one
/// collection are serialized and a single record is never observable
/// half-written. Nothing here performs network or disk I/O except the
/// explicit snapshot calls.
#[must_use]
pub struct ForageTracker {
    books: Books,
    ledger_service: LedgerService,
    registry_service: RegistryService,
    inventory_service: InventoryService,
    report_service: ReportService,
    audit_service: AuditService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for ForageTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForageTracker")
            .field("users", &self.books.users.len())
            .field("records", &self.books.records.len())
            .field("prices", &self.books.prices.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl ForageTracker {
    /// Create a brand new tracker with empty books.
    pub fn create_new() -> Self {
        Self::build(Books::new())
    }

    /// Load an existing tracker from snapshot bytes.
    /// Use this where the frontend handles file I/O.
    pub fn load_from_bytes(data: &[u8]) -> Result<Self, CoreError> {
        let books = StorageManager::load_from_bytes(data)?;
        Ok(Self::build(books))
    }

    /// Save the current books to snapshot bytes.
    /// Clears the unsaved-changes flag on success.
    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>, CoreError> {
        let bytes = StorageManager::save_to_bytes(&self.books)?;
        self.dirty = false;
        Ok(bytes)
    }

    /// Load from a snapshot file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<Self, CoreError> {
        let books = StorageManager::load_from_file(path)?;
        Ok(Self::build(books))
    }

    /// Save to a snapshot file on disk (native only, not WASM).
    /// Clears the unsaved-changes flag on success.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: &str) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.books, path)?;
        self.dirty = false;
        Ok(())
    }

    // ── User Management ─────────────────────────────────────────────

    /// Register a new display-name account. The alias must be non-empty
    /// after trimming; uniqueness is a convention, not a constraint.
    pub fn create_user(&mut self, alias: impl Into<String>) -> Result<Uuid, CoreError> {
        let alias = alias.into().trim().to_string();
        if alias.is_empty() {
            return Err(CoreError::ValidationError(
                "User alias must not be empty".into(),
            ));
        }
        let user = User::new(alias);
        let id = user.id;
        self.books.users.push(user);
        self.dirty = true;
        Ok(id)
    }

    /// Get a user with freshly computed revenue/profit totals. The totals
    /// fold ALL of the user's records, unlike the sales-only report views.
    #[must_use]
    pub fn get_user(&self, user_id: Uuid) -> Option<UserSummary> {
        self.registry_service.get(&self.books, user_id)
    }

    /// Look up a user by display alias — the whole "login" mechanism.
    /// A pure read; no password or secret is involved.
    #[must_use]
    pub fn find_user_by_alias(&self, alias: &str) -> Option<UserSummary> {
        self.registry_service.find_by_alias(&self.books, alias)
    }

    /// All users in registration order, each with computed totals.
    #[must_use]
    pub fn list_users(&self) -> Vec<UserSummary> {
        self.registry_service.list(&self.books)
    }

    #[must_use]
    pub fn user_count(&self) -> usize {
        self.books.users.len()
    }

    // ── Ledger ──────────────────────────────────────────────────────

    /// Record an acquisition: cost only, sell price fixed at zero.
    /// Quantity is in grams, the buy price in currency per kilogram.
    #[allow(clippy::too_many_arguments)]
    pub fn record_purchase(
        &mut self,
        user_id: Uuid,
        category: Category,
        species: impl Into<String>,
        quantity: f64,
        buy_price: f64,
        location: Option<String>,
        notes: Option<String>,
    ) -> Result<Uuid, CoreError> {
        self.ensure_user(user_id)?;
        let mut record = LedgerRecord::new(
            user_id,
            RecordKind::Purchase,
            category,
            species,
            quantity,
            buy_price,
            0.0,
        );
        record.location = location;
        record.notes = notes;
        let id = self.ledger_service.add_record(&mut self.books, record)?;
        self.dirty = true;
        Ok(id)
    }

    /// Record a sale. A well-formed sale carries the cost basis copied from
    /// the purchase price; callers that pass `buy_price` 0 produce a record
    /// that inventory still counts as sold but profit aggregation skips
    /// (an operational warning is logged).
    #[allow(clippy::too_many_arguments)]
    pub fn record_sale(
        &mut self,
        user_id: Uuid,
        category: Category,
        species: impl Into<String>,
        quantity: f64,
        buy_price: f64,
        sell_price: f64,
        location: Option<String>,
        notes: Option<String>,
    ) -> Result<Uuid, CoreError> {
        self.ensure_user(user_id)?;
        let mut record = LedgerRecord::new(
            user_id,
            RecordKind::Sale,
            category,
            species,
            quantity,
            buy_price,
            sell_price,
        );
        record.location = location;
        record.notes = notes;
        let id = self.ledger_service.add_record(&mut self.books, record)?;
        self.dirty = true;
        Ok(id)
    }

    /// Get a single record by its ID.
    #[must_use]
    pub fn get_record(&self, record_id: Uuid) -> Option<&LedgerRecord> {
        self.ledger_service.get(&self.books, record_id)
    }

    /// A user's records, optionally restricted to one calendar year,
    /// newest first.
    #[must_use]
    pub fn list_records_for_user(&self, user_id: Uuid, year: Option<i32>) -> Vec<&LedgerRecord> {
        self.ledger_service.list_for_user(&self.books, user_id, year)
    }

    /// Every record in the ledger, in insertion order.
    #[must_use]
    pub fn list_records(&self) -> Vec<&LedgerRecord> {
        self.books.records.iter().collect()
    }

    /// Apply a partial update; changing quantity or a price recomputes all
    /// derived totals on the merged record. Returns the updated record.
    pub fn update_record(
        &mut self,
        record_id: Uuid,
        update: RecordUpdate,
    ) -> Result<LedgerRecord, CoreError> {
        let updated = self
            .ledger_service
            .update(&mut self.books, record_id, update)?
            .clone();
        self.dirty = true;
        Ok(updated)
    }

    /// Delete a record by ID. Returns true if one existed.
    pub fn delete_record(&mut self, record_id: Uuid) -> bool {
        let removed = self.ledger_service.remove(&mut self.books, record_id);
        if removed {
            self.dirty = true;
        }
        removed
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.books.records.len()
    }

    /// Distinct calendar years present in the ledger, descending.
    #[must_use]
    pub fn ledger_years(&self) -> Vec<i32> {
        self.ledger_service.years(&self.books)
    }

    // ── Prices ──────────────────────────────────────────────────────

    /// Insert or overwrite the reference prices for a (category, species,
    /// year) triple. An existing entry keeps its id; duplicates of the
    /// triple never coexist. Returns the affected entry's id.
    pub fn upsert_price(
        &mut self,
        category: Category,
        species: &str,
        year: i32,
        buy_price: f64,
        sell_price: f64,
    ) -> Result<Uuid, CoreError> {
        if buy_price < 0.0 || sell_price < 0.0 {
            return Err(CoreError::ValidationError(
                "Prices must be non-negative".into(),
            ));
        }
        let id = self
            .books
            .prices
            .upsert(category, species, year, buy_price, sell_price);
        self.dirty = true;
        Ok(id)
    }

    #[must_use]
    pub fn get_price(&self, price_id: Uuid) -> Option<&PriceEntry> {
        self.books.prices.get(price_id)
    }

    /// The price to copy onto a new record: this calendar year's entry if
    /// present, otherwise the most recent year on file for the pair.
    #[must_use]
    pub fn current_price(&self, category: Category, species: &str) -> Option<&PriceEntry> {
        let current_year = chrono::Utc::now().year();
        self.books
            .prices
            .current_for_year(category, species, current_year)
    }

    /// Price entries, optionally restricted by year and/or species.
    #[must_use]
    pub fn query_prices(
        &self,
        year: Option<i32>,
        species: Option<(Category, &str)>,
    ) -> Vec<&PriceEntry> {
        self.books.prices.query(year, species)
    }

    /// Patch an entry's prices by id, refreshing its timestamp.
    pub fn update_price(
        &mut self,
        price_id: Uuid,
        buy_price: Option<f64>,
        sell_price: Option<f64>,
    ) -> Result<PriceEntry, CoreError> {
        if buy_price.map_or(false, |p| p < 0.0) || sell_price.map_or(false, |p| p < 0.0) {
            return Err(CoreError::ValidationError(
                "Prices must be non-negative".into(),
            ));
        }
        let entry = self
            .books
            .prices
            .get_mut(price_id)
            .ok_or_else(|| CoreError::PriceNotFound(price_id.to_string()))?;
        if let Some(b) = buy_price {
            entry.buy_price = b;
        }
        if let Some(s) = sell_price {
            entry.sell_price = s;
        }
        entry.updated_at = chrono::Utc::now();
        let updated = entry.clone();
        self.dirty = true;
        Ok(updated)
    }

    /// Delete a price entry by ID. Returns true if one existed.
    pub fn delete_price(&mut self, price_id: Uuid) -> bool {
        let removed = self.books.prices.remove(price_id);
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Distinct years present in the price table, descending.
    #[must_use]
    pub fn price_years(&self) -> Vec<i32> {
        self.books.prices.years()
    }

    #[must_use]
    pub fn price_count(&self) -> usize {
        self.books.prices.len()
    }

    // ── Reports & Inventory ─────────────────────────────────────────

    /// One user's profit per calendar year, proper sales only (explicit
    /// sales that also carry a cost basis).
    #[must_use]
    pub fn profit_by_user_year(
        &self,
        user_id: Uuid,
        category: Option<Category>,
    ) -> BTreeMap<i32, YearlyTotals> {
        self.report_service
            .profit_by_user_year(&self.books, user_id, category)
    }

    /// Every user's yearly sales plus system-wide per-year sums.
    #[must_use]
    pub fn all_users_sales_by_year(&self, category: Option<Category>) -> SalesOverview {
        self.report_service
            .all_users_sales_by_year(&self.books, category)
    }

    /// Per-kilogram market-margin view over the price table. Independent of
    /// the ledger — it changes only when price entries change.
    #[must_use]
    pub fn price_profit_analysis(
        &self,
        category: Option<Category>,
    ) -> BTreeMap<i32, YearlyTotals> {
        self.report_service
            .price_profit_analysis(&self.books, category)
    }

    /// Net inventory per (category, species) for a user: grams purchased
    /// minus grams sold. Negative availability is reported, not clamped.
    #[must_use]
    pub fn available_inventory(
        &self,
        user_id: Uuid,
        category: Option<Category>,
        species: Option<&str>,
    ) -> Vec<InventoryLine> {
        self.inventory_service
            .available(&self.books, user_id, category, species)
    }

    // ── Audit ───────────────────────────────────────────────────────

    /// Scan the ledger for stored totals that disagree with recomputation
    /// and for sales recorded without a cost basis. Read-only.
    #[must_use]
    pub fn run_audit(&self) -> AuditReport {
        self.audit_service.audit(&self.books)
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export all ledger records as a JSON string.
    pub fn export_records_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.books.records)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize records: {e}")))
    }

    /// Import ledger records from a JSON string. Accepts both current
    /// exports and legacy data without an explicit kind, which is then
    /// classified by the zero-price convention. Totals are recomputed;
    /// every record's user must already be registered.
    /// Returns the number of records imported.
    pub fn import_records_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let imports: Vec<RecordImport> = serde_json::from_str(json)?;
        let records: Vec<LedgerRecord> = imports.into_iter().map(RecordImport::into_record).collect();

        // All-or-nothing: validate the whole batch before touching the books.
        for record in &records {
            self.ensure_user(record.user_id)?;
        }
        let mut staged = self.books.clone();
        for record in &records {
            self.ledger_service.add_record(&mut staged, record.clone())?;
        }

        let count = records.len();
        self.books = staged;
        self.dirty = true;
        Ok(count)
    }

    /// Export the full books as JSON (unencrypted snapshot for debugging/display).
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.books)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize books: {e}")))
    }

    // ── Dirty State ─────────────────────────────────────────────────

    /// Returns `true` if the books were modified since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Internal ────────────────────────────────────────────────────

    fn ensure_user(&self, user_id: Uuid) -> Result<(), CoreError> {
        if self.books.users.iter().any(|u| u.id == user_id) {
            Ok(())
        } else {
            Err(CoreError::UserNotFound(user_id.to_string()))
        }
    }

    fn build(books: Books) -> Self {
        Self {
            books,
            ledger_service: LedgerService::new(),
            registry_service: RegistryService::new(),
            inventory_service: InventoryService::new(),
            report_service: ReportService::new(),
            audit_service: AuditService::new(),
            dirty: false,
        }
    }
}
