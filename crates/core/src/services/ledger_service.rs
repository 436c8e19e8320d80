use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::books::Books;
use crate::models::record::{LedgerRecord, RecordUpdate};

/// CRUD over the ledger records in [`Books`], keeping the derived monetary
/// fields consistent across every write.
///
/// Pure business logic — no I/O. The service does not check that the owning
/// user exists; the facade performs that check before calling in.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Validate and store a new record. The record's totals were computed by
    /// its constructor; this only guards the structural preconditions and
    /// emits an operational warning for sales recorded without a cost basis.
    /// That warning never blocks the write.
    pub fn add_record(&self, books: &mut Books, record: LedgerRecord) -> Result<Uuid, CoreError> {
        Self::validate(&record)?;
        if record.is_sale_without_cost() {
            tracing::warn!(
                record_id = %record.id,
                species = %record.species,
                "sale recorded without a cost basis (buy_price == 0); \
                 it will be excluded from profit aggregation"
            );
        }
        let id = record.id;
        books.records.push(record);
        Ok(id)
    }

    pub fn get<'a>(&self, books: &'a Books, id: Uuid) -> Option<&'a LedgerRecord> {
        books.records.iter().find(|r| r.id == id)
    }

    /// All records owned by a user, optionally restricted to one calendar
    /// year, newest first. Internal storage is oldest-first insertion
    /// order, so reversing gives a deterministic newest-first view even
    /// when timestamps tie.
    pub fn list_for_user<'a>(
        &self,
        books: &'a Books,
        user_id: Uuid,
        year: Option<i32>,
    ) -> Vec<&'a LedgerRecord> {
        let mut records: Vec<&LedgerRecord> = books
            .records
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter(|r| year.map_or(true, |y| r.year() == y))
            .collect();
        records.reverse();
        records
    }

    /// Apply a partial update. Fields absent from the patch keep their prior
    /// values; if quantity or either price changes, all three derived totals
    /// are recomputed together from the merged record.
    pub fn update<'a>(
        &self,
        books: &'a mut Books,
        id: Uuid,
        update: RecordUpdate,
    ) -> Result<&'a LedgerRecord, CoreError> {
        let record = books
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| CoreError::RecordNotFound(id.to_string()))?;

        let merged = {
            let mut candidate = record.clone();
            if let Some(q) = update.quantity {
                candidate.quantity = q;
            }
            if let Some(b) = update.buy_price {
                candidate.buy_price = b;
            }
            if let Some(s) = update.sell_price {
                candidate.sell_price = s;
            }
            candidate
        };
        Self::validate(&merged)?;

        let touches_totals = update.touches_totals();
        if let Some(q) = update.quantity {
            record.quantity = q;
        }
        if let Some(b) = update.buy_price {
            record.buy_price = b;
        }
        if let Some(s) = update.sell_price {
            record.sell_price = s;
        }
        if let Some(loc) = update.location {
            record.location = Some(loc);
        }
        if let Some(n) = update.notes {
            record.notes = Some(n);
        }
        if touches_totals {
            record.recompute_totals();
        }
        Ok(record)
    }

    /// Remove a record by id. Returns true if one existed.
    pub fn remove(&self, books: &mut Books, id: Uuid) -> bool {
        let before = books.records.len();
        books.records.retain(|r| r.id != id);
        books.records.len() < before
    }

    /// Distinct calendar years present in the ledger, descending.
    pub fn years(&self, books: &Books) -> Vec<i32> {
        let mut years: Vec<i32> = books.records.iter().map(|r| r.year()).collect();
        years.sort_unstable();
        years.dedup();
        years.reverse();
        years
    }

    fn validate(record: &LedgerRecord) -> Result<(), CoreError> {
        if record.quantity <= 0.0 || !record.quantity.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Quantity must be positive, got {}",
                record.quantity
            )));
        }
        if record.buy_price < 0.0 || !record.buy_price.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Buy price must be non-negative, got {}",
                record.buy_price
            )));
        }
        if record.sell_price < 0.0 || !record.sell_price.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Sell price must be non-negative, got {}",
                record.sell_price
            )));
        }
        Ok(())
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
