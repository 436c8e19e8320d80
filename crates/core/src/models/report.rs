use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::category::Category;
use super::user::UserSummary;

/// One yearly bucket of a profit report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YearlyTotals {
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub item_count: usize,
}

impl YearlyTotals {
    /// Fold one observation into the bucket.
    pub fn add(&mut self, revenue: f64, cost: f64, profit: f64) {
        self.revenue += revenue;
        self.cost += cost;
        self.profit += profit;
        self.item_count += 1;
    }
}

/// Year → totals mapping. `BTreeMap` keeps years in ascending order for
/// deterministic iteration.
pub type YearlyBreakdown = BTreeMap<i32, YearlyTotals>;

/// One user's yearly sales profit, as part of [`SalesOverview`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSales {
    pub user: UserSummary,
    pub sales_by_year: YearlyBreakdown,
}

/// All users' sales profit plus the system-wide per-year sums. Each field
/// of a yearly total is summed independently across users.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesOverview {
    pub per_user: Vec<UserSales>,
    pub totals_by_year: YearlyBreakdown,
}

/// Net inventory position for one (category, species) pair of one user.
///
/// `available` may be negative: that signals oversold inventory and is
/// reported as-is rather than clamped — preventing overselling is a check
/// callers perform before writing to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryLine {
    pub category: Category,
    pub species: String,

    /// Grams acquired via purchase records
    pub total_purchased: f64,

    /// Grams disposed via sale records (including sales without cost basis)
    pub total_sold: f64,

    /// total_purchased - total_sold
    pub available: f64,
}

/// A stored derived field disagreeing with recomputation on one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inconsistency {
    pub record_id: uuid::Uuid,
    pub field: String,
    pub stored: f64,
    pub expected: f64,
}

/// A soft signal about a suspicious record. Warnings never block writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditWarning {
    pub record_id: uuid::Uuid,
    pub message: String,
}

/// Result of a full ledger scan by the audit service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub inconsistent_records: Vec<Inconsistency>,
    pub warnings: Vec<AuditWarning>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.inconsistent_records.is_empty() && self.warnings.is_empty()
    }
}
