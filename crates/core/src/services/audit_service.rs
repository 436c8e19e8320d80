use crate::models::books::Books;
use crate::models::record::GRAMS_PER_KG;
use crate::models::report::{AuditReport, AuditWarning, Inconsistency};

/// Absolute tolerance (currency units) when comparing stored derived fields
/// against recomputation. Small float drift is expected; anything beyond
/// this indicates a record was written without a full recomputation.
pub const AUDIT_TOLERANCE: f64 = 0.01;

/// Read-only scan of the ledger for records whose stored derived fields
/// disagree with recomputation, or whose price combination is semantically
/// ambiguous. Never mutates anything; findings are a report, not errors.
pub struct AuditService;

impl AuditService {
    pub fn new() -> Self {
        Self
    }

    pub fn audit(&self, books: &Books) -> AuditReport {
        let mut report = AuditReport::default();

        for record in &books.records {
            if record.is_sale_without_cost() {
                report.warnings.push(AuditWarning {
                    record_id: record.id,
                    message: format!(
                        "sell_price {} with buy_price 0 — possible miscategorized record \
                         (no cost basis); excluded from profit aggregation",
                        record.sell_price
                    ),
                });
            }

            // Derived-field drift is only checked on records carrying both
            // prices; zero-priced legs make half the expectation trivially 0.
            if record.buy_price > 0.0 && record.sell_price > 0.0 {
                let expected_revenue = record.quantity * record.sell_price / GRAMS_PER_KG;
                let expected_cost = record.quantity * record.buy_price / GRAMS_PER_KG;
                let expected_profit = expected_revenue - expected_cost;

                for (field, stored, expected) in [
                    ("total_revenue", record.total_revenue, expected_revenue),
                    ("total_cost", record.total_cost, expected_cost),
                    ("total_profit", record.total_profit, expected_profit),
                ] {
                    if (stored - expected).abs() > AUDIT_TOLERANCE {
                        report.inconsistent_records.push(Inconsistency {
                            record_id: record.id,
                            field: field.to_string(),
                            stored,
                            expected,
                        });
                    }
                }
            }
        }

        report
    }
}

impl Default for AuditService {
    fn default() -> Self {
        Self::new()
    }
}
