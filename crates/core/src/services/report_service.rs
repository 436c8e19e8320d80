use uuid::Uuid;

use crate::models::books::Books;
use crate::models::category::Category;
use crate::models::report::{SalesOverview, UserSales, YearlyBreakdown};
use crate::services::registry_service::RegistryService;

/// Rolls ledger records into yearly profit summaries, and the price table
/// into a separate per-kilogram market-margin view.
///
/// Ledger aggregation counts proper sales only (an explicit Sale that also
/// carries a cost basis). Each record contributes its own stored totals;
/// nothing is re-derived from current prices.
pub struct ReportService {
    registry_service: RegistryService,
}

impl ReportService {
    pub fn new() -> Self {
        Self {
            registry_service: RegistryService::new(),
        }
    }

    /// One user's sales profit grouped by the calendar year of each record,
    /// optionally restricted to one category.
    pub fn profit_by_user_year(
        &self,
        books: &Books,
        user_id: Uuid,
        category: Option<Category>,
    ) -> YearlyBreakdown {
        let mut breakdown = YearlyBreakdown::new();
        for record in &books.records {
            if record.user_id != user_id || !record.is_proper_sale() {
                continue;
            }
            if category.map_or(false, |c| c != record.category) {
                continue;
            }
            breakdown.entry(record.year()).or_default().add(
                record.total_revenue,
                record.total_cost,
                record.total_profit,
            );
        }
        breakdown
    }

    /// Every registered user's yearly sales plus system-wide per-year sums.
    /// Each component of a yearly bucket is summed independently across
    /// users.
    pub fn all_users_sales_by_year(
        &self,
        books: &Books,
        category: Option<Category>,
    ) -> SalesOverview {
        let mut overview = SalesOverview::default();
        for user in self.registry_service.list(books) {
            let sales_by_year = self.profit_by_user_year(books, user.id, category);
            for (year, totals) in &sales_by_year {
                let bucket = overview.totals_by_year.entry(*year).or_default();
                bucket.revenue += totals.revenue;
                bucket.cost += totals.cost;
                bucket.profit += totals.profit;
                bucket.item_count += totals.item_count;
            }
            overview.per_user.push(UserSales {
                user,
                sales_by_year,
            });
        }
        overview
    }

    /// Market-margin view over the price table, NOT the ledger: each price
    /// entry counts as one per-kilogram observation in its year (revenue +=
    /// sell price, cost += buy price). Shares the breakdown shape with the
    /// ledger reports but changes only when the price table changes.
    pub fn price_profit_analysis(
        &self,
        books: &Books,
        category: Option<Category>,
    ) -> YearlyBreakdown {
        let mut breakdown = YearlyBreakdown::new();
        for entry in &books.prices.entries {
            if category.map_or(false, |c| c != entry.category) {
                continue;
            }
            breakdown.entry(entry.year).or_default().add(
                entry.sell_price,
                entry.buy_price,
                entry.sell_price - entry.buy_price,
            );
        }
        breakdown
    }
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new()
    }
}
