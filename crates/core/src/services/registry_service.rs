use uuid::Uuid;

use crate::models::books::Books;
use crate::models::user::{User, UserSummary};

/// Read side of the identity registry: users plus financial totals derived
/// on every read by folding the ledger.
///
/// The totals here fold ALL of a user's records, whatever their kind or
/// prices. This is intentionally coarser than the report service, which
/// counts proper sales only — the two figures diverge on anomalous records
/// and both views are wanted.
pub struct RegistryService;

impl RegistryService {
    pub fn new() -> Self {
        Self
    }

    pub fn get(&self, books: &Books, id: Uuid) -> Option<UserSummary> {
        books
            .users
            .iter()
            .find(|u| u.id == id)
            .map(|u| self.summarize(books, u))
    }

    /// Look up a user by display alias (trimmed, exact match). This is the
    /// whole "login" mechanism — a pure read, no secret involved.
    pub fn find_by_alias(&self, books: &Books, alias: &str) -> Option<UserSummary> {
        let wanted = alias.trim();
        books
            .users
            .iter()
            .find(|u| u.alias == wanted)
            .map(|u| self.summarize(books, u))
    }

    /// All users in registration order, each with freshly computed totals.
    pub fn list(&self, books: &Books) -> Vec<UserSummary> {
        books
            .users
            .iter()
            .map(|u| self.summarize(books, u))
            .collect()
    }

    fn summarize(&self, books: &Books, user: &User) -> UserSummary {
        let mut revenue = 0.0;
        let mut profit = 0.0;
        for record in books.records.iter().filter(|r| r.user_id == user.id) {
            revenue += record.total_revenue;
            profit += record.total_profit;
        }
        UserSummary {
            id: user.id,
            alias: user.alias.clone(),
            created_at: user.created_at,
            revenue,
            profit,
        }
    }
}

impl Default for RegistryService {
    fn default() -> Self {
        Self::new()
    }
}
