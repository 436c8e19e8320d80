use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A display-name account. There is no authentication — "logging in" is a
/// plain lookup by alias returning the user's id, and nothing secret is
/// stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,

    /// Display alias (unique by convention, not enforced)
    pub alias: String,

    /// When the account was registered
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            alias: alias.into(),
            created_at: Utc::now(),
        }
    }
}

/// A user together with coarse financial totals folded over ALL of their
/// ledger records, regardless of record kind.
///
/// This deliberately differs from the report service's "proper sales only"
/// profit figures: registry totals are an everything-included view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub alias: String,
    pub created_at: DateTime<Utc>,

    /// Sum of total_revenue across all the user's records
    pub revenue: f64,

    /// Sum of total_profit across all the user's records
    pub profit: f64,
}
