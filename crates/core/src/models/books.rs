use serde::{Deserialize, Serialize};

use super::price::PriceBook;
use super::record::LedgerRecord;
use super::user::User;

/// The main data container: everything the tracker knows, held in process
/// memory. This is what gets serialized into a snapshot file.
///
/// There is exactly one `Books` per tracker instance and all mutation goes
/// through the owning [`crate::ForageTracker`], so writers are serialized
/// and a reader never observes a half-written record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Books {
    /// Registered display-name accounts
    pub users: Vec<User>,

    /// All purchase/sale records, in insertion order (oldest first)
    pub records: Vec<LedgerRecord>,

    /// Reference price table, upserted by (category, species, year)
    pub prices: PriceBook,
}

impl Books {
    pub fn new() -> Self {
        Self::default()
    }
}
