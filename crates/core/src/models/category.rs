use serde::{Deserialize, Serialize};

/// The class of a tracked foraged good. Exactly two classes exist; anything
/// else is rejected at the transport boundary before reaching the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Berries (blueberry, lingonberry, ...)
    Berry,
    /// Mushrooms (chanterelle, porcini, ...)
    Mushroom,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Berry => write!(f, "berry"),
            Category::Mushroom => write!(f, "mushroom"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "berry" => Ok(Category::Berry),
            "mushroom" => Ok(Category::Mushroom),
            other => Err(format!("Unknown category '{other}' (expected berry or mushroom)")),
        }
    }
}

/// What a ledger record represents.
///
/// The kind is chosen explicitly by the caller at creation time. Legacy data
/// encoded intent in its prices instead (a purchase had sell_price == 0);
/// [`RecordKind::classify`] maps that convention and is used only on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// Acquiring goods: a cost-only record.
    Purchase,
    /// Selling goods: carries revenue, and a cost basis when well-formed.
    Sale,
}

impl RecordKind {
    /// Classify a legacy record by the zero-price convention: anything with
    /// a sell price is a sale, everything else is a purchase. The buy price
    /// plays no part in the rule — records with both prices zero carry no
    /// money at all and land on the purchase side (quantity-only collection
    /// entries).
    pub fn classify(sell_price: f64) -> Self {
        if sell_price > 0.0 {
            RecordKind::Sale
        } else {
            RecordKind::Purchase
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Purchase => write!(f, "Purchase"),
            RecordKind::Sale => write!(f, "Sale"),
        }
    }
}

/// Normalized form of a free-text species name, used wherever species act as
/// lookup keys (price natural key, inventory grouping). Display strings keep
/// their original casing.
pub fn species_key(species: &str) -> String {
    species.trim().to_lowercase()
}
