use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical menu key: trimmed and lowercased.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey(pub String);

impl ItemKey {
    /// Returns `None` when nothing is left after trimming.
    pub fn normalize(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub key: ItemKey,
    pub display_name: String,
    pub unit_price: Decimal,
}

impl CatalogEntry {
    pub fn new(key: &str, display_name: &str, unit_price: Decimal) -> Self {
        Self {
            key: ItemKey(key.trim().to_lowercase()),
            display_name: display_name.trim().to_owned(),
            unit_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ItemKey;

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(ItemKey::normalize("  PiZZa \n"), Some(ItemKey("pizza".to_owned())));
    }

    #[test]
    fn normalize_rejects_blank_input() {
        assert_eq!(ItemKey::normalize("   "), None);
        assert_eq!(ItemKey::normalize(""), None);
    }
}
