use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::domain::menu::{CatalogEntry, ItemKey};
use crate::errors::CatalogError;

/// Fixed menu, built once at startup. Entries keep their definition order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        let mut normalized = Vec::with_capacity(entries.len());

        for entry in entries {
            let display_name = entry.display_name.trim().to_owned();
            let key = ItemKey::normalize(&entry.key.0)
                .ok_or_else(|| CatalogError::EmptyKey { display_name: display_name.clone() })?;
            if display_name.is_empty() {
                return Err(CatalogError::MissingDisplayName { key: key.0 });
            }
            if entry.unit_price < Decimal::ZERO {
                return Err(CatalogError::NegativePrice { key: key.0 });
            }
            if !seen.insert(key.clone()) {
                return Err(CatalogError::DuplicateKey { key: key.0 });
            }

            normalized.push(CatalogEntry { key, display_name, unit_price: entry.unit_price });
        }

        Ok(Self { entries: normalized })
    }

    pub fn with_default_menu() -> Self {
        Self { entries: default_menu() }
    }

    /// Expects an already-normalized key; normalization belongs to the request boundary.
    pub fn lookup(&self, key: &ItemKey) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| &entry.key == key)
    }

    pub fn display_name<'a>(&'a self, key: &'a ItemKey) -> &'a str {
        self.lookup(key).map(|entry| entry.display_name.as_str()).unwrap_or(key.as_str())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn default_menu() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("pizza", "Pizza", Decimal::new(1099, 2)),
        CatalogEntry::new("burger", "Burger", Decimal::new(899, 2)),
        CatalogEntry::new("fries", "Fries", Decimal::new(349, 2)),
        CatalogEntry::new("salad", "Salad", Decimal::new(749, 2)),
        CatalogEntry::new("soda", "Soda", Decimal::new(199, 2)),
    ]
}
