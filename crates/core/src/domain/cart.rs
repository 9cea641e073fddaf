use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::pricing::lines_subtotal;
use crate::domain::menu::ItemKey;

/// Session id used when the inbound request carries none.
pub const ANONYMOUS_SESSION_ID: &str = "anon";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn anonymous() -> Self {
        Self(ANONYMOUS_SESSION_ID.to_owned())
    }

    /// Blank or missing ids collapse to the anonymous session.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if !value.is_empty() => Self(value.to_owned()),
            _ => Self::anonymous(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_key: ItemKey,
    pub quantity: u32,
    /// Catalog price at the moment the line was first added.
    pub unit_price: Decimal,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Lines keep insertion order and hold at most one entry per item key.
/// `subtotal` is recomputed by every mutating cart operation before it returns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub session_id: SessionId,
    pub(crate) lines: Vec<CartLine>,
    pub(crate) subtotal: Decimal,
}

impl Cart {
    pub fn new(session_id: SessionId) -> Self {
        Self { session_id, lines: Vec::new(), subtotal: Decimal::ZERO }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, item_key: &ItemKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.item_key == item_key)
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    pub(crate) fn line_mut(&mut self, item_key: &ItemKey) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| &line.item_key == item_key)
    }

    pub(crate) fn recompute_subtotal(&mut self) -> Decimal {
        self.subtotal = lines_subtotal(&self.lines);
        self.subtotal
    }
}
