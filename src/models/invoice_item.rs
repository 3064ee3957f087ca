use std::fmt;

use uuid::Uuid;

use crate::calculator::compute_amount;

/// Opaque row identifier, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One billable row. The amount is never stored, it is always
/// `quantity * rate` at the time it is read.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceItem {
    pub id: ItemId,
    pub description: String,
    pub quantity: f64,
    pub rate: f64,
}

impl InvoiceItem {
    /// A fresh default row: quantity 1, rate 0, no description.
    pub fn new() -> Self {
        Self {
            id: ItemId::new(),
            description: String::new(),
            quantity: 1.0,
            rate: 0.0,
        }
    }

    pub fn amount(&self) -> f64 {
        compute_amount(self.quantity, self.rate)
    }
}

impl Default for InvoiceItem {
    fn default() -> Self {
        Self::new()
    }
}
