use crate::calculator::{self, CalcError, ItemUpdate, Totals};

use super::{Client, InvoiceItem, ItemId};

/// Editable session state behind the invoice form. Lives for as long as the
/// form is open and is never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub items: Vec<InvoiceItem>,
    pub client: Client,
    pub notes: String,
    pub terms: String,
    pub tax_percent: f64,
}

impl InvoiceDraft {
    /// A new draft starts with a single empty row.
    pub fn new(tax_percent: f64) -> Self {
        Self {
            items: vec![InvoiceItem::new()],
            client: Client::default(),
            notes: String::new(),
            terms: String::new(),
            tax_percent,
        }
    }

    pub fn add_item(&mut self) -> ItemId {
        calculator::add_item(&mut self.items)
    }

    pub fn update_item(&mut self, id: ItemId, update: ItemUpdate) -> Result<(), CalcError> {
        calculator::update_item(&mut self.items, id, update)
    }

    pub fn remove_item(&mut self, id: ItemId) -> Result<InvoiceItem, CalcError> {
        calculator::remove_item(&mut self.items, id)
    }

    pub fn item(&self, id: ItemId) -> Option<&InvoiceItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn totals(&self) -> Totals {
        calculator::compute_totals(&self.items, self.tax_percent)
    }
}

impl Default for InvoiceDraft {
    fn default() -> Self {
        Self::new(0.0)
    }
}
