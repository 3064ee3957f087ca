use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::calculator::{compute_totals, Totals};

use super::{Client, InvoiceDraft, InvoiceItem};

/// Point-in-time copy of the draft, built for a single export.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: Uuid,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub items: Vec<InvoiceItem>,
    pub client: Client,
    pub notes: Option<String>,
    pub terms: Option<String>,
    /// Tax percentage, e.g. `10.0` for 10%.
    pub tax: f64,
}

impl Invoice {
    pub fn snapshot(draft: &InvoiceDraft, issued_on: NaiveDate, due_in_days: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: issued_on,
            due_date: issued_on + Duration::days(due_in_days),
            items: draft.items.clone(),
            client: draft.client.clone(),
            notes: non_blank(&draft.notes),
            terms: non_blank(&draft.terms),
            tax: draft.tax_percent,
        }
    }

    /// Subtotal, tax amount and total, derived from the items on every call.
    pub fn totals(&self) -> Totals {
        compute_totals(&self.items, self.tax)
    }
}

fn non_blank(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::ItemUpdate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn due_date_is_thirty_days_after_issue() {
        let draft = InvoiceDraft::default();

        let invoice = Invoice::snapshot(&draft, date(2024, 1, 15), 30);

        assert_eq!(invoice.due_date, date(2024, 2, 14));
    }

    #[test]
    fn each_snapshot_gets_a_fresh_id() {
        let draft = InvoiceDraft::default();
        let today = date(2024, 3, 1);

        let first = Invoice::snapshot(&draft, today, 30);
        let second = Invoice::snapshot(&draft, today, 30);

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn blank_notes_and_terms_are_dropped() {
        let mut draft = InvoiceDraft::default();
        draft.notes = "  \n ".to_string();
        draft.terms = "Net 30".to_string();

        let invoice = Invoice::snapshot(&draft, date(2024, 3, 1), 30);

        assert_eq!(invoice.notes, None);
        assert_eq!(invoice.terms.as_deref(), Some("Net 30"));
    }

    #[test]
    fn snapshot_is_detached_from_later_edits() {
        let mut draft = InvoiceDraft::new(10.0);
        let id = draft.items[0].id;
        draft.update_item(id, ItemUpdate::Rate(50.0)).unwrap();

        let invoice = Invoice::snapshot(&draft, date(2024, 3, 1), 30);
        draft.update_item(id, ItemUpdate::Rate(75.0)).unwrap();

        let totals = invoice.totals();
        assert_eq!(totals.subtotal, 50.0);
        assert_eq!(totals.tax_amount, 5.0);
        assert_eq!(totals.total, 55.0);
    }
}
