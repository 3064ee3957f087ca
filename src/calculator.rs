//! Derived amounts and totals for a list of line items.
//!
//! All arithmetic is plain `f64`. Values are never rounded here; two-decimal
//! formatting happens only when the invoice is rendered, so totals may carry
//! floating-point artifacts at the cent level (e.g. `0.1 + 0.2`).

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{InvoiceItem, ItemId};

#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("no line item with id {0}")]
    ItemNotFound(ItemId),
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
}

/// A single field change on a line item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemUpdate {
    Description(String),
    Quantity(f64),
    Rate(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
}

pub fn compute_amount(quantity: f64, rate: f64) -> f64 {
    quantity * rate
}

/// Apply `update` to the item with `id`. Other rows are left untouched.
pub fn update_item(items: &mut [InvoiceItem], id: ItemId, update: ItemUpdate) -> Result<(), CalcError> {
    let Some(item) = items.iter_mut().find(|item| item.id == id) else {
        warn!(%id, "update for unknown line item");
        return Err(CalcError::ItemNotFound(id));
    };

    match update {
        ItemUpdate::Description(description) => item.description = description,
        ItemUpdate::Quantity(quantity) => item.quantity = quantity,
        ItemUpdate::Rate(rate) => item.rate = rate,
    }
    debug!(%id, amount = item.amount(), "line item updated");

    Ok(())
}

/// Append a default row and return its id.
pub fn add_item(items: &mut Vec<InvoiceItem>) -> ItemId {
    let item = InvoiceItem::new();
    let id = item.id;
    items.push(item);
    debug!(%id, count = items.len(), "line item added");
    id
}

pub fn remove_item(items: &mut Vec<InvoiceItem>, id: ItemId) -> Result<InvoiceItem, CalcError> {
    let Some(index) = items.iter().position(|item| item.id == id) else {
        warn!(%id, "removal of unknown line item");
        return Err(CalcError::ItemNotFound(id));
    };

    let removed = items.remove(index);
    debug!(%id, count = items.len(), "line item removed");
    Ok(removed)
}

pub fn compute_totals(items: &[InvoiceItem], tax_percent: f64) -> Totals {
    let subtotal: f64 = items.iter().map(InvoiceItem::amount).sum();
    let tax_amount = subtotal * tax_percent / 100.0;

    Totals {
        subtotal,
        tax_amount,
        total: subtotal + tax_amount,
    }
}

/// Parse user-entered numeric text. Blank input counts as zero; anything
/// else must be a finite number.
pub fn parse_number(text: &str) -> Result<f64, CalcError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CalcError::InvalidNumber(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(description: &str, quantity: f64, rate: f64) -> InvoiceItem {
        InvoiceItem {
            description: description.to_string(),
            quantity,
            rate,
            ..InvoiceItem::new()
        }
    }

    #[test]
    fn single_item_with_ten_percent_tax() {
        let items = vec![item("Design work", 10.0, 50.0)];

        let totals = compute_totals(&items, 10.0);

        assert_eq!(items[0].amount(), 500.0);
        assert_eq!(totals.subtotal, 500.0);
        assert_eq!(totals.tax_amount, 50.0);
        assert_eq!(totals.total, 550.0);
    }

    #[test]
    fn empty_list_totals_are_zero() {
        let totals = compute_totals(&[], 20.0);

        assert_eq!(totals, Totals { subtotal: 0.0, tax_amount: 0.0, total: 0.0 });
    }

    #[test]
    fn two_items_without_tax() {
        let items = vec![item("Hosting", 2.0, 25.5), item("Domain", 1.0, 99.99)];

        let totals = compute_totals(&items, 0.0);

        assert_eq!(items[0].amount(), 51.0);
        assert_eq!(items[1].amount(), 99.99);
        assert!((totals.subtotal - 150.99).abs() < 1e-9);
        assert_eq!(totals.total, totals.subtotal);
    }

    #[test]
    fn update_recomputes_amount() {
        let mut items = vec![item("Consulting", 1.0, 0.0)];
        let id = items[0].id;

        update_item(&mut items, id, ItemUpdate::Quantity(3.0)).unwrap();
        update_item(&mut items, id, ItemUpdate::Rate(40.0)).unwrap();

        assert_eq!(items[0].amount(), 120.0);
    }

    #[test]
    fn update_leaves_other_rows_untouched() {
        let mut items = vec![item("A", 1.0, 10.0), item("B", 2.0, 20.0)];
        let untouched = items[1].clone();
        let id = items[0].id;

        update_item(&mut items, id, ItemUpdate::Description("A2".to_string())).unwrap();

        assert_eq!(items[0].description, "A2");
        assert_eq!(items[1], untouched);
    }

    #[test]
    fn update_of_unknown_id_is_reported() {
        let mut items = vec![item("A", 1.0, 10.0)];
        let before = items.clone();
        let missing = ItemId::new();

        let err = update_item(&mut items, missing, ItemUpdate::Rate(5.0)).unwrap_err();

        assert_eq!(err, CalcError::ItemNotFound(missing));
        assert_eq!(items, before);
    }

    #[test]
    fn add_item_appends_default_row() {
        let mut items = vec![item("A", 1.0, 10.0)];

        let id = add_item(&mut items);

        assert_eq!(items.len(), 2);
        let added = &items[1];
        assert_eq!(added.id, id);
        assert_eq!(added.description, "");
        assert_eq!(added.quantity, 1.0);
        assert_eq!(added.rate, 0.0);
        assert_eq!(added.amount(), 0.0);
    }

    #[test]
    fn remove_can_empty_the_list() {
        let mut items = vec![item("A", 1.0, 10.0)];
        let id = items[0].id;

        let removed = remove_item(&mut items, id).unwrap();

        assert_eq!(removed.description, "A");
        assert!(items.is_empty());
        assert_eq!(remove_item(&mut items, id), Err(CalcError::ItemNotFound(id)));
    }

    #[test]
    fn negative_and_zero_values_are_accepted() {
        let items = vec![item("Refund", -1.0, 30.0), item("Free", 0.0, 100.0)];

        let totals = compute_totals(&items, 10.0);

        assert_eq!(totals.subtotal, -30.0);
        assert_eq!(totals.total, -33.0);
    }

    #[test]
    fn parse_number_accepts_numbers_and_blank() {
        assert_eq!(parse_number("12.5"), Ok(12.5));
        assert_eq!(parse_number("  -3 "), Ok(-3.0));
        assert_eq!(parse_number(""), Ok(0.0));
        assert_eq!(parse_number("   "), Ok(0.0));
    }

    #[test]
    fn parse_number_rejects_non_numeric_text() {
        assert_eq!(parse_number("abc"), Err(CalcError::InvalidNumber("abc".to_string())));
        assert!(parse_number("NaN").is_err());
        assert!(parse_number("inf").is_err());
        assert!(parse_number("1.2.3").is_err());
    }

    fn arb_items() -> impl Strategy<Value = Vec<InvoiceItem>> {
        prop::collection::vec((-1_000.0f64..1_000.0, -1_000.0f64..1_000.0), 0..12).prop_map(|rows| {
            rows.into_iter()
                .map(|(quantity, rate)| item("row", quantity, rate))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn amount_tracks_quantity_and_rate(quantity in -1e6f64..1e6, rate in -1e6f64..1e6) {
            let mut items = vec![InvoiceItem::new()];
            let id = items[0].id;

            update_item(&mut items, id, ItemUpdate::Quantity(quantity)).unwrap();
            prop_assert_eq!(items[0].amount(), compute_amount(quantity, 0.0));
            update_item(&mut items, id, ItemUpdate::Rate(rate)).unwrap();
            prop_assert_eq!(items[0].amount(), quantity * rate);
        }

        #[test]
        fn totals_ignore_item_order(items in arb_items(), tax in 0.0f64..50.0) {
            let mut reversed = items.clone();
            reversed.reverse();

            let a = compute_totals(&items, tax);
            let b = compute_totals(&reversed, tax);

            // Summation order can move the last bits of an f64.
            let tolerance = 1e-6 * (1.0 + a.subtotal.abs());
            prop_assert!((a.subtotal - b.subtotal).abs() <= tolerance);
            prop_assert!((a.tax_amount - b.tax_amount).abs() <= tolerance);
            prop_assert!((a.total - b.total).abs() <= tolerance);
        }

        #[test]
        fn add_then_remove_restores_sequence(items in arb_items()) {
            let mut edited = items.clone();

            let id = add_item(&mut edited);
            remove_item(&mut edited, id).unwrap();

            prop_assert_eq!(edited, items);
        }

        #[test]
        fn zero_tax_means_total_equals_subtotal(items in arb_items()) {
            let totals = compute_totals(&items, 0.0);

            prop_assert_eq!(totals.tax_amount, 0.0);
            prop_assert_eq!(totals.total, totals.subtotal);
        }

        #[test]
        fn totals_are_repeatable(items in arb_items(), tax in -100.0f64..100.0) {
            prop_assert_eq!(compute_totals(&items, tax), compute_totals(&items, tax));
        }
    }
}
