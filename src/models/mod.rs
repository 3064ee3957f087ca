mod client;
mod draft;
mod invoice;
mod invoice_item;

pub use client::Client;
pub use draft::InvoiceDraft;
pub use invoice::Invoice;
pub use invoice_item::{InvoiceItem, ItemId};
