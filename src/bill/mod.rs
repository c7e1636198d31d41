mod catalog;
mod draft;
mod totals;

pub use catalog::{parse_month, Product, MONTHS};
pub use draft::{BillDraft, LineField, LineItem};
pub use totals::{compute_totals, parse_amount, LineTotal, Totals};
