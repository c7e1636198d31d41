use chrono::{Month, NaiveDate};

use super::catalog::Product;

/// Raw quantity and price input for one selected product.
///
/// Values are kept exactly as entered; coercion to numbers happens when
/// totals are computed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineItem {
    pub quantity: String,
    pub price: String,
}

/// Which half of a [`LineItem`] an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineField {
    Quantity,
    Price,
}

/// The bill being assembled.
///
/// Selection and line items live in a single ordered list, so a product is
/// selected exactly when it has a line item and rows keep the order in which
/// products were picked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillDraft {
    customer_name: String,
    invoice_date: Option<NaiveDate>,
    billing_month: Option<Month>,
    lines: Vec<(Product, LineItem)>,
    discount_percent: f64,
}

impl BillDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.customer_name = name.into();
    }

    pub fn set_invoice_date(&mut self, date: NaiveDate) {
        self.invoice_date = Some(date);
    }

    pub fn set_billing_month(&mut self, month: Month) {
        self.billing_month = Some(month);
    }

    /// Deselect a selected product (dropping its values) or append an
    /// unselected one with an empty line item.
    pub fn toggle_product(&mut self, product: Product) {
        match self.position(product) {
            Some(idx) => {
                self.lines.remove(idx);
            }
            None => self.lines.push((product, LineItem::default())),
        }
    }

    /// Edit one field of a selected product's line item. Does nothing when
    /// the product is not selected.
    pub fn set_line_item_field(&mut self, product: Product, field: LineField, value: impl Into<String>) {
        let Some(idx) = self.position(product) else {
            return;
        };
        let item = &mut self.lines[idx].1;
        match field {
            LineField::Quantity => item.quantity = value.into(),
            LineField::Price => item.price = value.into(),
        }
    }

    /// Store a discount percentage. Non-numeric input counts as 0 and the
    /// result is clamped into `[0, 100]`.
    pub fn set_discount(&mut self, value: &str) {
        let parsed = value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);
        self.discount_percent = parsed.clamp(0.0, 100.0);
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn invoice_date(&self) -> Option<NaiveDate> {
        self.invoice_date
    }

    pub fn billing_month(&self) -> Option<Month> {
        self.billing_month
    }

    pub fn discount_percent(&self) -> f64 {
        self.discount_percent
    }

    /// Selected products in selection order
    pub fn selected_products(&self) -> impl Iterator<Item = Product> + '_ {
        self.lines.iter().map(|(product, _)| *product)
    }

    /// Selected products paired with their line items, in selection order
    pub fn lines(&self) -> impl Iterator<Item = (Product, &LineItem)> + '_ {
        self.lines.iter().map(|(product, item)| (*product, item))
    }

    pub fn line_item(&self, product: Product) -> Option<&LineItem> {
        self.position(product).map(|idx| &self.lines[idx].1)
    }

    pub fn is_selected(&self, product: Product) -> bool {
        self.position(product).is_some()
    }

    /// True when no product is selected
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, product: Product) -> Option<usize> {
        self.lines.iter().position(|(p, _)| *p == product)
    }
}
