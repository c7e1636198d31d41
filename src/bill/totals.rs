use super::catalog::Product;
use super::draft::BillDraft;

/// Computed amounts for one selected product
#[derive(Debug, Clone, PartialEq)]
pub struct LineTotal {
    pub product: Product,
    pub quantity: f64,
    pub unit_price: f64,
    pub total: f64,
}

/// Computed amounts for a whole draft
#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub lines: Vec<LineTotal>,
    pub grand_total: f64,
    pub discount_percent: f64,
}

/// Coerce raw numeric input to an amount. Empty, invalid, non-finite and
/// negative input all count as 0.
pub fn parse_amount(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(0.0)
}

/// Compute line totals and the discounted grand total for a draft.
///
/// The discount is applied to the running total after each line rather than
/// once to the final sum, so it compounds across lines:
/// `acc = (acc + line) - (acc + line) * discount / 100`.
pub fn compute_totals(draft: &BillDraft) -> Totals {
    let discount = draft.discount_percent();

    let lines: Vec<LineTotal> = draft
        .lines()
        .map(|(product, item)| {
            let quantity = parse_amount(&item.quantity);
            let unit_price = parse_amount(&item.price);
            LineTotal {
                product,
                quantity,
                unit_price,
                total: quantity * unit_price,
            }
        })
        .collect();

    let grand_total = lines.iter().fold(0.0, |acc, line| {
        let running = acc + line.total;
        let discount_amount = running * discount / 100.0;
        running - discount_amount
    });

    Totals {
        lines,
        grand_total,
        discount_percent: discount,
    }
}
