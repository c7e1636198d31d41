use serde::Serialize;

use super::format_money;
use super::identity::{BusinessIdentity, FARM};
use crate::bill::{BillDraft, Totals};

/// Fixed page geometry: A4 at 96 px per inch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSize {
    pub paper: &'static str,
    pub width_px: u32,
    pub height_px: u32,
}

pub const A4: PageSize = PageSize {
    paper: "a4",
    width_px: 794,
    height_px: 1123,
};

/// A visual asset the document refers to. Capture has to wait until every
/// referenced asset is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetRef {
    MilkLogo,
    GoatLogo,
}

impl AssetRef {
    pub fn key(self) -> &'static str {
        match self {
            AssetRef::MilkLogo => "milk_logo",
            AssetRef::GoatLogo => "goat_logo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub product: String,
    pub quantity: String,
    pub price: String,
    pub total: String,
}

/// One block of the bill layout, top to bottom
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Header {
        identity: BusinessIdentity,
        left_logo: AssetRef,
        right_logo: AssetRef,
    },
    MetaBand {
        invoice_date: String,
        billing_month: String,
    },
    Customer {
        name: String,
    },
    LineTable {
        rows: Vec<TableRow>,
    },
    GrandTotal {
        amount: String,
    },
    Discount {
        percent: String,
    },
}

/// Layout derived from a draft snapshot. Rebuilt for every preview or
/// export; never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDocument {
    pub page: PageSize,
    pub blocks: Vec<Block>,
}

impl RenderedDocument {
    /// Every asset referenced by the layout, in document order
    pub fn assets(&self) -> Vec<AssetRef> {
        self.blocks
            .iter()
            .flat_map(|block| match block {
                Block::Header {
                    left_logo,
                    right_logo,
                    ..
                } => vec![*left_logo, *right_logo],
                _ => Vec::new(),
            })
            .collect()
    }

    pub fn line_table(&self) -> Option<&[TableRow]> {
        self.blocks.iter().find_map(|block| match block {
            Block::LineTable { rows } => Some(rows.as_slice()),
            _ => None,
        })
    }

    pub fn has_discount_line(&self) -> bool {
        self.blocks
            .iter()
            .any(|block| matches!(block, Block::Discount { .. }))
    }
}

fn raw_or_zero(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Lay out a draft and its totals as a single A4 bill.
pub fn render_document(draft: &BillDraft, totals: &Totals) -> RenderedDocument {
    let mut blocks = vec![
        Block::Header {
            identity: FARM,
            left_logo: AssetRef::MilkLogo,
            right_logo: AssetRef::GoatLogo,
        },
        Block::MetaBand {
            invoice_date: draft
                .invoice_date()
                .map(|d| d.format("%d-%m-%Y").to_string())
                .unwrap_or_default(),
            billing_month: draft
                .billing_month()
                .map(|m| m.name().to_string())
                .unwrap_or_default(),
        },
        Block::Customer {
            name: draft.customer_name().to_string(),
        },
    ];

    if !draft.is_empty() {
        let rows = draft
            .lines()
            .zip(&totals.lines)
            .map(|((product, item), line)| TableRow {
                product: product.label().to_string(),
                quantity: raw_or_zero(&item.quantity),
                price: raw_or_zero(&item.price),
                total: format_money(line.total),
            })
            .collect();
        blocks.push(Block::LineTable { rows });
    }

    blocks.push(Block::GrandTotal {
        amount: format_money(totals.grand_total),
    });

    if totals.discount_percent > 0.0 {
        blocks.push(Block::Discount {
            percent: totals.discount_percent.to_string(),
        });
    }

    RenderedDocument { page: A4, blocks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::{compute_totals, LineField, Product};
    use chrono::{Month, NaiveDate};

    fn render(draft: &BillDraft) -> RenderedDocument {
        render_document(draft, &compute_totals(draft))
    }

    fn sample_draft() -> BillDraft {
        let mut draft = BillDraft::new();
        draft.set_customer_name("Ravi Patil");
        draft.set_invoice_date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        draft.set_billing_month(Month::February);
        draft.toggle_product(Product::Ghee);
        draft.set_line_item_field(Product::Ghee, LineField::Quantity, "2");
        draft.set_line_item_field(Product::Ghee, LineField::Price, "600");
        draft.toggle_product(Product::Milk);
        draft.set_line_item_field(Product::Milk, LineField::Quantity, "10");
        draft.set_line_item_field(Product::Milk, LineField::Price, "50");
        draft
    }

    #[test]
    fn empty_selection_omits_table() {
        let doc = render(&BillDraft::new());
        assert!(doc.line_table().is_none());
        assert!(doc
            .blocks
            .iter()
            .any(|b| matches!(b, Block::GrandTotal { amount } if amount == "0.00")));
    }

    #[test]
    fn rows_follow_selection_order() {
        let doc = render(&sample_draft());
        let rows = doc.line_table().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product, "Ghee (Kg)");
        assert_eq!(rows[0].total, "1,200.00");
        assert_eq!(rows[1].product, "Milk (L)");
        assert_eq!(rows[1].quantity, "10");
        assert_eq!(rows[1].price, "50");
        assert_eq!(rows[1].total, "500.00");
    }

    #[test]
    fn unset_values_render_as_zero() {
        let mut draft = BillDraft::new();
        draft.toggle_product(Product::SheepFemale);
        let doc = render(&draft);
        let rows = doc.line_table().unwrap();

        assert_eq!(rows[0].quantity, "0");
        assert_eq!(rows[0].price, "0");
        assert_eq!(rows[0].total, "0.00");
    }

    #[test]
    fn discount_line_only_when_positive() {
        let mut draft = sample_draft();
        assert!(!render(&draft).has_discount_line());

        draft.set_discount("12.5");
        let doc = render(&draft);
        assert!(doc.has_discount_line());
        assert!(doc
            .blocks
            .iter()
            .any(|b| matches!(b, Block::Discount { percent } if percent == "12.5")));
    }

    #[test]
    fn metadata_and_customer_blocks() {
        let doc = render(&sample_draft());
        assert_eq!(
            doc.blocks[1],
            Block::MetaBand {
                invoice_date: "01-03-2026".to_string(),
                billing_month: "February".to_string(),
            }
        );
        assert_eq!(
            doc.blocks[2],
            Block::Customer {
                name: "Ravi Patil".to_string()
            }
        );
    }

    #[test]
    fn layout_is_fixed_a4_with_logo_assets() {
        let doc = render(&sample_draft());
        assert_eq!(doc.page, A4);
        assert_eq!(doc.assets(), vec![AssetRef::MilkLogo, AssetRef::GoatLogo]);
    }

    #[test]
    fn captured_bill_ends_at_totals() {
        let mut draft = sample_draft();
        draft.set_discount("10");
        let doc = render(&draft);
        assert!(matches!(doc.blocks.last(), Some(Block::Discount { .. })));

        let doc = render(&sample_draft());
        assert!(matches!(doc.blocks.last(), Some(Block::GrandTotal { .. })));

        let json = serde_json::to_string(&doc).unwrap();
        assert!(!json.contains("\"kind\":\"footer\""));
    }

    #[test]
    fn serializes_with_block_kind_tags() {
        let doc = render(&sample_draft());
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["page"]["paper"], "a4");
        assert_eq!(json["blocks"][0]["kind"], "header");
        assert_eq!(json["blocks"][0]["left_logo"], "milk_logo");
        assert_eq!(json["blocks"][3]["kind"], "line_table");
        assert_eq!(json["blocks"][3]["rows"][0]["product"], "Ghee (Kg)");
    }
}
