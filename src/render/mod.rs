mod document;
mod identity;

pub use document::{render_document, AssetRef, Block, PageSize, RenderedDocument, TableRow};
pub use identity::{BusinessIdentity, FARM};

/// Format an amount with two decimals and comma-grouped thousands
pub fn format_money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut out = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let mut grouped: String = out.chars().rev().collect();
    if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        grouped.insert(0, '-');
    }
    format!("{grouped}.{frac}")
}
