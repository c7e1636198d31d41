use chrono::Month;
use std::fmt;
use std::str::FromStr;

use crate::error::BillError;

/// A product the farm bills for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    Milk,
    Ghee,
    GoatMale,
    GoatFemale,
    SheepMale,
    SheepFemale,
}

impl Product {
    /// Every product, in the order they are offered for selection.
    pub const ALL: [Product; 6] = [
        Product::Milk,
        Product::Ghee,
        Product::GoatMale,
        Product::GoatFemale,
        Product::SheepMale,
        Product::SheepFemale,
    ];

    /// Short identifier used on the command line
    pub fn id(self) -> &'static str {
        match self {
            Product::Milk => "milk",
            Product::Ghee => "ghee",
            Product::GoatMale => "goat-male",
            Product::GoatFemale => "goat-female",
            Product::SheepMale => "sheep-male",
            Product::SheepFemale => "sheep-female",
        }
    }

    /// Name printed on the bill
    pub fn label(self) -> &'static str {
        match self {
            Product::Milk => "Milk (L)",
            Product::Ghee => "Ghee (Kg)",
            Product::GoatMale => "Goat Male",
            Product::GoatFemale => "Goat Female",
            Product::SheepMale => "Sheep Male",
            Product::SheepFemale => "Sheep Female",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Product {
    type Err = BillError;

    /// Accepts either the id ("goat-male") or the label ("Goat Male").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Product::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(wanted) || p.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BillError::UnknownProduct(s.to_string()))
    }
}

pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Parse a full or abbreviated English month name
pub fn parse_month(input: &str) -> Result<Month, BillError> {
    input
        .trim()
        .parse::<Month>()
        .map_err(|_| BillError::UnknownMonth(input.to_string()))
}
