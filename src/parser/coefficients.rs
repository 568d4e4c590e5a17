// Coefficient tables on the match detail page
use crate::model::{CoefficientEntry, Reading};

pub const PERIOD_ONE_LABEL: &str = "Počet gólů v 1. třetině";
pub const PERIOD_TWO_LABEL: &str = "Počet gólů ve 2. třetině";
/// The third period only has a whole-match goals market.
pub const MATCH_LABEL: &str = "Počet gólů v zápasu";

/// Header of the table holding goal coefficients for `period`.
pub fn table_label_for_period(period: Reading) -> Option<&'static str> {
    match period.value()? {
        1 => Some(PERIOD_ONE_LABEL),
        2 => Some(PERIOD_TWO_LABEL),
        3 => Some(MATCH_LABEL),
        _ => None,
    }
}

/// A cell as read from the page; label-only cells have no value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoefficientCell {
    pub name: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoefficientTable {
    pub header: String,
    pub rows: Vec<Vec<CoefficientCell>>,
}

/// Flattens every table whose header equals `label`, in page order.
pub fn extract_coefficients(tables: &[CoefficientTable], label: &str) -> Vec<CoefficientEntry> {
    tables
        .iter()
        .filter(|t| t.header.trim() == label)
        .flat_map(|t| t.rows.iter().flatten())
        .filter_map(|cell| match (&cell.name, &cell.value) {
            (Some(name), Some(value)) => Some(CoefficientEntry {
                name: name.trim().to_string(),
                value: value.trim().to_string(),
            }),
            _ => None,
        })
        .collect()
}
