// Text parsing for live match state and coefficient tables.

pub mod coefficients;
pub mod time_codec;

pub use coefficients::{extract_coefficients, table_label_for_period, CoefficientCell, CoefficientTable};
pub use time_codec::{parse_period_goals, parse_score, parse_time};
