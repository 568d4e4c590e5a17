// Utility functions
use chrono::Local;

/// Local timestamp as written into records and log lines.
pub fn now_datetime() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Local calendar date, used to partition log files.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Uppercases the first character: `periodGoals` -> `PeriodGoals`.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Joins a site-relative link onto the home url.
pub fn absolute_link(home_url: &str, href: &str) -> String {
    format!("{}{}", home_url, href)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_field_names() {
        assert_eq!(capitalize("periodGoals"), "PeriodGoals");
        assert_eq!(capitalize("teams"), "Teams");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn datetime_has_second_precision() {
        let dt = now_datetime();
        assert_eq!(dt.len(), 19);
        assert!(dt.starts_with(&today()));
    }
}
