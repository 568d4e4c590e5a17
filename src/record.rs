// Listing entry text -> MatchRecord
use crate::model::{CoefficientEntry, MatchRecord, Reading};
use crate::parser::{parse_period_goals, parse_score, parse_time};
use crate::utils::absolute_link;

/// Raw texts read from one listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSnapshot {
    /// Score badge text; live matches without a badge have no goals yet.
    pub score: Option<String>,
    pub teams: String,
    pub timings: String,
    pub href: String,
}

pub fn build_record(
    snapshot: &ListingSnapshot,
    home_url: &str,
    coefs: Vec<CoefficientEntry>,
    datetime: String,
) -> MatchRecord {
    let time = parse_time(&snapshot.timings);
    let goals = snapshot
        .score
        .as_deref()
        .map(parse_score)
        .unwrap_or(Reading::Value(0));

    MatchRecord {
        datetime,
        link: absolute_link(home_url, &snapshot.href),
        teams: snapshot.teams.clone(),
        period: time.period,
        minute: time.period_minute,
        total_minute: time.total_minute,
        goals,
        period_goals: parse_period_goals(&snapshot.timings, time.period),
        coefs,
    }
}
