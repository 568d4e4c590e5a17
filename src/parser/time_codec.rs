// Timing text such as "2. 35:12(1:0, 0:1)" -> period, minutes, period goals
use crate::model::{MatchTime, Reading};

/// Length of one period in minutes.
pub const PERIOD_LENGTH: i64 = 20;

fn strip(segment: &str, dashes: bool) -> String {
    segment
        .chars()
        .filter(|c| !c.is_whitespace() && !(dashes && *c == '-'))
        .collect()
}

/// Minutes from a clock segment; "35:12" reads as 35.
fn clock_minutes(segment: &str) -> Reading {
    let cleaned = strip(segment, true);
    let minutes = cleaned.split(':').next().unwrap_or_default();
    Reading::parse(minutes)
}

/// Never fails: anything unreadable becomes `Absent` or `Malformed`.
///
/// The period is the text before the first `.`. The elapsed minute is taken
/// from the third `.`-segment, or from an `MM:SS` clock in the second
/// segment when the text uses the compact layout. Without a period nothing
/// else is read.
pub fn parse_time(text: &str) -> MatchTime {
    let head = match text.find('(') {
        Some(i) => &text[..i],
        None => text,
    };
    let segments: Vec<&str> = head.split('.').collect();

    let period_text = strip(segments[0], false);
    if period_text.is_empty() {
        return MatchTime::ABSENT;
    }
    let period = Reading::parse(&period_text);

    let total_minute = match segments.as_slice() {
        [_, _, third, ..] => clock_minutes(third),
        [_, second] if second.contains(':') => clock_minutes(second),
        _ => Reading::Absent,
    };
    let period_minute = period.zip_with(total_minute, |p, m| {
        let elapsed = p.checked_sub(1)?.checked_mul(PERIOD_LENGTH)?;
        m.checked_sub(elapsed)
    });

    MatchTime { period, total_minute, period_minute }
}

/// Sum of a "home:away" pair. A missing side is malformed.
pub fn parse_score(text: &str) -> Reading {
    let mut sides = text.trim().split(':');
    match (sides.next(), sides.next(), sides.next()) {
        (Some(home), Some(away), None) => {
            Reading::parse(home).zip_with(Reading::parse(away), |h, a| h.checked_add(a))
        }
        _ => Reading::Malformed,
    }
}

/// Goals scored in `period` (1-based), read from the first `(...)` group.
///
/// `Absent` when there is no group or the group has no entry for the period.
pub fn parse_period_goals(text: &str, period: Reading) -> Reading {
    let Some(period) = period.value().filter(|p| *p >= 1) else {
        return Reading::Absent;
    };
    let (Some(open), Some(close)) = (text.find('('), text.rfind(')')) else {
        return Reading::Absent;
    };
    if close < open {
        return Reading::Absent;
    }

    text[open + 1..close]
        .split(',')
        .nth((period - 1) as usize)
        .map(parse_score)
        .unwrap_or(Reading::Absent)
}
