use crate::config::Thresholds;
use crate::model::MatchRecord;

/// A record is fit when it is in the configured period, at the configured
/// minute (absolute or within the period), and the period has no more goals
/// than the ceiling. Unreadable values never match.
pub fn is_fit(record: &MatchRecord, thresholds: &Thresholds) -> bool {
    let in_period = record.period.value() == Some(thresholds.period);
    let at_minute = record.total_minute.value() == Some(thresholds.minute)
        || record.minute.value() == Some(thresholds.minute);
    let under_ceiling = record
        .period_goals
        .value()
        .is_some_and(|goals| goals <= thresholds.goals);

    in_period && at_minute && under_ceiling
}
