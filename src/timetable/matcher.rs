use crate::timetable::session::ClassSession;
use crate::timetable::{PERIOD_MAX, PERIOD_MIN, ScheduleError, weekday_number};
use time::{Date, OffsetDateTime};

/// The point a status query is evaluated at. Resolved once at the API
/// boundary; matcher and classifier each work on one concrete variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationPoint {
    /// A concrete timestamp; schedule and occupancy signals both apply.
    Now(OffsetDateTime),
    /// A (date, period) pair that has not occurred yet; schedule only.
    Future { date: Date, period: u8 },
}

/// Find the session active at `point` among one classroom's sessions.
///
/// When sessions overlap, the first match in list order wins. That is an
/// arbitrary tie-break over unvalidated timetable data, not a most-specific
/// match; callers must not rely on which overlapping session is returned.
pub fn active_session<'a, I>(
    sessions: I,
    point: EvaluationPoint,
) -> Result<Option<&'a ClassSession>, ScheduleError>
where
    I: IntoIterator<Item = &'a ClassSession>,
{
    match point {
        EvaluationPoint::Now(at) => {
            let weekday = weekday_number(at.weekday());
            let clock = at.time();
            Ok(sessions
                .into_iter()
                .find(|s| s.day_of_week == weekday && s.start_time <= clock && clock <= s.end_time))
        }
        EvaluationPoint::Future { date, period } => {
            if !(PERIOD_MIN..=PERIOD_MAX).contains(&period) {
                return Err(ScheduleError::InvalidPeriod(period));
            }
            let weekday = weekday_number(date.weekday());
            Ok(sessions
                .into_iter()
                .find(|s| s.day_of_week == weekday && s.period == period))
        }
    }
}

/// Whether a single session is in progress at `at` (inclusive bounds).
pub fn is_active_at(session: &ClassSession, at: OffsetDateTime) -> bool {
    let clock = at.time();
    session.day_of_week == weekday_number(at.weekday())
        && session.start_time <= clock
        && clock <= session.end_time
}
