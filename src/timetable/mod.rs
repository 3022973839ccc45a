use thiserror::Error;
use time::Time;
use time::macros::time;

pub mod matcher;
pub mod session;

pub const PERIOD_MIN: u8 = 1;
pub const PERIOD_MAX: u8 = 7;

/// Standard institutional period table: periods 1-7 mapped to fixed
/// (start, end) times of day. Never mutated at runtime.
const PERIOD_TIMES: [(Time, Time); 7] = [
    (time!(8:50), time!(10:20)),
    (time!(10:30), time!(12:00)),
    (time!(13:00), time!(14:30)),
    (time!(14:40), time!(16:10)),
    (time!(16:20), time!(17:50)),
    (time!(18:00), time!(19:30)),
    (time!(19:40), time!(21:10)),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("invalid period: {0} (expected {PERIOD_MIN}-{PERIOD_MAX})")]
    InvalidPeriod(u8),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("invalid time of day: {0}")]
    InvalidTime(String),
    #[error("invalid day of week: {0} (expected 0=Monday to 6=Sunday)")]
    InvalidDayOfWeek(u8),
    #[error("class session ends before it starts")]
    InvalidTimeRange,
}

/// Look up the (start, end) times for a period number.
pub fn period_bounds(period: u8) -> Result<(Time, Time), ScheduleError> {
    if !(PERIOD_MIN..=PERIOD_MAX).contains(&period) {
        return Err(ScheduleError::InvalidPeriod(period));
    }
    Ok(PERIOD_TIMES[(period - 1) as usize])
}

/// Day-of-week number with Monday = 0 and Sunday = 6.
pub fn weekday_number(weekday: time::Weekday) -> u8 {
    weekday.number_days_from_monday()
}
