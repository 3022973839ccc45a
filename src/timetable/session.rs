use crate::timetable::{ScheduleError, period_bounds};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use time::Time;
use time::macros::format_description;

/// One weekly recurring scheduled class slot for a classroom.
///
/// Sessions are immutable once created; whether a session is active is
/// always computed against a supplied evaluation point, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSession {
    pub id: String,
    pub classroom_id: String,
    pub class_name: String,
    pub instructor: Option<String>,
    /// 0 = Monday .. 6 = Sunday.
    pub day_of_week: u8,
    /// Index into the period table, 1-7.
    pub period: u8,
    pub start_time: Time,
    pub end_time: Time,
    pub semester: Option<String>,
    pub course_code: Option<String>,
}

/// Incoming session data, from the timetable seed file or the create
/// endpoint. Times are optional strings; absent times derive from the
/// period table.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionDraft {
    pub classroom_id: String,
    pub class_name: String,
    #[serde(default)]
    pub instructor: Option<String>,
    pub day_of_week: u8,
    pub period: u8,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub course_code: Option<String>,
}

impl ClassSession {
    pub fn from_draft(id: String, draft: SessionDraft) -> Result<Self, ScheduleError> {
        if draft.day_of_week > 6 {
            return Err(ScheduleError::InvalidDayOfWeek(draft.day_of_week));
        }

        let (default_start, default_end) = period_bounds(draft.period)?;
        let start_time = match draft.start_time.as_deref() {
            Some(raw) if !raw.is_empty() => parse_time_of_day(raw)?,
            _ => default_start,
        };
        let end_time = match draft.end_time.as_deref() {
            Some(raw) if !raw.is_empty() => parse_time_of_day(raw)?,
            _ => default_end,
        };
        if start_time >= end_time {
            return Err(ScheduleError::InvalidTimeRange);
        }

        Ok(Self {
            id,
            classroom_id: draft.classroom_id,
            class_name: draft.class_name,
            instructor: draft.instructor,
            day_of_week: draft.day_of_week,
            period: draft.period,
            start_time,
            end_time,
            semester: draft.semester,
            course_code: draft.course_code,
        })
    }
}

/// Parse a "HH:MM" or "HH:MM:SS" time-of-day string.
pub fn parse_time_of_day(raw: &str) -> Result<Time, ScheduleError> {
    let with_seconds = format_description!("[hour]:[minute]:[second]");
    let without_seconds = format_description!("[hour]:[minute]");
    Time::parse(raw, with_seconds)
        .or_else(|_| Time::parse(raw, without_seconds))
        .map_err(|_| ScheduleError::InvalidTime(raw.to_string()))
}

#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("failed to read timetable: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse timetable: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid timetable entry: {0}")]
    Invalid(#[from] ScheduleError),
}

/// Bulk-import the timetable from a JSON seed file. A missing file is an
/// empty timetable, not an error.
pub fn load_timetable_from_path(
    path: impl AsRef<Path>,
) -> Result<Vec<ClassSession>, TimetableError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let contents = std::fs::read_to_string(path)?;
    let drafts: Vec<SessionDraft> = serde_json::from_str(&contents)?;
    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| {
            ClassSession::from_draft(format!("sched-{:04}", index + 1), draft).map_err(Into::into)
        })
        .collect()
}
