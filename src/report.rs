//! Reporting assembler: composes directory, snapshot, matcher, and
//! classifier output into per-classroom records for the API layer. Field
//! copying only; all decision logic lives in the matcher and classifier.

use crate::directory::Classroom;
use crate::occupancy::OccupancySnapshot;
use crate::occupancy::classifier::{self, StatusResult};
use crate::timetable::ScheduleError;
use crate::timetable::matcher::{EvaluationPoint, active_session};
use crate::timetable::session::ClassSession;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct ClassroomStatusRecord {
    pub classroom: Classroom,
    pub snapshot: Option<OccupancySnapshot>,
    pub result: StatusResult,
    /// URL of the latest annotated detection image, when one exists on disk.
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub faculty: Option<String>,
    pub building_id: Option<String>,
}

impl ReportFilter {
    fn matches(&self, classroom: &Classroom) -> bool {
        if let Some(faculty) = &self.faculty
            && classroom.faculty != *faculty
        {
            return false;
        }
        if let Some(building_id) = &self.building_id
            && classroom.building_id != *building_id
        {
            return false;
        }
        true
    }
}

pub fn assemble_status_report(
    classrooms: &[Classroom],
    sessions: &[ClassSession],
    snapshots: &HashMap<String, OccupancySnapshot>,
    filter: &ReportFilter,
    point: EvaluationPoint,
    static_dir: &Path,
) -> Result<Vec<ClassroomStatusRecord>, ScheduleError> {
    let mut records = Vec::new();
    for classroom in classrooms.iter().filter(|c| filter.matches(c)) {
        let active = active_session(
            sessions.iter().filter(|s| s.classroom_id == classroom.id),
            point,
        )?;
        let snapshot = snapshots.get(&classroom.id);
        let result = match point {
            EvaluationPoint::Now(_) => {
                classifier::classify_now(classroom.capacity, snapshot, active)
            }
            EvaluationPoint::Future { .. } => classifier::classify_future(active),
        };

        records.push(ClassroomStatusRecord {
            classroom: classroom.clone(),
            snapshot: snapshot.cloned(),
            result,
            image_url: processed_image_url(static_dir, &classroom.id),
        });
    }
    Ok(records)
}

fn processed_image_url(static_dir: &Path, classroom_id: &str) -> Option<String> {
    let path = static_dir
        .join("processed")
        .join(format!("{classroom_id}.jpg"));
    path.exists()
        .then(|| format!("/static/processed/{classroom_id}.jpg"))
}
