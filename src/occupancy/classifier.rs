//! Occupancy-status classifier.
//!
//! Maps a classroom's capacity, its latest occupancy snapshot, and the
//! schedule matcher's verdict to a discrete room status. Pure functions,
//! one per evaluation mode; neither performs I/O nor errors.

use crate::occupancy::OccupancySnapshot;
use crate::timetable::session::ClassSession;
use serde::Serialize;

/// Below this occupancy rate a scheduled room counts as nearly empty.
pub const LOW_OCCUPANCY_RATE: f64 = 0.10;
/// At or above this occupancy rate an unscheduled room counts as crowded.
pub const CROWDED_OCCUPANCY_RATE: f64 = 0.50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoomStatus {
    InClass,
    ScheduledLow,
    Occupied,
    PartiallyOccupied,
    Available,
}

/// Computed status for one classroom. Never persisted; recomputed on
/// every query.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusResult {
    pub status: RoomStatus,
    pub status_detail: String,
    pub is_available: bool,
    pub occupancy_rate: f64,
    pub active_class: Option<ClassSession>,
}

/// Detected count over capacity, clamped to [0, 1]. Zero capacity or a
/// missing snapshot reads as zero occupancy.
pub fn occupancy_rate(capacity: u32, snapshot: Option<&OccupancySnapshot>) -> f64 {
    let Some(snapshot) = snapshot else {
        return 0.0;
    };
    if capacity == 0 {
        return 0.0;
    }
    (f64::from(snapshot.current_count) / f64::from(capacity)).min(1.0)
}

/// Raw half-capacity signal: fewer people detected than half the seats.
/// Auxiliary only; the classifier's `is_available` is derived from the
/// final status, not from this.
pub fn below_half_capacity(capacity: u32, snapshot: Option<&OccupancySnapshot>) -> bool {
    let count = snapshot.map(|s| s.current_count).unwrap_or(0);
    f64::from(count) < f64::from(capacity) * 0.5
}

/// Classify at the current time, where both the schedule and the
/// occupancy signal apply.
pub fn classify_now(
    capacity: u32,
    snapshot: Option<&OccupancySnapshot>,
    active: Option<&ClassSession>,
) -> StatusResult {
    let rate = occupancy_rate(capacity, snapshot);

    let (status, status_detail) = match active {
        Some(session) if rate >= LOW_OCCUPANCY_RATE => (
            RoomStatus::InClass,
            format!("Class in session: {}", session.class_name),
        ),
        Some(session) => (
            RoomStatus::ScheduledLow,
            format!("Class scheduled, low attendance: {}", session.class_name),
        ),
        None if rate >= CROWDED_OCCUPANCY_RATE => (
            RoomStatus::Occupied,
            "In use without a scheduled class".to_string(),
        ),
        None if rate >= LOW_OCCUPANCY_RATE => {
            (RoomStatus::PartiallyOccupied, "Partially in use".to_string())
        }
        None => (RoomStatus::Available, "Room is free".to_string()),
    };

    StatusResult {
        status,
        status_detail,
        is_available: matches!(
            status,
            RoomStatus::Available | RoomStatus::PartiallyOccupied
        ),
        occupancy_rate: rate,
        active_class: active.cloned(),
    }
}

/// Classify for a future (date, period) query. No occupancy signal exists
/// for a future time, so the schedule alone decides.
pub fn classify_future(active: Option<&ClassSession>) -> StatusResult {
    match active {
        Some(session) => StatusResult {
            status: RoomStatus::InClass,
            status_detail: format!("Class scheduled: {}", session.class_name),
            is_available: false,
            occupancy_rate: 0.0,
            active_class: Some(session.clone()),
        },
        None => StatusResult {
            status: RoomStatus::Available,
            status_detail: "Room is free".to_string(),
            is_available: true,
            occupancy_rate: 0.0,
            active_class: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::session::SessionDraft;
    use std::time::UNIX_EPOCH;

    fn snapshot(count: u32) -> OccupancySnapshot {
        OccupancySnapshot {
            classroom_id: "room-101".to_string(),
            current_count: count,
            detection_confidence: 0.9,
            last_updated: UNIX_EPOCH,
            camera_id: None,
        }
    }

    fn session(name: &str) -> ClassSession {
        ClassSession::from_draft(
            "sched-0001".to_string(),
            SessionDraft {
                classroom_id: "room-101".to_string(),
                class_name: name.to_string(),
                instructor: None,
                day_of_week: 2,
                period: 3,
                start_time: None,
                end_time: None,
                semester: None,
                course_code: None,
            },
        )
        .expect("valid session")
    }

    #[test]
    fn rate_is_count_over_capacity() {
        let snap = snapshot(10);
        assert_eq!(occupancy_rate(40, Some(&snap)), 0.25);
    }

    #[test]
    fn rate_clamps_counts_exceeding_capacity() {
        let snap = snapshot(55);
        assert_eq!(occupancy_rate(40, Some(&snap)), 1.0);
    }

    #[test]
    fn rate_is_zero_for_zero_capacity_or_missing_snapshot() {
        let snap = snapshot(30);
        assert_eq!(occupancy_rate(0, Some(&snap)), 0.0);
        assert_eq!(occupancy_rate(40, None), 0.0);
    }

    #[test]
    fn half_capacity_signal_uses_strict_less_than() {
        assert!(below_half_capacity(40, Some(&snapshot(19))));
        assert!(!below_half_capacity(40, Some(&snapshot(20))));
        assert!(below_half_capacity(40, None));
    }

    #[test]
    fn scheduled_room_at_low_boundary_is_in_class() {
        // 4/40 = 0.10, boundary inclusive.
        let snap = snapshot(4);
        let result = classify_now(40, Some(&snap), Some(&session("Linear Algebra")));

        assert_eq!(result.status, RoomStatus::InClass);
        assert!(!result.is_available);
        assert_eq!(result.status_detail, "Class in session: Linear Algebra");
    }

    #[test]
    fn scheduled_room_below_low_threshold_is_scheduled_low() {
        // 3/40 = 0.075.
        let snap = snapshot(3);
        let result = classify_now(40, Some(&snap), Some(&session("Linear Algebra")));

        assert_eq!(result.status, RoomStatus::ScheduledLow);
        assert!(!result.is_available);
    }

    #[test]
    fn unscheduled_room_at_crowded_boundary_is_occupied() {
        // 20/40 = 0.50, boundary inclusive.
        let snap = snapshot(20);
        let result = classify_now(40, Some(&snap), None);

        assert_eq!(result.status, RoomStatus::Occupied);
        assert!(!result.is_available);
    }

    #[test]
    fn unscheduled_room_between_thresholds_is_partially_occupied() {
        // 19/40 = 0.475.
        let snap = snapshot(19);
        let result = classify_now(40, Some(&snap), None);

        assert_eq!(result.status, RoomStatus::PartiallyOccupied);
        assert!(result.is_available);
    }

    #[test]
    fn unscheduled_room_below_low_threshold_is_available() {
        // 3/40 = 0.075.
        let snap = snapshot(3);
        let result = classify_now(40, Some(&snap), None);

        assert_eq!(result.status, RoomStatus::Available);
        assert!(result.is_available);
    }

    #[test]
    fn missing_snapshot_reads_as_available_when_unscheduled() {
        let result = classify_now(40, None, None);

        assert_eq!(result.status, RoomStatus::Available);
        assert!(result.is_available);
        assert_eq!(result.occupancy_rate, 0.0);
    }

    #[test]
    fn missing_snapshot_with_session_is_scheduled_low() {
        let result = classify_now(40, None, Some(&session("Linear Algebra")));

        assert_eq!(result.status, RoomStatus::ScheduledLow);
        assert!(!result.is_available);
    }

    #[test]
    fn availability_matches_status_over_all_five_cells() {
        let cases: [(u32, bool, RoomStatus, bool); 5] = [
            (10, true, RoomStatus::InClass, false),
            (2, true, RoomStatus::ScheduledLow, false),
            (25, false, RoomStatus::Occupied, false),
            (10, false, RoomStatus::PartiallyOccupied, true),
            (2, false, RoomStatus::Available, true),
        ];
        let s = session("Linear Algebra");

        for (count, has_session, expected_status, expected_available) in cases {
            let snap = snapshot(count);
            let active = has_session.then_some(&s);
            let result = classify_now(40, Some(&snap), active);
            assert_eq!(result.status, expected_status, "count {count}");
            assert_eq!(result.is_available, expected_available, "count {count}");
        }
    }

    #[test]
    fn future_mode_ignores_occupancy_entirely() {
        let s = session("Linear Algebra");

        let with_session = classify_future(Some(&s));
        assert_eq!(with_session.status, RoomStatus::InClass);
        assert!(!with_session.is_available);
        assert_eq!(with_session.status_detail, "Class scheduled: Linear Algebra");

        let without = classify_future(None);
        assert_eq!(without.status, RoomStatus::Available);
        assert!(without.is_available);
        assert_eq!(without.occupancy_rate, 0.0);
    }

    #[test]
    fn status_serializes_to_kebab_case_wire_form() {
        let forms: [(RoomStatus, &str); 5] = [
            (RoomStatus::InClass, "in-class"),
            (RoomStatus::ScheduledLow, "scheduled-low"),
            (RoomStatus::Occupied, "occupied"),
            (RoomStatus::PartiallyOccupied, "partially-occupied"),
            (RoomStatus::Available, "available"),
        ];
        for (status, expected) in forms {
            let value = serde_json::to_value(status).expect("serialize status");
            assert_eq!(value, serde_json::json!(expected));
        }
    }
}
