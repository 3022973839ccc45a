use std::time::SystemTime;

pub mod classifier;

/// The single most-recent occupancy observation for a classroom.
/// Last-write-wins; the append-only history keeps every observation.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancySnapshot {
    pub classroom_id: String,
    pub current_count: u32,
    /// Detection confidence in [0, 1].
    pub detection_confidence: f64,
    pub last_updated: SystemTime,
    pub camera_id: Option<String>,
}

/// One row of the append-only occupancy audit trail.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyObservation {
    pub classroom_id: String,
    pub timestamp: SystemTime,
    pub count: u32,
    pub detection_confidence: f64,
    pub camera_id: Option<String>,
}

impl OccupancyObservation {
    pub fn from_snapshot(snapshot: &OccupancySnapshot) -> Self {
        Self {
            classroom_id: snapshot.classroom_id.clone(),
            timestamp: snapshot.last_updated,
            count: snapshot.current_count,
            detection_confidence: snapshot.detection_confidence,
            camera_id: snapshot.camera_id.clone(),
        }
    }
}
