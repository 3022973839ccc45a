//! Schedule-driven simulated detector.
//!
//! Stands in for a real camera bridge during development: rooms fill to a
//! fixed fraction of capacity while a class is scheduled and show a small
//! drifting residual count otherwise. Deterministic for a given timestamp.

use crate::detector::{Detection, DetectorFactory, PersonDetector};
use crate::directory::Classroom;
use crate::error::AppError;
use crate::timetable::matcher::{EvaluationPoint, active_session};
use crate::timetable::session::ClassSession;
use std::collections::HashMap;
use time::OffsetDateTime;

const IN_SESSION_FILL_PERCENT: u32 = 70;
const IN_SESSION_CONFIDENCE: f64 = 0.9;
const IDLE_CONFIDENCE: f64 = 0.6;

#[derive(Debug, Clone)]
struct CameraProfile {
    capacity: u32,
    sessions: Vec<ClassSession>,
}

pub struct SimulatedDetectorFactory {
    profiles: HashMap<String, CameraProfile>,
}

impl SimulatedDetectorFactory {
    /// Bind every classroom with a camera to its capacity and timetable.
    pub fn new(classrooms: &[Classroom], sessions: &[ClassSession]) -> Self {
        let profiles = classrooms
            .iter()
            .filter_map(|classroom| {
                classroom.camera_id.clone().map(|camera_id| {
                    let own_sessions = sessions
                        .iter()
                        .filter(|s| s.classroom_id == classroom.id)
                        .cloned()
                        .collect();
                    (
                        camera_id,
                        CameraProfile {
                            capacity: classroom.capacity,
                            sessions: own_sessions,
                        },
                    )
                })
            })
            .collect();
        Self { profiles }
    }
}

impl DetectorFactory for SimulatedDetectorFactory {
    type Detector = SimulatedDetector;

    fn create_for_camera(&mut self, camera_id: &str) -> Result<Self::Detector, AppError> {
        let profile = self
            .profiles
            .get(camera_id)
            .cloned()
            .ok_or_else(|| AppError::UnknownCamera(camera_id.to_string()))?;
        Ok(SimulatedDetector { profile })
    }
}

#[derive(Debug)]
pub struct SimulatedDetector {
    profile: CameraProfile,
}

impl SimulatedDetector {
    fn detect_at(&self, at: OffsetDateTime) -> Detection {
        let in_session = active_session(&self.profile.sessions, EvaluationPoint::Now(at))
            .ok()
            .flatten()
            .is_some();

        if in_session {
            Detection {
                count: self.profile.capacity * IN_SESSION_FILL_PERCENT / 100,
                confidence: IN_SESSION_CONFIDENCE,
            }
        } else {
            // Residual foot traffic, varying slowly with the clock.
            Detection {
                count: u32::from(at.minute()) % 4,
                confidence: IDLE_CONFIDENCE,
            }
        }
    }
}

impl PersonDetector for SimulatedDetector {
    fn detect(&mut self) -> Result<Detection, AppError> {
        Ok(self.detect_at(OffsetDateTime::now_utc()))
    }
}
