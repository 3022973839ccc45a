use crate::error::AppError;
use crate::occupancy::OccupancySnapshot;
use crate::state::AppState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, warn};

pub mod mock;
pub mod simulated;

/// One person-count observation from a camera feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub count: u32,
    /// In [0, 1].
    pub confidence: f64,
}

pub trait PersonDetector {
    fn detect(&mut self) -> Result<Detection, AppError>;
}

pub trait DetectorFactory {
    type Detector: PersonDetector;

    fn create_for_camera(&mut self, camera_id: &str) -> Result<Self::Detector, AppError>;
}

/// Run one detection pass over every classroom with a camera bound and
/// persist the results into shared state. A failed camera leaves that
/// classroom's previous snapshot in place; occupancy is a continuously
/// refreshed approximate signal, so a stale value beats a fabricated zero.
pub fn poll_and_store_counts<F>(
    factory: &mut F,
    state: &Arc<RwLock<AppState>>,
) -> Result<Vec<OccupancySnapshot>, AppError>
where
    F: DetectorFactory,
{
    let monitored: Vec<(String, String)> = {
        let guard = state.read().map_err(|_| AppError::StateLock)?;
        guard
            .classrooms()
            .iter()
            .filter_map(|c| c.camera_id.clone().map(|camera| (c.id.clone(), camera)))
            .collect()
    };

    if monitored.is_empty() {
        debug!("No classrooms have a camera bound, nothing to poll");
        return Ok(Vec::new());
    }

    let mut stored = Vec::new();
    for (classroom_id, camera_id) in monitored {
        let mut detector = match factory.create_for_camera(&camera_id) {
            Ok(detector) => detector,
            Err(err) => {
                warn!(
                    classroom_id = classroom_id.as_str(),
                    camera_id = camera_id.as_str(),
                    error = %err,
                    "Failed to create detector for camera"
                );
                continue;
            }
        };

        let detection = match detector.detect() {
            Ok(detection) => detection,
            Err(err) => {
                warn!(
                    classroom_id = classroom_id.as_str(),
                    camera_id = camera_id.as_str(),
                    error = %err,
                    "Detection failed"
                );
                continue;
            }
        };

        if let Err(reason) = validate_detection(&detection) {
            warn!(
                classroom_id = classroom_id.as_str(),
                camera_id = camera_id.as_str(),
                count = detection.count,
                confidence = detection.confidence,
                error = reason.as_str(),
                "Invalid detection"
            );
            continue;
        }

        let snapshot = OccupancySnapshot {
            classroom_id: classroom_id.clone(),
            current_count: detection.count,
            detection_confidence: detection.confidence,
            last_updated: SystemTime::now(),
            camera_id: Some(camera_id),
        };

        {
            let mut guard = state.write().map_err(|_| AppError::StateLock)?;
            guard.upsert_snapshot(snapshot.clone())?;
        }
        stored.push(snapshot);
    }

    Ok(stored)
}

fn validate_detection(detection: &Detection) -> Result<(), String> {
    if !detection.confidence.is_finite() || !(0.0..=1.0).contains(&detection.confidence) {
        return Err(format!(
            "confidence out of range: {} (expected 0.0-1.0)",
            detection.confidence
        ));
    }
    Ok(())
}

/// Spawn the background thread that keeps snapshots fresh.
pub fn spawn_poll_thread<F>(
    mut factory: F,
    state: Arc<RwLock<AppState>>,
    interval: Duration,
    stop: Arc<AtomicBool>,
) -> std::thread::JoinHandle<()>
where
    F: DetectorFactory + Send + 'static,
{
    std::thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            let cycle_start = Instant::now();

            if let Err(err) = poll_and_store_counts(&mut factory, &state) {
                warn!(error = %err, "Detector poll cycle failed");
            }

            sleep_with_stop(interval, &stop, cycle_start);
        }
    })
}

fn sleep_with_stop(duration: Duration, stop: &AtomicBool, start: Instant) {
    let elapsed = start.elapsed();
    if elapsed >= duration {
        return;
    }
    let remaining = duration - elapsed;
    let step = Duration::from_millis(100);
    let mut slept = Duration::ZERO;

    while slept < remaining {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        std::thread::sleep(step);
        slept += step;
    }
}
