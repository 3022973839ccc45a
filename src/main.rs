use roomwatch::detector::simulated::SimulatedDetectorFactory;
use roomwatch::{api, config, detector, directory, state, timetable};
use std::net::SocketAddr;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

fn init_tracing() {
    let subscriber = tracing_subscriber::fmt().with_target(false).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    tracing::info!(
        config_path = config::DEFAULT_CONFIG_PATH,
        "roomwatch starting"
    );
    let config = config::load_default()?;
    let state = Arc::new(RwLock::new(state::AppState::with_history_capacity(
        config.history_capacity(),
    )));
    // Keep the snapshot channel open for the lifetime of the process.
    let _snapshot_rx = {
        let guard = state.read().expect("state lock poisoned");
        guard.subscribe_snapshots()
    };

    // Seed the classroom directory and the timetable
    let classrooms = match directory::load_directory_from_path(config.classrooms_path()) {
        Ok(classrooms) => {
            tracing::info!(count = classrooms.len(), "Classroom directory loaded");
            classrooms
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load classroom directory, starting empty");
            Vec::new()
        }
    };
    let sessions = match timetable::session::load_timetable_from_path(config.schedules_path()) {
        Ok(sessions) => {
            tracing::info!(count = sessions.len(), "Timetable loaded");
            sessions
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load timetable, starting empty");
            Vec::new()
        }
    };

    if let Ok(mut guard) = state.write() {
        guard.set_classrooms(classrooms);
        guard.set_sessions(sessions);
        guard.set_static_dir(config.static_dir());
    } else {
        tracing::warn!("State lock poisoned while applying seed data");
    }

    // Start the background detector loop (simulated camera bridge)
    let stop_flag = Arc::new(AtomicBool::new(false));
    let _poll_handle = if config.detector_enabled() {
        let factory = {
            let guard = state.read().expect("state lock poisoned");
            SimulatedDetectorFactory::new(guard.classrooms(), guard.sessions())
        };
        let monitored = {
            let guard = state.read().expect("state lock poisoned");
            guard
                .classrooms()
                .iter()
                .filter(|c| c.camera_id.is_some())
                .count()
        };
        if monitored == 0 {
            tracing::warn!("Detector enabled but no classroom has a camera bound");
            None
        } else {
            tracing::info!(
                monitored = monitored,
                interval_ms = config.poll_interval().as_millis(),
                "Starting detector poll thread"
            );
            Some(detector::spawn_poll_thread(
                factory,
                Arc::clone(&state),
                config.poll_interval(),
                Arc::clone(&stop_flag),
            ))
        }
    } else {
        tracing::info!("Detector disabled - occupancy updates arrive via POST /api/occupancy");
        None
    };

    let app = api::router(Arc::clone(&state));
    let port = config.server_port();
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await?;

    // Signal detector thread to stop
    stop_flag.store(true, std::sync::atomic::Ordering::Relaxed);

    Ok(())
}
