use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use std::sync::{Arc, RwLock};

pub mod handlers;
pub mod responses;

pub fn router(state: Arc<RwLock<AppState>>) -> Router {
    Router::new()
        .route("/api/rooms", get(handlers::get_rooms))
        .route("/api/rooms/{classroom_id}", get(handlers::get_room))
        .route("/api/status", get(handlers::get_status))
        .route("/api/occupancy", post(handlers::post_occupancy))
        .route("/api/occupancy/{classroom_id}", get(handlers::get_occupancy))
        .route(
            "/api/schedules",
            get(handlers::get_schedules).post(handlers::post_schedule),
        )
        .route("/api/schedules/active", get(handlers::get_active_schedules))
        .route("/api/health", get(handlers::get_health))
        .with_state(state)
}
