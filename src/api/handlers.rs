use crate::api::responses::{
    ActiveClassBody, ClassroomBody, ClassroomStatusBody, HealthErrorCode, HealthErrorResponse,
    HealthStatus, HealthSuccessResponse, OccupancyErrorCode, OccupancyErrorResponse,
    OccupancySuccessResponse, RoomSuccessResponse, RoomsErrorCode, RoomsErrorResponse,
    RoomsSuccessResponse, ScheduleBody, ScheduleCreatedResponse, SchedulesErrorCode,
    SchedulesErrorResponse, SchedulesSuccessResponse, StatusErrorCode, StatusErrorResponse,
    StatusOccupancyBody, StatusSuccessResponse,
};
use crate::directory::Classroom;
use crate::occupancy::OccupancySnapshot;
use crate::occupancy::classifier::{below_half_capacity, occupancy_rate};
use crate::report::{ClassroomStatusRecord, ReportFilter, assemble_status_report};
use crate::state::AppState;
use crate::timetable::matcher::{EvaluationPoint, is_active_at};
use crate::timetable::session::SessionDraft;
use crate::timetable::{PERIOD_MAX, PERIOD_MIN, ScheduleError};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tracing::error;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
enum TimestampError {
    Format(time::error::Format),
}

impl fmt::Display for TimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampError::Format(err) => write!(f, "timestamp format error: {err}"),
        }
    }
}

fn format_timestamp(timestamp: SystemTime) -> Result<String, TimestampError> {
    let datetime = OffsetDateTime::from(timestamp);
    datetime.format(&Rfc3339).map_err(TimestampError::Format)
}

fn fallback_timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

// Classroom directory

#[derive(Debug, Deserialize)]
pub struct RoomsQuery {
    pub faculty: Option<String>,
    pub building_id: Option<String>,
    pub floor: Option<i32>,
}

pub enum RoomsResponse {
    Success(RoomsSuccessResponse),
    Error {
        status: StatusCode,
        body: RoomsErrorResponse,
    },
}

impl IntoResponse for RoomsResponse {
    fn into_response(self) -> Response {
        match self {
            RoomsResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            RoomsResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn get_rooms(
    State(state): State<Arc<RwLock<AppState>>>,
    Query(query): Query<RoomsQuery>,
) -> impl IntoResponse {
    build_rooms_response(state, query, SystemTime::now())
}

fn build_rooms_response(
    state: Arc<RwLock<AppState>>,
    query: RoomsQuery,
    now: SystemTime,
) -> RoomsResponse {
    let guard = match state.read() {
        Ok(guard) => guard,
        Err(_) => {
            return rooms_internal_error("state lock poisoned while reading classrooms");
        }
    };

    let classrooms: Vec<ClassroomBody> = guard
        .classrooms()
        .iter()
        .filter(|c| query.faculty.as_deref().is_none_or(|f| c.faculty == f))
        .filter(|c| {
            query
                .building_id
                .as_deref()
                .is_none_or(|b| c.building_id == b)
        })
        .filter(|c| query.floor.is_none_or(|floor| c.floor == floor))
        .map(ClassroomBody::from_classroom)
        .collect();
    drop(guard);

    let timestamp = match format_timestamp(now) {
        Ok(formatted) => formatted,
        Err(_) => {
            return rooms_internal_error("timestamp formatting failure");
        }
    };

    RoomsResponse::Success(RoomsSuccessResponse {
        classrooms,
        timestamp,
    })
}

fn rooms_internal_error(message: &str) -> RoomsResponse {
    error!(message = message, "Internal error while handling /api/rooms");
    RoomsResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: RoomsErrorResponse {
            error_code: RoomsErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: fallback_timestamp(),
        },
    }
}

pub enum RoomResponse {
    Success(RoomSuccessResponse),
    Error {
        status: StatusCode,
        body: RoomsErrorResponse,
    },
}

impl IntoResponse for RoomResponse {
    fn into_response(self) -> Response {
        match self {
            RoomResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            RoomResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn get_room(
    State(state): State<Arc<RwLock<AppState>>>,
    Path(classroom_id): Path<String>,
) -> impl IntoResponse {
    build_room_response(state, &classroom_id, SystemTime::now())
}

fn build_room_response(
    state: Arc<RwLock<AppState>>,
    classroom_id: &str,
    now: SystemTime,
) -> RoomResponse {
    let guard = match state.read() {
        Ok(guard) => guard,
        Err(_) => {
            return room_internal_error("state lock poisoned while reading classrooms");
        }
    };

    let classroom = guard.classroom(classroom_id).map(ClassroomBody::from_classroom);
    drop(guard);

    let timestamp = match format_timestamp(now) {
        Ok(formatted) => formatted,
        Err(_) => {
            return room_internal_error("timestamp formatting failure");
        }
    };

    match classroom {
        Some(classroom) => RoomResponse::Success(RoomSuccessResponse {
            classroom,
            timestamp,
        }),
        None => RoomResponse::Error {
            status: StatusCode::NOT_FOUND,
            body: RoomsErrorResponse {
                error_code: RoomsErrorCode::NotFound,
                error_message: format!("Classroom not found: {classroom_id}"),
                timestamp,
            },
        },
    }
}

fn room_internal_error(message: &str) -> RoomResponse {
    error!(
        message = message,
        "Internal error while handling /api/rooms/{{id}}"
    );
    RoomResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: RoomsErrorResponse {
            error_code: RoomsErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: fallback_timestamp(),
        },
    }
}

// Status report

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub faculty: Option<String>,
    pub building_id: Option<String>,
    /// "YYYY-MM-DD"; requires `target_period` as well.
    pub target_date: Option<String>,
    pub target_period: Option<u8>,
    /// RFC 3339 override for the evaluation time in now mode.
    pub at: Option<String>,
}

pub enum StatusApiResponse {
    Success(StatusSuccessResponse),
    Error {
        status: StatusCode,
        body: StatusErrorResponse,
    },
}

impl IntoResponse for StatusApiResponse {
    fn into_response(self) -> Response {
        match self {
            StatusApiResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            StatusApiResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn get_status(
    State(state): State<Arc<RwLock<AppState>>>,
    Query(query): Query<StatusQuery>,
) -> impl IntoResponse {
    build_status_response(state, query, OffsetDateTime::now_utc())
}

/// Resolve the query into one evaluation point. Date and period must be
/// supplied together; `at` applies only in now mode.
fn resolve_evaluation_point(
    query: &StatusQuery,
    now: OffsetDateTime,
) -> Result<EvaluationPoint, (StatusErrorCode, String)> {
    match (query.target_date.as_deref(), query.target_period) {
        (Some(raw_date), Some(period)) => {
            if !(PERIOD_MIN..=PERIOD_MAX).contains(&period) {
                return Err((
                    StatusErrorCode::InvalidPeriod,
                    format!("invalid period: {period} (expected {PERIOD_MIN}-{PERIOD_MAX})"),
                ));
            }
            let date = Date::parse(raw_date, format_description!("[year]-[month]-[day]"))
                .map_err(|_| {
                    (
                        StatusErrorCode::InvalidDate,
                        format!("invalid date: {raw_date} (expected YYYY-MM-DD)"),
                    )
                })?;
            Ok(EvaluationPoint::Future { date, period })
        }
        (None, None) => match query.at.as_deref() {
            Some(raw) => OffsetDateTime::parse(raw, &Rfc3339)
                .map(EvaluationPoint::Now)
                .map_err(|_| {
                    (
                        StatusErrorCode::InvalidDate,
                        format!("invalid timestamp: {raw} (expected RFC 3339)"),
                    )
                }),
            None => Ok(EvaluationPoint::Now(now)),
        },
        _ => Err((
            StatusErrorCode::InvalidQuery,
            "target_date and target_period must be supplied together".to_string(),
        )),
    }
}

fn build_status_response(
    state: Arc<RwLock<AppState>>,
    query: StatusQuery,
    now: OffsetDateTime,
) -> StatusApiResponse {
    let timestamp = match now.format(&Rfc3339) {
        Ok(formatted) => formatted,
        Err(_) => {
            return status_internal_error("timestamp formatting failure");
        }
    };

    let point = match resolve_evaluation_point(&query, now) {
        Ok(point) => point,
        Err((error_code, error_message)) => {
            return StatusApiResponse::Error {
                status: StatusCode::BAD_REQUEST,
                body: StatusErrorResponse {
                    error_code,
                    error_message,
                    timestamp,
                },
            };
        }
    };

    let filter = ReportFilter {
        faculty: query.faculty,
        building_id: query.building_id,
    };

    let guard = match state.read() {
        Ok(guard) => guard,
        Err(_) => {
            return status_internal_error("state lock poisoned while assembling status report");
        }
    };
    let records = match assemble_status_report(
        guard.classrooms(),
        guard.sessions(),
        guard.snapshots(),
        &filter,
        point,
        guard.static_dir(),
    ) {
        Ok(records) => records,
        Err(err) => {
            drop(guard);
            let error_code = match err {
                ScheduleError::InvalidPeriod(_) => StatusErrorCode::InvalidPeriod,
                ScheduleError::InvalidDate(_) => StatusErrorCode::InvalidDate,
                _ => StatusErrorCode::InvalidQuery,
            };
            return StatusApiResponse::Error {
                status: StatusCode::BAD_REQUEST,
                body: StatusErrorResponse {
                    error_code,
                    error_message: err.to_string(),
                    timestamp,
                },
            };
        }
    };
    drop(guard);

    let mut classrooms = Vec::with_capacity(records.len());
    for record in records {
        match map_status_record(record) {
            Ok(body) => classrooms.push(body),
            Err(message) => {
                return status_internal_error(message);
            }
        }
    }

    StatusApiResponse::Success(StatusSuccessResponse {
        classrooms,
        timestamp,
    })
}

fn map_status_record(record: ClassroomStatusRecord) -> Result<ClassroomStatusBody, &'static str> {
    let occupancy = match &record.snapshot {
        Some(snapshot) => Some(StatusOccupancyBody {
            current_count: snapshot.current_count,
            detection_confidence: snapshot.detection_confidence,
            last_updated: format_timestamp(snapshot.last_updated)
                .map_err(|_| "snapshot timestamp formatting failure")?,
        }),
        None => None,
    };
    let active_class = record
        .result
        .active_class
        .as_ref()
        .map(ActiveClassBody::from_session);

    Ok(ClassroomStatusBody {
        classroom: ClassroomBody::from_classroom(&record.classroom),
        occupancy,
        is_available: record.result.is_available,
        occupancy_rate: record.result.occupancy_rate,
        status: record.result.status,
        status_detail: record.result.status_detail,
        active_class,
        image_url: record.image_url,
    })
}

fn status_internal_error(message: &str) -> StatusApiResponse {
    error!(message = message, "Internal error while handling /api/status");
    StatusApiResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: StatusErrorResponse {
            error_code: StatusErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: fallback_timestamp(),
        },
    }
}

// Occupancy snapshots

#[derive(Debug, Deserialize)]
pub struct OccupancyUpdateRequest {
    pub classroom_id: String,
    pub current_count: u32,
    pub detection_confidence: f64,
    #[serde(default)]
    pub camera_id: Option<String>,
}

pub enum OccupancyApiResponse {
    Success(OccupancySuccessResponse),
    Error {
        status: StatusCode,
        body: OccupancyErrorResponse,
    },
}

impl IntoResponse for OccupancyApiResponse {
    fn into_response(self) -> Response {
        match self {
            OccupancyApiResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            OccupancyApiResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn get_occupancy(
    State(state): State<Arc<RwLock<AppState>>>,
    Path(classroom_id): Path<String>,
) -> impl IntoResponse {
    build_occupancy_response(state, &classroom_id, SystemTime::now())
}

fn build_occupancy_response(
    state: Arc<RwLock<AppState>>,
    classroom_id: &str,
    now: SystemTime,
) -> OccupancyApiResponse {
    let timestamp = match format_timestamp(now) {
        Ok(formatted) => formatted,
        Err(_) => {
            return occupancy_internal_error("timestamp formatting failure");
        }
    };

    let guard = match state.read() {
        Ok(guard) => guard,
        Err(_) => {
            return occupancy_internal_error("state lock poisoned while reading snapshots");
        }
    };

    let capacity = match guard.classroom(classroom_id) {
        Some(classroom) => classroom.capacity,
        None => {
            drop(guard);
            return OccupancyApiResponse::Error {
                status: StatusCode::NOT_FOUND,
                body: OccupancyErrorResponse {
                    error_code: OccupancyErrorCode::NotFound,
                    error_message: format!("Classroom not found: {classroom_id}"),
                    timestamp,
                },
            };
        }
    };

    let snapshot = match guard.snapshot(classroom_id) {
        Some(snapshot) => snapshot,
        None => {
            drop(guard);
            return OccupancyApiResponse::Error {
                status: StatusCode::NOT_FOUND,
                body: OccupancyErrorResponse {
                    error_code: OccupancyErrorCode::NoSnapshot,
                    error_message: format!(
                        "No occupancy snapshot for classroom: {classroom_id}"
                    ),
                    timestamp,
                },
            };
        }
    };

    match occupancy_success_body(capacity, snapshot, timestamp) {
        Ok(body) => OccupancyApiResponse::Success(body),
        Err(message) => occupancy_internal_error(message),
    }
}

fn occupancy_success_body(
    capacity: u32,
    snapshot: &OccupancySnapshot,
    timestamp: String,
) -> Result<OccupancySuccessResponse, &'static str> {
    Ok(OccupancySuccessResponse {
        classroom_id: snapshot.classroom_id.clone(),
        current_count: snapshot.current_count,
        detection_confidence: snapshot.detection_confidence,
        last_updated: format_timestamp(snapshot.last_updated)
            .map_err(|_| "snapshot timestamp formatting failure")?,
        camera_id: snapshot.camera_id.clone(),
        is_available: below_half_capacity(capacity, Some(snapshot)),
        occupancy_rate: occupancy_rate(capacity, Some(snapshot)),
        timestamp,
    })
}

pub async fn post_occupancy(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(request): Json<OccupancyUpdateRequest>,
) -> impl IntoResponse {
    build_occupancy_update_response(state, request, SystemTime::now())
}

fn build_occupancy_update_response(
    state: Arc<RwLock<AppState>>,
    request: OccupancyUpdateRequest,
    now: SystemTime,
) -> OccupancyApiResponse {
    let timestamp = match format_timestamp(now) {
        Ok(formatted) => formatted,
        Err(_) => {
            return occupancy_internal_error("timestamp formatting failure");
        }
    };

    if !request.detection_confidence.is_finite()
        || !(0.0..=1.0).contains(&request.detection_confidence)
    {
        return OccupancyApiResponse::Error {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: OccupancyErrorResponse {
                error_code: OccupancyErrorCode::InvalidConfidence,
                error_message: format!(
                    "detection_confidence out of range: {} (expected 0.0-1.0)",
                    request.detection_confidence
                ),
                timestamp,
            },
        };
    }

    let mut guard = match state.write() {
        Ok(guard) => guard,
        Err(_) => {
            return occupancy_internal_error("state lock poisoned while updating snapshot");
        }
    };

    let capacity = match guard.classroom(&request.classroom_id) {
        Some(classroom) => classroom.capacity,
        None => {
            drop(guard);
            return OccupancyApiResponse::Error {
                status: StatusCode::NOT_FOUND,
                body: OccupancyErrorResponse {
                    error_code: OccupancyErrorCode::NotFound,
                    error_message: format!("Classroom not found: {}", request.classroom_id),
                    timestamp,
                },
            };
        }
    };

    let snapshot = OccupancySnapshot {
        classroom_id: request.classroom_id,
        current_count: request.current_count,
        detection_confidence: request.detection_confidence,
        last_updated: now,
        camera_id: request.camera_id,
    };

    if guard.upsert_snapshot(snapshot.clone()).is_err() {
        drop(guard);
        return occupancy_internal_error("failed to publish snapshot update");
    }
    drop(guard);

    match occupancy_success_body(capacity, &snapshot, timestamp) {
        Ok(body) => OccupancyApiResponse::Success(body),
        Err(message) => occupancy_internal_error(message),
    }
}

fn occupancy_internal_error(message: &str) -> OccupancyApiResponse {
    error!(
        message = message,
        "Internal error while handling /api/occupancy"
    );
    OccupancyApiResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: OccupancyErrorResponse {
            error_code: OccupancyErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: fallback_timestamp(),
        },
    }
}

// Schedules

#[derive(Debug, Deserialize)]
pub struct SchedulesQuery {
    pub classroom_id: Option<String>,
    pub day_of_week: Option<u8>,
    pub period: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct ActiveSchedulesQuery {
    /// RFC 3339 override for the evaluation time (defaults to now).
    pub at: Option<String>,
}

pub enum SchedulesApiResponse {
    Success(SchedulesSuccessResponse),
    Error {
        status: StatusCode,
        body: SchedulesErrorResponse,
    },
}

impl IntoResponse for SchedulesApiResponse {
    fn into_response(self) -> Response {
        match self {
            SchedulesApiResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            SchedulesApiResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn get_schedules(
    State(state): State<Arc<RwLock<AppState>>>,
    Query(query): Query<SchedulesQuery>,
) -> impl IntoResponse {
    build_schedules_response(state, query, SystemTime::now())
}

fn build_schedules_response(
    state: Arc<RwLock<AppState>>,
    query: SchedulesQuery,
    now: SystemTime,
) -> SchedulesApiResponse {
    let guard = match state.read() {
        Ok(guard) => guard,
        Err(_) => {
            return schedules_internal_error("state lock poisoned while reading sessions");
        }
    };

    let schedules: Vec<ScheduleBody> = guard
        .sessions()
        .iter()
        .filter(|s| {
            query
                .classroom_id
                .as_deref()
                .is_none_or(|id| s.classroom_id == id)
        })
        .filter(|s| query.day_of_week.is_none_or(|day| s.day_of_week == day))
        .filter(|s| query.period.is_none_or(|period| s.period == period))
        .map(ScheduleBody::from_session)
        .collect();
    drop(guard);

    let timestamp = match format_timestamp(now) {
        Ok(formatted) => formatted,
        Err(_) => {
            return schedules_internal_error("timestamp formatting failure");
        }
    };

    SchedulesApiResponse::Success(SchedulesSuccessResponse {
        schedules,
        timestamp,
    })
}

pub async fn get_active_schedules(
    State(state): State<Arc<RwLock<AppState>>>,
    Query(query): Query<ActiveSchedulesQuery>,
) -> impl IntoResponse {
    build_active_schedules_response(state, query, OffsetDateTime::now_utc())
}

fn build_active_schedules_response(
    state: Arc<RwLock<AppState>>,
    query: ActiveSchedulesQuery,
    now: OffsetDateTime,
) -> SchedulesApiResponse {
    let timestamp = match now.format(&Rfc3339) {
        Ok(formatted) => formatted,
        Err(_) => {
            return schedules_internal_error("timestamp formatting failure");
        }
    };

    let at = match query.at.as_deref() {
        Some(raw) => match OffsetDateTime::parse(raw, &Rfc3339) {
            Ok(parsed) => parsed,
            Err(_) => {
                return SchedulesApiResponse::Error {
                    status: StatusCode::BAD_REQUEST,
                    body: SchedulesErrorResponse {
                        error_code: SchedulesErrorCode::InvalidDate,
                        error_message: format!("invalid timestamp: {raw} (expected RFC 3339)"),
                        timestamp,
                    },
                };
            }
        },
        None => now,
    };

    let guard = match state.read() {
        Ok(guard) => guard,
        Err(_) => {
            return schedules_internal_error("state lock poisoned while reading sessions");
        }
    };
    let schedules: Vec<ScheduleBody> = guard
        .sessions()
        .iter()
        .filter(|s| is_active_at(s, at))
        .map(ScheduleBody::from_session)
        .collect();
    drop(guard);

    SchedulesApiResponse::Success(SchedulesSuccessResponse {
        schedules,
        timestamp,
    })
}

pub enum ScheduleCreateResponse {
    Created(ScheduleCreatedResponse),
    Error {
        status: StatusCode,
        body: SchedulesErrorResponse,
    },
}

impl IntoResponse for ScheduleCreateResponse {
    fn into_response(self) -> Response {
        match self {
            ScheduleCreateResponse::Created(body) => {
                (StatusCode::CREATED, Json(body)).into_response()
            }
            ScheduleCreateResponse::Error { status, body } => {
                (status, Json(body)).into_response()
            }
        }
    }
}

pub async fn post_schedule(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(draft): Json<SessionDraft>,
) -> impl IntoResponse {
    build_schedule_create_response(state, draft, SystemTime::now())
}

fn build_schedule_create_response(
    state: Arc<RwLock<AppState>>,
    draft: SessionDraft,
    now: SystemTime,
) -> ScheduleCreateResponse {
    let timestamp = match format_timestamp(now) {
        Ok(formatted) => formatted,
        Err(_) => {
            return schedule_create_internal_error("timestamp formatting failure");
        }
    };

    let mut guard = match state.write() {
        Ok(guard) => guard,
        Err(_) => {
            return schedule_create_internal_error("state lock poisoned while adding session");
        }
    };

    match guard.add_session(draft) {
        Ok(session) => {
            drop(guard);
            ScheduleCreateResponse::Created(ScheduleCreatedResponse {
                schedule: ScheduleBody::from_session(&session),
                timestamp,
            })
        }
        Err(err) => {
            drop(guard);
            ScheduleCreateResponse::Error {
                status: StatusCode::BAD_REQUEST,
                body: SchedulesErrorResponse {
                    error_code: schedule_error_code(&err),
                    error_message: err.to_string(),
                    timestamp,
                },
            }
        }
    }
}

fn schedule_error_code(err: &ScheduleError) -> SchedulesErrorCode {
    match err {
        ScheduleError::InvalidPeriod(_) => SchedulesErrorCode::InvalidPeriod,
        ScheduleError::InvalidDate(_) => SchedulesErrorCode::InvalidDate,
        ScheduleError::InvalidTime(_) => SchedulesErrorCode::InvalidTime,
        ScheduleError::InvalidDayOfWeek(_) => SchedulesErrorCode::InvalidDayOfWeek,
        ScheduleError::InvalidTimeRange => SchedulesErrorCode::InvalidTimeRange,
    }
}

fn schedules_internal_error(message: &str) -> SchedulesApiResponse {
    error!(
        message = message,
        "Internal error while handling /api/schedules"
    );
    SchedulesApiResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: SchedulesErrorResponse {
            error_code: SchedulesErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: fallback_timestamp(),
        },
    }
}

fn schedule_create_internal_error(message: &str) -> ScheduleCreateResponse {
    error!(
        message = message,
        "Internal error while handling POST /api/schedules"
    );
    ScheduleCreateResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: SchedulesErrorResponse {
            error_code: SchedulesErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: fallback_timestamp(),
        },
    }
}

// Health

pub enum HealthResponse {
    Success {
        status: StatusCode,
        body: HealthSuccessResponse,
    },
    Error {
        status: StatusCode,
        body: HealthErrorResponse,
    },
}

impl IntoResponse for HealthResponse {
    fn into_response(self) -> Response {
        match self {
            HealthResponse::Success { status, body } => (status, Json(body)).into_response(),
            HealthResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn get_health(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    build_health_response(state, SystemTime::now())
}

fn build_health_response(state: Arc<RwLock<AppState>>, now: SystemTime) -> HealthResponse {
    let guard = match state.read() {
        Ok(guard) => guard,
        Err(_) => {
            return health_internal_error("state lock poisoned while reading state");
        }
    };
    let status = derive_health_status(guard.classrooms(), guard.snapshots());
    drop(guard);

    let timestamp = match format_timestamp(now) {
        Ok(formatted) => formatted,
        Err(_) => {
            return health_internal_error("timestamp formatting failure");
        }
    };

    let status_code = match status {
        HealthStatus::Ko => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Ok | HealthStatus::Degraded => StatusCode::OK,
    };

    HealthResponse::Success {
        status: status_code,
        body: HealthSuccessResponse { status, timestamp },
    }
}

/// Directory empty: ko. No cameras bound: ok (push-only deployment).
/// Otherwise graded by how many monitored rooms have a snapshot.
fn derive_health_status(
    classrooms: &[Classroom],
    snapshots: &HashMap<String, OccupancySnapshot>,
) -> HealthStatus {
    if classrooms.is_empty() {
        return HealthStatus::Ko;
    }

    let monitored: Vec<&Classroom> = classrooms
        .iter()
        .filter(|c| c.camera_id.is_some())
        .collect();
    if monitored.is_empty() {
        return HealthStatus::Ok;
    }

    let with_snapshot = monitored
        .iter()
        .filter(|c| snapshots.contains_key(&c.id))
        .count();
    if with_snapshot == monitored.len() {
        HealthStatus::Ok
    } else if with_snapshot > 0 {
        HealthStatus::Degraded
    } else {
        HealthStatus::Ko
    }
}

fn health_internal_error(message: &str) -> HealthResponse {
    error!(message = message, "Internal error while handling /api/health");
    HealthResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: HealthErrorResponse {
            error_code: HealthErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: fallback_timestamp(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupancy::classifier::RoomStatus;
    use std::time::{Duration, UNIX_EPOCH};
    use time::macros::datetime;

    fn classroom(id: &str, capacity: u32, camera_id: Option<&str>) -> Classroom {
        Classroom {
            id: id.to_string(),
            room_number: id.to_string(),
            building_id: "bldg-a".to_string(),
            faculty: "Engineering".to_string(),
            floor: 1,
            capacity,
            has_projector: false,
            has_wifi: true,
            has_power_outlets: true,
            camera_id: camera_id.map(str::to_string),
        }
    }

    fn draft(classroom_id: &str, name: &str, day_of_week: u8, period: u8) -> SessionDraft {
        SessionDraft {
            classroom_id: classroom_id.to_string(),
            class_name: name.to_string(),
            instructor: None,
            day_of_week,
            period,
            start_time: None,
            end_time: None,
            semester: None,
            course_code: None,
        }
    }

    fn snapshot(classroom_id: &str, count: u32, at_secs: u64) -> OccupancySnapshot {
        OccupancySnapshot {
            classroom_id: classroom_id.to_string(),
            current_count: count,
            detection_confidence: 0.9,
            last_updated: UNIX_EPOCH + Duration::from_secs(at_secs),
            camera_id: Some("cam-1".to_string()),
        }
    }

    fn poisoned_state() -> Arc<RwLock<AppState>> {
        let state = Arc::new(RwLock::new(AppState::new()));
        let state_for_thread = Arc::clone(&state);
        let _ = std::thread::spawn(move || {
            let _guard = state_for_thread.write().expect("lock for poison");
            panic!("poison lock");
        })
        .join();
        state
    }

    fn no_filter_rooms_query() -> RoomsQuery {
        RoomsQuery {
            faculty: None,
            building_id: None,
            floor: None,
        }
    }

    fn now_status_query() -> StatusQuery {
        StatusQuery {
            faculty: None,
            building_id: None,
            target_date: None,
            target_period: None,
            at: None,
        }
    }

    #[test]
    fn rooms_handler_lists_and_filters() {
        let mut app_state = AppState::new();
        app_state.set_classrooms(vec![
            classroom("room-101", 40, None),
            Classroom {
                floor: 2,
                ..classroom("room-201", 80, None)
            },
        ]);
        let state = Arc::new(RwLock::new(app_state));

        let response = build_rooms_response(
            Arc::clone(&state),
            no_filter_rooms_query(),
            UNIX_EPOCH + Duration::from_secs(1),
        );
        match response {
            RoomsResponse::Success(body) => {
                assert_eq!(body.classrooms.len(), 2);
                assert_eq!(body.timestamp, "1970-01-01T00:00:01Z");
            }
            RoomsResponse::Error { status, .. } => {
                panic!("expected success response, got error: {status}");
            }
        }

        let response = build_rooms_response(
            state,
            RoomsQuery {
                faculty: None,
                building_id: None,
                floor: Some(2),
            },
            UNIX_EPOCH,
        );
        match response {
            RoomsResponse::Success(body) => {
                assert_eq!(body.classrooms.len(), 1);
                assert_eq!(body.classrooms[0].id, "room-201");
            }
            RoomsResponse::Error { status, .. } => {
                panic!("expected success response, got error: {status}");
            }
        }
    }

    #[test]
    fn rooms_handler_returns_internal_error_when_lock_poisoned() {
        let response =
            build_rooms_response(poisoned_state(), no_filter_rooms_query(), UNIX_EPOCH);

        match response {
            RoomsResponse::Error { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body.error_code, RoomsErrorCode::InternalError);
                assert_eq!(body.error_message, "Internal server error");
            }
            RoomsResponse::Success(_) => {
                panic!("expected internal error response");
            }
        }
    }

    #[test]
    fn room_handler_returns_not_found_for_unknown_id() {
        let state = Arc::new(RwLock::new(AppState::new()));

        let response = build_room_response(state, "room-404", UNIX_EPOCH);

        match response {
            RoomResponse::Error { status, body } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(body.error_code, RoomsErrorCode::NotFound);
            }
            RoomResponse::Success(_) => {
                panic!("expected not found response");
            }
        }
    }

    #[test]
    fn status_handler_classifies_scheduled_room_with_people_as_in_class() {
        let mut app_state = AppState::new();
        let _snapshot_rx = app_state.subscribe_snapshots();
        app_state.set_classrooms(vec![classroom("room-101", 40, None)]);
        app_state.set_sessions(vec![
            crate::timetable::session::ClassSession::from_draft(
                "sched-0001".to_string(),
                draft("room-101", "Linear Algebra", 2, 3),
            )
            .expect("valid session"),
        ]);
        app_state
            .upsert_snapshot(snapshot("room-101", 5, 100))
            .expect("upsert snapshot");
        let state = Arc::new(RwLock::new(app_state));

        // Wednesday 13:30, inside period 3.
        let response = build_status_response(
            state,
            now_status_query(),
            datetime!(2026-01-07 13:30 UTC),
        );

        match response {
            StatusApiResponse::Success(body) => {
                assert_eq!(body.classrooms.len(), 1);
                let room = &body.classrooms[0];
                assert_eq!(room.status, RoomStatus::InClass);
                assert!(!room.is_available);
                assert_eq!(room.occupancy_rate, 0.125);
                assert_eq!(
                    room.active_class.as_ref().map(|c| c.class_name.as_str()),
                    Some("Linear Algebra")
                );
                assert_eq!(
                    room.occupancy.as_ref().map(|o| o.current_count),
                    Some(5)
                );
                assert_eq!(body.timestamp, "2026-01-07T13:30:00Z");
            }
            StatusApiResponse::Error { status, .. } => {
                panic!("expected success response, got error: {status}");
            }
        }
    }

    #[test]
    fn status_handler_future_mode_ignores_occupancy() {
        let mut app_state = AppState::new();
        let _snapshot_rx = app_state.subscribe_snapshots();
        app_state.set_classrooms(vec![classroom("room-101", 40, None)]);
        app_state.set_sessions(vec![
            crate::timetable::session::ClassSession::from_draft(
                "sched-0001".to_string(),
                draft("room-101", "Linear Algebra", 2, 3),
            )
            .expect("valid session"),
        ]);
        // Crowded right now; must not leak into the future verdict.
        app_state
            .upsert_snapshot(snapshot("room-101", 39, 100))
            .expect("upsert snapshot");
        let state = Arc::new(RwLock::new(app_state));

        let query = StatusQuery {
            target_date: Some("2026-01-07".to_string()),
            target_period: Some(3),
            ..now_status_query()
        };
        let response = build_status_response(state, query, datetime!(2026-01-05 09:00 UTC));

        match response {
            StatusApiResponse::Success(body) => {
                let room = &body.classrooms[0];
                assert_eq!(room.status, RoomStatus::InClass);
                assert!(!room.is_available);
                assert_eq!(room.occupancy_rate, 0.0);
            }
            StatusApiResponse::Error { status, .. } => {
                panic!("expected success response, got error: {status}");
            }
        }
    }

    #[test]
    fn status_handler_rejects_period_outside_table() {
        let state = Arc::new(RwLock::new(AppState::new()));
        let query = StatusQuery {
            target_date: Some("2026-01-07".to_string()),
            target_period: Some(9),
            ..now_status_query()
        };

        let response = build_status_response(state, query, datetime!(2026-01-05 09:00 UTC));

        match response {
            StatusApiResponse::Error { status, body } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(body.error_code, StatusErrorCode::InvalidPeriod);
            }
            StatusApiResponse::Success(_) => {
                panic!("expected invalid period response");
            }
        }
    }

    #[test]
    fn status_handler_rejects_unparsable_date() {
        let state = Arc::new(RwLock::new(AppState::new()));
        let query = StatusQuery {
            target_date: Some("01/07/2026".to_string()),
            target_period: Some(3),
            ..now_status_query()
        };

        let response = build_status_response(state, query, datetime!(2026-01-05 09:00 UTC));

        match response {
            StatusApiResponse::Error { status, body } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(body.error_code, StatusErrorCode::InvalidDate);
            }
            StatusApiResponse::Success(_) => {
                panic!("expected invalid date response");
            }
        }
    }

    #[test]
    fn status_handler_rejects_half_supplied_future_query() {
        let state = Arc::new(RwLock::new(AppState::new()));
        let query = StatusQuery {
            target_date: Some("2026-01-07".to_string()),
            ..now_status_query()
        };

        let response = build_status_response(state, query, datetime!(2026-01-05 09:00 UTC));

        match response {
            StatusApiResponse::Error { status, body } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(body.error_code, StatusErrorCode::InvalidQuery);
            }
            StatusApiResponse::Success(_) => {
                panic!("expected invalid query response");
            }
        }
    }

    #[test]
    fn status_handler_accepts_explicit_at_timestamp() {
        let mut app_state = AppState::new();
        app_state.set_classrooms(vec![classroom("room-101", 40, None)]);
        let state = Arc::new(RwLock::new(app_state));

        let query = StatusQuery {
            at: Some("2026-01-07T13:30:00Z".to_string()),
            ..now_status_query()
        };
        let response = build_status_response(state, query, datetime!(2026-01-05 09:00 UTC));

        match response {
            StatusApiResponse::Success(body) => {
                assert_eq!(body.classrooms.len(), 1);
                assert_eq!(body.classrooms[0].status, RoomStatus::Available);
            }
            StatusApiResponse::Error { status, .. } => {
                panic!("expected success response, got error: {status}");
            }
        }
    }

    #[test]
    fn status_handler_rejects_unparsable_at_timestamp() {
        let state = Arc::new(RwLock::new(AppState::new()));
        let query = StatusQuery {
            at: Some("yesterday".to_string()),
            ..now_status_query()
        };

        let response = build_status_response(state, query, datetime!(2026-01-05 09:00 UTC));

        match response {
            StatusApiResponse::Error { status, body } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(body.error_code, StatusErrorCode::InvalidDate);
            }
            StatusApiResponse::Success(_) => {
                panic!("expected invalid date response");
            }
        }
    }

    #[test]
    fn occupancy_handler_reports_snapshot_with_raw_availability() {
        let mut app_state = AppState::new();
        let _snapshot_rx = app_state.subscribe_snapshots();
        app_state.set_classrooms(vec![classroom("room-101", 40, None)]);
        app_state
            .upsert_snapshot(snapshot("room-101", 25, 3))
            .expect("upsert snapshot");
        let state = Arc::new(RwLock::new(app_state));

        let response =
            build_occupancy_response(state, "room-101", UNIX_EPOCH + Duration::from_secs(5));

        match response {
            OccupancyApiResponse::Success(body) => {
                assert_eq!(body.classroom_id, "room-101");
                assert_eq!(body.current_count, 25);
                // 25 >= 40 * 0.5, so the raw half-capacity signal is false.
                assert!(!body.is_available);
                assert_eq!(body.occupancy_rate, 0.625);
                assert_eq!(body.last_updated, "1970-01-01T00:00:03Z");
                assert_eq!(body.timestamp, "1970-01-01T00:00:05Z");
            }
            OccupancyApiResponse::Error { status, .. } => {
                panic!("expected success response, got error: {status}");
            }
        }
    }

    #[test]
    fn occupancy_handler_distinguishes_unknown_room_from_missing_snapshot() {
        let mut app_state = AppState::new();
        app_state.set_classrooms(vec![classroom("room-101", 40, None)]);
        let state = Arc::new(RwLock::new(app_state));

        let response = build_occupancy_response(Arc::clone(&state), "room-404", UNIX_EPOCH);
        match response {
            OccupancyApiResponse::Error { status, body } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(body.error_code, OccupancyErrorCode::NotFound);
            }
            OccupancyApiResponse::Success(_) => panic!("expected not found response"),
        }

        let response = build_occupancy_response(state, "room-101", UNIX_EPOCH);
        match response {
            OccupancyApiResponse::Error { status, body } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(body.error_code, OccupancyErrorCode::NoSnapshot);
            }
            OccupancyApiResponse::Success(_) => panic!("expected no snapshot response"),
        }
    }

    #[test]
    fn occupancy_update_upserts_snapshot_and_appends_history() {
        let mut app_state = AppState::new();
        let _snapshot_rx = app_state.subscribe_snapshots();
        app_state.set_classrooms(vec![classroom("room-101", 40, None)]);
        let state = Arc::new(RwLock::new(app_state));

        let request = OccupancyUpdateRequest {
            classroom_id: "room-101".to_string(),
            current_count: 12,
            detection_confidence: 0.85,
            camera_id: Some("cam-1".to_string()),
        };
        let response = build_occupancy_update_response(
            Arc::clone(&state),
            request,
            UNIX_EPOCH + Duration::from_secs(7),
        );

        match response {
            OccupancyApiResponse::Success(body) => {
                assert_eq!(body.current_count, 12);
                assert_eq!(body.last_updated, "1970-01-01T00:00:07Z");
                assert!(body.is_available);
            }
            OccupancyApiResponse::Error { status, .. } => {
                panic!("expected success response, got error: {status}");
            }
        }

        let guard = state.read().expect("state readable");
        assert_eq!(
            guard.snapshot("room-101").map(|s| s.current_count),
            Some(12)
        );
        assert_eq!(guard.history().len(), 1);
    }

    #[test]
    fn occupancy_update_rejects_confidence_outside_unit_interval() {
        let mut app_state = AppState::new();
        app_state.set_classrooms(vec![classroom("room-101", 40, None)]);
        let state = Arc::new(RwLock::new(app_state));

        let request = OccupancyUpdateRequest {
            classroom_id: "room-101".to_string(),
            current_count: 12,
            detection_confidence: 1.2,
            camera_id: None,
        };
        let response = build_occupancy_update_response(state, request, UNIX_EPOCH);

        match response {
            OccupancyApiResponse::Error { status, body } => {
                assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
                assert_eq!(body.error_code, OccupancyErrorCode::InvalidConfidence);
            }
            OccupancyApiResponse::Success(_) => {
                panic!("expected invalid confidence response");
            }
        }
    }

    #[test]
    fn occupancy_update_rejects_unknown_classroom() {
        let state = Arc::new(RwLock::new(AppState::new()));

        let request = OccupancyUpdateRequest {
            classroom_id: "room-404".to_string(),
            current_count: 1,
            detection_confidence: 0.5,
            camera_id: None,
        };
        let response = build_occupancy_update_response(state, request, UNIX_EPOCH);

        match response {
            OccupancyApiResponse::Error { status, body } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(body.error_code, OccupancyErrorCode::NotFound);
            }
            OccupancyApiResponse::Success(_) => {
                panic!("expected not found response");
            }
        }
    }

    #[test]
    fn schedules_handler_filters_by_classroom_day_and_period() {
        let mut app_state = AppState::new();
        app_state.set_sessions(vec![
            crate::timetable::session::ClassSession::from_draft(
                "sched-0001".to_string(),
                draft("room-101", "Linear Algebra", 2, 3),
            )
            .expect("valid session"),
            crate::timetable::session::ClassSession::from_draft(
                "sched-0002".to_string(),
                draft("room-102", "Microeconomics", 3, 1),
            )
            .expect("valid session"),
        ]);
        let state = Arc::new(RwLock::new(app_state));

        let response = build_schedules_response(
            Arc::clone(&state),
            SchedulesQuery {
                classroom_id: Some("room-101".to_string()),
                day_of_week: None,
                period: None,
            },
            UNIX_EPOCH,
        );
        match response {
            SchedulesApiResponse::Success(body) => {
                assert_eq!(body.schedules.len(), 1);
                assert_eq!(body.schedules[0].class_name, "Linear Algebra");
            }
            SchedulesApiResponse::Error { status, .. } => {
                panic!("expected success response, got error: {status}");
            }
        }

        let response = build_schedules_response(
            state,
            SchedulesQuery {
                classroom_id: None,
                day_of_week: Some(3),
                period: Some(1),
            },
            UNIX_EPOCH,
        );
        match response {
            SchedulesApiResponse::Success(body) => {
                assert_eq!(body.schedules.len(), 1);
                assert_eq!(body.schedules[0].class_name, "Microeconomics");
            }
            SchedulesApiResponse::Error { status, .. } => {
                panic!("expected success response, got error: {status}");
            }
        }
    }

    #[test]
    fn active_schedules_handler_returns_sessions_in_progress() {
        let mut app_state = AppState::new();
        app_state.set_sessions(vec![
            crate::timetable::session::ClassSession::from_draft(
                "sched-0001".to_string(),
                draft("room-101", "Linear Algebra", 2, 3),
            )
            .expect("valid session"),
            crate::timetable::session::ClassSession::from_draft(
                "sched-0002".to_string(),
                draft("room-102", "Microeconomics", 2, 4),
            )
            .expect("valid session"),
        ]);
        let state = Arc::new(RwLock::new(app_state));

        // Wednesday 13:30 falls inside period 3 only.
        let response = build_active_schedules_response(
            state,
            ActiveSchedulesQuery { at: None },
            datetime!(2026-01-07 13:30 UTC),
        );

        match response {
            SchedulesApiResponse::Success(body) => {
                assert_eq!(body.schedules.len(), 1);
                assert_eq!(body.schedules[0].class_name, "Linear Algebra");
            }
            SchedulesApiResponse::Error { status, .. } => {
                panic!("expected success response, got error: {status}");
            }
        }
    }

    #[test]
    fn active_schedules_handler_rejects_unparsable_at() {
        let state = Arc::new(RwLock::new(AppState::new()));

        let response = build_active_schedules_response(
            state,
            ActiveSchedulesQuery {
                at: Some("noonish".to_string()),
            },
            datetime!(2026-01-07 13:30 UTC),
        );

        match response {
            SchedulesApiResponse::Error { status, body } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(body.error_code, SchedulesErrorCode::InvalidDate);
            }
            SchedulesApiResponse::Success(_) => {
                panic!("expected invalid date response");
            }
        }
    }

    #[test]
    fn schedule_create_derives_times_and_assigns_id() {
        let state = Arc::new(RwLock::new(AppState::new()));

        let response = build_schedule_create_response(
            Arc::clone(&state),
            draft("room-101", "Linear Algebra", 2, 3),
            UNIX_EPOCH,
        );

        match response {
            ScheduleCreateResponse::Created(body) => {
                assert_eq!(body.schedule.id, "sched-0001");
                assert_eq!(body.schedule.start_time, "13:00");
                assert_eq!(body.schedule.end_time, "14:30");
            }
            ScheduleCreateResponse::Error { status, .. } => {
                panic!("expected created response, got error: {status}");
            }
        }

        let guard = state.read().expect("state readable");
        assert_eq!(guard.sessions().len(), 1);
    }

    #[test]
    fn schedule_create_rejects_invalid_period() {
        let state = Arc::new(RwLock::new(AppState::new()));

        let response = build_schedule_create_response(
            state,
            draft("room-101", "Linear Algebra", 2, 0),
            UNIX_EPOCH,
        );

        match response {
            ScheduleCreateResponse::Error { status, body } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(body.error_code, SchedulesErrorCode::InvalidPeriod);
            }
            ScheduleCreateResponse::Created(_) => {
                panic!("expected invalid period response");
            }
        }
    }

    #[test]
    fn health_handler_grades_monitored_coverage() {
        let mut app_state = AppState::new();
        let _snapshot_rx = app_state.subscribe_snapshots();
        app_state.set_classrooms(vec![
            classroom("room-101", 40, Some("cam-1")),
            classroom("room-102", 60, Some("cam-2")),
        ]);
        app_state
            .upsert_snapshot(snapshot("room-101", 5, 1))
            .expect("upsert snapshot");
        let state = Arc::new(RwLock::new(app_state));

        let response = build_health_response(
            Arc::clone(&state),
            UNIX_EPOCH + Duration::from_secs(2),
        );
        match response {
            HealthResponse::Success { status, body } => {
                assert_eq!(status, StatusCode::OK);
                assert_eq!(body.status, HealthStatus::Degraded);
                assert_eq!(body.timestamp, "1970-01-01T00:00:02Z");
            }
            HealthResponse::Error { status, .. } => {
                panic!("expected success response, got error: {status}");
            }
        }

        {
            let mut guard = state.write().expect("state writable");
            guard
                .upsert_snapshot(snapshot("room-102", 8, 2))
                .expect("upsert snapshot");
        }
        let response = build_health_response(state, UNIX_EPOCH + Duration::from_secs(3));
        match response {
            HealthResponse::Success { status, body } => {
                assert_eq!(status, StatusCode::OK);
                assert_eq!(body.status, HealthStatus::Ok);
            }
            HealthResponse::Error { status, .. } => {
                panic!("expected success response, got error: {status}");
            }
        }
    }

    #[test]
    fn health_handler_returns_ko_when_no_monitored_snapshots() {
        let mut app_state = AppState::new();
        app_state.set_classrooms(vec![classroom("room-101", 40, Some("cam-1"))]);
        let state = Arc::new(RwLock::new(app_state));

        let response = build_health_response(state, UNIX_EPOCH + Duration::from_secs(4));

        match response {
            HealthResponse::Success { status, body } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body.status, HealthStatus::Ko);
            }
            HealthResponse::Error { status, .. } => {
                panic!("expected success response, got error: {status}");
            }
        }
    }

    #[test]
    fn health_handler_returns_ko_for_empty_directory() {
        let state = Arc::new(RwLock::new(AppState::new()));

        let response = build_health_response(state, UNIX_EPOCH + Duration::from_secs(5));

        match response {
            HealthResponse::Success { status, body } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body.status, HealthStatus::Ko);
            }
            HealthResponse::Error { status, .. } => {
                panic!("expected success response, got error: {status}");
            }
        }
    }

    #[test]
    fn health_handler_is_ok_for_push_only_deployment() {
        let mut app_state = AppState::new();
        app_state.set_classrooms(vec![classroom("room-101", 40, None)]);
        let state = Arc::new(RwLock::new(app_state));

        let response = build_health_response(state, UNIX_EPOCH + Duration::from_secs(6));

        match response {
            HealthResponse::Success { status, body } => {
                assert_eq!(status, StatusCode::OK);
                assert_eq!(body.status, HealthStatus::Ok);
            }
            HealthResponse::Error { status, .. } => {
                panic!("expected success response, got error: {status}");
            }
        }
    }

    #[test]
    fn health_handler_returns_internal_error_when_lock_poisoned() {
        let response = build_health_response(poisoned_state(), UNIX_EPOCH);

        match response {
            HealthResponse::Error { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body.error_code, HealthErrorCode::InternalError);
                assert_eq!(body.error_message, "Internal server error");
            }
            HealthResponse::Success { .. } => {
                panic!("expected internal error response");
            }
        }
    }
}
