use crate::directory::Classroom;
use crate::occupancy::classifier::RoomStatus;
use crate::timetable::session::ClassSession;
use serde::Serialize;
use time::Time;
use time::macros::format_description;

#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "snake_case")]
pub struct ClassroomBody {
    pub id: String,
    pub room_number: String,
    pub building_id: String,
    pub faculty: String,
    pub floor: i32,
    pub capacity: u32,
    pub has_projector: bool,
    pub has_wifi: bool,
    pub has_power_outlets: bool,
}

impl ClassroomBody {
    pub fn from_classroom(classroom: &Classroom) -> Self {
        Self {
            id: classroom.id.clone(),
            room_number: classroom.room_number.clone(),
            building_id: classroom.building_id.clone(),
            faculty: classroom.faculty.clone(),
            floor: classroom.floor,
            capacity: classroom.capacity,
            has_projector: classroom.has_projector,
            has_wifi: classroom.has_wifi,
            has_power_outlets: classroom.has_power_outlets,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RoomsSuccessResponse {
    pub classrooms: Vec<ClassroomBody>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RoomSuccessResponse {
    pub classroom: ClassroomBody,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RoomsErrorResponse {
    pub error_code: RoomsErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomsErrorCode {
    NotFound,
    InternalError,
}

#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "snake_case")]
pub struct StatusOccupancyBody {
    pub current_count: u32,
    pub detection_confidence: f64,
    pub last_updated: String,
}

#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "snake_case")]
pub struct ActiveClassBody {
    pub class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    pub day_of_week: u8,
    pub period: u8,
    pub start_time: String,
    pub end_time: String,
}

impl ActiveClassBody {
    pub fn from_session(session: &ClassSession) -> Self {
        Self {
            class_name: session.class_name.clone(),
            instructor: session.instructor.clone(),
            day_of_week: session.day_of_week,
            period: session.period,
            start_time: format_time_of_day(session.start_time),
            end_time: format_time_of_day(session.end_time),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ClassroomStatusBody {
    pub classroom: ClassroomBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupancy: Option<StatusOccupancyBody>,
    pub is_available: bool,
    pub occupancy_rate: f64,
    pub status: RoomStatus,
    pub status_detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_class: Option<ActiveClassBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StatusSuccessResponse {
    pub classrooms: Vec<ClassroomStatusBody>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StatusErrorResponse {
    pub error_code: StatusErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusErrorCode {
    InvalidDate,
    InvalidPeriod,
    InvalidQuery,
    InternalError,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OccupancySuccessResponse {
    pub classroom_id: String,
    pub current_count: u32,
    pub detection_confidence: f64,
    pub last_updated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_id: Option<String>,
    pub is_available: bool,
    pub occupancy_rate: f64,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OccupancyErrorResponse {
    pub error_code: OccupancyErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OccupancyErrorCode {
    NotFound,
    NoSnapshot,
    InvalidConfidence,
    InternalError,
}

#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "snake_case")]
pub struct ScheduleBody {
    pub id: String,
    pub classroom_id: String,
    pub class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    pub day_of_week: u8,
    pub period: u8,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
}

impl ScheduleBody {
    pub fn from_session(session: &ClassSession) -> Self {
        Self {
            id: session.id.clone(),
            classroom_id: session.classroom_id.clone(),
            class_name: session.class_name.clone(),
            instructor: session.instructor.clone(),
            day_of_week: session.day_of_week,
            period: session.period,
            start_time: format_time_of_day(session.start_time),
            end_time: format_time_of_day(session.end_time),
            semester: session.semester.clone(),
            course_code: session.course_code.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulesSuccessResponse {
    pub schedules: Vec<ScheduleBody>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ScheduleCreatedResponse {
    pub schedule: ScheduleBody,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulesErrorResponse {
    pub error_code: SchedulesErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchedulesErrorCode {
    InvalidDate,
    InvalidPeriod,
    InvalidDayOfWeek,
    InvalidTime,
    InvalidTimeRange,
    InternalError,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
    Ko,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthSuccessResponse {
    pub status: HealthStatus,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthErrorResponse {
    pub error_code: HealthErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthErrorCode {
    InternalError,
}

/// "HH:MM" rendering for period and session times.
pub fn format_time_of_day(time: Time) -> String {
    time.format(format_description!("[hour]:[minute]"))
        .unwrap_or_else(|_| "00:00".to_string())
}
