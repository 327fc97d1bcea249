use chrono::{DateTime, Utc};
use db::models::attendance_record::{AttendanceStatus, MarkedBy};
use db::models::attendance_session::SessionStatus;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Default)]
pub struct SessionResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub valid_from: String,
    pub valid_to: String,
    pub status: SessionStatus,
    pub subject_id: i64,
    pub batch_id: i64,
    pub class_config_id: i64,
    pub created_by: i64,
    pub created_at: String,
    pub updated_at: String,
    pub present_count: i64,
    pub roster_count: i64,
}

impl From<db::models::attendance_session::Model> for SessionResponse {
    fn from(m: db::models::attendance_session::Model) -> Self {
        Self {
            id: m.uuid,
            title: m.title,
            description: m.description,
            valid_from: m.valid_from.to_rfc3339(),
            valid_to: m.valid_to.to_rfc3339(),
            status: m.status,
            subject_id: m.subject_id,
            batch_id: m.batch_id,
            class_config_id: m.class_config_id,
            created_by: m.created_by,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
            present_count: 0,
            roster_count: 0,
        }
    }
}

impl SessionResponse {
    pub fn from_with_counts(
        m: db::models::attendance_session::Model,
        present_count: i64,
        roster_count: i64,
    ) -> Self {
        let mut base = Self::from(m);
        base.present_count = present_count;
        base.roster_count = roster_count;
        base
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionReq {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    #[validate(length(min = 1, message = "subject_code is required"))]
    pub subject_code: String,
    pub batch_id: i64,
    pub class_config_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditSessionReq {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "subject_code must not be empty"))]
    pub subject_code: Option<String>,
    pub batch_id: Option<i64>,
    pub class_config_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TransitionReq {
    pub status: SessionStatus,
}

#[derive(Debug, Deserialize)]
pub struct SelfMarkReq {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize, Default)]
pub struct SelfMarkResponse {
    pub distance_meters: f64,
}

#[derive(Debug, Deserialize)]
pub struct BulkMarkReq {
    pub student_ids: Vec<i64>,
}

#[derive(Debug, Serialize, Default)]
pub struct BulkMarkResponse {
    pub marked: u64,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i32>,
    pub per_page: Option<i32>,
    pub status: Option<SessionStatus>,
}

#[derive(Debug, Serialize, Default)]
pub struct ListResponse {
    pub sessions: Vec<SessionResponse>,
    pub page: i32,
    pub per_page: i32,
    pub total: i32,
}

#[derive(Debug, Serialize)]
pub struct RosterEntry {
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub marked_at: Option<String>,
    pub marked_by: Option<MarkedBy>,
}

impl From<db::models::attendance_record::Model> for RosterEntry {
    fn from(r: db::models::attendance_record::Model) -> Self {
        Self {
            student_id: r.user_id,
            status: r.status,
            marked_at: r.marked_at.map(|t| t.to_rfc3339()),
            marked_by: r.marked_by,
        }
    }
}
