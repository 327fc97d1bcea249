//! Subject management routes (professor-only).
//!
//! Subjects are the existence-check collaborator for session creation:
//! sessions resolve them by their unique code.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

use crate::response::ApiResponse;
use crate::routes::common::error_response;
use db::error::AttendanceError;
use db::models::{attendance_session, subject};

pub fn subject_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_subject))
        .route("/", get(list_subjects))
        .route("/{subject_id}", delete(delete_subject))
}

#[derive(Debug, Serialize, Default)]
pub struct SubjectResponse {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<subject::Model> for SubjectResponse {
    fn from(m: subject::Model) -> Self {
        Self {
            id: m.id,
            code: m.code,
            title: m.title,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubjectReq {
    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
}

/// POST `/api/subjects`
pub async fn create_subject(
    State(state): State<AppState>,
    Json(body): Json<CreateSubjectReq>,
) -> (StatusCode, Json<ApiResponse<SubjectResponse>>) {
    let db = state.db();

    if let Err(e) = body.validate() {
        return error_response(AttendanceError::Validation(e.to_string()));
    }

    let code = body.code.trim();
    match subject::Model::find_by_code(db, code).await {
        Ok(Some(_)) => {
            return error_response(AttendanceError::Validation(format!(
                "subject code '{code}' already exists"
            )));
        }
        Ok(None) => {}
        Err(e) => return error_response(e.into()),
    }

    match subject::Model::create(db, code, body.title.trim()).await {
        Ok(row) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                SubjectResponse::from(row),
                "Subject created",
            )),
        ),
        Err(e) => error_response(e.into()),
    }
}

/// GET `/api/subjects`
pub async fn list_subjects(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<SubjectResponse>>>) {
    match subject::Entity::find()
        .order_by_asc(subject::Column::Code)
        .all(state.db())
        .await
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(SubjectResponse::from).collect(),
                "Subjects retrieved",
            )),
        ),
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/api/subjects/{subject_id}`
///
/// Refused while sessions still reference the subject: session deletion is
/// an explicit professor action and must not happen via cascade.
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(subject_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    let db = state.db();

    match subject::Entity::find_by_id(subject_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(AttendanceError::NotFound("subject")),
        Err(e) => return error_response(e.into()),
    }

    let in_use = attendance_session::Entity::find()
        .filter(attendance_session::Column::SubjectId.eq(subject_id))
        .count(db)
        .await;
    match in_use {
        Ok(0) => {}
        Ok(_) => {
            return error_response(AttendanceError::Validation(
                "subject is referenced by existing sessions".into(),
            ));
        }
        Err(e) => return error_response(e.into()),
    }

    match subject::Entity::delete_by_id(subject_id).exec(db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Subject deleted")),
        ),
        Err(e) => error_response(e.into()),
    }
}
