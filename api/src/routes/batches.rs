//! Batch management routes (professor-only).
//!
//! A batch is a named student cohort; its membership rows are the roster
//! that session creation materializes attendance records from.

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
use db::models::{attendance_session, batch, batch_student, user};

pub fn batch_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_batch))
        .route("/", get(list_batches))
        .route("/{batch_id}", delete(delete_batch))
        .route("/{batch_id}/students", get(list_batch_students))
        .route("/{batch_id}/students", post(assign_student))
        .route("/{batch_id}/students/{user_id}", delete(remove_student))
}

#[derive(Debug, Serialize, Default)]
pub struct BatchResponse {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<batch::Model> for BatchResponse {
    fn from(m: batch::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchStudentResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBatchReq {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignStudentReq {
    pub user_id: i64,
}

/// POST `/api/batches`
pub async fn create_batch(
    State(state): State<AppState>,
    Json(body): Json<CreateBatchReq>,
) -> (StatusCode, Json<ApiResponse<BatchResponse>>) {
    let db = state.db();

    if let Err(e) = body.validate() {
        return error_response(AttendanceError::Validation(e.to_string()));
    }

    let name = body.name.trim();
    let duplicate = batch::Entity::find()
        .filter(batch::Column::Name.eq(name))
        .one(db)
        .await;
    match duplicate {
        Ok(Some(_)) => {
            return error_response(AttendanceError::Validation(format!(
                "batch '{name}' already exists"
            )));
        }
        Ok(None) => {}
        Err(e) => return error_response(e.into()),
    }

    match batch::Model::create(db, name).await {
        Ok(row) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                BatchResponse::from(row),
                "Batch created",
            )),
        ),
        Err(e) => error_response(e.into()),
    }
}

/// GET `/api/batches`
pub async fn list_batches(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<BatchResponse>>>) {
    match batch::Entity::find()
        .order_by_asc(batch::Column::Name)
        .all(state.db())
        .await
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(BatchResponse::from).collect(),
                "Batches retrieved",
            )),
        ),
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/api/batches/{batch_id}`
///
/// Refused while sessions still reference the batch: session deletion is an
/// explicit professor action and must not happen via cascade.
pub async fn delete_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    let db = state.db();

    match batch::Entity::find_by_id(batch_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(AttendanceError::NotFound("batch")),
        Err(e) => return error_response(e.into()),
    }

    let in_use = attendance_session::Entity::find()
        .filter(attendance_session::Column::BatchId.eq(batch_id))
        .count(db)
        .await;
    match in_use {
        Ok(0) => {}
        Ok(_) => {
            return error_response(AttendanceError::Validation(
                "batch is referenced by existing sessions".into(),
            ));
        }
        Err(e) => return error_response(e.into()),
    }

    match batch::Entity::delete_by_id(batch_id).exec(db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Batch deleted")),
        ),
        Err(e) => error_response(e.into()),
    }
}

/// GET `/api/batches/{batch_id}/students`
///
/// The batch roster with user details, ordered by student id.
pub async fn list_batch_students(
    State(state): State<AppState>,
    Path(batch_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Vec<BatchStudentResponse>>>) {
    let db = state.db();

    match batch::Entity::find_by_id(batch_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(AttendanceError::NotFound("batch")),
        Err(e) => return error_response(e.into()),
    }

    let roster = match batch_student::Model::roster_ids(db, batch_id).await {
        Ok(ids) => ids,
        Err(e) => return error_response(e.into()),
    };
    if roster.is_empty() {
        return (
            StatusCode::OK,
            Json(ApiResponse::success(Vec::new(), "Batch roster retrieved")),
        );
    }

    match user::Entity::find()
        .filter(user::Column::Id.is_in(roster))
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
    {
        Ok(users) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                users
                    .into_iter()
                    .map(|u| BatchStudentResponse {
                        id: u.id,
                        username: u.username,
                        email: u.email,
                    })
                    .collect(),
                "Batch roster retrieved",
            )),
        ),
        Err(e) => error_response(e.into()),
    }
}

/// POST `/api/batches/{batch_id}/students`
///
/// Assign a student to the batch roster. Only callers with the student role
/// can be assigned.
pub async fn assign_student(
    State(state): State<AppState>,
    Path(batch_id): Path<i64>,
    Json(body): Json<AssignStudentReq>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    let db = state.db();

    match batch::Entity::find_by_id(batch_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(AttendanceError::NotFound("batch")),
        Err(e) => return error_response(e.into()),
    }
    match user::Model::role_of(db, body.user_id).await {
        Ok(Some(user::Role::Student)) => {}
        Ok(Some(_)) => {
            return error_response(AttendanceError::Validation(
                "only students can be assigned to a batch".into(),
            ));
        }
        Ok(None) => return error_response(AttendanceError::NotFound("user")),
        Err(e) => return error_response(e.into()),
    }
    match batch_student::Model::is_member(db, batch_id, body.user_id).await {
        Ok(false) => {}
        Ok(true) => {
            return error_response(AttendanceError::Validation(
                "student is already in this batch".into(),
            ));
        }
        Err(e) => return error_response(e.into()),
    }

    match batch_student::Model::assign(db, batch_id, body.user_id).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(ApiResponse::success((), "Student assigned to batch")),
        ),
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/api/batches/{batch_id}/students/{user_id}`
///
/// Remove a student from the batch roster. Attendance records of existing
/// sessions are not touched; a later session edit reconciles them.
pub async fn remove_student(
    State(state): State<AppState>,
    Path((batch_id, user_id)): Path<(i64, i64)>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    match batch_student::Model::remove(state.db(), batch_id, user_id).await {
        Ok(0) => error_response(AttendanceError::NotFound("batch membership")),
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Student removed from batch")),
        ),
        Err(e) => error_response(e.into()),
    }
}
