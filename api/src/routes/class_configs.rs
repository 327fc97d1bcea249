//! Classroom configuration routes (professor-only).
//!
//! A class config is the labeled geographic anchor that self-service
//! attendance marking geofences against. Sessions re-resolve their config by
//! id at mark time, so editing a location here moves the geofence for future
//! marks of existing sessions.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

use crate::response::ApiResponse;
use crate::routes::common::error_response;
use db::error::AttendanceError;
use db::models::{attendance_session, class_config};

pub fn class_config_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_class_config))
        .route("/", get(list_class_configs))
        .route("/{config_id}", put(edit_class_config))
        .route("/{config_id}", delete(delete_class_config))
}

#[derive(Debug, Serialize, Default)]
pub struct ClassConfigResponse {
    pub id: i64,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<class_config::Model> for ClassConfigResponse {
    fn from(m: class_config::Model) -> Self {
        Self {
            id: m.id,
            label: m.label,
            latitude: m.latitude,
            longitude: m.longitude,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClassConfigReq {
    #[validate(length(min = 1, message = "label is required"))]
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditClassConfigReq {
    #[validate(length(min = 1, message = "label must not be empty"))]
    pub label: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// POST `/api/class-configs`
pub async fn create_class_config(
    State(state): State<AppState>,
    Json(body): Json<CreateClassConfigReq>,
) -> (StatusCode, Json<ApiResponse<ClassConfigResponse>>) {
    if let Err(e) = body.validate() {
        return error_response(AttendanceError::Validation(e.to_string()));
    }

    match class_config::Model::create(state.db(), body.label.trim(), body.latitude, body.longitude)
        .await
    {
        Ok(row) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                ClassConfigResponse::from(row),
                "Class config created",
            )),
        ),
        Err(e) => error_response(e),
    }
}

/// GET `/api/class-configs`
pub async fn list_class_configs(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<ClassConfigResponse>>>) {
    match class_config::Entity::find()
        .order_by_asc(class_config::Column::Label)
        .all(state.db())
        .await
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(ClassConfigResponse::from).collect(),
                "Class configs retrieved",
            )),
        ),
        Err(e) => error_response(e.into()),
    }
}

/// PUT `/api/class-configs/{config_id}`
pub async fn edit_class_config(
    State(state): State<AppState>,
    Path(config_id): Path<i64>,
    Json(body): Json<EditClassConfigReq>,
) -> (StatusCode, Json<ApiResponse<ClassConfigResponse>>) {
    if let Err(e) = body.validate() {
        return error_response(AttendanceError::Validation(e.to_string()));
    }

    match class_config::Model::edit(
        state.db(),
        config_id,
        body.label.as_deref(),
        body.latitude,
        body.longitude,
    )
    .await
    {
        Ok(row) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ClassConfigResponse::from(row),
                "Class config updated",
            )),
        ),
        Err(e) => error_response(e),
    }
}

/// DELETE `/api/class-configs/{config_id}`
///
/// Refused while sessions still reference the config: session deletion is
/// an explicit professor action and must not happen via cascade.
pub async fn delete_class_config(
    State(state): State<AppState>,
    Path(config_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    let db = state.db();

    match class_config::Entity::find_by_id(config_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(AttendanceError::NotFound("class config")),
        Err(e) => return error_response(e.into()),
    }

    let in_use = attendance_session::Entity::find()
        .filter(attendance_session::Column::ClassConfigId.eq(config_id))
        .count(db)
        .await;
    match in_use {
        Ok(0) => {}
        Ok(_) => {
            return error_response(AttendanceError::Validation(
                "class config is referenced by existing sessions".into(),
            ));
        }
        Err(e) => return error_response(e.into()),
    }

    match class_config::Entity::delete_by_id(config_id).exec(db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Class config deleted")),
        ),
        Err(e) => error_response(e.into()),
    }
}
