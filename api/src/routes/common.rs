use crate::response::ApiResponse;
use axum::{Json, http::StatusCode};
use db::error::AttendanceError;
use serde::Serialize;

/// Maps an engine error to the HTTP status it travels under.
pub fn status_for(err: &AttendanceError) -> StatusCode {
    match err {
        AttendanceError::NotFound(_) => StatusCode::NOT_FOUND,
        AttendanceError::Forbidden => StatusCode::FORBIDDEN,
        AttendanceError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_REQUEST,
    }
}

/// Turns an engine error into the standard error envelope, carrying its
/// stable `error_kind`.
pub fn error_response<T>(err: AttendanceError) -> (StatusCode, Json<ApiResponse<T>>)
where
    T: Serialize + Default,
{
    let status = status_for(&err);
    if status == StatusCode::SERVICE_UNAVAILABLE {
        tracing::error!(error = %err, "storage failure surfaced to caller");
    }
    (
        status,
        Json(ApiResponse::error_kind(err.kind(), err.to_string())),
    )
}
