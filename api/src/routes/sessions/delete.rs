//! Session delete route.

use axum::{Extension, Json, extract::Path, extract::State, http::StatusCode};
use util::state::AppState;

use crate::routes::common::error_response;
use crate::{auth::AuthUser, response::ApiResponse};

use db::models::attendance_session::Model as Session;

/// DELETE `/api/sessions/{session_id}`
///
/// Delete a session and all of its attendance records, whatever its
/// status. There is no soft delete.
///
/// **Auth**: professor (router); must be the session's creator.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    match Session::delete(state.db(), &session_id, claims.sub).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Session deleted")),
        ),
        Err(e) => error_response(e),
    }
}
