//! Session edit route.

use axum::{Extension, Json, extract::Path, extract::State, http::StatusCode};
use util::state::AppState;
use validator::Validate;

use crate::routes::common::error_response;
use crate::{auth::AuthUser, response::ApiResponse};

use super::common::{EditSessionReq, SessionResponse};
use db::error::AttendanceError;
use db::models::attendance_session::{Model as Session, SessionUpdate};

/// PUT `/api/sessions/{session_id}`
///
/// Edit a session's fields. Permitted while the session is `new` or
/// `active`; a batch change reconciles the attendance roster.
///
/// **Auth**: professor (router); must be the session's creator.
pub async fn edit_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<EditSessionReq>,
) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    if let Err(e) = body.validate() {
        return error_response(AttendanceError::Validation(e.to_string()));
    }

    let changes = SessionUpdate {
        title: body.title,
        description: body.description,
        valid_from: body.valid_from,
        valid_to: body.valid_to,
        subject_code: body.subject_code,
        batch_id: body.batch_id,
        class_config_id: body.class_config_id,
    };

    match Session::edit(state.db(), &session_id, claims.sub, changes).await {
        Ok(row) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                SessionResponse::from(row),
                "Session updated",
            )),
        ),
        Err(e) => error_response(e),
    }
}
