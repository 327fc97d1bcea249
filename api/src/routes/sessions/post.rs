//! Session write routes: create a session, move it through its lifecycle,
//! and the two attendance-marking paths.

use axum::{Extension, Json, extract::Path, extract::State, http::StatusCode};
use chrono::Utc;
use util::{config, state::AppState};
use validator::Validate;

use crate::routes::common::{error_response, status_for};
use crate::{auth::AuthUser, response::ApiResponse};

use super::common::{
    BulkMarkReq, BulkMarkResponse, CreateSessionReq, SelfMarkReq, SelfMarkResponse,
    SessionResponse, TransitionReq,
};
use db::error::AttendanceError;
use db::models::attendance_record;
use db::models::attendance_session::{Model as Session, NewSession};

/// POST `/api/sessions`
///
/// Create a new attendance session in status `new`. An `absent` record is
/// materialized for every student in the batch roster.
///
/// **Auth**: professor (router); the caller becomes the session's creator.
pub async fn create_session(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<CreateSessionReq>,
) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    if let Err(e) = body.validate() {
        return error_response(AttendanceError::Validation(e.to_string()));
    }

    let params = NewSession {
        title: body.title,
        description: body.description,
        valid_from: body.valid_from,
        valid_to: body.valid_to,
        subject_code: body.subject_code,
        batch_id: body.batch_id,
        class_config_id: body.class_config_id,
        created_by: claims.sub,
    };

    match Session::create(state.db(), params).await {
        Ok(row) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                SessionResponse::from(row),
                "Session created",
            )),
        ),
        Err(e) => error_response(e),
    }
}

/// POST `/api/sessions/{session_id}/transition`
///
/// Move a session to the requested status. Only `new -> active` and
/// `active -> completed` are legal.
///
/// **Auth**: professor (router); must be the session's creator.
pub async fn transition_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<TransitionReq>,
) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    match Session::transition(state.db(), &session_id, claims.sub, body.status).await {
        Ok(row) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                SessionResponse::from(row),
                "Session transitioned",
            )),
        ),
        Err(e) => error_response(e),
    }
}

/// POST `/api/sessions/{session_id}/attendance/bulk`
///
/// Mark a set of roster students present. Ids outside the roster are
/// ignored; already-present students are left untouched.
///
/// **Auth**: professor (router); must be the session's creator.
pub async fn bulk_mark_attendance(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<BulkMarkReq>,
) -> (StatusCode, Json<ApiResponse<BulkMarkResponse>>) {
    let db = state.db();

    let session = match Session::find_by_uuid(db, &session_id).await {
        Ok(Some(session)) => session,
        Ok(None) => return error_response(AttendanceError::NotFound("session")),
        Err(e) => return error_response(e.into()),
    };

    match attendance_record::Model::mark_bulk(db, &session, claims.sub, &body.student_ids, Utc::now())
        .await
    {
        Ok(marked) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                BulkMarkResponse { marked },
                "Attendance recorded",
            )),
        ),
        Err(e) => error_response(e),
    }
}

/// POST `/api/sessions/{session_id}/attendance/self`
///
/// Student-initiated, geolocation-gated attendance mark. The reported
/// position must fall within the configured radius of the session's
/// classroom anchor.
///
/// A proximity rejection still carries the computed distance in `data` so
/// the caller can display it.
pub async fn self_mark_attendance(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<SelfMarkReq>,
) -> (StatusCode, Json<ApiResponse<SelfMarkResponse>>) {
    let db = state.db();

    let session = match Session::find_by_uuid(db, &session_id).await {
        Ok(Some(session)) => session,
        Ok(None) => return error_response(AttendanceError::NotFound("session")),
        Err(e) => return error_response(e.into()),
    };

    match attendance_record::Model::mark_self(
        db,
        &session,
        claims.sub,
        body.latitude,
        body.longitude,
        config::attendance_radius_m(),
        Utc::now(),
    )
    .await
    {
        Ok((_, distance_m)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                SelfMarkResponse {
                    distance_meters: distance_m,
                },
                "Attendance recorded",
            )),
        ),
        Err(AttendanceError::OutOfRange { distance_m, radius_m }) => {
            let err = AttendanceError::OutOfRange { distance_m, radius_m };
            (
                status_for(&err),
                Json(ApiResponse::error_with_data(
                    SelfMarkResponse {
                        distance_meters: distance_m,
                    },
                    err.kind(),
                    err.to_string(),
                )),
            )
        }
        Err(e) => error_response(e),
    }
}
