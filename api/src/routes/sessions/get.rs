//! Session read routes: list sessions, fetch a single session, read the
//! attendance roster.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::PaginatorTrait;
use util::state::AppState;

use crate::routes::common::error_response;
use crate::{auth::AuthUser, response::ApiResponse};

use super::common::{ListQuery, ListResponse, RosterEntry, SessionResponse};
use db::error::AttendanceError;
use db::models::{attendance_record, attendance_session, user};

/// GET `/api/sessions`
///
/// List sessions visible to the caller: a professor sees sessions they
/// created, a student sees sessions whose batch roster contains them.
///
/// **Query**:
/// - `status` *(optional)*: `new` | `active` | `completed`
/// - `page` *(default 1)*
/// - `per_page` *(default 20, max 100)*
pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(q): Query<ListQuery>,
) -> (StatusCode, Json<ApiResponse<ListResponse>>) {
    let db = state.db();
    let page = q.page.unwrap_or(1).max(1) as u64;
    let per_page = q.per_page.unwrap_or(20).clamp(1, 100) as u64;

    let role = match user::Model::role_of(db, claims.sub).await {
        Ok(Some(role)) => role,
        Ok(None) => return error_response(AttendanceError::NotFound("user")),
        Err(e) => return error_response(e.into()),
    };

    let sel = match role {
        user::Role::Professor => {
            attendance_session::Model::query_for_professor(claims.sub, q.status)
        }
        user::Role::Student => attendance_session::Model::query_for_student(claims.sub, q.status),
    };

    let paginator = sel.paginate(db, per_page);
    let total = match paginator.num_items().await {
        Ok(n) => n as i32,
        Err(e) => return error_response(e.into()),
    };
    let rows = match paginator.fetch_page(page - 1).await {
        Ok(rows) => rows,
        Err(e) => return error_response(e.into()),
    };

    let session_ids: Vec<i64> = rows.iter().map(|s| s.id).collect();
    let counts = match attendance_record::Model::status_counts_for(db, &session_ids).await {
        Ok(counts) => counts,
        Err(e) => return error_response(e.into()),
    };

    let resp = ListResponse {
        sessions: rows
            .into_iter()
            .map(|s| {
                let (present, roster) = counts.get(&s.id).copied().unwrap_or((0, 0));
                SessionResponse::from_with_counts(s, present, roster)
            })
            .collect(),
        page: page as i32,
        per_page: per_page as i32,
        total,
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(resp, "Sessions retrieved")),
    )
}

/// GET `/api/sessions/{session_id}`
///
/// Fetch a single session with attendance counts.
///
/// **Auth**: the session's creator or a roster member.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    let db = state.db();

    let session = match attendance_session::Model::get_authorized(db, &session_id, claims.sub).await
    {
        Ok(session) => session,
        Err(e) => return error_response(e),
    };

    let counts = match attendance_record::Model::status_counts_for(db, &[session.id]).await {
        Ok(counts) => counts,
        Err(e) => return error_response(e.into()),
    };
    let (present, roster) = counts.get(&session.id).copied().unwrap_or((0, 0));

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            SessionResponse::from_with_counts(session, present, roster),
            "Session retrieved",
        )),
    )
}

/// GET `/api/sessions/{session_id}/roster`
///
/// The full attendance ledger for a session, ordered by student id.
///
/// **Auth**: the session's creator.
pub async fn get_roster(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<Vec<RosterEntry>>>) {
    let db = state.db();

    let session = match attendance_session::Model::find_by_uuid(db, &session_id).await {
        Ok(Some(session)) => session,
        Ok(None) => return error_response(AttendanceError::NotFound("session")),
        Err(e) => return error_response(e.into()),
    };
    if session.created_by != claims.sub {
        return error_response(AttendanceError::Forbidden);
    }

    match attendance_record::Model::roster(db, session.id).await {
        Ok(records) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                records.into_iter().map(RosterEntry::from).collect(),
                "Roster retrieved",
            )),
        ),
        Err(e) => error_response(e.into()),
    }
}
