use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use util::state::AppState;

mod common;
mod delete;
mod get;
mod post;
mod put;

pub use delete::delete_session;
pub use get::{get_roster, get_session, list_sessions};
pub use post::{bulk_mark_attendance, create_session, self_mark_attendance, transition_session};
pub use put::edit_session;

use crate::auth::guards::require_professor;

pub fn session_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions))
        .route("/", post(create_session).route_layer(from_fn_with_state(app_state.clone(), require_professor)))
        .route("/{session_id}", get(get_session))
        .route("/{session_id}", put(edit_session).route_layer(from_fn_with_state(app_state.clone(), require_professor)))
        .route("/{session_id}", delete(delete_session).route_layer(from_fn_with_state(app_state.clone(), require_professor)))
        .route("/{session_id}/transition", post(transition_session).route_layer(from_fn_with_state(app_state.clone(), require_professor)))
        .route("/{session_id}/attendance/bulk", post(bulk_mark_attendance).route_layer(from_fn_with_state(app_state.clone(), require_professor)))
        .route("/{session_id}/attendance/self", post(self_mark_attendance))
        .route("/{session_id}/roster", get(get_roster).route_layer(from_fn_with_state(app_state.clone(), require_professor)))
        .with_state(app_state)
}
