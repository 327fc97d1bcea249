//! HTTP route entry point for `/api/...`.
//!
//! Routes are organized by domain, each protected via the appropriate access
//! control middleware:
//! - `/health` → Health check endpoint (public)
//! - `/sessions` → Session lifecycle and attendance marking (authenticated;
//!   professor-only where noted on individual routes)
//! - `/subjects`, `/batches`, `/class-configs` → Collaborator management
//!   (professor-only)

use crate::auth::guards::{allow_authenticated, require_professor};
use crate::routes::{
    batches::batch_routes, class_configs::class_config_routes, health::health_routes,
    sessions::session_routes, subjects::subject_routes,
};
use axum::{Router, middleware::{from_fn, from_fn_with_state}};
use util::state::AppState;

pub mod batches;
pub mod class_configs;
pub mod common;
pub mod health;
pub mod sessions;
pub mod subjects;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest(
            "/sessions",
            session_routes(app_state.clone()).route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/subjects",
            subject_routes()
                .route_layer(from_fn_with_state(app_state.clone(), require_professor)),
        )
        .nest(
            "/batches",
            batch_routes().route_layer(from_fn_with_state(app_state.clone(), require_professor)),
        )
        .nest(
            "/class-configs",
            class_config_routes()
                .route_layer(from_fn_with_state(app_state.clone(), require_professor)),
        )
        .with_state(app_state)
}
