//! Route definitions for the KeyHub HTTP API.
//!
//! All routes are mounted under `/api`. Share and identity routes sit
//! behind the identity middleware; health routes do not.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    let api_routes = Router::new()
        .merge(share_routes())
        .merge(invitation_routes())
        .merge(auth_routes())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::identity::resolve_identity,
        ))
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Share management and shared content
fn share_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/shares",
            get(handlers::share::list_shares).post(handlers::share::create_share),
        )
        .route(
            "/shares/{share_id}",
            get(handlers::share::get_share).delete(handlers::share::revoke_share),
        )
        .route("/shares/{share_id}/content", get(handlers::share::get_content))
}

/// Invitation responses and resend
fn invitation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/shares/{share_id}/accept",
            post(handlers::invitation::accept_invitation),
        )
        .route(
            "/shares/{share_id}/reject",
            post(handlers::invitation::reject_invitation),
        )
        .route(
            "/shares/{share_id}/invitations/{email}/resend",
            post(handlers::invitation::resend_invitation),
        )
}

/// Identity synchronization
fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/sync", post(handlers::auth::sync_identity))
}

/// Health checks
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
