//! Main router configuration assembling the page and authentication endpoints.

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::{
    context::AppState,
    handler_b2c::{handle_b2c_callback, handle_b2c_login},
    handler_dashboard::handle_dashboard,
    handler_entra::{handle_entra_callback, handle_entra_login},
    handler_index::handle_index,
    handler_logout::handle_logout,
    handler_oauth2::{handle_oauth2_callback, handle_oauth2_login},
};

/// Build the application router
pub fn build_router(ctx: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/oauth2/login", get(handle_oauth2_login))
        .route("/oauth2/callback", get(handle_oauth2_callback))
        .route("/b2c/login", get(handle_b2c_login))
        .route("/b2c/callback", get(handle_b2c_callback))
        .route("/entra/login", get(handle_entra_login))
        .route("/entra/callback", get(handle_entra_callback))
        .route("/logout", get(handle_logout));

    Router::new()
        .route("/", get(handle_index))
        .route("/dashboard", get(handle_dashboard))
        .nest("/auth", auth_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
