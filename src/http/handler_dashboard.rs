//! Handles GET /dashboard - Renders the signed-in profile page

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::SignedCookieJar;
use axum_template::RenderHtml;
use chrono::{DateTime, Utc};
use minijinja::context;

use super::context::AppState;
use crate::errors::Result;

/// Handle requests to the dashboard page. Requires an authenticated session.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response> {
    let session = state.sessions.load(&jar);
    let Some(user) = session.user else {
        return Ok(StatusCode::UNAUTHORIZED.into_response());
    };

    let token_expires = DateTime::<Utc>::from_timestamp_millis(user.expires_at)
        .map(|at| at.to_rfc3339())
        .unwrap_or_else(|| "unknown".to_string());

    Ok(RenderHtml(
        "dashboard.html",
        state.template_env.clone(),
        context! {
            title => "Dashboard",
            user => user,
            token_expires => token_expires,
        },
    )
    .into_response())
}
