//! Handles GET / - Renders the sign-in page of the application

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use axum_extra::extract::SignedCookieJar;
use axum_template::RenderHtml;
use minijinja::context;
use serde::Deserialize;

use super::context::AppState;
use crate::errors::Result;

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    /// Opaque error code from a failed authentication flow
    pub error: Option<String>,
}

/// Handle requests to the index page
pub async fn handle_index(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<IndexQuery>,
) -> Result<impl IntoResponse> {
    let session = state.sessions.load(&jar);

    Ok(RenderHtml(
        "index.html",
        state.template_env.clone(),
        context! {
            title => "Microsoft Identity Demo",
            user => session.user,
            error => query.error,
            oauth2_enabled => state.config.oauth2.is_some(),
            b2c_enabled => state.config.b2c.is_some(),
            entra_enabled => state.config.entra.is_some(),
        },
    ))
}
