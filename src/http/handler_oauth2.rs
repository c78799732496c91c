//! Handles /auth/oauth2/* - standard OAuth2 authorization-code flow with a
//! client secret.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::SignedCookieJar;

use super::context::AppState;
use super::utils_flow::{CallbackQuery, finish_callback, run_callback};
use crate::errors::{ConfigError, Result};
use crate::oauth::{ProviderFlow, generate};

/// GET /auth/oauth2/login - store a CSRF state and redirect to the provider
pub async fn handle_oauth2_login(
    State(app): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Redirect)> {
    let config = app
        .config
        .oauth2
        .as_ref()
        .ok_or(ConfigError::FlowNotConfigured("oauth2"))?;
    let flow = ProviderFlow::oauth2(config);

    let state = generate::state();
    let mut session = app.sessions.load(&jar);
    session.oauth_state = Some(state.clone());
    let jar = app.sessions.commit(jar, &session)?;

    tracing::debug!(flow = flow.name(), "redirecting to authorization endpoint");
    Ok((jar, Redirect::to(&flow.authorization_url(&state, None, None))))
}

/// GET /auth/oauth2/callback - validate state, exchange the code, create the
/// session
pub async fn handle_oauth2_callback(
    State(app): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<(SignedCookieJar, Redirect)> {
    let config = app
        .config
        .oauth2
        .as_ref()
        .ok_or(ConfigError::FlowNotConfigured("oauth2"))?;
    let flow = ProviderFlow::oauth2(config);

    let mut session = app.sessions.load(&jar);
    let stored_state = session.oauth_state.take();

    let outcome = run_callback(&app, &flow, query, stored_state, None).await;
    finish_callback(&app, jar, session, outcome, flow.name())
}
