//! Handles /auth/b2c/* - Azure AD B2C policy flow.
//!
//! The nonce is generated and sent on the authorization request but, like the
//! ID-token signature, is not validated on the way back; see
//! [`crate::oauth::identity_from_id_token`] for the trust boundary.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::SignedCookieJar;

use super::context::AppState;
use super::utils_flow::{CallbackQuery, finish_callback, run_callback};
use crate::errors::{ConfigError, Result};
use crate::oauth::{ProviderFlow, generate};

/// GET /auth/b2c/login - store state and nonce, redirect to the B2C policy
pub async fn handle_b2c_login(
    State(app): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Redirect)> {
    let config = app
        .config
        .b2c
        .as_ref()
        .ok_or(ConfigError::FlowNotConfigured("b2c"))?;
    let flow = ProviderFlow::b2c(config);

    let state = generate::state();
    let nonce = generate::nonce();
    let mut session = app.sessions.load(&jar);
    session.b2c_state = Some(state.clone());
    session.b2c_nonce = Some(nonce.clone());
    let jar = app.sessions.commit(jar, &session)?;

    tracing::debug!(flow = flow.name(), "redirecting to authorization endpoint");
    Ok((
        jar,
        Redirect::to(&flow.authorization_url(&state, Some(&nonce), None)),
    ))
}

/// GET /auth/b2c/callback - validate state, exchange the code, derive the
/// identity from the ID token
pub async fn handle_b2c_callback(
    State(app): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<(SignedCookieJar, Redirect)> {
    let config = app
        .config
        .b2c
        .as_ref()
        .ok_or(ConfigError::FlowNotConfigured("b2c"))?;
    let flow = ProviderFlow::b2c(config);

    let mut session = app.sessions.load(&jar);
    let stored_state = session.b2c_state.take();
    // Consumed so it cannot be replayed, even though it is not checked
    session.b2c_nonce.take();

    let outcome = run_callback(&app, &flow, query, stored_state, None).await;
    finish_callback(&app, jar, session, outcome, flow.name())
}
