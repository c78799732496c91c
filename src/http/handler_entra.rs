//! Handles /auth/entra/* - Entra ID public-client flow with PKCE.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::SignedCookieJar;

use super::context::AppState;
use super::utils_flow::{CallbackQuery, finish_callback, run_callback};
use crate::errors::{ConfigError, Result};
use crate::oauth::{ProviderFlow, generate};

/// GET /auth/entra/login - store state and code verifier, redirect with the
/// S256 challenge
pub async fn handle_entra_login(
    State(app): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Redirect)> {
    let config = app
        .config
        .entra
        .as_ref()
        .ok_or(ConfigError::FlowNotConfigured("entra"))?;
    let flow = ProviderFlow::entra(config);

    let state = generate::state();
    let verifier = generate::code_verifier();
    let challenge = generate::code_challenge(&verifier);

    // Only the challenge leaves the server; the verifier stays in the
    // signed cookie until the token exchange
    let mut session = app.sessions.load(&jar);
    session.entra_state = Some(state.clone());
    session.entra_verifier = Some(verifier);
    let jar = app.sessions.commit(jar, &session)?;

    tracing::debug!(flow = flow.name(), "redirecting to authorization endpoint");
    Ok((
        jar,
        Redirect::to(&flow.authorization_url(&state, None, Some(&challenge))),
    ))
}

/// GET /auth/entra/callback - validate state and verifier, exchange the code
pub async fn handle_entra_callback(
    State(app): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<(SignedCookieJar, Redirect)> {
    let config = app
        .config
        .entra
        .as_ref()
        .ok_or(ConfigError::FlowNotConfigured("entra"))?;
    let flow = ProviderFlow::entra(config);

    let mut session = app.sessions.load(&jar);
    let stored_state = session.entra_state.take();
    let code_verifier = session.entra_verifier.take();

    let outcome = run_callback(&app, &flow, query, stored_state, code_verifier).await;
    finish_callback(&app, jar, session, outcome, flow.name())
}
