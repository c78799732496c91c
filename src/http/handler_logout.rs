//! Handles GET /auth/logout - Clears the session cookie

use axum::{extract::State, response::Redirect};
use axum_extra::extract::SignedCookieJar;

use super::context::AppState;

/// Remove the session cookie and send the user home
pub async fn handle_logout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> (SignedCookieJar, Redirect) {
    let session = state.sessions.load(&jar);
    if let Some(user) = session.user {
        tracing::info!(user_id = %user.user_id, "logout");
    }

    (state.sessions.destroy(jar), Redirect::to("/"))
}
