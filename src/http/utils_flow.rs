//! Shared callback machinery for the three authentication flows.
//!
//! Every flow walks the same path: reject provider errors, require code and
//! state, compare the callback state against the stored value, exchange the
//! code, resolve the identity. The handlers differ only in which session
//! fields hold the flow state.

use axum::response::Redirect;
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;

use super::context::AppState;
use crate::errors::{AuthError, Result};
use crate::oauth::ProviderFlow;
use crate::session::{Session, SessionUser};

/// Query parameters the provider sends to every callback endpoint
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Run the validate-exchange-resolve sequence for one callback.
///
/// State is compared before any token exchange; a mismatch or a missing PKCE
/// verifier returns without touching the network.
pub async fn run_callback(
    app: &AppState,
    flow: &ProviderFlow,
    query: CallbackQuery,
    stored_state: Option<String>,
    code_verifier: Option<String>,
) -> std::result::Result<SessionUser, AuthError> {
    if let Some(code) = query.error {
        return Err(AuthError::Provider {
            code,
            description: query.error_description.unwrap_or_default(),
        });
    }

    let (Some(code), Some(callback_state)) = (query.code, query.state) else {
        return Err(AuthError::MissingParameters);
    };

    match stored_state {
        Some(stored) if stored == callback_state => {}
        _ => return Err(AuthError::StateMismatch),
    }

    if flow.requires_verifier() && code_verifier.is_none() {
        return Err(AuthError::MissingVerifier);
    }

    let tokens = flow
        .exchange_code(&app.http_client, &code, code_verifier.as_deref())
        .await?;
    let identity = flow.resolve_identity(&app.http_client, &tokens).await?;

    Ok(SessionUser::from_identity(identity, &tokens))
}

/// Commit the callback outcome: a session bootstrap and redirect to the
/// dashboard on success, an opaque error redirect home otherwise.
///
/// The (consumed) flow state is committed in both cases so a state or
/// verifier value is never replayable.
pub fn finish_callback(
    app: &AppState,
    jar: SignedCookieJar,
    mut session: Session,
    outcome: std::result::Result<SessionUser, AuthError>,
    flow_name: &str,
) -> Result<(SignedCookieJar, Redirect)> {
    match outcome {
        Ok(user) => {
            tracing::info!(flow = flow_name, user_id = %user.user_id, "login complete");
            session.user = Some(user);
            session.clear_flow_state();
            let jar = app.sessions.commit(jar, &session)?;
            Ok((jar, Redirect::to("/dashboard")))
        }
        Err(err) => {
            tracing::error!(flow = flow_name, error = %err, "authentication flow failed");
            let jar = app.sessions.commit(jar, &session)?;
            Ok((jar, Redirect::to(&error_redirect(err.error_code()))))
        }
    }
}

/// Home redirect carrying an opaque error code as `/?error=<code>`.
pub fn error_redirect(code: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("error", code)
        .finish();
    format!("/?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_redirect_encodes_code() {
        assert_eq!(error_redirect("invalid_state"), "/?error=invalid_state");
        assert_eq!(
            error_redirect("server error/odd"),
            "/?error=server+error%2Fodd"
        );
    }
}
