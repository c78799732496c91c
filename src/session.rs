//! Signed-cookie session storage.
//!
//! The whole session rides in one signed cookie as a JSON blob, so a commit
//! is a single Set-Cookie header and no partial state is ever observable.
//! Tampered or unsigned cookies fail signature verification and load as an
//! empty session instead of erroring into handler logic.

use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::HttpError;
use crate::oauth::types::{TokenResponse, UserIdentity};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "__session";

/// Session contents: an optional authenticated user plus the ephemeral
/// per-flow state written at login initiation and consumed at the callback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b2c_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b2c_nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entra_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entra_verifier: Option<String>,
}

impl Session {
    /// Drop all ephemeral flow state; called once a callback has consumed it.
    pub fn clear_flow_state(&mut self) {
        self.oauth_state = None;
        self.b2c_state = None;
        self.b2c_nonce = None;
        self.entra_state = None;
        self.entra_verifier = None;
    }
}

/// Authenticated user record
///
/// All identity fields are written together; a session either has a complete
/// user or none at all. `expires_at` is epoch milliseconds and is not
/// reconciled with the cookie lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_at: i64,
}

impl SessionUser {
    /// Build the session record from a normalized identity and token response.
    pub fn from_identity(identity: UserIdentity, tokens: &TokenResponse) -> Self {
        Self {
            user_id: identity.id,
            email: identity.email,
            name: identity.display_name,
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            expires_at: tokens.expires_at_ms(),
        }
    }
}

/// Adapter over the signed cookie jar with load / commit / destroy semantics
#[derive(Clone)]
pub struct SessionStore {
    key: Key,
    secure: bool,
    max_age: time::Duration,
}

impl SessionStore {
    pub fn new(key: Key, secure: bool, max_age: time::Duration) -> Self {
        Self {
            key,
            secure,
            max_age,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.session_secret.as_ref().clone(),
            *config.secure_cookies.as_ref(),
            *config.session_max_age.as_ref(),
        )
    }

    /// Build a jar from request headers, for use outside axum extractors.
    pub fn jar(&self, headers: &http::HeaderMap) -> SignedCookieJar {
        SignedCookieJar::from_headers(headers, self.key.clone())
    }

    /// Decode the session from a verified jar.
    ///
    /// A missing cookie, failed signature, or unparsable blob all yield the
    /// default session.
    pub fn load(&self, jar: &SignedCookieJar) -> Session {
        jar.get(SESSION_COOKIE)
            .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
            .unwrap_or_default()
    }

    /// Serialize and sign the session into the jar as one cookie.
    pub fn commit(
        &self,
        jar: SignedCookieJar,
        session: &Session,
    ) -> Result<SignedCookieJar, HttpError> {
        let value = serde_json::to_string(session)
            .map_err(|e| HttpError::SessionSerializationFailed(e.to_string()))?;

        let cookie = Cookie::build((SESSION_COOKIE, value))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(self.max_age)
            .build();

        Ok(jar.add(cookie))
    }

    /// Add a removal cookie so the browser drops the session immediately.
    pub fn destroy(&self, jar: SignedCookieJar) -> SignedCookieJar {
        jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use http::HeaderMap;
    use http::header::{COOKIE, SET_COOKIE};

    fn test_store() -> SessionStore {
        SessionStore::new(Key::generate(), false, time::Duration::days(7))
    }

    fn test_user() -> SessionUser {
        SessionUser {
            user_id: "guid-1".to_string(),
            email: "ada@contoso.com".to_string(),
            name: "Ada Lovelace".to_string(),
            access_token: "access-token".to_string(),
            refresh_token: Some("refresh-token".to_string()),
            expires_at: 1_700_000_000_000,
        }
    }

    /// Turn a committed jar into the Cookie header a browser would send back.
    fn roundtrip_headers(jar: SignedCookieJar) -> HeaderMap {
        let response = (jar, "").into_response();
        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .expect("commit produced no Set-Cookie")
            .to_str()
            .unwrap();
        let pair = set_cookie.split(';').next().unwrap().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, pair.parse().unwrap());
        headers
    }

    #[test]
    fn test_commit_load_round_trip() {
        let store = test_store();
        let mut session = Session::default();
        session.user = Some(test_user());
        session.oauth_state = Some("st".to_string());

        let jar = store.jar(&HeaderMap::new());
        let jar = store.commit(jar, &session).unwrap();
        let headers = roundtrip_headers(jar);

        let loaded = store.load(&store.jar(&headers));
        assert_eq!(loaded, session);
    }

    #[test]
    fn test_tampered_cookie_loads_empty() {
        let store = test_store();
        let mut session = Session::default();
        session.user = Some(test_user());

        let jar = store.commit(store.jar(&HeaderMap::new()), &session).unwrap();
        let headers = roundtrip_headers(jar);

        let cookie_header = headers.get(COOKIE).unwrap().to_str().unwrap();
        let mut tampered = cookie_header.to_string();
        // Flip the final character of the signed value
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        let mut tampered_headers = HeaderMap::new();
        tampered_headers.insert(COOKIE, tampered.parse().unwrap());

        let loaded = store.load(&store.jar(&tampered_headers));
        assert_eq!(loaded, Session::default());
        assert!(loaded.user.is_none());
    }

    #[test]
    fn test_unsigned_cookie_loads_empty() {
        let store = test_store();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            format!("{SESSION_COOKIE}={}", "{\"user\":null}").parse().unwrap(),
        );

        let loaded = store.load(&store.jar(&headers));
        assert_eq!(loaded, Session::default());
    }

    #[test]
    fn test_destroy_clears_session() {
        let store = test_store();
        let mut session = Session::default();
        session.user = Some(test_user());

        let jar = store.commit(store.jar(&HeaderMap::new()), &session).unwrap();
        let headers = roundtrip_headers(jar);

        // The browser replays the session cookie; logout removes it
        let jar = store.jar(&headers);
        let jar = store.destroy(jar);

        let response = (jar, "").into_response();
        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .expect("destroy produced no Set-Cookie")
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with(&format!("{SESSION_COOKIE}=")));
        assert!(set_cookie.contains("Max-Age=0"));

        // A cleared cookie value no longer verifies
        let pair = set_cookie.split(';').next().unwrap().to_string();
        let mut cleared = HeaderMap::new();
        cleared.insert(COOKIE, pair.parse().unwrap());
        assert_eq!(store.load(&store.jar(&cleared)), Session::default());
    }

    #[test]
    fn test_clear_flow_state_keeps_user() {
        let mut session = Session {
            user: Some(test_user()),
            oauth_state: Some("a".to_string()),
            b2c_state: Some("b".to_string()),
            b2c_nonce: Some("c".to_string()),
            entra_state: Some("d".to_string()),
            entra_verifier: Some("e".to_string()),
        };

        session.clear_flow_state();
        assert!(session.user.is_some());
        assert!(session.oauth_state.is_none());
        assert!(session.entra_verifier.is_none());
    }
}
