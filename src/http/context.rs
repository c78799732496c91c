//! Application state and request context management.

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use axum_template::engine::Engine;
use minijinja::Environment;
use std::sync::Arc;

use crate::{config::Config, session::SessionStore};

/// Template engine with compiled-in templates.
pub type AppEngine = Engine<Environment<'static>>;

#[derive(Clone)]
pub struct AppState {
    pub http_client: reqwest::Client,
    pub config: Arc<Config>,
    /// Template engine for rendering HTML responses.
    pub template_env: AppEngine,
    /// Signed-cookie session adapter
    pub sessions: SessionStore,
}

// SignedCookieJar extraction requires the signing key to come from state
impl FromRef<AppState> for Key {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.session_secret.as_ref().clone()
    }
}
