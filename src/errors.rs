//! Standardized error types following the `error-msid-<domain>-<number>` format.

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

/// Configuration errors that occur during application startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error when a required environment variable is not set
    #[error("error-msid-config-1 {0} must be set")]
    EnvVarRequired(String),

    /// Error when HTTP_PORT cannot be parsed
    #[error("error-msid-config-2 Parsing HTTP_PORT into u16 failed: {0:?}")]
    PortParsingFailed(std::num::ParseIntError),

    /// Error when version information is not available
    #[error("error-msid-config-3 One of GIT_HASH or CARGO_PKG_VERSION must be set")]
    VersionNotSet,

    /// Error when duration string cannot be parsed
    #[error("error-msid-config-4 Failed to parse duration '{0}': {1}")]
    DurationParsingFailed(String, String),

    /// Error when boolean string cannot be parsed
    #[error(
        "error-msid-config-5 Failed to parse boolean '{0}': expected true/false/1/0/yes/no/on/off"
    )]
    BoolParsingFailed(String),

    /// Error when the session secret is too short to derive a signing key
    #[error("error-msid-config-6 SESSION_SECRET must be at least 32 bytes, got {0}")]
    SessionSecretTooShort(usize),

    /// Error when a flow required by the request is not configured
    #[error("error-msid-config-7 The {0} flow is not configured; set its environment variables")]
    FlowNotConfigured(&'static str),
}

/// Authentication flow errors raised between login initiation and session creation
#[derive(Debug, Error)]
pub enum AuthError {
    /// The identity provider returned an error on the callback
    #[error("error-msid-auth-1 Provider returned '{code}': {description}")]
    Provider { code: String, description: String },

    /// Callback is missing the code or state query parameter
    #[error("error-msid-auth-2 Callback missing code or state parameter")]
    MissingParameters,

    /// Callback state does not match the stored value (possible CSRF)
    #[error("error-msid-auth-3 Callback state does not match stored state")]
    StateMismatch,

    /// PKCE callback arrived without a stored code verifier
    #[error("error-msid-auth-4 No PKCE code verifier stored in session")]
    MissingVerifier,

    /// Token endpoint returned a non-success status; carries the raw body
    #[error("error-msid-auth-5 Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// User-info endpoint returned a non-success status
    #[error("error-msid-auth-6 User info fetch failed: {0}")]
    UserInfoFailed(String),

    /// ID token could not be decoded into claims
    #[error("error-msid-auth-7 Malformed ID token: {0}")]
    MalformedToken(String),
}

impl AuthError {
    /// Opaque error code surfaced to the browser as `/?error=<code>`.
    ///
    /// Exchange, user-info, and token parsing failures all collapse to
    /// `authentication_failed`; the detail is logged server-side only.
    pub fn error_code(&self) -> &str {
        match self {
            AuthError::Provider { code, .. } => code,
            AuthError::MissingParameters => "missing_parameters",
            AuthError::StateMismatch => "invalid_state",
            AuthError::MissingVerifier => "missing_verifier",
            AuthError::TokenExchangeFailed(_)
            | AuthError::UserInfoFailed(_)
            | AuthError::MalformedToken(_) => "authentication_failed",
        }
    }
}

/// HTTP server errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Error when template rendering fails
    #[error("error-msid-http-1 Template rendering failed: {0}")]
    TemplateRenderingFailed(String),

    /// Error when the session cookie cannot be serialized
    #[error("error-msid-http-2 Session serialization failed: {0}")]
    SessionSerializationFailed(String),

    /// Error when request processing fails
    #[error("error-msid-http-3 Request processing failed: {0}")]
    RequestProcessingFailed(String),
}

impl From<ConfigError> for HttpError {
    fn from(err: ConfigError) -> Self {
        HttpError::RequestProcessingFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HttpError>;

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self, "internal server error");
        (StatusCode::INTERNAL_SERVER_ERROR).into_response()
    }
}
