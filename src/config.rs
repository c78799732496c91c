//! Environment-based configuration types for the showcase server runtime settings.

use anyhow::Result;
use axum_extra::extract::cookie::Key;
use std::time::Duration;

use crate::errors::ConfigError;

/// HTTP server port configuration
#[derive(Clone)]
pub struct HttpPort(u16);

/// HTTP client timeout configuration
#[derive(Clone)]
pub struct HttpClientTimeout(Duration);

/// Session cookie lifetime configuration
#[derive(Clone)]
pub struct SessionMaxAge(time::Duration);

/// Secure cookie flag configuration (off for plain-HTTP local development)
#[derive(Clone)]
pub struct SecureCookies(bool);

/// Session cookie signing key derived from SESSION_SECRET
#[derive(Clone)]
pub struct SessionSecret(Key);

/// OAuth2 authorization-code flow settings (confidential client)
#[derive(Clone)]
pub struct OAuth2Config {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub redirect_uri: String,
}

/// Azure AD B2C policy flow settings
#[derive(Clone)]
pub struct B2cConfig {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_name: String,
    pub policy_name: String,
    pub redirect_uri: String,
}

/// Entra ID PKCE flow settings (public client, no secret)
#[derive(Clone)]
pub struct EntraConfig {
    pub client_id: String,
    pub tenant_id: String,
    pub redirect_uri: String,
}

/// Main application configuration
///
/// Built once at startup and shared immutably; flows whose environment
/// variables are absent load as `None` and their routes fail cleanly.
#[derive(Clone)]
pub struct Config {
    pub version: String,
    pub http_port: HttpPort,
    pub user_agent: String,
    pub http_client_timeout: HttpClientTimeout,
    pub session_secret: SessionSecret,
    pub session_max_age: SessionMaxAge,
    pub secure_cookies: SecureCookies,
    pub oauth2: Option<OAuth2Config>,
    pub b2c: Option<B2cConfig>,
    pub entra: Option<EntraConfig>,
}

impl Config {
    /// Create a new configuration from environment variables
    pub fn new() -> Result<Self> {
        let default_user_agent = format!("msid/{}", version()?);

        let http_port: HttpPort = default_env("HTTP_PORT", "8080").try_into()?;
        let http_client_timeout: HttpClientTimeout =
            default_env("HTTP_CLIENT_TIMEOUT", "10s").try_into()?;
        let session_secret: SessionSecret = require_env("SESSION_SECRET")?.try_into()?;
        let session_max_age: SessionMaxAge = default_env("SESSION_MAX_AGE", "7d").try_into()?;
        let secure_cookies: SecureCookies = default_env("SECURE_COOKIES", "false").try_into()?;
        let user_agent = default_env("USER_AGENT", &default_user_agent);

        let oauth2 = OAuth2Config::from_env()?;
        let b2c = B2cConfig::from_env()?;
        let entra = EntraConfig::from_env()?;

        Ok(Self {
            version: version()?,
            http_port,
            user_agent,
            http_client_timeout,
            session_secret,
            session_max_age,
            secure_cookies,
            oauth2,
            b2c,
            entra,
        })
    }
}

impl OAuth2Config {
    /// Load the flow from `OAUTH2_*` variables; absent client id means the
    /// flow is not configured, a present id with no secret is fatal.
    fn from_env() -> Result<Option<Self>> {
        let Some(client_id) = optional_env("OAUTH2_CLIENT_ID") else {
            return Ok(None);
        };
        let client_secret = require_env("OAUTH2_CLIENT_SECRET")?;
        let tenant_id = default_env("OAUTH2_TENANT_ID", "common");
        let redirect_uri = default_env(
            "OAUTH2_REDIRECT_URI",
            "http://localhost:8080/auth/oauth2/callback",
        );

        Ok(Some(Self {
            client_id,
            client_secret,
            tenant_id,
            redirect_uri,
        }))
    }
}

impl B2cConfig {
    fn from_env() -> Result<Option<Self>> {
        let Some(client_id) = optional_env("B2C_CLIENT_ID") else {
            return Ok(None);
        };
        let client_secret = require_env("B2C_CLIENT_SECRET")?;
        let tenant_name = require_env("B2C_TENANT_NAME")?;
        let policy_name = default_env("B2C_POLICY_NAME", "B2C_1_signupsignin1");
        let redirect_uri = default_env(
            "B2C_REDIRECT_URI",
            "http://localhost:8080/auth/b2c/callback",
        );

        Ok(Some(Self {
            client_id,
            client_secret,
            tenant_name,
            policy_name,
            redirect_uri,
        }))
    }
}

impl EntraConfig {
    fn from_env() -> Result<Option<Self>> {
        let Some(client_id) = optional_env("ENTRA_CLIENT_ID") else {
            return Ok(None);
        };
        let tenant_id = default_env("ENTRA_TENANT_ID", "common");
        let redirect_uri = default_env(
            "ENTRA_REDIRECT_URI",
            "http://localhost:8080/auth/entra/callback",
        );

        Ok(Some(Self {
            client_id,
            tenant_id,
            redirect_uri,
        }))
    }
}

/// Get application version from build environment
pub fn version() -> Result<String> {
    option_env!("GIT_HASH")
        .or(option_env!("CARGO_PKG_VERSION"))
        .map(|val| val.to_string())
        .ok_or(ConfigError::VersionNotSet.into())
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| ConfigError::EnvVarRequired(name.to_string()).into())
}

pub(crate) fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn default_env(name: &str, default_value: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default_value.to_string())
}

impl TryFrom<String> for HttpPort {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Ok(Self(8080))
        } else {
            value
                .parse::<u16>()
                .map(Self)
                .map_err(|err| ConfigError::PortParsingFailed(err).into())
        }
    }
}

impl AsRef<u16> for HttpPort {
    fn as_ref(&self) -> &u16 {
        &self.0
    }
}

impl TryFrom<String> for HttpClientTimeout {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Ok(Self(Duration::from_secs(10)));
        }

        let duration = duration_str::parse(&value)
            .map_err(|e| ConfigError::DurationParsingFailed(value, e.to_string()))?;
        Ok(Self(duration))
    }
}

impl AsRef<Duration> for HttpClientTimeout {
    fn as_ref(&self) -> &Duration {
        &self.0
    }
}

impl TryFrom<String> for SessionMaxAge {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let duration = duration_str::parse(&value)
            .map_err(|e| ConfigError::DurationParsingFailed(value, e.to_string()))?;
        let duration = time::Duration::try_from(duration)?;
        Ok(Self(duration))
    }
}

impl AsRef<time::Duration> for SessionMaxAge {
    fn as_ref(&self) -> &time::Duration {
        &self.0
    }
}

impl TryFrom<String> for SecureCookies {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "" | "false" | "0" | "no" | "off" => Ok(Self(false)),
            "true" | "1" | "yes" | "on" => Ok(Self(true)),
            _ => Err(ConfigError::BoolParsingFailed(value).into()),
        }
    }
}

impl AsRef<bool> for SecureCookies {
    fn as_ref(&self) -> &bool {
        &self.0
    }
}

impl TryFrom<String> for SessionSecret {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.len() < 32 {
            return Err(ConfigError::SessionSecretTooShort(value.len()).into());
        }
        Ok(Self(Key::derive_from(value.as_bytes())))
    }
}

impl AsRef<Key> for SessionSecret {
    fn as_ref(&self) -> &Key {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_port_parsing() {
        let port: HttpPort = "3000".to_string().try_into().unwrap();
        assert_eq!(*port.as_ref(), 3000);

        let default: HttpPort = "".to_string().try_into().unwrap();
        assert_eq!(*default.as_ref(), 8080);

        assert!(HttpPort::try_from("not-a-port".to_string()).is_err());
    }

    #[test]
    fn test_http_client_timeout_parsing() {
        let timeout: HttpClientTimeout = "30s".to_string().try_into().unwrap();
        assert_eq!(*timeout.as_ref(), Duration::from_secs(30));

        let default: HttpClientTimeout = "".to_string().try_into().unwrap();
        assert_eq!(*default.as_ref(), Duration::from_secs(10));
    }

    #[test]
    fn test_session_max_age_parsing() {
        let max_age: SessionMaxAge = "7d".to_string().try_into().unwrap();
        assert_eq!(*max_age.as_ref(), time::Duration::days(7));
    }

    #[test]
    fn test_secure_cookies_parsing() {
        assert!(*SecureCookies::try_from("true".to_string()).unwrap().as_ref());
        assert!(!*SecureCookies::try_from("false".to_string()).unwrap().as_ref());
        assert!(!*SecureCookies::try_from("".to_string()).unwrap().as_ref());
        assert!(SecureCookies::try_from("maybe".to_string()).is_err());
    }

    #[test]
    fn test_session_secret_minimum_length() {
        assert!(SessionSecret::try_from("too-short".to_string()).is_err());
        assert!(
            SessionSecret::try_from("0123456789abcdef0123456789abcdef".to_string()).is_ok()
        );
    }
}
