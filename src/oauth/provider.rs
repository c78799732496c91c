//! Polymorphic identity-provider flow over the Microsoft `/oauth2/v2.0`
//! endpoints.
//!
//! The three showcase variants share one authorization-URL / token-exchange /
//! identity-resolution shape and differ only in authority, scope, and
//! credential mode: OAuth2 and B2C authenticate the token request with a
//! client secret, Entra binds the code to a PKCE verifier instead.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::config::{B2cConfig, EntraConfig, OAuth2Config};
use crate::errors::AuthError;
use crate::oauth::types::{B2cClaims, GraphUser, TokenResponse, UserIdentity};

const MICROSOFT_AUTHORITY: &str = "https://login.microsoftonline.com";
const GRAPH_ME_ENDPOINT: &str = "https://graph.microsoft.com/v1.0/me";

/// How the flow authenticates the token request
#[derive(Clone)]
pub enum Credential {
    /// Confidential client: `client_secret` in the token request body
    ClientSecret(String),
    /// Public client: `code_verifier` instead of a secret
    Pkce,
}

/// Where the normalized user identity comes from
#[derive(Clone, Copy, PartialEq, Eq)]
enum IdentitySource {
    /// GET Microsoft Graph `/me` with the access token
    Graph,
    /// Decode the ID token's claims (B2C)
    IdTokenClaims,
}

/// One configured identity-provider flow
#[derive(Clone)]
pub struct ProviderFlow {
    name: &'static str,
    authority: String,
    client_id: String,
    credential: Credential,
    redirect_uri: String,
    scope: String,
    identity_source: IdentitySource,
}

impl ProviderFlow {
    /// Standard OAuth2 authorization-code flow with a client secret.
    pub fn oauth2(config: &OAuth2Config) -> Self {
        Self {
            name: "oauth2",
            authority: format!("{}/{}", MICROSOFT_AUTHORITY, config.tenant_id),
            client_id: config.client_id.clone(),
            credential: Credential::ClientSecret(config.client_secret.clone()),
            redirect_uri: config.redirect_uri.clone(),
            scope: "openid profile email User.Read".to_string(),
            identity_source: IdentitySource::Graph,
        }
    }

    /// Azure AD B2C policy flow; identity comes from the ID token.
    pub fn b2c(config: &B2cConfig) -> Self {
        Self {
            name: "b2c",
            authority: format!(
                "https://{tenant}.b2clogin.com/{tenant}.onmicrosoft.com/{policy}",
                tenant = config.tenant_name,
                policy = config.policy_name,
            ),
            client_id: config.client_id.clone(),
            credential: Credential::ClientSecret(config.client_secret.clone()),
            redirect_uri: config.redirect_uri.clone(),
            // B2C access tokens are scoped to the application itself
            scope: format!("openid profile email {}", config.client_id),
            identity_source: IdentitySource::IdTokenClaims,
        }
    }

    /// Entra ID flow for public clients, PKCE instead of a client secret.
    pub fn entra(config: &EntraConfig) -> Self {
        Self {
            name: "entra",
            authority: format!("{}/{}", MICROSOFT_AUTHORITY, config.tenant_id),
            client_id: config.client_id.clone(),
            credential: Credential::Pkce,
            redirect_uri: config.redirect_uri.clone(),
            scope: "openid profile email User.Read offline_access".to_string(),
            identity_source: IdentitySource::Graph,
        }
    }

    /// Flow name used in logs and error context.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the callback must present a stored PKCE verifier.
    pub fn requires_verifier(&self) -> bool {
        matches!(self.credential, Credential::Pkce)
    }

    /// Build the provider authorization URL for a login redirect.
    ///
    /// All parameters are percent-encoded; the client secret is never part of
    /// this URL. `nonce` is set by the B2C flow, `code_challenge` by Entra.
    pub fn authorization_url(
        &self,
        state: &str,
        nonce: Option<&str>,
        code_challenge: Option<&str>,
    ) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_mode", "query")
            .append_pair("scope", &self.scope)
            .append_pair("state", state);

        if let Some(nonce) = nonce {
            query.append_pair("nonce", nonce);
        }

        if let Some(challenge) = code_challenge {
            query
                .append_pair("code_challenge", challenge)
                .append_pair("code_challenge_method", "S256");
        }

        format!("{}/oauth2/v2.0/authorize?{}", self.authority, query.finish())
    }

    /// Exchange an authorization code for tokens at the provider's token
    /// endpoint.
    ///
    /// `code_verifier` must be supplied for the PKCE credential mode and is
    /// ignored otherwise. A non-success response surfaces as
    /// [`AuthError::TokenExchangeFailed`] carrying the raw provider body.
    pub async fn exchange_code(
        &self,
        http_client: &reqwest::Client,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<TokenResponse, AuthError> {
        let token_endpoint = format!("{}/oauth2/v2.0/token", self.authority);

        let mut params: Vec<(&str, &str)> = vec![
            ("client_id", &self.client_id),
            ("code", code),
            ("redirect_uri", &self.redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        match &self.credential {
            Credential::ClientSecret(secret) => params.push(("client_secret", secret)),
            Credential::Pkce => {
                let verifier = code_verifier.ok_or(AuthError::MissingVerifier)?;
                params.push(("code_verifier", verifier));
            }
        }

        let response = http_client
            .post(&token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenExchangeFailed(format!(
                "{status}: {body}"
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))
    }

    /// Resolve the normalized user identity for a successful token response.
    pub async fn resolve_identity(
        &self,
        http_client: &reqwest::Client,
        tokens: &TokenResponse,
    ) -> Result<UserIdentity, AuthError> {
        match self.identity_source {
            IdentitySource::Graph => self.fetch_user(http_client, &tokens.access_token).await,
            IdentitySource::IdTokenClaims => {
                let id_token = tokens
                    .id_token
                    .as_deref()
                    .ok_or_else(|| AuthError::MalformedToken("no id_token in response".into()))?;
                identity_from_id_token(id_token)
            }
        }
    }

    /// Fetch the user profile from Microsoft Graph `/me` with a bearer token.
    pub async fn fetch_user(
        &self,
        http_client: &reqwest::Client,
        access_token: &str,
    ) -> Result<UserIdentity, AuthError> {
        let response = http_client
            .get(GRAPH_ME_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::UserInfoFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::UserInfoFailed(format!("{status}: {body}")));
        }

        let user = response
            .json::<GraphUser>()
            .await
            .map_err(|e| AuthError::UserInfoFailed(e.to_string()))?;

        Ok(user.into())
    }
}

/// Decode the claims segment of a B2C ID token into a [`UserIdentity`].
///
/// Trust boundary: the token arrived directly from the token endpoint over
/// TLS, so the claims are accepted without verifying the JWS signature or the
/// nonce binding. Anything consuming ID tokens from a less trusted channel
/// must verify both.
pub fn identity_from_id_token(id_token: &str) -> Result<UserIdentity, AuthError> {
    let segments: Vec<&str> = id_token.split('.').collect();
    if segments.len() != 3 {
        return Err(AuthError::MalformedToken(format!(
            "expected 3 segments, got {}",
            segments.len()
        )));
    }

    let payload = URL_SAFE_NO_PAD
        .decode(segments[1].trim_end_matches('='))
        .map_err(|e| AuthError::MalformedToken(format!("payload is not base64url: {e}")))?;

    let claims: B2cClaims = serde_json::from_slice(&payload)
        .map_err(|e| AuthError::MalformedToken(format!("payload is not claim JSON: {e}")))?;

    Ok(claims.into())
}
