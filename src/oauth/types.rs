//! Wire-level types for the Microsoft token and user-info endpoints.

use serde::{Deserialize, Serialize};

/// Token endpoint response (subset of the Microsoft identity platform shape)
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Present for OIDC scopes; the B2C flow derives the user identity from it
    #[serde(default)]
    pub id_token: Option<String>,
    /// Lifetime of the access token in seconds
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Absolute expiry in epoch milliseconds, computed at exchange time.
    pub fn expires_at_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis() + (self.expires_in as i64) * 1000
    }
}

/// Normalized user identity, the common shape across all three flows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

/// Microsoft Graph `/me` response fields used for identity normalization
#[derive(Debug, Clone, Deserialize)]
pub struct GraphUser {
    pub id: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub mail: Option<String>,
    #[serde(rename = "userPrincipalName", default)]
    pub user_principal_name: Option<String>,
}

impl From<GraphUser> for UserIdentity {
    fn from(user: GraphUser) -> Self {
        // Personal accounts often leave `mail` unset; the UPN is always present
        let email = user
            .user_principal_name
            .or(user.mail)
            .unwrap_or_default();
        Self {
            id: user.id,
            email,
            display_name: user.display_name.unwrap_or_default(),
        }
    }
}

/// Claims read from a B2C ID token payload
#[derive(Debug, Clone, Deserialize)]
pub struct B2cClaims {
    pub sub: String,
    /// B2C policies emit a collection; plain `email` is the fallback
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<B2cClaims> for UserIdentity {
    fn from(claims: B2cClaims) -> Self {
        let email = claims
            .emails
            .into_iter()
            .next()
            .or(claims.email)
            .unwrap_or_default();
        Self {
            id: claims.sub,
            email,
            display_name: claims.name.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_user_prefers_principal_name() {
        let user: GraphUser = serde_json::from_value(serde_json::json!({
            "id": "guid-1",
            "displayName": "Ada Lovelace",
            "mail": "ada@contoso.com",
            "userPrincipalName": "ada@contoso.onmicrosoft.com"
        }))
        .unwrap();

        let identity = UserIdentity::from(user);
        assert_eq!(identity.id, "guid-1");
        assert_eq!(identity.email, "ada@contoso.onmicrosoft.com");
        assert_eq!(identity.display_name, "Ada Lovelace");
    }

    #[test]
    fn test_graph_user_falls_back_to_mail() {
        let user: GraphUser = serde_json::from_value(serde_json::json!({
            "id": "guid-2",
            "displayName": "Grace Hopper",
            "mail": "grace@contoso.com"
        }))
        .unwrap();

        assert_eq!(UserIdentity::from(user).email, "grace@contoso.com");
    }

    #[test]
    fn test_b2c_claims_prefer_emails_collection() {
        let claims: B2cClaims = serde_json::from_value(serde_json::json!({
            "sub": "b2c-sub",
            "emails": ["first@example.com", "second@example.com"],
            "email": "plain@example.com",
            "name": "First User"
        }))
        .unwrap();

        let identity = UserIdentity::from(claims);
        assert_eq!(identity.email, "first@example.com");
        assert_eq!(identity.display_name, "First User");
    }

    #[test]
    fn test_b2c_claims_email_fallback() {
        let claims: B2cClaims = serde_json::from_value(serde_json::json!({
            "sub": "b2c-sub",
            "email": "plain@example.com"
        }))
        .unwrap();

        assert_eq!(UserIdentity::from(claims).email, "plain@example.com");
    }

    #[test]
    fn test_token_response_parses_minimal_body() {
        let token: TokenResponse = serde_json::from_value(serde_json::json!({
            "access_token": "at",
            "expires_in": 3600
        }))
        .unwrap();

        assert_eq!(token.access_token, "at");
        assert!(token.refresh_token.is_none());
        assert!(token.id_token.is_none());
        assert!(token.expires_at_ms() > chrono::Utc::now().timestamp_millis());
    }
}
