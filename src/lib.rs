//! Microsoft identity authentication showcase library crate.
//!
//! Provides three server-side Microsoft login variants (OAuth2 authorization
//! code, Azure AD B2C, Entra ID with PKCE) backed by signed-cookie sessions.

pub mod config;
pub mod errors;
pub mod http;
pub mod oauth;
pub mod session;
pub mod templates;
