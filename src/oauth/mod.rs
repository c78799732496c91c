//! Microsoft identity flows: parameter generation, authorization URLs, token
//! exchange, and identity normalization.

pub mod generate;
pub mod provider;
pub mod types;

pub use provider::{Credential, ProviderFlow, identity_from_id_token};
pub use types::{TokenResponse, UserIdentity};
