//! HTTP routing, application state, and request handlers.

pub mod context;
pub mod handler_b2c;
pub mod handler_dashboard;
pub mod handler_entra;
pub mod handler_index;
pub mod handler_logout;
pub mod handler_oauth2;
pub mod server;
pub mod utils_flow;

pub use context::{AppEngine, AppState};
pub use server::build_router;
