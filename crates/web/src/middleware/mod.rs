//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors, `main` only)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with an in-memory store)

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{
    AuthRejection, OptionalAuth, RequireAdmin, RequireCustomer, clear_session, set_signed_in,
};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
