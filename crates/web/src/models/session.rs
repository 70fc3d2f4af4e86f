//! Session-related types.
//!
//! The token and the user record are stored under separate keys so that a
//! token without a readable user record can be detected and treated as
//! signed out.

use foodio_core::SessionUser;
use secrecy::SecretString;

/// Session keys.
pub mod keys {
    /// Bearer token returned by the backend at sign-in.
    pub const TOKEN: &str = "token";

    /// The signed-in user's record (`id`, `role`, optional `name`/`email`).
    pub const USER: &str = "user";

    /// The customer's cart.
    pub const CART: &str = "cart";
}

/// A session that passed the role gate.
#[derive(Debug, Clone)]
pub struct SignedIn {
    /// Bearer token forwarded to the backend.
    pub token: SecretString,
    pub user: SessionUser,
}
