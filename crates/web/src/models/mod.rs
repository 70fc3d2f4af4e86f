//! Types kept in the session.

pub mod session;

pub use session::{SignedIn, keys};
