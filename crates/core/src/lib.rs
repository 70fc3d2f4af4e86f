//! Foodio Core - Shared types library.
//!
//! Types and pure rules shared by the Foodio web application and its tests:
//!
//! - [`types`] - Newtype IDs, prices, emails, order statuses and roles
//! - [`session`] - The session user record and the role gate
//! - [`cart`] - The per-session cart
//! - [`validation`] - Form schemas for the back office and the auth views
//!
//! # Architecture
//!
//! Like the types it holds, this crate does no I/O: no HTTP, no sessions, no
//! templates. Everything here can be unit tested without a runtime.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod session;
pub mod types;
pub mod validation;

pub use cart::{Cart, CartLine};
pub use session::{Access, SessionUser, check_access};
pub use types::*;
pub use validation::ValidationErrors;
