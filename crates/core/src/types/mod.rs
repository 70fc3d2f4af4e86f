//! Core types for Foodio.
//!
//! Type-safe wrappers for IDs, prices, emails, statuses and roles.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use status::{OrderStatus, Role};
