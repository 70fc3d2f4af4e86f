//! Customer section: menu, cart and order history.
//!
//! Every handler here takes [`RequireCustomer`](crate::middleware::RequireCustomer),
//! so admins are sent to the back office and anonymous visitors to `/auth`.

pub mod cart;
pub mod menu;
pub mod orders;
