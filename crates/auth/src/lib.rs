//! Token verification for socket and admin requests.
//!
//! - [`Crypto`] signs and verifies HS256 tokens
//! - [`Claims`] carries the user and player ids issued by the REST service
//! - [`Auth`] and [`Admin`] are actix extractors (feature `server`)
mod claims;
mod crypto;

pub use claims::*;
pub use crypto::*;

#[cfg(feature = "server")]
mod middleware;
#[cfg(feature = "server")]
pub use middleware::*;
