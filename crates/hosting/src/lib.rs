//! Room registry and socket gateway.
//!
//! [`Casino`] owns every [`rtrp_gameroom::Room`]. [`Gateway`] bridges one
//! authenticated WebSocket to them through the [`Dispatcher`], and
//! [`Api`] resolves tokens to player profiles.
mod api;
mod casino;
mod dispatcher;
mod error;
mod gateway;

pub use api::*;
pub use casino::*;
pub use dispatcher::*;
pub use error::*;
pub use gateway::*;
