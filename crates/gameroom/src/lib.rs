//! Table runtime.
//!
//! A [`Room`] pairs the connected-player set with a [`Dealer`] task that
//! owns the hold'em engine. Engine output flows through a [`Fanout`]
//! task to per-socket [`Outbox`]es; chip batches go to the table's relay.
mod command;
mod dealer;
mod error;
mod fanout;
mod members;
mod protocol;
mod response;
mod room;
mod state;
mod timer;

pub use command::*;
pub use dealer::*;
pub use error::*;
pub use fanout::*;
pub use members::*;
pub use protocol::*;
pub use response::*;
pub use room::*;
pub use state::*;
pub use timer::*;
