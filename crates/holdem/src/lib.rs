//! Texas Hold'em hand state machine.
//!
//! [`Holdem`] seats players, deals, runs the betting rounds, and settles
//! layered side pots. It owns no clock and no sockets; every step queues
//! [`Output`]s for the table runtime to deliver.
mod action;
mod error;
mod event;
mod holdem;
mod participant;
mod player;
mod round;
mod seat;
mod seats;
mod showdown;
mod stakes;
mod status;
mod view;

pub use action::*;
pub use error::*;
pub use event::*;
pub use holdem::*;
pub use participant::*;
pub use player::*;
pub use round::*;
pub use seat::*;
pub use seats::*;
pub use showdown::*;
pub use stakes::*;
pub use status::*;
pub use view::*;
