//! Chip deltas between tables and the bank of record.
//!
//! Tables never write balances. Each closed betting round and each
//! settled pot becomes a [`ChipUpdate`] pushed through a per-table
//! [`Relay`] into a [`ChipSink`], normally the AMQP [`Publisher`].
//! The [`Consumer`] drains the bound queue and hands every message to
//! a [`Bank`], normally the Postgres [`Applier`].
mod applier;
mod backoff;
mod bank;
mod consumer;
mod ledger;
mod publisher;
mod relay;
mod sink;
mod update;

pub use applier::*;
pub use backoff::*;
pub use bank::*;
pub use consumer::*;
pub use ledger::*;
pub use publisher::*;
pub use relay::*;
pub use sink::*;
pub use update::*;
