//! PostgreSQL plumbing for the chip ledger.
//!
//! - [`db()`] opens a connection and drives it on a background task
//! - [`Schema`] describes a table as static SQL
//!
//! The players table is owned by the REST service; this side only
//! updates balances and records which chip messages it has applied.
mod traits;

pub use traits::*;

use tokio_postgres::Client;

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Opens a connection to `url`.
///
/// The connection future is spawned onto the runtime; the returned
/// client is owned so callers can open transactions on it.
pub async fn db(url: &str) -> Result<Client, PgErr> {
    log::info!("[database] connecting");
    let tls = tokio_postgres::tls::NoTls;
    let (client, connection) = tokio_postgres::connect(url, tls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("[database] connection closed: {}", e);
        }
    });
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await?;
    Ok(client)
}

/// Player accounts and their bank-of-record balances.
#[rustfmt::skip]
pub const PLAYERS:   &str = "players";
/// Chip messages already applied, keyed by message id.
#[rustfmt::skip]
pub const PROCESSED: &str = "processed_messages";
