//! Realtime poker gateway.
//!
//! Configuration comes from flags or the environment; see `--help`.
use clap::Parser;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    rtrp_core::log()?;
    let config = rtrp_server::Config::parse();
    rtrp_server::run(config).await
}
