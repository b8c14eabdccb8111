//! Gateway server.
//!
//! Serves the authenticated WebSocket at `/ws`, the room listing, the
//! admin reset, and a health check. On SIGINT or SIGTERM it stops
//! accepting, drains every table, then resets them.
mod config;
pub mod handlers;

pub use config::*;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use actix_web::web;
use rtrp_chips::ChipSink;
use rtrp_chips::Publisher;
use rtrp_hosting::*;
use std::sync::Arc;

#[rustfmt::skip]
pub async fn run(config: Config) -> anyhow::Result<()> {
    let publisher = Arc::new(Publisher::connect(&config.mq_url, &config.service_name).await?);
    let sink: Arc<dyn ChipSink> = publisher.clone();
    let casino = Arc::new(Casino::with_default_room(config.timers(), sink).await?);
    let identity: Arc<dyn Identity> = Arc::new(Api::new(&config.api_url));
    let crypto = web::Data::new(rtrp_auth::Crypto::new(config.jwt_secret.as_bytes()));
    let admin = web::Data::new(rtrp_auth::AdminToken(config.admin_token.clone()));
    let dispatcher = web::Data::new(Dispatcher::new(casino.clone()));
    let identity = web::Data::new(identity);
    let registry = web::Data::new(casino.clone());
    log::info!("[server] {} listening on port {}", config.service_name, config.port);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(crypto.clone())
            .app_data(admin.clone())
            .app_data(dispatcher.clone())
            .app_data(identity.clone())
            .app_data(registry.clone())
            .route("/health", web::get().to(handlers::health))
            .route("/ws", web::get().to(handlers::socket))
            .route("/rooms", web::get().to(handlers::rooms))
            .route("/admin/reset", web::post().to(handlers::reset))
    })
    .disable_signals()
    .bind(("0.0.0.0", config.port))?
    .run();
    let handle = server.handle();
    let mut running = actix_web::rt::spawn(server);
    tokio::select! {
        served = &mut running => {
            casino.shutdown(std::time::Duration::ZERO).await;
            served??
        }
        _ = signal() => {
            log::info!("[server] shutting down");
            handle.pause().await;
            casino.shutdown(config.grace()).await;
            handle.stop(true).await;
            let _ = running.await;
        }
    }
    // every room has flushed its relay by now
    publisher.close().await;
    log::info!("[server] stopped");
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix.
async fn signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::SignalKind;
        match tokio::signal::unix::signal(SignalKind::terminate()) {
            Ok(mut term) => tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            },
            Err(e) => {
                log::warn!("[server] no SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
