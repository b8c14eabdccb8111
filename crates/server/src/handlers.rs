use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use rtrp_auth::Admin;
use rtrp_auth::Auth;
use rtrp_core::*;
use rtrp_hosting::*;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct RoomFilter {
    pub game_type: Option<GameType>,
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

pub async fn rooms(casino: web::Data<Arc<Casino>>, filter: web::Query<RoomFilter>) -> impl Responder {
    HttpResponse::Ok().json(casino.list(filter.game_type).await)
}

pub async fn reset(_: Admin, casino: web::Data<Arc<Casino>>) -> impl Responder {
    casino.reset_all().await;
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Upgrades an authenticated request after resolving the player profile.
pub async fn socket(
    auth: Auth,
    identity: web::Data<Arc<dyn Identity>>,
    dispatcher: web::Data<Dispatcher>,
    body: web::Payload,
    req: HttpRequest,
) -> HttpResponse {
    let token = Auth::token(&req).unwrap_or_default();
    let player = match identity.player(&token).await {
        Ok(player) if &player.id == auth.claims().player() => player,
        Ok(player) => {
            log::warn!(
                "[gateway] token for {} resolved to {}",
                auth.claims().player(),
                player.id
            );
            return HttpResponse::Unauthorized().body("identity mismatch");
        }
        Err(e) => {
            log::warn!("[gateway] identity lookup failed: {}", e);
            return HttpResponse::Unauthorized().body("unable to verify player");
        }
    };
    match actix_ws::handle(&req, body) {
        Ok((response, session, streams)) => {
            Gateway::bridge(dispatcher.get_ref().clone(), player, session, streams);
            response
        }
        Err(e) => HttpResponse::BadRequest().body(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::App;
    use actix_web::test;
    use rtrp_auth::AdminToken;
    use rtrp_chips::Ledger;
    use rtrp_gameroom::TimerConfig;

    async fn casino() -> web::Data<Arc<Casino>> {
        let casino = Casino::with_default_room(TimerConfig::default(), Arc::new(Ledger::default()))
            .await
            .unwrap();
        web::Data::new(Arc::new(casino))
    }

    #[actix_web::test]
    async fn health_is_ok() {
        let app = test::init_service(App::new().route("/health", web::get().to(health))).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, web::Bytes::from_static(b"ok"));
    }

    #[actix_web::test]
    async fn rooms_are_listed() {
        let app = test::init_service(
            App::new()
                .app_data(casino().await)
                .route("/rooms", web::get().to(rooms)),
        )
        .await;
        let req = test::TestRequest::get().uri("/rooms?game_type=1").to_request();
        let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json[0]["id"], "room_1");
        assert_eq!(json[0]["max_room_players"], 100);
    }

    #[actix_web::test]
    async fn reset_needs_admin_token() {
        let app = test::init_service(
            App::new()
                .app_data(casino().await)
                .app_data(web::Data::new(AdminToken("secret".into())))
                .route("/admin/reset", web::post().to(reset)),
        )
        .await;
        let req = test::TestRequest::post().uri("/admin/reset").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);
        let req = test::TestRequest::post()
            .uri("/admin/reset")
            .insert_header(("Authorization", "Bearer secret"))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
    }
}
