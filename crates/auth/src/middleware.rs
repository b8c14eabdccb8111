use super::*;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use actix_web::web;
use std::future::Ready;
use std::future::ready;

/// Extractor for authenticated socket upgrades.
/// Reads the token from `Authorization: Bearer` or the `token` query parameter.
pub struct Auth(pub Claims);

impl Auth {
    pub fn claims(&self) -> &Claims {
        &self.0
    }
    /// Raw bearer token from the header or query string.
    pub fn token(req: &HttpRequest) -> Option<String> {
        let header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.to_owned());
        header.or_else(|| {
            web::Query::<std::collections::HashMap<String, String>>::from_query(req.query_string())
                .ok()
                .and_then(|q| q.get("token").cloned())
        })
    }
    fn verify(req: &HttpRequest) -> Result<Self, actix_web::Error> {
        let token = Self::token(req)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| actix_web::error::ErrorUnauthorized("missing token"))?;
        let crypto = req
            .app_data::<web::Data<Crypto>>()
            .ok_or_else(|| actix_web::error::ErrorInternalServerError("token service not configured"))?;
        let claims = crypto
            .decode(&token)
            .map_err(|_| actix_web::error::ErrorUnauthorized("invalid token"))?;
        if claims.expired() {
            return Err(actix_web::error::ErrorUnauthorized("token expired"));
        }
        if claims.player().is_empty() {
            return Err(actix_web::error::ErrorUnauthorized("invalid token"));
        }
        Ok(Auth(claims))
    }
}

impl FromRequest for Auth {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::verify(req))
    }
}

/// Shared secret guarding the admin surface.
#[derive(Debug, Clone)]
pub struct AdminToken(pub String);

/// Extractor for admin requests: `Authorization: Bearer <ADMIN_TOKEN>`.
pub struct Admin;

impl FromRequest for Admin {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let expected = req.app_data::<web::Data<AdminToken>>().map(|t| t.0.clone());
        let given = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "));
        ready(match (expected, given) {
            (None, _) => Err(actix_web::error::ErrorInternalServerError("admin token not configured")),
            (Some(expected), Some(given)) if !expected.is_empty() && expected == given => Ok(Admin),
            _ => Err(actix_web::error::ErrorUnauthorized("admin only")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rtrp_core::PlayerId;
    use std::time::Duration;

    fn token(crypto: &Crypto) -> String {
        let claims = Claims::new("u".to_string(), PlayerId::from("p"), Duration::from_secs(60));
        crypto.encode(&claims).unwrap()
    }

    #[actix_web::test]
    async fn bearer_header() {
        let crypto = Crypto::new(b"s");
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {}", token(&crypto))))
            .app_data(web::Data::new(crypto))
            .to_http_request();
        let auth = Auth::extract(&req).await.unwrap();
        assert_eq!(auth.claims().player(), &PlayerId::from("p"));
    }

    #[actix_web::test]
    async fn query_token() {
        let crypto = Crypto::new(b"s");
        let req = TestRequest::with_uri(&format!("/ws?token={}", token(&crypto)))
            .app_data(web::Data::new(crypto))
            .to_http_request();
        assert!(Auth::extract(&req).await.is_ok());
    }

    #[actix_web::test]
    async fn missing_token() {
        let req = TestRequest::default()
            .app_data(web::Data::new(Crypto::new(b"s")))
            .to_http_request();
        assert!(Auth::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn admin_secret() {
        let secret = web::Data::new(AdminToken("hunter2".to_string()));
        let good = TestRequest::default()
            .insert_header(("Authorization", "Bearer hunter2"))
            .app_data(secret.clone())
            .to_http_request();
        let bad = TestRequest::default()
            .insert_header(("Authorization", "Bearer guess"))
            .app_data(secret)
            .to_http_request();
        assert!(Admin::extract(&good).await.is_ok());
        assert!(Admin::extract(&bad).await.is_err());
    }
}
