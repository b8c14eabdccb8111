use rtrp_core::PlayerId;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub player_id: PlayerId,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: String, player_id: PlayerId, ttl: Duration) -> Self {
        let iat = now();
        Self {
            user_id,
            player_id,
            iat,
            exp: iat + ttl.as_secs() as i64,
        }
    }
    pub fn expired(&self) -> bool {
        self.exp < now()
    }
    pub fn player(&self) -> &PlayerId {
        &self.player_id
    }
    pub fn user(&self) -> &str {
        &self.user_id
    }
}
