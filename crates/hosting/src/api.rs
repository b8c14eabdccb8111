use rtrp_core::*;
use rtrp_holdem::Player;
use serde::Deserialize;

/// Resolves a bearer token to the player profile behind it.
#[async_trait::async_trait]
pub trait Identity: Send + Sync {
    async fn player(&self, token: &str) -> anyhow::Result<Player>;
}

/// `{success, status, data, message}` envelope of the REST service.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status: u16,
    pub data: Option<T>,
    #[serde(default)]
    pub message: String,
}

/// `GET /auth/user` payload.
#[derive(Debug, Deserialize)]
pub struct UserInfo {
    pub id: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub identifier: String,
    pub player: Player,
}

impl ApiResponse<UserInfo> {
    pub fn into_player(self) -> anyhow::Result<Player> {
        match (self.success, self.data) {
            (true, Some(user)) if !user.player.id.is_empty() => Ok(user.player),
            _ => anyhow::bail!("identity lookup failed ({}): {}", self.status, self.message),
        }
    }
}

/// HTTP client for the REST identity service.
#[derive(Debug, Clone)]
pub struct Api {
    client: reqwest::Client,
    base: String,
}

impl Api {
    pub fn new(base: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl Identity for Api {
    async fn player(&self, token: &str) -> anyhow::Result<Player> {
        let url = format!("{}/auth/user", self.base);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?
            .json::<ApiResponse<UserInfo>>()
            .await?;
        response.into_player()
    }
}
