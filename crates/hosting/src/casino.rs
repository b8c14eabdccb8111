use rtrp_chips::ChipSink;
use rtrp_core::*;
use rtrp_gameroom::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Process-wide directory of live rooms.
pub struct Casino {
    timers: TimerConfig,
    sink: Arc<dyn ChipSink>,
    rooms: RwLock<HashMap<RoomId, Arc<Room>>>,
}

impl Casino {
    pub fn new(timers: TimerConfig, sink: Arc<dyn ChipSink>) -> Self {
        Self {
            timers,
            sink,
            rooms: RwLock::new(HashMap::new()),
        }
    }
    /// A casino with the default room already open.
    pub async fn with_default_room(timers: TimerConfig, sink: Arc<dyn ChipSink>) -> anyhow::Result<Self> {
        let casino = Self::new(timers, sink);
        casino.create(RoomConfig::default()).await?;
        Ok(casino)
    }
}

impl Casino {
    pub async fn create(&self, config: RoomConfig) -> anyhow::Result<Arc<Room>> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&config.id) {
            anyhow::bail!("room {} already exists", config.id);
        }
        let id = config.id.clone();
        let room = Arc::new(Room::open(config, self.timers, self.sink.clone()));
        rooms.insert(id.clone(), room.clone());
        log::info!("[casino] created room {}", id);
        Ok(room)
    }
    pub async fn get(&self, id: &RoomId) -> Option<Arc<Room>> {
        self.rooms.read().await.get(id).cloned()
    }
    pub async fn rooms(&self) -> Vec<Arc<Room>> {
        let mut rooms = self.rooms.read().await.values().cloned().collect::<Vec<_>>();
        rooms.sort_by(|a, b| a.id().cmp(b.id()));
        rooms
    }
    /// Summaries sorted by room id, optionally of one game type.
    pub async fn list(&self, game_type: Option<GameType>) -> Vec<RoomSummary> {
        let mut summaries = Vec::new();
        for room in self.rooms().await {
            if game_type.is_some_and(|g| g != room.config().game_type) {
                continue;
            }
            match room.summary().await {
                Ok(summary) => summaries.push(summary),
                Err(e) => log::warn!("[casino] room {} unavailable: {}", room.id(), e),
            }
        }
        summaries
    }
    pub async fn reset_all(&self) {
        log::info!("[casino] resetting every room");
        for room in self.rooms().await {
            room.reset().await;
        }
    }
    /// Lets in-flight hands finish for up to `grace`, resets every room,
    /// then stops the dealers once their chip batches are published.
    pub async fn shutdown(&self, grace: Duration) {
        let rooms = self.rooms().await;
        log::info!("[casino] draining {} rooms", rooms.len());
        let drains = futures::future::join_all(rooms.iter().map(|r| r.drain()));
        if tokio::time::timeout(grace, drains).await.is_err() {
            log::warn!("[casino] grace period elapsed with hands in flight");
        }
        self.reset_all().await;
        futures::future::join_all(rooms.iter().map(|r| r.close())).await;
    }
}
