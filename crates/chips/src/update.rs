use chrono::DateTime;
use chrono::Utc;
use rtrp_core::*;
use serde::Deserialize;
use serde::Serialize;

/// One batch of balance changes for a single room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChipUpdate {
    pub message_id: ID<ChipUpdate>,
    pub timestamp: DateTime<Utc>,
    pub game_type: GameType,
    pub room_id: RoomId,
    pub player_changes: Vec<ChipChange>,
}

impl ChipUpdate {
    pub fn new(game_type: GameType, room_id: RoomId, player_changes: Vec<ChipChange>) -> Self {
        Self {
            message_id: ID::default(),
            timestamp: Utc::now(),
            game_type,
            room_id,
            player_changes,
        }
    }
    /// `poker.game.{game_type}.chip_update.{room_id}`
    pub fn routing_key(&self) -> String {
        format!("poker.game.{}.chip_update.{}", self.game_type, self.room_id)
    }
    /// Net change across the batch.
    pub fn net(&self) -> Chips {
        self.player_changes.iter().map(|c| c.change).sum()
    }
}
