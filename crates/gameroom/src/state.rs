use rtrp_core::*;
use rtrp_holdem::GameView;
use rtrp_holdem::Phase;
use rtrp_holdem::Player;
use rtrp_holdem::Rules;
use serde::Deserialize;
use serde::Serialize;

/// Static parameters a room is opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomConfig {
    pub id: RoomId,
    pub name: String,
    /// connected players
    pub capacity: usize,
    /// seats at the table
    pub max_game_players: usize,
    pub min_bet: Chips,
    pub game_type: GameType,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            id: RoomId::from(DEFAULT_ROOM_ID),
            name: DEFAULT_ROOM_NAME.to_string(),
            capacity: DEFAULT_ROOM_CAPACITY,
            max_game_players: DEFAULT_GAME_CAPACITY,
            min_bet: DEFAULT_MIN_BET,
            game_type: GameType::Holdem,
        }
    }
}

impl RoomConfig {
    pub fn rules(&self, timeout: u64) -> Rules {
        Rules {
            capacity: self.max_game_players,
            min_bet: self.min_bet,
            timeout,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Active,
    Inactive,
}

/// Full room snapshot sent over the socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomState {
    pub room_id: RoomId,
    pub name: String,
    pub status: RoomStatus,
    pub max_players: usize,
    pub max_game_players: usize,
    pub players: Vec<Player>,
    pub min_bet: Chips,
    pub game_type: GameType,
    pub game_status: Phase,
    pub game_state: GameView,
}

/// Registry listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: String,
    pub status: RoomStatus,
    pub max_room_players: usize,
    pub players_in_room: usize,
    pub game_status: Phase,
    pub game_type: GameType,
    pub min_bet: Chips,
    pub max_game_players: usize,
    pub players_in_game: usize,
}
