use chrono::DateTime;
use chrono::Utc;
use rtrp_core::*;
use serde::Deserialize;
use serde::Serialize;

/// Envelope type tag, inbound and outbound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    RoomInfo,
    RoomJoin,
    RoomJoinOk,
    RoomLeave,
    RoomLeaveOk,
    GameJoin,
    GameJoinOk,
    GameLeave,
    GameLeaveOk,
    GameAction,
    GameHoldemAction,
    Error,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoomInfo => "room_info",
            Self::RoomJoin => "room_join",
            Self::RoomJoinOk => "room_join_ok",
            Self::RoomLeave => "room_leave",
            Self::RoomLeaveOk => "room_leave_ok",
            Self::GameJoin => "game_join",
            Self::GameJoinOk => "game_join_ok",
            Self::GameLeave => "game_leave",
            Self::GameLeaveOk => "game_leave_ok",
            Self::GameAction => "game_action",
            Self::GameHoldemAction => "game_holdem_action",
            Self::Error => "error",
        }
    }
    /// Types a client may send.
    pub fn requests() -> [Self; 6] {
        [
            Self::RoomInfo,
            Self::RoomJoin,
            Self::RoomLeave,
            Self::GameJoin,
            Self::GameLeave,
            Self::GameAction,
        ]
    }
}

impl TryFrom<&str> for Kind {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, String> {
        Self::requests()
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound socket envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    #[serde(rename = "type")]
    pub kind: Kind,
    pub player_id: PlayerId,
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl Response {
    pub fn new(kind: Kind, player_id: PlayerId, data: impl Serialize) -> Self {
        let data = serde_json::to_value(data)
            .inspect_err(|e| log::error!("[protocol] unserializable {} payload: {}", kind, e))
            .unwrap_or_default();
        Self {
            kind,
            player_id,
            data,
            timestamp: Utc::now(),
        }
    }
    pub fn error(player_id: PlayerId, message: impl std::fmt::Display) -> Self {
        Self::new(
            Kind::Error,
            player_id,
            serde_json::json!({ "error": message.to_string() }),
        )
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
