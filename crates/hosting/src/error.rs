use rtrp_gameroom::RoomError;
use rtrp_holdem::HoldemError;

/// Failures answering one inbound socket frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    Malformed,
    UnknownType(String),
    RoomNotFound,
    NotStarted,
    Room(RoomError),
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed => write!(f, "invalid message format"),
            Self::UnknownType(t) => write!(f, "unknown message type: {}", t),
            Self::RoomNotFound => write!(f, "Room not found"),
            Self::NotStarted => write!(f, "game not started"),
            Self::Room(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DispatchError {}

impl From<RoomError> for DispatchError {
    fn from(e: RoomError) -> Self {
        match e {
            RoomError::Holdem(HoldemError::GameNotReady) => Self::NotStarted,
            e => Self::Room(e),
        }
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(_: serde_json::Error) -> Self {
        Self::Malformed
    }
}
