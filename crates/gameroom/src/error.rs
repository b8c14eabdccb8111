use rtrp_holdem::HoldemError;

/// Room admission and delegation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    RoomFull,
    NotMember,
    /// the dealer task is gone
    Closed,
    Holdem(HoldemError),
}

impl std::fmt::Display for RoomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RoomFull => write!(f, "room is full"),
            Self::NotMember => write!(f, "player not in room"),
            Self::Closed => write!(f, "room closed"),
            Self::Holdem(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RoomError {}

impl From<HoldemError> for RoomError {
    fn from(e: HoldemError) -> Self {
        Self::Holdem(e)
    }
}
