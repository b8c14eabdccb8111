use rtrp_cards::DeckError;

/// Admission and domain failures raised by the engine.
/// Display strings are the error codes clients see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldemError {
    TableFull,
    PlayerAlreadySeated,
    PositionTaken,
    InvalidPosition,
    PlayerNotFound,
    GameNotReady,
    NotYourTurn,
    InvalidAction(String),
    Deck(DeckError),
}

impl std::fmt::Display for HoldemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TableFull => write!(f, "game_full"),
            Self::PlayerAlreadySeated => write!(f, "game_player_already_in"),
            Self::PositionTaken => write!(f, "game_position_taken"),
            Self::InvalidPosition => write!(f, "game_invalid_position"),
            Self::PlayerNotFound => write!(f, "game_player_not_found"),
            Self::GameNotReady => write!(f, "game_not_ready"),
            Self::NotYourTurn => write!(f, "not_your_turn"),
            Self::InvalidAction(reason) => write!(f, "invalid_action: {}", reason),
            Self::Deck(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for HoldemError {}

impl From<DeckError> for HoldemError {
    fn from(e: DeckError) -> Self {
        Self::Deck(e)
    }
}
