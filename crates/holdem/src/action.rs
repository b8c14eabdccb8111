use rtrp_core::*;
use serde::Deserialize;
use serde::Serialize;

/// Betting decision. Serialized as its wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Move {
    Fold = 0,
    Call = 1,
    Raise = 2,
    Bet = 3,
    Check = 4,
    AllIn = 5,
}

impl From<Move> for u8 {
    fn from(m: Move) -> u8 {
        m as u8
    }
}
impl TryFrom<u8> for Move {
    type Error = String;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Self::Fold),
            1 => Ok(Self::Call),
            2 => Ok(Self::Raise),
            3 => Ok(Self::Bet),
            4 => Ok(Self::Check),
            5 => Ok(Self::AllIn),
            n => Err(format!("invalid action code {}", n)),
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Fold => write!(f, "fold"),
            Self::Call => write!(f, "call"),
            Self::Raise => write!(f, "raise"),
            Self::Bet => write!(f, "bet"),
            Self::Check => write!(f, "check"),
            Self::AllIn => write!(f, "all-in"),
        }
    }
}

/// A player's action request as carried in `game_action.data`.
/// `amount` is the raise-to total for Raise and the bet size for Bet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub player_id: PlayerId,
    pub action: Move,
    #[serde(default)]
    pub amount: Chips,
}

impl Action {
    pub fn new(player_id: PlayerId, action: Move, amount: Chips) -> Self {
        Self {
            player_id,
            action,
            amount,
        }
    }
}
