use rtrp_core::BOARD_CARDS;
use serde::Deserialize;
use serde::Serialize;

/// Betting round. Serialized as its ordinal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Round {
    #[default]
    PreFlop = 0,
    Flop = 1,
    Turn = 2,
    River = 3,
    Showdown = 4,
}

impl Round {
    pub fn next(&self) -> Self {
        match self {
            Self::PreFlop => Self::Flop,
            Self::Flop => Self::Turn,
            Self::Turn => Self::River,
            Self::River | Self::Showdown => Self::Showdown,
        }
    }
    /// community cards visible during this round
    pub fn revealed(&self) -> usize {
        match self {
            Self::PreFlop => 0,
            Self::Flop => 3,
            Self::Turn => 4,
            Self::River | Self::Showdown => BOARD_CARDS,
        }
    }
}

impl From<Round> for u8 {
    fn from(r: Round) -> u8 {
        r as u8
    }
}
impl TryFrom<u8> for Round {
    type Error = String;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Self::PreFlop),
            1 => Ok(Self::Flop),
            2 => Ok(Self::Turn),
            3 => Ok(Self::River),
            4 => Ok(Self::Showdown),
            n => Err(format!("invalid round {}", n)),
        }
    }
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::PreFlop => write!(f, "preflop"),
            Self::Flop => write!(f, "flop"),
            Self::Turn => write!(f, "turn"),
            Self::River => write!(f, "river"),
            Self::Showdown => write!(f, "showdown"),
        }
    }
}
