use serde::Deserialize;
use serde::Serialize;

/// Hand category, weakest to strongest.
/// Serialized as its ordinal.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl From<Category> for u8 {
    fn from(c: Category) -> u8 {
        c as u8
    }
}
impl TryFrom<u8> for Category {
    type Error = String;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Self::HighCard),
            1 => Ok(Self::OnePair),
            2 => Ok(Self::TwoPair),
            3 => Ok(Self::ThreeOfAKind),
            4 => Ok(Self::Straight),
            5 => Ok(Self::Flush),
            6 => Ok(Self::FullHouse),
            7 => Ok(Self::FourOfAKind),
            8 => Ok(Self::StraightFlush),
            9 => Ok(Self::RoyalFlush),
            n => Err(format!("invalid category {}", n)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::HighCard => write!(f, "HighCard"),
            Self::OnePair => write!(f, "OnePair"),
            Self::TwoPair => write!(f, "TwoPair"),
            Self::ThreeOfAKind => write!(f, "ThreeOfAKind"),
            Self::Straight => write!(f, "Straight"),
            Self::Flush => write!(f, "Flush"),
            Self::FullHouse => write!(f, "FullHouse"),
            Self::FourOfAKind => write!(f, "FourOfAKind"),
            Self::StraightFlush => write!(f, "StraightFlush"),
            Self::RoyalFlush => write!(f, "RoyalFlush"),
        }
    }
}
