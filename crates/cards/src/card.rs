use super::rank::Rank;
use super::suit::Suit;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// A playing card.
///
/// Serialized for clients as `{"suit": "hearts", "value": 14, "hidden": false}`.
/// Hiding is a presentation concern; views omit masked cards entirely,
/// so every serialized card is face up.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Face", try_from = "Face")]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
    pub fn rank(&self) -> Rank {
        self.rank
    }
    pub fn suit(&self) -> Suit {
        self.suit
    }
}

/// u8 isomorphism
/// each card is mapped to its location in a sorted deck 0-51
/// Ts
/// 35
impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        u8::from(c.suit) + u8::from(c.rank) * 4
    }
}
impl From<u8> for Card {
    fn from(n: u8) -> Self {
        Self {
            rank: Rank::from(n / 4),
            suit: Suit::from(n % 4),
        }
    }
}

/// u64 isomorphism
/// each card is just one bit turned on
impl From<Card> for u64 {
    fn from(c: Card) -> u64 {
        1 << u8::from(c)
    }
}

/// str isomorphism, e.g. "As" or "Td"
impl TryFrom<&str> for Card {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(s), None) => Ok(Self {
                rank: Rank::try_from(r)?,
                suit: Suit::try_from(s.to_string().as_str())?,
            }),
            _ => Err(anyhow::anyhow!("invalid card: {}", s)),
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Client-facing card shape.
#[derive(Serialize, Deserialize)]
struct Face {
    suit: String,
    value: i64,
    #[serde(default)]
    hidden: bool,
}

impl From<Card> for Face {
    fn from(card: Card) -> Self {
        Self {
            suit: card.suit.name().to_string(),
            value: card.rank.value() as i64,
            hidden: false,
        }
    }
}
impl TryFrom<Face> for Card {
    type Error = anyhow::Error;
    fn try_from(face: Face) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            rank: Rank::try_from(face.value)?,
            suit: Suit::try_from(face.suit.as_str())?,
        })
    }
}
