use super::card::Card;
use super::rank::Rank;
use super::suit::Suit;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// Failure to draw from an exhausted deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckError {
    EmptyDeck,
}

impl std::fmt::Display for DeckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDeck => write!(f, "empty deck"),
        }
    }
}

impl std::error::Error for DeckError {}

/// Ordered stack of cards. Draws pop from the end.
#[derive(Debug, Clone)]
pub struct Deck(Vec<Card>);

impl Deck {
    /// A freshly shuffled 52-card deck.
    pub fn new() -> Self {
        let mut deck = Self::ordered();
        deck.shuffle(&mut SmallRng::seed_from_u64(Self::seed()));
        deck
    }
    /// All 52 cards, hearts then diamonds then clubs then spades, each Two to Ace.
    pub fn ordered() -> Self {
        Self(
            [Suit::Heart, Suit::Diamond, Suit::Club, Suit::Spade]
                .into_iter()
                .flat_map(|suit| Rank::all().map(move |rank| Card::new(rank, suit)))
                .collect(),
        )
    }
    /// A deck that deals `cards` in the given order.
    pub fn stacked(mut cards: Vec<Card>) -> Self {
        cards.reverse();
        Self(cards)
    }
    /// Fisher-Yates over the remaining cards.
    pub fn shuffle<R: rand::Rng>(&mut self, rng: &mut R) {
        self.0.shuffle(rng);
    }
    pub fn draw(&mut self) -> Result<Card, DeckError> {
        self.0.pop().ok_or(DeckError::EmptyDeck)
    }
    pub fn size(&self) -> usize {
        self.0.len()
    }
    fn seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Hand;

    #[test]
    fn fifty_two_distinct() {
        let mut deck = Deck::new();
        let cards = (0..52).map(|_| deck.draw().unwrap()).collect::<Vec<_>>();
        assert_eq!(Hand::from(cards).size(), 52);
    }

    #[test]
    fn exhausts() {
        let mut deck = Deck::ordered();
        for _ in 0..52 {
            deck.draw().unwrap();
        }
        assert_eq!(deck.draw(), Err(DeckError::EmptyDeck));
    }

    #[test]
    fn ordered_draws_from_the_end() {
        let mut deck = Deck::ordered();
        assert_eq!(deck.draw().unwrap(), Card::try_from("As").unwrap());
        assert_eq!(deck.draw().unwrap(), Card::try_from("Ks").unwrap());
    }

    #[test]
    fn stacked_deals_in_order() {
        let a = Card::try_from("2h").unwrap();
        let b = Card::try_from("3d").unwrap();
        let mut deck = Deck::stacked(vec![a, b]);
        assert_eq!(deck.draw().unwrap(), a);
        assert_eq!(deck.draw().unwrap(), b);
        assert_eq!(deck.size(), 0);
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let mut a = Deck::ordered();
        let mut b = Deck::ordered();
        a.shuffle(&mut SmallRng::seed_from_u64(7));
        b.shuffle(&mut SmallRng::seed_from_u64(7));
        assert_eq!(a.0, b.0);
    }
}
