use super::category::Category;
use super::evaluator::Evaluator;
use super::hand::Hand;

/// A hand's showdown strength.
///
/// Ordering compares the category first, then the tiebreaker
/// face values lexicographically. Equal strengths split the pot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Strength {
    category: Category,
    tiebreakers: Vec<u8>,
}

impl Strength {
    pub fn category(&self) -> Category {
        self.category
    }
    /// Face values (2..=14) resolving ties within the category.
    pub fn tiebreakers(&self) -> &[u8] {
        &self.tiebreakers
    }
}

impl From<Hand> for Strength {
    fn from(hand: Hand) -> Self {
        Evaluator::from(hand).strength()
    }
}

impl From<(Category, Vec<u8>)> for Strength {
    fn from((category, tiebreakers): (Category, Vec<u8>)) -> Self {
        Self {
            category,
            tiebreakers,
        }
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:<14}{:?}", self.category, self.tiebreakers)
    }
}
