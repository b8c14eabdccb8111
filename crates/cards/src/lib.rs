//! Cards, decks, and seven-card hand evaluation.
//!
//! ## Core Types
//!
//! - [`Card`]: Rank and suit, serialized as `{suit, value, hidden}`
//! - [`Hand`]: Unordered card set packed into a `u64`
//! - [`Deck`]: Shuffled stack with fallible draws
//!
//! ## Evaluation
//!
//! - [`Evaluator`]: Finds the best five-card hand from up to seven cards
//! - [`Strength`]: Category plus ordered tiebreakers; totally ordered
mod card;
mod category;
mod deck;
mod evaluator;
mod hand;
mod rank;
mod strength;
mod suit;

pub use card::*;
pub use category::*;
pub use deck::*;
pub use evaluator::*;
pub use hand::*;
pub use rank::*;
pub use strength::*;
pub use suit::*;
