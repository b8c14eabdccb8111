use super::*;
use rtrp_cards::Card;
use rtrp_core::*;

/// A player's place in the current hand.
///
/// Holds the private hole cards and the per-hand betting ledger.
/// `stake` is the round bet; `None` means no entry yet this round.
/// `spent` accumulates across rounds and feeds side-pot settlement.
/// A seat is folded exactly when its hole cards are cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    position: Position,
    player: PlayerId,
    hole: Vec<Card>,
    stake: Option<Chips>,
    spent: Chips,
    acted: Option<Move>,
}

impl Seat {
    pub fn new(position: Position, player: PlayerId) -> Self {
        Self {
            position,
            player,
            hole: Vec::with_capacity(HOLE_CARDS),
            stake: None,
            spent: 0,
            acted: None,
        }
    }
    pub fn position(&self) -> Position {
        self.position
    }
    pub fn player(&self) -> &PlayerId {
        &self.player
    }
    pub fn hole(&self) -> &[Card] {
        &self.hole
    }
    pub fn folded(&self) -> bool {
        self.hole.is_empty()
    }
    /// Chips committed this round.
    pub fn stake(&self) -> Chips {
        self.stake.unwrap_or_default()
    }
    pub fn staked(&self) -> bool {
        self.stake.is_some()
    }
    /// Chips committed this hand.
    pub fn spent(&self) -> Chips {
        self.spent
    }
    pub fn acted(&self) -> Option<Move> {
        self.acted
    }
    pub fn deal(&mut self, card: Card) {
        self.hole.push(card);
    }
    pub fn fold(&mut self) {
        self.hole.clear();
        self.acted = Some(Move::Fold);
    }
    pub fn commit(&mut self, chips: Chips) {
        self.stake = Some(self.stake() + chips);
        self.spent += chips;
    }
    pub fn mark(&mut self, action: Move) {
        self.acted = Some(action);
    }
    pub fn reset_round(&mut self) {
        self.stake = None;
        self.acted = None;
    }
}
