use super::*;
use rtrp_cards::Card;
use rtrp_core::*;
use serde::Deserialize;
use serde::Serialize;

/// Public per-seat data in a table snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub status: Status,
    pub position: Position,
    pub name: String,
    pub balance: Chips,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hand: Vec<Card>,
    pub is_folded: bool,
    pub is_all_in: bool,
    pub is_dealer: bool,
    pub is_small_blind: bool,
    pub is_big_blind: bool,
    pub is_current_turn: bool,
    pub current_bet_in_round: Chips,
    /// hole cards revealed at a contested showdown
    #[serde(skip)]
    pub shown: bool,
}

/// Freshly materialized snapshot of a table.
///
/// Built with every hand present; [`GameView::masked`] strips the hole
/// cards a given viewer may not see before anything leaves the process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub players: Vec<PlayerView>,
    pub community_cards: Vec<Card>,
    pub pot: Chips,
    pub current_bet: Chips,
    pub current_round: Round,
    pub small_blind_amount: Chips,
    pub big_blind_amount: Chips,
}

impl GameView {
    /// The view as `viewer` may see it: only their own hole cards,
    /// plus any shown at showdown. `None` sees no private cards.
    pub fn masked(&self, viewer: Option<&PlayerId>) -> Self {
        let mut view = self.clone();
        view.players
            .iter_mut()
            .filter(|p| !p.shown)
            .filter(|p| Some(&p.id) != viewer)
            .for_each(|p| p.hand.clear());
        view
    }
    pub fn player(&self, id: &PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| &p.id == id)
    }
}
