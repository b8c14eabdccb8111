use super::*;
use rtrp_cards::Card;
use rtrp_cards::Category;
use rtrp_core::*;
use serde::Serialize;

/// Hole cards and blind layout sent privately to each dealt player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundStart {
    pub small_blind: Position,
    pub big_blind: Position,
    pub pot: Chips,
    pub current_bet: Chips,
    pub dealer_seat: Position,
    pub small_blind_amount: Chips,
    pub big_blind_amount: Chips,
    pub hand: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundProgress {
    pub round: Round,
    pub cards: Vec<Card>,
    pub pot: Chips,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerTurn {
    pub player_id: PlayerId,
    pub timeout: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerAction {
    pub player_id: PlayerId,
    pub action: Move,
    /// chips committed by this action
    pub amount: Chips,
}

/// One winner's line in a contested showdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandResult {
    pub player_id: PlayerId,
    pub rank: Category,
    pub high_cards: Vec<u8>,
    pub amount: Chips,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowdownResult {
    pub winners: Vec<HandResult>,
    pub pot: Chips,
    pub game_state: GameView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Winner {
    pub winner_id: PlayerId,
    pub amount: Chips,
    pub reason: String,
}

/// Game events emitted by the engine.
/// Serializes as the bare payload; [`Event::kind`] carries the type code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Event {
    GameStart(GameView),
    GameEnd(GameView),
    RoundStart(RoundStart),
    RoundProgress(RoundProgress),
    RoundEnd(GameView),
    PlayerTurn(PlayerTurn),
    PlayerAction(PlayerAction),
    Showdown(ShowdownResult),
    Winner(Winner),
}

impl Event {
    /// Wire type code, 0 through 8.
    pub fn kind(&self) -> u8 {
        match self {
            Self::GameStart(_) => 0,
            Self::GameEnd(_) => 1,
            Self::RoundStart(_) => 2,
            Self::RoundProgress(_) => 3,
            Self::RoundEnd(_) => 4,
            Self::PlayerTurn(_) => 5,
            Self::PlayerAction(_) => 6,
            Self::Showdown(_) => 7,
            Self::Winner(_) => 8,
        }
    }
    /// Strips hole cards `viewer` may not see from any embedded view.
    pub fn masked(&self, viewer: Option<&PlayerId>) -> Self {
        match self {
            Self::GameStart(v) => Self::GameStart(v.masked(viewer)),
            Self::GameEnd(v) => Self::GameEnd(v.masked(viewer)),
            Self::RoundEnd(v) => Self::RoundEnd(v.masked(viewer)),
            Self::Showdown(s) => Self::Showdown(ShowdownResult {
                winners: s.winners.clone(),
                pot: s.pot,
                game_state: s.game_state.masked(viewer),
            }),
            other => other.clone(),
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GameStart(_) => write!(f, "game start"),
            Self::GameEnd(_) => write!(f, "game end"),
            Self::RoundStart(r) => write!(f, "round start, dealer {}", r.dealer_seat),
            Self::RoundProgress(r) => write!(f, "{} pot {}", r.round, r.pot),
            Self::RoundEnd(v) => write!(f, "{} closed pot {}", v.current_round, v.pot),
            Self::PlayerTurn(t) => write!(f, "{} to act", t.player_id),
            Self::PlayerAction(a) => write!(f, "{} {} {}", a.player_id, a.action, a.amount),
            Self::Showdown(s) => write!(f, "showdown {} winners", s.winners.len()),
            Self::Winner(w) => write!(f, "{} wins {} {}", w.winner_id, w.amount, w.reason),
        }
    }
}

/// Everything the engine asks its driver to deliver, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// to every connected client, with the view at emission time
    Broadcast { event: Event, view: GameView },
    /// to one player only
    Unicast { to: PlayerId, event: Event, view: GameView },
    /// an action was refused and coerced
    Reject { to: PlayerId, error: HoldemError },
    /// a settlement step for the chip bus
    Chips(Vec<ChipChange>),
    /// a seat dropped below the minimum bet and left the table
    Reaped { player: PlayerId, balance: Chips },
}
