use super::*;
use rtrp_core::*;

/// A player seated at the table across hands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    player: Player,
    position: Position,
    balance: Chips,
    status: Status,
}

impl Participant {
    pub fn new(position: Position, player: Player) -> Self {
        Self {
            balance: player.chips,
            status: Status::Waiting,
            player,
            position,
        }
    }
    pub fn player(&self) -> &Player {
        &self.player
    }
    pub fn id(&self) -> &PlayerId {
        &self.player.id
    }
    pub fn position(&self) -> Position {
        self.position
    }
    pub fn balance(&self) -> Chips {
        self.balance
    }
    pub fn status(&self) -> Status {
        self.status
    }
    /// eligible for the next deal
    pub fn ready(&self) -> bool {
        matches!(self.status, Status::Waiting | Status::Active | Status::Folded)
    }
    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }
    /// Moves up to `chips` from the balance, returning what moved.
    pub fn withdraw(&mut self, chips: Chips) -> Chips {
        let moved = chips.min(self.balance).max(0);
        self.balance -= moved;
        moved
    }
    pub fn deposit(&mut self, chips: Chips) {
        self.balance += chips;
    }
}
