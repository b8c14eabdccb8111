use rtrp_core::*;
use rtrp_holdem::Action;
use rtrp_holdem::GameView;
use rtrp_holdem::HoldemError;
use rtrp_holdem::Phase;
use rtrp_holdem::Player;
use tokio::sync::oneshot;

pub type Reply<T> = oneshot::Sender<T>;

/// Requests into a table's dealer task.
#[derive(Debug)]
pub enum Command {
    Seat {
        player: Player,
        position: Position,
        reply: Reply<Result<(), HoldemError>>,
    },
    /// answered with the stack the player leaves the table with
    Leave {
        player: PlayerId,
        reply: Reply<Result<Chips, HoldemError>>,
    },
    Act {
        action: Action,
        reply: Reply<Result<(), HoldemError>>,
    },
    Snapshot {
        reply: Reply<Snapshot>,
    },
    /// stop dealing new hands; answered once no hand is in flight
    Drain {
        done: Reply<()>,
    },
    Reset {
        done: Reply<()>,
    },
    /// stop the task; answered once every chip batch is published
    Close {
        done: Reply<()>,
    },
}

/// Engine state as read by the room.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub phase: Phase,
    pub view: GameView,
    pub seated: usize,
}
