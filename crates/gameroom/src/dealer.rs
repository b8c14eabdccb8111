use super::*;
use rtrp_cards::Deck;
use rtrp_chips::Relay;
use rtrp_core::*;
use rtrp_holdem::*;
use tokio::sync::mpsc::*;
use tokio::time::Instant;

/// Task that owns a table's engine.
///
/// Every mutation arrives as a [`Command`] on one channel, so the engine
/// is never touched from two tasks. Timer deadlines are served from the
/// same select loop: the deal pause prompts the first seat, the turn
/// timer forces a default action, the hand pause deals again.
pub struct Dealer {
    room: RoomId,
    holdem: Holdem,
    timer: Timer,
    step: Step,
    relay: Relay,
    fanout: UnboundedSender<Output>,
    inbox: UnboundedReceiver<Command>,
    draining: bool,
    drains: Vec<Reply<()>>,
    closing: Option<Reply<()>>,
}

impl Dealer {
    pub fn spawn(
        room: RoomId,
        rules: Rules,
        timers: TimerConfig,
        relay: Relay,
        fanout: UnboundedSender<Output>,
    ) -> UnboundedSender<Command> {
        let (tx, rx) = unbounded_channel();
        let dealer = Self {
            room,
            holdem: Holdem::new(rules),
            timer: Timer::new(timers),
            step: Step::Idle,
            relay,
            fanout,
            inbox: rx,
            draining: false,
            drains: Vec::new(),
            closing: None,
        };
        tokio::spawn(dealer.run());
        tx
    }
    async fn run(mut self) {
        log::debug!("[dealer {}] running", self.room);
        while self.closing.is_none() {
            let deadline = self.timer.deadline();
            tokio::select! {
                biased;
                command = self.inbox.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => self.wake(),
            }
            self.flush();
        }
        self.relay.flush().await;
        log::debug!("[dealer {}] stopped", self.room);
        if let Some(done) = self.closing {
            let _ = done.send(());
        }
    }
}

impl Dealer {
    fn handle(&mut self, command: Command) {
        match command {
            Command::Seat {
                player,
                position,
                reply,
            } => {
                let seated = self.holdem.add_player(position, player);
                if seated.is_ok() {
                    self.kickoff();
                }
                self.flush();
                let _ = reply.send(seated);
            }
            Command::Leave { player, reply } => {
                let balance = self
                    .holdem
                    .participant(&player)
                    .map(Participant::balance)
                    .unwrap_or_default();
                let left = self.holdem.remove_player(&player).map(|step| {
                    if step != self.step {
                        self.follow(step);
                    }
                    balance
                });
                self.flush();
                let _ = reply.send(left);
            }
            Command::Act { action, reply } => {
                let acted = match self.holdem.phase() {
                    Phase::Started => self
                        .holdem
                        .act(&action.player_id, action.action, action.amount)
                        .map(|step| self.follow(step)),
                    _ => Err(HoldemError::GameNotReady),
                };
                self.flush();
                let _ = reply.send(acted);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(Snapshot {
                    phase: self.holdem.phase(),
                    view: self.holdem.view(),
                    seated: self.holdem.participants().count(),
                });
            }
            Command::Drain { done } => {
                log::info!("[dealer {}] draining", self.room);
                self.draining = true;
                match self.step {
                    Step::Idle | Step::Settled => {
                        self.timer.clear();
                        let _ = done.send(());
                    }
                    _ => self.drains.push(done),
                }
            }
            Command::Reset { done } => {
                self.holdem.reset();
                self.timer.clear();
                self.step = Step::Idle;
                self.drains.drain(..).for_each(|d| {
                    let _ = d.send(());
                });
                let _ = done.send(());
            }
            Command::Close { done } => {
                log::info!("[dealer {}] closing", self.room);
                self.timer.clear();
                self.closing = Some(done);
            }
        }
    }
    fn wake(&mut self) {
        let wake = self.timer.wake();
        self.timer.clear();
        match wake {
            Some(Wake::Deal) => {
                let step = self.holdem.prompt();
                self.follow(step);
            }
            Some(Wake::Turn) => {
                log::debug!("[dealer {}] turn timer expired", self.room);
                let step = self.holdem.expire();
                self.follow(step);
            }
            Some(Wake::Pause) => match self.holdem.next_hand(Deck::new()) {
                Ok(step) => self.follow(step),
                Err(e) => log::error!("[dealer {}] could not deal: {}", self.room, e),
            },
            None => {}
        }
    }
    /// Starts a session once a seat change makes one possible.
    fn kickoff(&mut self) {
        if self.draining || self.holdem.phase() != Phase::Waiting || !self.holdem.can_start() {
            return;
        }
        match self.holdem.start(Deck::new()) {
            Ok(step) => self.follow(step),
            Err(e) => log::error!("[dealer {}] could not start: {}", self.room, e),
        }
    }
    /// Arms the timer the engine's next step waits on.
    fn follow(&mut self, step: Step) {
        self.step = step;
        match step {
            Step::Idle => self.timer.clear(),
            Step::Dealt => self.timer.start_deal(),
            Step::Await(_) => self.timer.start_decision(),
            Step::Settled if self.draining => {
                self.timer.clear();
                self.drains.drain(..).for_each(|d| {
                    let _ = d.send(());
                });
            }
            Step::Settled => self.timer.start_pause(),
        }
    }
    /// Chip batches go to the relay, everything else to the sockets.
    fn flush(&mut self) {
        for output in self.holdem.drain() {
            match output {
                Output::Chips(changes) => self.relay.send(changes),
                output => {
                    let _ = self.fanout.send(output);
                }
            }
        }
    }
}
