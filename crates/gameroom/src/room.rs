use super::*;
use rtrp_chips::ChipSink;
use rtrp_chips::Relay;
use rtrp_core::*;
use rtrp_holdem::Action;
use rtrp_holdem::Player;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

/// Live table.
///
/// Owns the connected-player set and the handle to its dealer task.
/// Membership changes happen here under the members lock; anything that
/// touches the engine is a [`Command`] awaited on a oneshot reply.
pub struct Room {
    config: RoomConfig,
    members: Arc<Mutex<Members>>,
    commands: UnboundedSender<Command>,
    open: AtomicBool,
}

impl Room {
    /// Spawns the dealer, fan-out and chip relay tasks for a new table.
    pub fn open(config: RoomConfig, timers: TimerConfig, sink: Arc<dyn ChipSink>) -> Self {
        let members = Arc::new(Mutex::new(Members::default()));
        let fanout = Fanout::spawn(config.id.clone(), members.clone());
        let relay = Relay::spawn(sink, config.id.clone(), config.game_type);
        let rules = config.rules(timers.decision.as_secs());
        let commands = Dealer::spawn(config.id.clone(), rules, timers, relay, fanout);
        log::info!("[room {}] opened \"{}\"", config.id, config.name);
        Self {
            config,
            members,
            commands,
            open: AtomicBool::new(true),
        }
    }
    pub fn id(&self) -> &RoomId {
        &self.config.id
    }
    pub fn config(&self) -> &RoomConfig {
        &self.config
    }
    pub fn status(&self) -> RoomStatus {
        match self.open.load(Ordering::Relaxed) {
            true => RoomStatus::Active,
            false => RoomStatus::Inactive,
        }
    }
    async fn ask<T>(&self, command: impl FnOnce(Reply<T>) -> Command) -> Result<T, RoomError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(command(tx))
            .map_err(|_| RoomError::Closed)?;
        rx.await.map_err(|_| RoomError::Closed)
    }
}

/// Membership.
impl Room {
    /// Connects `player` on `outbox`. A previous socket of the same
    /// player is closed.
    pub async fn join(&self, player: Player, outbox: Outbox) -> Result<(), RoomError> {
        let mut members = self.members.lock().await;
        if !members.contains(&player.id) && members.len() >= self.config.capacity {
            return Err(RoomError::RoomFull);
        }
        log::info!("[room {}] {} joined", self.config.id, player.id);
        if let Some(previous) = members.insert(player, outbox) {
            log::info!("[room {}] replaced an older socket", self.config.id);
            previous.close();
        }
        Ok(())
    }
    /// Disconnects `player` if `conn` is still their live socket, and
    /// takes them out of the game. Returns their profile carrying the
    /// stack they left the table with; None when a newer socket owns
    /// them or they were not a member.
    pub async fn leave(&self, player: &PlayerId, conn: ID<Outbox>) -> Option<Player> {
        if self
            .members
            .lock()
            .await
            .conn(player)
            .is_some_and(|live| live != conn)
        {
            return None;
        }
        let _ = self.unseat(player).await;
        log::info!("[room {}] {} left", self.config.id, player);
        self.members.lock().await.remove(player)
    }
    pub async fn contains(&self, player: &PlayerId) -> bool {
        self.members.lock().await.contains(player)
    }
    pub async fn member(&self, player: &PlayerId) -> Option<Player> {
        self.members.lock().await.get(player).cloned()
    }
}

/// Game delegation.
impl Room {
    pub async fn seat(&self, player: &PlayerId, position: Position) -> Result<(), RoomError> {
        let player = self.member(player).await.ok_or(RoomError::NotMember)?;
        self.ask(|reply| Command::Seat {
            player,
            position,
            reply,
        })
        .await?
        .map_err(RoomError::from)
    }
    /// Takes `player` off the table and returns the stack they leave
    /// with, which becomes their member balance for the next seating.
    pub async fn unseat(&self, player: &PlayerId) -> Result<Chips, RoomError> {
        let id = player.clone();
        let balance = self
            .ask(|reply| Command::Leave { player: id, reply })
            .await??;
        self.members.lock().await.set_chips(player, balance);
        Ok(balance)
    }
    pub async fn act(&self, action: Action) -> Result<(), RoomError> {
        self.ask(|reply| Command::Act { action, reply })
            .await?
            .map_err(RoomError::from)
    }
    pub async fn snapshot(&self) -> Result<Snapshot, RoomError> {
        self.ask(|reply| Command::Snapshot { reply }).await
    }
    /// Room state as `viewer` may see it.
    pub async fn state(&self, viewer: Option<&PlayerId>) -> Result<RoomState, RoomError> {
        let snapshot = self.snapshot().await?;
        let players = self.members.lock().await.players();
        Ok(self.compose(&snapshot, viewer, players))
    }
    /// Sends every member a `room_info` frame with their own view of
    /// the table.
    pub async fn announce(&self, subject: &PlayerId) -> Result<(), RoomError> {
        let snapshot = self.snapshot().await?;
        let mut members = self.members.lock().await;
        let players = members.players();
        members.broadcast(None, |viewer| {
            let state = self.compose(&snapshot, Some(viewer), players.clone());
            Response::new(Kind::RoomInfo, subject.clone(), state).to_json()
        });
        Ok(())
    }
    fn compose(&self, snapshot: &Snapshot, viewer: Option<&PlayerId>, players: Vec<Player>) -> RoomState {
        RoomState {
            room_id: self.config.id.clone(),
            name: self.config.name.clone(),
            status: self.status(),
            max_players: self.config.capacity,
            max_game_players: self.config.max_game_players,
            players,
            min_bet: self.config.min_bet,
            game_type: self.config.game_type,
            game_status: snapshot.phase,
            game_state: snapshot.view.masked(viewer),
        }
    }
    pub async fn summary(&self) -> Result<RoomSummary, RoomError> {
        let snapshot = self.snapshot().await?;
        let players_in_room = self.members.lock().await.len();
        Ok(RoomSummary {
            id: self.config.id.clone(),
            name: self.config.name.clone(),
            status: self.status(),
            max_room_players: self.config.capacity,
            players_in_room,
            game_status: snapshot.phase,
            game_type: self.config.game_type,
            min_bet: self.config.min_bet,
            max_game_players: self.config.max_game_players,
            players_in_game: snapshot.seated,
        })
    }
}

/// Socket fan-out for dispatcher replies.
impl Room {
    pub async fn send_one(&self, to: &PlayerId, response: &Response) -> bool {
        self.members.lock().await.send(to, response.to_json())
    }
    pub async fn broadcast_all(&self, response: &Response) {
        let frame = response.to_json();
        self.members.lock().await.broadcast(None, |_| frame.clone());
    }
    pub async fn broadcast_others(&self, except: &PlayerId, response: &Response) {
        let frame = response.to_json();
        self.members
            .lock()
            .await
            .broadcast(Some(except), |_| frame.clone());
    }
}

/// Lifecycle.
impl Room {
    /// Stops new hands and resolves once no hand is in flight.
    pub async fn drain(&self) {
        self.open.store(false, Ordering::Relaxed);
        let _ = self.ask(|done| Command::Drain { done }).await;
    }
    /// Closes every socket and empties the table. Stakes survive.
    pub async fn reset(&self) {
        log::info!("[room {}] reset", self.config.id);
        self.members.lock().await.clear();
        let _ = self.ask(|done| Command::Reset { done }).await;
    }
    /// Stops the dealer. Resolves once every chip batch it produced has
    /// been handed to the sink; later commands fail with `Closed`.
    pub async fn close(&self) {
        self.open.store(false, Ordering::Relaxed);
        let _ = self.ask(|done| Command::Close { done }).await;
        log::info!("[room {}] closed", self.config.id);
    }
}
