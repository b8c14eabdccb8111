use rtrp_core::*;
use rtrp_holdem::Player;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::sync::mpsc;

/// Sending half of one socket's bounded frame queue.
///
/// The room holds an `Outbox` per connected player; the gateway's write
/// pump owns the matching [`Inbox`]. Closing an outbox wakes the pump so
/// it can shut the socket even while frames are still queued.
#[derive(Debug, Clone)]
pub struct Outbox {
    id: ID<Outbox>,
    tx: mpsc::Sender<String>,
    kill: Arc<Notify>,
}

/// Receiving half drained by the socket write pump.
#[derive(Debug)]
pub struct Inbox {
    rx: mpsc::Receiver<String>,
    kill: Arc<Notify>,
}

impl Outbox {
    pub fn channel(capacity: usize) -> (Self, Inbox) {
        let (tx, rx) = mpsc::channel(capacity);
        let kill = Arc::new(Notify::new());
        let outbox = Self {
            id: ID::default(),
            tx,
            kill: kill.clone(),
        };
        (outbox, Inbox { rx, kill })
    }
    pub fn id(&self) -> ID<Outbox> {
        self.id
    }
    /// Queues a frame without waiting. False when the queue is full or
    /// the socket is gone.
    pub fn send(&self, frame: String) -> bool {
        self.tx.try_send(frame).is_ok()
    }
    pub fn close(&self) {
        self.kill.notify_one();
    }
}

impl Inbox {
    /// Next frame, or None once the room closed this socket.
    pub async fn recv(&mut self) -> Option<String> {
        tokio::select! {
            biased;
            _ = self.kill.notified() => None,
            frame = self.rx.recv() => frame,
        }
    }
}

#[derive(Debug, Clone)]
struct Member {
    player: Player,
    outbox: Outbox,
}

/// Connected players of a room, one live socket each.
#[derive(Debug, Default)]
pub struct Members(HashMap<PlayerId, Member>);

impl Members {
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.0.contains_key(id)
    }
    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.0.get(id).map(|m| &m.player)
    }
    pub fn conn(&self, id: &PlayerId) -> Option<ID<Outbox>> {
        self.0.get(id).map(|m| m.outbox.id())
    }
    /// Profiles sorted by player id.
    pub fn players(&self) -> Vec<Player> {
        let mut players = self.0.values().map(|m| m.player.clone()).collect::<Vec<_>>();
        players.sort_by(|a, b| a.id.cmp(&b.id));
        players
    }
    /// Registers `player` on `outbox`, returning the outbox of a previous
    /// connection it displaced.
    pub fn insert(&mut self, player: Player, outbox: Outbox) -> Option<Outbox> {
        let id = player.id.clone();
        self.0
            .insert(id, Member { player, outbox: outbox.clone() })
            .map(|old| old.outbox)
            .filter(|old| old.id() != outbox.id())
    }
    /// Records the stack a member walked away from the table with.
    pub fn set_chips(&mut self, id: &PlayerId, chips: Chips) {
        if let Some(member) = self.0.get_mut(id) {
            member.player.chips = chips;
        }
    }
    pub fn remove(&mut self, id: &PlayerId) -> Option<Player> {
        self.0.remove(id).map(|m| m.player)
    }
    /// Queues a frame for one member, evicting them on overflow.
    pub fn send(&mut self, to: &PlayerId, frame: String) -> bool {
        match self.0.get(to).map(|m| m.outbox.send(frame)) {
            Some(true) => true,
            Some(false) => {
                self.evict(to);
                false
            }
            None => false,
        }
    }
    /// Queues a per-viewer frame for every member except `except`.
    pub fn broadcast<F>(&mut self, except: Option<&PlayerId>, frame: F)
    where
        F: Fn(&PlayerId) -> String,
    {
        let slow = self
            .0
            .iter()
            .filter(|(id, _)| Some(*id) != except)
            .filter(|(id, m)| !m.outbox.send(frame(id)))
            .map(|(id, _)| id.clone())
            .collect::<Vec<_>>();
        slow.iter().for_each(|id| self.evict(id));
    }
    /// Closes every socket and forgets every member.
    pub fn clear(&mut self) {
        self.0.values().for_each(|m| m.outbox.close());
        self.0.clear();
    }
    fn evict(&mut self, id: &PlayerId) {
        if let Some(member) = self.0.remove(id) {
            log::warn!("[members] evicting {}, outbound queue overflowed", id);
            member.outbox.close();
        }
    }
}
