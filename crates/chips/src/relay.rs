use super::*;
use rtrp_core::*;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use tokio::task::JoinHandle;

/// Per-table publishing task.
///
/// Batches handed to [`Relay::send`] are published one at a time in
/// order, each retried with [`Backoff`] before being dropped.
#[derive(Debug)]
pub struct Relay {
    room: RoomId,
    game_type: GameType,
    tx: UnboundedSender<ChipUpdate>,
    task: JoinHandle<()>,
}

impl Relay {
    pub fn spawn(sink: Arc<dyn ChipSink>, room: RoomId, game_type: GameType) -> Self {
        let (tx, rx) = unbounded_channel();
        let task = tokio::spawn(Self::pump(sink, room.clone(), rx));
        Self {
            room,
            game_type,
            tx,
            task,
        }
    }
    /// Queues a batch. Empty batches are not published.
    pub fn send(&self, changes: Vec<ChipChange>) {
        if changes.is_empty() {
            return;
        }
        let update = ChipUpdate::new(self.game_type, self.room.clone(), changes);
        log::debug!("[publisher {}] queued {}", self.room, update.message_id);
        if self.tx.send(update).is_err() {
            log::error!("[publisher {}] relay closed, batch lost", self.room);
        }
    }
    /// Publishes everything queued so far, then stops.
    pub async fn flush(self) {
        drop(self.tx);
        if let Err(e) = self.task.await {
            log::error!("[publisher {}] task failed: {}", self.room, e);
        }
    }
    async fn pump(sink: Arc<dyn ChipSink>, room: RoomId, mut rx: UnboundedReceiver<ChipUpdate>) {
        while let Some(update) = rx.recv().await {
            deliver(sink.as_ref(), &update).await;
        }
        log::debug!("[publisher {}] closed", room);
    }
}

/// Publishes with retry. Returns whether the update got through.
pub async fn deliver(sink: &dyn ChipSink, update: &ChipUpdate) -> bool {
    let mut backoff = Backoff::default();
    loop {
        match sink.publish(update).await {
            Ok(()) => return true,
            Err(e) => match backoff.next() {
                Some(delay) => {
                    log::warn!("[publisher] {} failed, retry in {:?}: {}", update.message_id, delay, e);
                    tokio::time::sleep(delay).await;
                }
                None => {
                    log::error!(
                        "[publisher] dropping {} for {} ({} changes): {}",
                        update.message_id,
                        update.routing_key(),
                        update.player_changes.len(),
                        e
                    );
                    return false;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changes(n: Chips) -> Vec<ChipChange> {
        vec![ChipChange::new(PlayerId::from("p"), n)]
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_in_order() {
        let ledger = Arc::new(Ledger::default());
        let relay = Relay::spawn(ledger.clone(), RoomId::from("room_1"), GameType::Holdem);
        relay.send(changes(-5));
        relay.send(Vec::new());
        relay.send(changes(15));
        relay.flush().await;
        let published = ledger.published().await;
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].player_changes, changes(-5));
        assert_eq!(published[1].player_changes, changes(15));
        assert!(published.iter().all(|u| u.routing_key() == "poker.game.1.chip_update.room_1"));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_failures() {
        let ledger = Arc::new(Ledger::failing(3));
        let update = ChipUpdate::new(GameType::Holdem, RoomId::from("r"), changes(1));
        assert!(deliver(ledger.as_ref(), &update).await);
        assert_eq!(ledger.published().await, vec![update]);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_five_attempts() {
        let ledger = Arc::new(Ledger::failing(5));
        let update = ChipUpdate::new(GameType::Holdem, RoomId::from("r"), changes(1));
        assert!(!deliver(ledger.as_ref(), &update).await);
        assert!(ledger.published().await.is_empty());
        assert!(deliver(ledger.as_ref(), &update).await);
    }
}
