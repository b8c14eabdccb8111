use super::*;
use rtrp_core::*;
use rtrp_holdem::Output;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::mpsc::*;

/// Delivers engine output to connected sockets off the dealer's task,
/// masking hole cards per viewer.
pub struct Fanout {
    room: RoomId,
    members: Arc<Mutex<Members>>,
    outputs: UnboundedReceiver<Output>,
}

impl Fanout {
    pub fn spawn(room: RoomId, members: Arc<Mutex<Members>>) -> UnboundedSender<Output> {
        let (tx, rx) = unbounded_channel();
        let fanout = Self {
            room,
            members,
            outputs: rx,
        };
        tokio::spawn(fanout.run());
        tx
    }
    async fn run(mut self) {
        while let Some(output) = self.outputs.recv().await {
            let mut members = self.members.lock().await;
            match output {
                Output::Broadcast { event, view } => {
                    log::debug!("[room {}] {}", self.room, event);
                    let subject = Protocol::subject(&event);
                    members.broadcast(None, |viewer| {
                        Protocol::holdem(&self.room, &event, &view, viewer, subject.clone()).to_json()
                    });
                }
                Output::Unicast { to, event, view } => {
                    let frame = Protocol::holdem(&self.room, &event, &view, &to, to.clone()).to_json();
                    members.send(&to, frame);
                }
                Output::Reject { to, error } => {
                    let frame = Protocol::reject(to.clone(), &error).to_json();
                    members.send(&to, frame);
                }
                Output::Reaped { player, balance } => {
                    log::info!("[room {}] {} unseated with {}", self.room, player, balance);
                    members.set_chips(&player, balance);
                    let frame = Protocol::reaped(&self.room, player.clone(), balance).to_json();
                    members.send(&player, frame);
                }
                Output::Chips(_) => {}
            }
        }
    }
}
