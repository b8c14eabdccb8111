use super::*;
use futures::StreamExt;
use rtrp_core::*;
use rtrp_gameroom::Outbox;
use rtrp_holdem::Player;

/// Bridges one authenticated WebSocket to the rooms.
pub struct Gateway;

impl Gateway {
    /// Spawns the socket loop: queued room frames are written out, text
    /// frames from the client are dispatched. On exit the player leaves
    /// whatever room the socket was in.
    pub fn bridge(
        dispatcher: Dispatcher,
        player: Player,
        mut session: actix_ws::Session,
        mut streams: actix_ws::MessageStream,
    ) {
        let (outbox, mut inbox) = Outbox::channel(OUTBOX_CAPACITY);
        let mut client = Client::new(player, outbox);
        log::info!("[gateway {}] connected", client.id());
        actix_web::rt::spawn(async move {
            'sesh: loop {
                tokio::select! {
                    biased;
                    frame = inbox.recv() => match frame {
                        Some(json) => if session.text(json).await.is_err() { break 'sesh },
                        None => break 'sesh,
                    },
                    msg = streams.next() => match msg {
                        Some(Ok(actix_ws::Message::Text(text))) => {
                            if let Some(reply) = dispatcher.dispatch(&mut client, &text).await {
                                client.reply(reply);
                            }
                        }
                        Some(Ok(actix_ws::Message::Ping(bytes))) => if session.pong(&bytes).await.is_err() { break 'sesh },
                        Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                        Some(Err(_)) => break 'sesh,
                        None => break 'sesh,
                        _ => continue 'sesh,
                    },
                }
            }
            dispatcher.disconnect(&mut client).await;
            let _ = session.close(None).await;
            log::info!("[gateway {}] disconnected", client.id());
        });
    }
}
