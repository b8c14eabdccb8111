use super::*;
use rtrp_core::*;
use rtrp_holdem::Event;
use rtrp_holdem::GameView;
use rtrp_holdem::HoldemError;
use serde::Serialize;

/// `game_holdem_action.data`
#[derive(Debug, Serialize)]
struct Payload<'a> {
    room_id: &'a RoomId,
    state: GameView,
    #[serde(rename = "type")]
    kind: u8,
    data: Event,
}

/// Encodes engine output into socket envelopes.
pub struct Protocol;

impl Protocol {
    /// The envelope `viewer` receives for `event`, with hole cards masked.
    pub fn holdem(room: &RoomId, event: &Event, view: &GameView, viewer: &PlayerId, player_id: PlayerId) -> Response {
        let payload = Payload {
            room_id: room,
            state: view.masked(Some(viewer)),
            kind: event.kind(),
            data: event.masked(Some(viewer)),
        };
        Response::new(Kind::GameHoldemAction, player_id, payload)
    }
    /// Player an event is about, if any.
    pub fn subject(event: &Event) -> PlayerId {
        match event {
            Event::PlayerTurn(t) => t.player_id.clone(),
            Event::PlayerAction(a) => a.player_id.clone(),
            Event::Winner(w) => w.winner_id.clone(),
            _ => PlayerId::default(),
        }
    }
    pub fn reject(to: PlayerId, error: &HoldemError) -> Response {
        Response::error(to, error)
    }
    /// Tells a player their short stack was taken off the table.
    pub fn reaped(room: &RoomId, to: PlayerId, chips: Chips) -> Response {
        let data = serde_json::json!({
            "room_id": room,
            "chips": chips,
            "reason": "insufficient chips",
        });
        Response::new(Kind::GameLeaveOk, to, data)
    }
}
