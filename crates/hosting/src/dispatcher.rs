use super::*;
use rtrp_core::*;
use rtrp_gameroom::*;
use rtrp_holdem::Action;
use rtrp_holdem::Player;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;
use std::sync::Arc;

/// Inbound `{type, data}` envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct Target {
    room_id: RoomId,
}

#[derive(Debug, Deserialize)]
struct Seating {
    room_id: RoomId,
    #[serde(default)]
    position: Position,
}

#[derive(Debug, Deserialize)]
struct Play {
    room_id: RoomId,
    data: Action,
}

/// One socket's identity and the room it currently sits in.
#[derive(Debug)]
pub struct Client {
    player: Player,
    outbox: Outbox,
    room: Option<RoomId>,
}

impl Client {
    pub fn new(player: Player, outbox: Outbox) -> Self {
        Self {
            player,
            outbox,
            room: None,
        }
    }
    pub fn id(&self) -> &PlayerId {
        &self.player.id
    }
    pub fn room(&self) -> Option<&RoomId> {
        self.room.as_ref()
    }
    pub fn reply(&self, response: Response) {
        if !self.outbox.send(response.to_json()) {
            log::warn!("[gateway {}] dropped reply, queue full", self.player.id);
        }
    }
}

/// Routes decoded client messages to room operations.
#[derive(Clone)]
pub struct Dispatcher {
    casino: Arc<Casino>,
}

impl Dispatcher {
    pub fn new(casino: Arc<Casino>) -> Self {
        Self { casino }
    }
    /// Handles one text frame. The returned response goes back to the
    /// sender only; room-wide effects are broadcast here.
    pub async fn dispatch(&self, client: &mut Client, frame: &str) -> Option<Response> {
        match self.route(client, frame).await {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("[dispatch {}] {}", client.id(), e);
                Some(Response::error(client.id().clone(), e))
            }
        }
    }
    /// Leaves the client's current room when its socket closes.
    pub async fn disconnect(&self, client: &mut Client) {
        if let Some(id) = client.room.take() {
            if let Some(room) = self.casino.get(&id).await {
                if let Some(player) = room.leave(client.id(), client.outbox.id()).await {
                    client.player = player;
                    let left = Response::new(Kind::RoomLeave, client.id().clone(), json!({ "player_id": client.id() }));
                    room.broadcast_all(&left).await;
                }
            }
        }
    }
    async fn route(&self, client: &mut Client, frame: &str) -> Result<Option<Response>, DispatchError> {
        let envelope = serde_json::from_str::<Envelope>(frame)?;
        let kind = Kind::try_from(envelope.kind.as_str()).map_err(DispatchError::UnknownType)?;
        log::debug!("[dispatch {}] {}", client.id(), kind);
        match kind {
            Kind::RoomInfo => self.room_info(client, envelope.data).await,
            Kind::RoomJoin => self.room_join(client, envelope.data).await,
            Kind::RoomLeave => self.room_leave(client, envelope.data).await,
            Kind::GameJoin => self.game_join(client, envelope.data).await,
            Kind::GameLeave => self.game_leave(client, envelope.data).await,
            Kind::GameAction => self.game_action(client, envelope.data).await,
            other => Err(DispatchError::UnknownType(other.to_string())),
        }
    }
    async fn room(&self, id: &RoomId) -> Result<Arc<Room>, DispatchError> {
        self.casino.get(id).await.ok_or(DispatchError::RoomNotFound)
    }
    /// Joins `room`, first leaving any other room the client sits in.
    async fn enter(&self, client: &mut Client, room: &Room) -> Result<(), DispatchError> {
        if client.room.as_ref().is_some_and(|r| r != room.id()) {
            self.disconnect(client).await;
        }
        room.join(client.player.clone(), client.outbox.clone()).await?;
        client.room = Some(room.id().clone());
        let joined = Response::new(Kind::RoomJoin, client.id().clone(), &client.player);
        room.broadcast_others(client.id(), &joined).await;
        Ok(())
    }
    async fn announce(&self, client: &Client, room: &Room) -> Result<(), DispatchError> {
        Ok(room.announce(client.id()).await?)
    }
}

/// Handlers.
impl Dispatcher {
    async fn room_info(&self, client: &mut Client, data: Value) -> Result<Option<Response>, DispatchError> {
        let target = serde_json::from_value::<Target>(data)?;
        let room = self.room(&target.room_id).await?;
        let state = room.state(Some(client.id())).await?;
        Ok(Some(Response::new(Kind::RoomInfo, client.id().clone(), state)))
    }
    async fn room_join(&self, client: &mut Client, data: Value) -> Result<Option<Response>, DispatchError> {
        let target = serde_json::from_value::<Target>(data)?;
        let room = self.room(&target.room_id).await?;
        self.enter(client, &room).await?;
        let state = room.state(Some(client.id())).await?;
        Ok(Some(Response::new(Kind::RoomJoinOk, client.id().clone(), state)))
    }
    async fn room_leave(&self, client: &mut Client, data: Value) -> Result<Option<Response>, DispatchError> {
        let target = serde_json::from_value::<Target>(data)?;
        let room = self.room(&target.room_id).await?;
        if !room.contains(client.id()).await {
            return Err(RoomError::NotMember.into());
        }
        if let Some(player) = room.leave(client.id(), client.outbox.id()).await {
            client.player = player;
        }
        if client.room.as_ref() == Some(&target.room_id) {
            client.room = None;
        }
        let left = Response::new(Kind::RoomLeave, client.id().clone(), json!({ "player_id": client.id() }));
        room.broadcast_all(&left).await;
        Ok(Some(Response::new(
            Kind::RoomLeaveOk,
            client.id().clone(),
            json!({ "room_id": target.room_id }),
        )))
    }
    async fn game_join(&self, client: &mut Client, data: Value) -> Result<Option<Response>, DispatchError> {
        let seating = serde_json::from_value::<Seating>(data)?;
        let room = self.room(&seating.room_id).await?;
        if !room.contains(client.id()).await {
            self.enter(client, &room).await?;
        }
        room.seat(client.id(), seating.position).await?;
        self.announce(client, &room).await?;
        Ok(Some(Response::new(
            Kind::GameJoinOk,
            client.id().clone(),
            json!({ "room_id": seating.room_id, "position": seating.position }),
        )))
    }
    async fn game_leave(&self, client: &mut Client, data: Value) -> Result<Option<Response>, DispatchError> {
        let target = serde_json::from_value::<Target>(data)?;
        let room = self.room(&target.room_id).await?;
        client.player.chips = room.unseat(client.id()).await?;
        self.announce(client, &room).await?;
        Ok(Some(Response::new(
            Kind::GameLeaveOk,
            client.id().clone(),
            json!({ "room_id": target.room_id }),
        )))
    }
    async fn game_action(&self, client: &mut Client, data: Value) -> Result<Option<Response>, DispatchError> {
        let play = serde_json::from_value::<Play>(data)?;
        let room = self.room(&play.room_id).await?;
        if !room.contains(client.id()).await {
            return Err(RoomError::NotMember.into());
        }
        let action = Action::new(client.id().clone(), play.data.action, play.data.amount);
        room.act(action).await?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtrp_chips::Ledger;

    async fn dispatcher() -> Dispatcher {
        let casino = Casino::with_default_room(TimerConfig::default(), Arc::new(Ledger::default()))
            .await
            .unwrap();
        Dispatcher::new(Arc::new(casino))
    }

    fn client(id: &str) -> (Client, Inbox) {
        let (outbox, inbox) = Outbox::channel(OUTBOX_CAPACITY);
        (Client::new(Player::new(id, id, 1000), outbox), inbox)
    }

    async fn reply(dispatcher: &Dispatcher, client: &mut Client, frame: Value) -> Value {
        let response = dispatcher.dispatch(client, &frame.to_string()).await.unwrap();
        serde_json::from_str(&response.to_json()).unwrap()
    }

    /// Reads frames until one matches.
    async fn until(inbox: &mut Inbox, found: impl Fn(&Value) -> bool) -> Value {
        loop {
            let frame = inbox.recv().await.expect("socket closed");
            let json = serde_json::from_str::<Value>(&frame).unwrap();
            if found(&json) {
                return json;
            }
        }
    }

    fn seat(json: &Value, id: &str) -> Value {
        json["data"]["game_state"]["players"]
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["id"] == id)
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn malformed_frame() {
        let dispatcher = dispatcher().await;
        let (mut a, _) = client("a");
        let response = dispatcher.dispatch(&mut a, "not json").await.unwrap();
        assert_eq!(response.kind, Kind::Error);
        assert_eq!(response.data["error"], "invalid message format");
    }

    #[tokio::test]
    async fn unknown_type() {
        let dispatcher = dispatcher().await;
        let (mut a, _) = client("a");
        let json = reply(&dispatcher, &mut a, json!({"type": "dance", "data": {}})).await;
        assert_eq!(json["data"]["error"], "unknown message type: dance");
        let json = reply(&dispatcher, &mut a, json!({"type": "room_join_ok", "data": {}})).await;
        assert_eq!(json["data"]["error"], "unknown message type: room_join_ok");
    }

    #[tokio::test]
    async fn missing_room() {
        let dispatcher = dispatcher().await;
        let (mut a, _) = client("a");
        let json = reply(&dispatcher, &mut a, json!({"type": "room_info", "data": {"room_id": "nope"}})).await;
        assert_eq!(json["type"], "error");
        assert_eq!(json["data"]["error"], "Room not found");
    }

    #[tokio::test]
    async fn join_replies_with_state_and_tells_others() {
        let dispatcher = dispatcher().await;
        let (mut a, mut inbox_a) = client("a");
        let (mut b, _) = client("b");
        reply(&dispatcher, &mut a, json!({"type": "room_join", "data": {"room_id": "room_1"}})).await;
        let json = reply(&dispatcher, &mut b, json!({"type": "room_join", "data": {"room_id": "room_1"}})).await;
        assert_eq!(json["type"], "room_join_ok");
        assert_eq!(json["data"]["players"].as_array().unwrap().len(), 2);
        assert_eq!(json["data"]["status"], "active");
        let seen = serde_json::from_str::<Value>(&inbox_a.recv().await.unwrap()).unwrap();
        assert_eq!(seen["type"], "room_join");
        assert_eq!(seen["data"]["id"], "b");
    }

    #[tokio::test]
    async fn game_join_enters_room_implicitly() {
        let dispatcher = dispatcher().await;
        let (mut a, mut inbox) = client("a");
        let json = reply(
            &dispatcher,
            &mut a,
            json!({"type": "game_join", "data": {"room_id": "room_1", "position": 2}}),
        )
        .await;
        assert_eq!(json["type"], "game_join_ok");
        assert_eq!(json["data"]["position"], 2);
        assert_eq!(a.room(), Some(&RoomId::from("room_1")));
        let info = serde_json::from_str::<Value>(&inbox.recv().await.unwrap()).unwrap();
        assert_eq!(info["type"], "room_info");
        assert_eq!(info["data"]["game_state"]["players"][0]["position"], 2);
    }

    #[tokio::test]
    async fn seat_taken_is_reported() {
        let dispatcher = dispatcher().await;
        let (mut a, _) = client("a");
        let (mut b, _) = client("b");
        let sit = json!({"type": "game_join", "data": {"room_id": "room_1", "position": 0}});
        reply(&dispatcher, &mut a, sit.clone()).await;
        let json = reply(&dispatcher, &mut b, sit).await;
        assert_eq!(json["data"]["error"], "game_position_taken");
    }

    #[tokio::test]
    async fn action_before_start() {
        let dispatcher = dispatcher().await;
        let (mut a, _) = client("a");
        reply(&dispatcher, &mut a, json!({"type": "game_join", "data": {"room_id": "room_1", "position": 0}})).await;
        let play = json!({"type": "game_action", "data": {
            "room_id": "room_1", "game_type": 1,
            "data": {"player_id": "a", "action": 4, "amount": 0}
        }});
        let json = reply(&dispatcher, &mut a, play).await;
        assert_eq!(json["data"]["error"], "game not started");
    }

    #[tokio::test]
    async fn action_requires_membership() {
        let dispatcher = dispatcher().await;
        let (mut a, _) = client("a");
        let play = json!({"type": "game_action", "data": {
            "room_id": "room_1", "data": {"action": 0}
        }});
        let json = reply(&dispatcher, &mut a, play).await;
        assert_eq!(json["data"]["error"], "player not in room");
    }

    #[tokio::test]
    async fn leave_requires_membership() {
        let dispatcher = dispatcher().await;
        let (mut a, _) = client("a");
        let leave = json!({"type": "room_leave", "data": {"room_id": "room_1"}});
        let json = reply(&dispatcher, &mut a, leave.clone()).await;
        assert_eq!(json["data"]["error"], "player not in room");
        reply(&dispatcher, &mut a, json!({"type": "room_join", "data": {"room_id": "room_1"}})).await;
        let json = reply(&dispatcher, &mut a, leave).await;
        assert_eq!(json["type"], "room_leave_ok");
        assert!(a.room().is_none());
    }

    #[tokio::test]
    async fn disconnect_frees_the_seat() {
        let dispatcher = dispatcher().await;
        let (mut a, _) = client("a");
        reply(&dispatcher, &mut a, json!({"type": "game_join", "data": {"room_id": "room_1", "position": 0}})).await;
        dispatcher.disconnect(&mut a).await;
        let room = dispatcher.casino.get(&RoomId::from("room_1")).await.unwrap();
        let summary = room.summary().await.unwrap();
        assert_eq!(summary.players_in_room, 0);
        assert_eq!(summary.players_in_game, 0);
    }

    #[tokio::test]
    async fn room_state_hides_other_hands() {
        let dispatcher = dispatcher().await;
        let (mut a, mut inbox_a) = client("a");
        let (mut b, _) = client("b");
        reply(&dispatcher, &mut a, json!({"type": "game_join", "data": {"room_id": "room_1", "position": 0}})).await;
        reply(&dispatcher, &mut b, json!({"type": "game_join", "data": {"room_id": "room_1", "position": 1}})).await;
        let info = reply(&dispatcher, &mut a, json!({"type": "room_info", "data": {"room_id": "room_1"}})).await;
        assert_eq!(seat(&info, "a")["hand"].as_array().unwrap().len(), 2);
        assert!(seat(&info, "b").get("hand").is_none());
        let announced = until(&mut inbox_a, |json| {
            json["type"] == "room_info" && json["data"]["game_state"]["players"].as_array().unwrap().len() == 2
        })
        .await;
        assert_eq!(seat(&announced, "a")["hand"].as_array().unwrap().len(), 2);
        assert!(seat(&announced, "b").get("hand").is_none());
        let (mut c, _) = client("c");
        let joined = reply(&dispatcher, &mut c, json!({"type": "room_join", "data": {"room_id": "room_1"}})).await;
        assert!(seat(&joined, "a").get("hand").is_none());
        assert!(seat(&joined, "b").get("hand").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn reseat_keeps_the_table_stack() {
        let dispatcher = dispatcher().await;
        let (mut a, mut inbox_a) = client("a");
        let (mut b, _) = client("b");
        let sit = json!({"type": "game_join", "data": {"room_id": "room_1", "position": 0}});
        reply(&dispatcher, &mut a, sit.clone()).await;
        reply(&dispatcher, &mut b, json!({"type": "game_join", "data": {"room_id": "room_1", "position": 1}})).await;
        let turn = until(&mut inbox_a, |json| {
            json["type"] == "game_holdem_action" && json["data"]["type"] == 5
        })
        .await;
        assert_eq!(turn["data"]["data"]["player_id"], "a");
        let fold = json!({"type": "game_action", "data": {
            "room_id": "room_1", "data": {"action": 0, "amount": 0}
        }});
        assert!(dispatcher.dispatch(&mut a, &fold.to_string()).await.is_none());
        let left = reply(&dispatcher, &mut a, json!({"type": "game_leave", "data": {"room_id": "room_1"}})).await;
        assert_eq!(left["type"], "game_leave_ok");
        reply(&dispatcher, &mut a, sit).await;
        let info = reply(&dispatcher, &mut a, json!({"type": "room_info", "data": {"room_id": "room_1"}})).await;
        let stack = |json: &Value, id: &str| {
            let view = seat(json, id);
            view["balance"].as_i64().unwrap() + view["current_bet_in_round"].as_i64().unwrap()
        };
        assert_eq!(stack(&info, "a"), 995);
        assert_eq!(stack(&info, "a") + stack(&info, "b"), 2000);
        dispatcher.disconnect(&mut a).await;
        let rejoined = reply(&dispatcher, &mut a, json!({"type": "room_join", "data": {"room_id": "room_1"}})).await;
        let profile = rejoined["data"]["players"]
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["id"] == "a")
            .cloned()
            .unwrap();
        assert_eq!(profile["chips"], 995);
    }
}
