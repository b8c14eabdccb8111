use super::*;
use rtrp_cards::*;
use rtrp_core::*;
use std::collections::BTreeMap;

/// What the driver should wait for next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// no hand in progress
    Idle,
    /// cards are out; call [`Holdem::prompt`] after the deal pause
    Dealt,
    /// waiting on the seat at this position, under the turn timer
    Await(Position),
    /// hand settled; call [`Holdem::next_hand`] after the hand pause
    Settled,
}

/// Per-hand state. Recreated at every deal.
#[derive(Debug, Clone)]
struct Deal {
    round: Round,
    pot: Chips,
    awarded: Chips,
    current_bet: Chips,
    dealer: Position,
    small_blind: Position,
    big_blind: Position,
    current: Position,
    turn: Option<Position>,
    seats: Seats,
    board: Vec<Card>,
    revealed: usize,
    shown: bool,
    complete: bool,
}

/// Hold'em engine for one table.
///
/// A synchronous state machine: every operation mutates state and queues
/// [`Output`]s, which the owning task drains with [`Holdem::drain`] and
/// delivers in order. Timing lives with the caller; the returned [`Step`]
/// says what to wait for.
#[derive(Debug)]
pub struct Holdem {
    rules: Rules,
    stakes: Stakes,
    phase: Phase,
    roster: BTreeMap<Position, Participant>,
    hand: Option<Deal>,
    button: Option<Position>,
    outbox: Vec<Output>,
}

impl Holdem {
    pub fn new(rules: Rules) -> Self {
        Self {
            stakes: Stakes::from(rules.min_bet),
            rules,
            phase: Phase::Waiting,
            roster: BTreeMap::new(),
            hand: None,
            button: None,
            outbox: Vec::new(),
        }
    }
    pub fn rules(&self) -> &Rules {
        &self.rules
    }
    pub fn stakes(&self) -> Stakes {
        self.stakes
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn round(&self) -> Option<Round> {
        self.hand.as_ref().map(|h| h.round)
    }
    pub fn pot(&self) -> Chips {
        self.hand.as_ref().map(|h| h.pot).unwrap_or_default()
    }
    pub fn current_bet(&self) -> Chips {
        self.hand.as_ref().map(|h| h.current_bet).unwrap_or_default()
    }
    pub fn dealer(&self) -> Option<Position> {
        self.hand.as_ref().map(|h| h.dealer)
    }
    /// Chips committed this hand across all seats.
    pub fn contributions(&self) -> Chips {
        self.hand
            .as_ref()
            .map(|h| h.seats.iter().map(Seat::spent).sum())
            .unwrap_or_default()
    }
    /// Chips already paid out of this hand's pot.
    pub fn awarded(&self) -> Chips {
        self.hand.as_ref().map(|h| h.awarded).unwrap_or_default()
    }
    /// Position of the prompted seat, if any.
    pub fn current(&self) -> Option<Position> {
        self.hand.as_ref().and_then(|h| h.turn)
    }
    /// Player of the prompted seat, if any.
    pub fn to_act(&self) -> Option<&PlayerId> {
        self.current()
            .and_then(|p| self.roster.get(&p))
            .map(Participant::id)
    }
    /// Amount the prompted seat must add to match the current bet.
    pub fn to_call(&self) -> Chips {
        self.current()
            .map(|p| self.owed(p))
            .unwrap_or_default()
    }
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.roster.values()
    }
    pub fn participant(&self, id: &PlayerId) -> Option<&Participant> {
        self.roster.values().find(|p| p.id() == id)
    }
    pub fn seated(&self, id: &PlayerId) -> bool {
        self.participant(id).is_some()
    }
    /// A hand is dealt and not yet settled.
    pub fn in_hand(&self) -> bool {
        self.hand.as_ref().is_some_and(|h| !h.complete)
    }
    /// At least two seats are eligible to be dealt in.
    pub fn can_start(&self) -> bool {
        self.roster.values().filter(|p| p.ready()).count() >= 2
    }
    /// Takes every queued output in emission order.
    pub fn drain(&mut self) -> Vec<Output> {
        std::mem::take(&mut self.outbox)
    }
}

/// Seating.
impl Holdem {
    pub fn add_player(&mut self, position: Position, player: Player) -> Result<(), HoldemError> {
        if self.seated(&player.id) {
            return Err(HoldemError::PlayerAlreadySeated);
        }
        if self.roster.len() >= self.rules.capacity {
            return Err(HoldemError::TableFull);
        }
        if position >= self.rules.capacity {
            return Err(HoldemError::InvalidPosition);
        }
        if self.roster.contains_key(&position) {
            return Err(HoldemError::PositionTaken);
        }
        log::debug!("[holdem] {} sits at {}", player.id, position);
        self.roster.insert(position, Participant::new(position, player));
        Ok(())
    }
    /// Removes a player. Mid-hand the seat is folded and marked Inactive;
    /// its chips stay in the pot and the seat is reaped at the next deal.
    pub fn remove_player(&mut self, id: &PlayerId) -> Result<Step, HoldemError> {
        let position = self
            .participant(id)
            .map(Participant::position)
            .ok_or(HoldemError::PlayerNotFound)?;
        let dealt = self
            .hand
            .as_ref()
            .filter(|h| !h.complete)
            .is_some_and(|h| h.seats.get(position).is_some());
        if !dealt {
            log::debug!("[holdem] {} leaves from {}", id, position);
            self.roster.remove(&position);
            return Ok(self.step());
        }
        log::debug!("[holdem] {} leaves mid-hand from {}", id, position);
        if let Some(p) = self.roster.get_mut(&position) {
            p.set_status(Status::Inactive);
        }
        let live = self
            .seat(position)
            .is_some_and(|s| !s.folded());
        if live {
            self.fold(position);
        }
        if self.current() == Some(position) {
            Ok(self.pass(position))
        } else if self.round_complete() {
            if let Some(hand) = self.hand.as_mut() {
                hand.turn = None;
            }
            Ok(self.advance())
        } else {
            Ok(self.step())
        }
    }
    /// Administrative reset. Stakes survive; everything else is cleared.
    pub fn reset(&mut self) {
        log::info!("[holdem] reset");
        self.roster.clear();
        self.outbox.clear();
        self.hand = None;
        self.button = None;
        self.phase = Phase::Waiting;
    }
}

/// Hand lifecycle.
impl Holdem {
    /// Opens a session and deals the first hand.
    pub fn start(&mut self, deck: Deck) -> Result<Step, HoldemError> {
        if self.phase != Phase::Waiting || !self.can_start() {
            return Err(HoldemError::GameNotReady);
        }
        log::info!("[holdem] starting with {} players", self.roster.len());
        self.phase = Phase::Starting;
        self.button = None;
        self.broadcast(Event::GameStart(self.view()));
        self.next_hand(deck)
    }
    /// Reaps departed and short-stacked seats, then deals again or ends
    /// the session when fewer than two players remain.
    pub fn next_hand(&mut self, deck: Deck) -> Result<Step, HoldemError> {
        self.reap();
        if self.can_start() {
            self.deal(deck)?;
            Ok(Step::Dealt)
        } else {
            self.end();
            Ok(Step::Idle)
        }
    }
    /// Prompts the next seat to act after the deal pause.
    pub fn prompt(&mut self) -> Step {
        self.advance()
    }
    /// Applies an action from `player`. Actions out of turn are refused
    /// untouched; invalid ones are reported and coerced to a fold.
    pub fn act(&mut self, player: &PlayerId, action: Move, amount: Chips) -> Result<Step, HoldemError> {
        let Some(position) = self.current() else {
            return match self.in_hand() {
                true => Err(HoldemError::NotYourTurn),
                false => Err(HoldemError::GameNotReady),
            };
        };
        if self.to_act() != Some(player) {
            log::error!("[holdem] {} acted out of turn", player);
            return Err(HoldemError::NotYourTurn);
        }
        if let Err(error) = self.apply(position, action, amount) {
            log::warn!("[holdem] {} {} {} refused: {}", player, action, amount, error);
            self.outbox.push(Output::Reject {
                to: player.clone(),
                error,
            });
            self.fold(position);
        }
        Ok(self.pass(position))
    }
    /// Turn timer expiry: call if affordable, else check, else fold.
    pub fn expire(&mut self) -> Step {
        match self.current() {
            None => self.step(),
            Some(position) => {
                let owed = self.owed(position);
                let balance = self.balance_at(position);
                let action = match owed {
                    0 => Move::Check,
                    n if n <= balance => Move::Call,
                    _ => Move::Fold,
                };
                log::debug!("[holdem] seat {} timed out, {}", position, action);
                if self.apply(position, action, 0).is_err() {
                    self.fold(position);
                }
                self.pass(position)
            }
        }
    }
}

/// Internals.
impl Holdem {
    fn step(&self) -> Step {
        match &self.hand {
            None => Step::Idle,
            Some(h) if h.complete => Step::Settled,
            Some(h) => h.turn.map(Step::Await).unwrap_or(Step::Dealt),
        }
    }
    fn seat(&self, position: Position) -> Option<&Seat> {
        self.hand.as_ref().and_then(|h| h.seats.get(position))
    }
    fn balance_at(&self, position: Position) -> Chips {
        self.roster
            .get(&position)
            .map(Participant::balance)
            .unwrap_or_default()
    }
    fn owed(&self, position: Position) -> Chips {
        let stake = self.seat(position).map(Seat::stake).unwrap_or_default();
        (self.current_bet() - stake).max(0)
    }
    fn reap(&mut self) {
        let min = self.stakes.min_bet();
        let gone = self
            .roster
            .values()
            .filter(|p| p.status() == Status::Inactive || p.balance() < min)
            .map(Participant::position)
            .collect::<Vec<_>>();
        for position in gone {
            let Some(p) = self.roster.remove(&position) else {
                continue;
            };
            log::debug!("[holdem] reaped {} with {}", p.id(), p.balance());
            // leavers were already told their stack when they left
            if p.status() != Status::Inactive {
                self.outbox.push(Output::Reaped {
                    player: p.id().clone(),
                    balance: p.balance(),
                });
            }
        }
        self.hand = None;
    }
    fn end(&mut self) {
        log::info!("[holdem] session over");
        self.hand = None;
        self.button = None;
        self.phase = Phase::Waiting;
        self.broadcast(Event::GameEnd(self.view()));
    }
    fn deal(&mut self, mut deck: Deck) -> Result<(), HoldemError> {
        self.roster
            .values_mut()
            .for_each(|p| p.set_status(Status::Active));
        let mut seats = self
            .roster
            .values()
            .map(|p| Seat::new(p.position(), p.id().clone()))
            .collect::<Seats>();
        let first = seats.positions().next().ok_or(HoldemError::GameNotReady)?;
        let dealer = self.button.map(|b| seats.next(b)).unwrap_or(first);
        let (small_blind, big_blind) = match seats.len() {
            2 => (dealer, seats.next(dealer)),
            _ => (seats.next(dealer), seats.next(seats.next(dealer))),
        };
        let order = seats
            .walk(seats.next(dealer))
            .map(Seat::position)
            .collect::<Vec<_>>();
        for _ in 0..HOLE_CARDS {
            for position in order.iter() {
                let card = deck.draw()?;
                if let Some(seat) = seats.get_mut(*position) {
                    seat.deal(card);
                }
            }
        }
        let mut board = Vec::with_capacity(BOARD_CARDS);
        for street in [3, 1, 1] {
            deck.draw()?;
            for _ in 0..street {
                board.push(deck.draw()?);
            }
        }
        self.button = Some(dealer);
        self.phase = Phase::Started;
        self.hand = Some(Deal {
            round: Round::PreFlop,
            pot: 0,
            awarded: 0,
            current_bet: 0,
            dealer,
            small_blind,
            big_blind,
            current: seats.next(big_blind),
            turn: None,
            seats,
            board,
            revealed: 0,
            shown: false,
            complete: false,
        });
        self.commit(small_blind, self.stakes.small_blind());
        self.commit(big_blind, self.stakes.big_blind());
        if let Some(hand) = self.hand.as_mut() {
            hand.current_bet = self.stakes.big_blind();
        }
        log::info!(
            "[holdem] dealt {} seats, dealer {} blinds {}/{}",
            order.len(),
            dealer,
            small_blind,
            big_blind
        );
        self.announce();
        Ok(())
    }
    /// Private round-start notices, then the public preflop progress.
    fn announce(&mut self) {
        let Some(hand) = self.hand.as_ref() else {
            return;
        };
        let notices = hand
            .seats
            .iter()
            .map(|s| {
                (
                    s.player().clone(),
                    RoundStart {
                        small_blind: hand.small_blind,
                        big_blind: hand.big_blind,
                        pot: hand.pot,
                        current_bet: hand.current_bet,
                        dealer_seat: hand.dealer,
                        small_blind_amount: self.stakes.small_blind(),
                        big_blind_amount: self.stakes.big_blind(),
                        hand: s.hole().to_vec(),
                    },
                )
            })
            .collect::<Vec<_>>();
        for (to, notice) in notices {
            self.unicast(to, Event::RoundStart(notice));
        }
        self.progress();
    }
    fn progress(&mut self) {
        let Some(hand) = self.hand.as_ref() else {
            return;
        };
        let event = Event::RoundProgress(RoundProgress {
            round: hand.round,
            cards: hand.board[..hand.revealed].to_vec(),
            pot: hand.pot,
        });
        self.broadcast(event);
    }
    /// Moves up to `chips` from a seat's balance into the pot.
    fn commit(&mut self, position: Position, chips: Chips) -> Chips {
        let moved = self
            .roster
            .get_mut(&position)
            .map(|p| p.withdraw(chips))
            .unwrap_or_default();
        if let Some(hand) = self.hand.as_mut() {
            hand.pot += moved;
            if let Some(seat) = hand.seats.get_mut(position) {
                seat.commit(moved);
            }
        }
        moved
    }
    fn fold(&mut self, position: Position) {
        let Some(seat) = self.hand.as_mut().and_then(|h| h.seats.get_mut(position)) else {
            return;
        };
        seat.fold();
        let player = seat.player().clone();
        if let Some(p) = self
            .roster
            .get_mut(&position)
            .filter(|p| p.status() == Status::Active)
        {
            p.set_status(Status::Folded);
        }
        self.broadcast(Event::PlayerAction(PlayerAction {
            player_id: player,
            action: Move::Fold,
            amount: 0,
        }));
    }
    fn apply(&mut self, position: Position, action: Move, amount: Chips) -> Result<(), HoldemError> {
        let invalid = |reason: String| Err(HoldemError::InvalidAction(reason));
        let stake = self.seat(position).map(Seat::stake).unwrap_or_default();
        let balance = self.balance_at(position);
        let current = self.current_bet();
        let owed = self.owed(position);
        let big = self.stakes.big_blind();
        let action = match action {
            Move::Raise if current == 0 => Move::Bet,
            Move::Bet if current > 0 => Move::Raise,
            other => other,
        };
        let minimum = (2 * current - stake).max(current + 1);
        let chips = match action {
            Move::Fold => {
                self.fold(position);
                return Ok(());
            }
            Move::Check if owed == 0 => 0,
            Move::Check => return invalid(format!("cannot check facing {}", owed)),
            Move::Call if owed > 0 => owed.min(balance),
            Move::Call => return invalid("nothing to call".to_string()),
            Move::Bet if amount < big => return invalid(format!("bet below big blind {}", big)),
            Move::Bet if amount > balance => return invalid("insufficient balance".to_string()),
            Move::Bet => amount,
            Move::Raise if amount < minimum => return invalid(format!("raise below {}", minimum)),
            Move::Raise if amount > balance => return invalid("insufficient balance".to_string()),
            Move::Raise => amount - stake,
            Move::AllIn if balance > 0 => balance,
            Move::AllIn => return invalid("no chips behind".to_string()),
        };
        let moved = self.commit(position, chips);
        let Some(hand) = self.hand.as_mut() else {
            return Err(HoldemError::GameNotReady);
        };
        let Some(seat) = hand.seats.get_mut(position) else {
            return Err(HoldemError::PlayerNotFound);
        };
        seat.mark(action);
        let total = seat.stake();
        let player = seat.player().clone();
        match action {
            Move::Bet | Move::Raise => hand.current_bet = total,
            Move::AllIn if total > hand.current_bet => hand.current_bet = total,
            _ => {}
        }
        log::debug!("[holdem] {} {} {}", player, action, moved);
        self.broadcast(Event::PlayerAction(PlayerAction {
            player_id: player,
            action,
            amount: moved,
        }));
        Ok(())
    }
    /// Moves the cursor past `position` and runs to the next wait.
    fn pass(&mut self, position: Position) -> Step {
        if let Some(hand) = self.hand.as_mut() {
            hand.turn = None;
            hand.current = hand.seats.next(position);
        }
        self.advance()
    }
    /// Runs the state machine until it needs input or the hand settles.
    fn advance(&mut self) -> Step {
        loop {
            match &self.hand {
                None => return Step::Idle,
                Some(h) if h.complete => return Step::Settled,
                Some(h) if h.turn.is_some() => return self.step(),
                Some(_) => {}
            }
            if self.round_complete() {
                self.close_round();
                if self.betting_over() {
                    self.showdown();
                    return Step::Settled;
                }
                self.open_round();
                continue;
            }
            let Some(position) = self.hand.as_ref().map(|h| h.current) else {
                return Step::Idle;
            };
            let movable = self.seat(position).is_some_and(|s| !s.folded())
                && self.balance_at(position) > 0;
            if let Some(hand) = self.hand.as_mut() {
                if movable {
                    hand.turn = Some(position);
                } else {
                    hand.current = hand.seats.next(position);
                    continue;
                }
            }
            if let Some(player) = self.roster.get(&position).map(|p| p.id().clone()) {
                self.broadcast(Event::PlayerTurn(PlayerTurn {
                    player_id: player,
                    timeout: self.rules.timeout,
                }));
            }
            return Step::Await(position);
        }
    }
    /// Every live seat with chips behind has acted and matched the
    /// highest round bet, or at most one seat is still live.
    fn round_complete(&self) -> bool {
        let Some(hand) = self.hand.as_ref() else {
            return false;
        };
        let live = hand.seats.live().collect::<Vec<_>>();
        if live.len() <= 1 {
            return true;
        }
        let max = live.iter().map(|s| s.stake()).max().unwrap_or_default();
        live.iter()
            .filter(|s| self.balance_at(s.position()) > 0)
            .all(|s| s.staked() && s.stake() == max && s.acted().is_some())
    }
    fn betting_over(&self) -> bool {
        let Some(hand) = self.hand.as_ref() else {
            return true;
        };
        let live = hand.seats.live().count();
        let funded = hand
            .seats
            .live()
            .filter(|s| self.balance_at(s.position()) > 0)
            .count();
        hand.round >= Round::River || live <= 1 || funded < 2
    }
    /// Publishes this round's bets as negative deltas and clears the round.
    fn close_round(&mut self) {
        let Some(hand) = self.hand.as_ref() else {
            return;
        };
        let changes = hand
            .seats
            .iter()
            .filter(|s| s.stake() > 0)
            .map(|s| ChipChange::new(s.player().clone(), -s.stake()))
            .collect::<Vec<_>>();
        log::debug!("[holdem] {} closed, pot {}", hand.round, hand.pot);
        if !changes.is_empty() {
            self.outbox.push(Output::Chips(changes));
        }
        self.broadcast(Event::RoundEnd(self.view()));
        if let Some(hand) = self.hand.as_mut() {
            hand.seats.iter_mut().for_each(Seat::reset_round);
            hand.current_bet = 0;
            hand.turn = None;
        }
    }
    fn open_round(&mut self) {
        if let Some(hand) = self.hand.as_mut() {
            hand.round = hand.round.next();
            hand.revealed = hand.round.revealed();
            hand.current = hand.seats.next(hand.dealer);
        }
        self.progress();
    }
    /// Reveals what is left of the board when the pot is contested,
    /// then settles it.
    fn showdown(&mut self) {
        let contested = self
            .hand
            .as_ref()
            .is_some_and(|h| h.seats.live().count() > 1);
        if contested {
            while self.hand.as_ref().is_some_and(|h| h.round < Round::Showdown) {
                self.open_round();
            }
            self.settle();
        } else {
            if let Some(hand) = self.hand.as_mut() {
                hand.round = Round::Showdown;
            }
            self.concede();
        }
        if let Some(hand) = self.hand.as_mut() {
            hand.complete = true;
            hand.turn = None;
        }
        self.phase = Phase::Ending;
    }
    /// Uncontested: the last live seat takes the pot.
    fn concede(&mut self) {
        let Some(hand) = self.hand.as_mut() else {
            return;
        };
        let Some((position, player)) = hand
            .seats
            .live()
            .next()
            .map(|s| (s.position(), s.player().clone()))
        else {
            return;
        };
        let amount = hand.pot;
        hand.awarded += amount;
        hand.pot = 0;
        if let Some(p) = self.roster.get_mut(&position) {
            p.deposit(amount);
        }
        log::info!("[holdem] {} wins {} uncontested", player, amount);
        self.outbox.push(Output::Chips(vec![ChipChange::new(player.clone(), amount)]));
        self.broadcast(Event::Winner(Winner {
            winner_id: player,
            amount,
            reason: "uncontested".to_string(),
        }));
    }
    /// Contested: evaluate live hands and split layered side pots.
    fn settle(&mut self) {
        let Some(hand) = self.hand.as_mut() else {
            return;
        };
        let claims = hand
            .seats
            .walk(hand.seats.next(hand.dealer))
            .map(|s| {
                let strength = (!s.folded())
                    .then(|| Strength::from(Hand::from([s.hole(), hand.board.as_slice()].concat())));
                Claim::new(s.position(), s.player().clone(), s.spent(), strength)
            })
            .collect::<Vec<_>>();
        let mut claims = Showdown::from(claims).settle();
        claims.sort_by_key(Claim::position);
        let pot = hand.pot;
        hand.awarded += claims.iter().map(Claim::reward).sum::<Chips>();
        hand.pot = 0;
        hand.shown = true;
        for claim in claims.iter().filter(|c| c.reward() > 0) {
            if let Some(p) = self.roster.get_mut(&claim.position()) {
                p.deposit(claim.reward());
            }
        }
        let winners = claims
            .iter()
            .filter(|c| c.reward() > 0)
            .filter_map(|c| {
                c.strength().map(|s| HandResult {
                    player_id: c.player().clone(),
                    rank: s.category(),
                    high_cards: s.tiebreakers().to_vec(),
                    amount: c.reward(),
                })
            })
            .collect::<Vec<_>>();
        let changes = claims
            .iter()
            .filter(|c| c.reward() > 0)
            .map(|c| ChipChange::new(c.player().clone(), c.reward()))
            .collect::<Vec<_>>();
        log::info!("[holdem] showdown, {} winners of {}", winners.len(), pot);
        if !changes.is_empty() {
            self.outbox.push(Output::Chips(changes));
        }
        let game_state = self.view();
        self.broadcast(Event::Showdown(ShowdownResult {
            winners,
            pot,
            game_state,
        }));
    }
    fn broadcast(&mut self, event: Event) {
        let view = self.view();
        self.outbox.push(Output::Broadcast { event, view });
    }
    fn unicast(&mut self, to: PlayerId, event: Event) {
        let view = self.view();
        self.outbox.push(Output::Unicast { to, event, view });
    }
}

/// Snapshots.
impl Holdem {
    /// Full snapshot with every hole card present; mask before sending.
    pub fn view(&self) -> GameView {
        let hand = self.hand.as_ref();
        let players = self
            .roster
            .values()
            .map(|p| {
                let position = p.position();
                let seat = hand.and_then(|h| h.seats.get(position));
                let live = seat.is_some_and(|s| !s.folded());
                PlayerView {
                    id: p.id().clone(),
                    status: p.status(),
                    position,
                    name: p.player().username.clone(),
                    balance: p.balance(),
                    hand: seat.map(|s| s.hole().to_vec()).unwrap_or_default(),
                    is_folded: seat.is_some_and(Seat::folded),
                    is_all_in: live && p.balance() == 0,
                    is_dealer: hand.is_some_and(|h| h.dealer == position),
                    is_small_blind: hand.is_some_and(|h| h.small_blind == position),
                    is_big_blind: hand.is_some_and(|h| h.big_blind == position),
                    is_current_turn: hand.is_some_and(|h| h.turn == Some(position)),
                    current_bet_in_round: seat.map(Seat::stake).unwrap_or_default(),
                    shown: live && hand.is_some_and(|h| h.shown),
                }
            })
            .collect();
        GameView {
            players,
            community_cards: hand
                .map(|h| h.board[..h.revealed].to_vec())
                .unwrap_or_default(),
            pot: self.pot(),
            current_bet: self.current_bet(),
            current_round: self.round().unwrap_or_default(),
            small_blind_amount: self.stakes.small_blind(),
            big_blind_amount: self.stakes.big_blind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn id(i: usize) -> PlayerId {
        PlayerId::from(format!("p{}", i))
    }
    fn table(seats: &[(Position, Chips)]) -> Holdem {
        let mut game = Holdem::new(Rules::default());
        for (position, chips) in seats {
            let player = Player::new(id(*position), "", *chips);
            game.add_player(*position, player).unwrap();
        }
        game
    }
    fn stack(cards: &str) -> Deck {
        Deck::stacked(
            cards
                .split_whitespace()
                .map(|c| Card::try_from(c).unwrap())
                .collect(),
        )
    }
    fn balance(game: &Holdem, i: usize) -> Chips {
        game.participant(&id(i)).map(Participant::balance).unwrap()
    }
    fn chips(outputs: &[Output]) -> Vec<Vec<ChipChange>> {
        outputs
            .iter()
            .filter_map(|o| match o {
                Output::Chips(changes) => Some(changes.clone()),
                _ => None,
            })
            .collect()
    }
    fn events(outputs: &[Output]) -> Vec<Event> {
        outputs
            .iter()
            .filter_map(|o| match o {
                Output::Broadcast { event, .. } => Some(event.clone()),
                Output::Unicast { event, .. } => Some(event.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn seating_errors() {
        let mut game = table(&[(0, 100), (1, 100)]);
        let again = Player::new(id(0), "", 100);
        assert_eq!(game.add_player(2, again), Err(HoldemError::PlayerAlreadySeated));
        let taken = Player::new(id(9), "", 100);
        assert_eq!(game.add_player(1, taken), Err(HoldemError::PositionTaken));
        let outside = Player::new(id(9), "", 100);
        assert_eq!(game.add_player(7, outside), Err(HoldemError::InvalidPosition));
        for i in 2..5 {
            game.add_player(i, Player::new(id(i), "", 100)).unwrap();
        }
        let extra = Player::new(id(9), "", 100);
        assert_eq!(game.add_player(4, extra), Err(HoldemError::TableFull));
    }

    #[test]
    fn cannot_start_alone() {
        let mut game = table(&[(0, 100)]);
        assert!(!game.can_start());
        assert_eq!(game.start(Deck::new()), Err(HoldemError::GameNotReady));
    }

    #[test]
    fn heads_up_big_blind_wins_uncontested() {
        let mut game = table(&[(0, 500), (1, 500)]);
        assert_eq!(game.start(Deck::new()), Ok(Step::Dealt));
        assert_eq!(game.dealer(), Some(0));
        assert_eq!(game.pot(), 15);
        assert_eq!(game.prompt(), Step::Await(0));
        game.drain();
        assert_eq!(game.act(&id(0), Move::Fold, 0), Ok(Step::Settled));
        assert_eq!(balance(&game, 0), 495);
        assert_eq!(balance(&game, 1), 505);
        let outputs = game.drain();
        assert_eq!(
            chips(&outputs),
            vec![
                vec![ChipChange::new(id(0), -5), ChipChange::new(id(1), -10)],
                vec![ChipChange::new(id(1), 15)],
            ]
        );
        assert!(events(&outputs).iter().any(|e| matches!(
            e,
            Event::Winner(w) if w.winner_id == id(1) && w.amount == 15 && w.reason == "uncontested"
        )));
    }

    #[test]
    fn flop_all_in_best_hand_wins() {
        // p1 Kd Kc, p0 As Ah; board 2c 7d 9s 3h 4s with burns between
        let deck = stack("Kd As Kc Ah 5c 2c 7d 9s 6c 3h 8c 4s");
        let mut game = table(&[(0, 100), (1, 100)]);
        game.start(deck).unwrap();
        assert_eq!(game.prompt(), Step::Await(0));
        assert_eq!(game.act(&id(0), Move::Call, 0), Ok(Step::Await(1)));
        assert_eq!(game.act(&id(1), Move::Check, 0), Ok(Step::Await(1)));
        assert_eq!(game.round(), Some(Round::Flop));
        assert_eq!(game.act(&id(1), Move::Check, 0), Ok(Step::Await(0)));
        assert_eq!(game.act(&id(0), Move::AllIn, 0), Ok(Step::Await(1)));
        assert_eq!(game.to_call(), 90);
        assert_eq!(game.act(&id(1), Move::Call, 0), Ok(Step::Settled));
        assert_eq!(balance(&game, 0), 200);
        assert_eq!(balance(&game, 1), 0);
        let events = events(&game.drain());
        let reveals = events
            .iter()
            .filter_map(|e| match e {
                Event::RoundProgress(p) => Some((p.round, p.cards.len())),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(
            reveals,
            vec![
                (Round::PreFlop, 0),
                (Round::Flop, 3),
                (Round::Turn, 4),
                (Round::River, 5),
                (Round::Showdown, 5),
            ]
        );
        let showdown = events.iter().find_map(|e| match e {
            Event::Showdown(s) => Some(s.clone()),
            _ => None,
        });
        let showdown = showdown.unwrap();
        assert_eq!(showdown.pot, 200);
        assert_eq!(showdown.winners.len(), 1);
        assert_eq!(showdown.winners[0].player_id, id(0));
        assert_eq!(showdown.winners[0].rank, Category::OnePair);
        assert_eq!(showdown.winners[0].high_cards[0], 14);
    }

    #[test]
    fn three_way_side_pot() {
        // deal order starts left of dealer 0: p1, p2, p0
        let deck = stack("Ks Qs As Kh Qh Ah 5h 2c 7d 9c 6h 3d 8h 4s");
        let mut game = table(&[(0, 50), (1, 100), (2, 200)]);
        game.start(deck).unwrap();
        assert_eq!(game.prompt(), Step::Await(0));
        assert_eq!(game.act(&id(0), Move::AllIn, 0), Ok(Step::Await(1)));
        assert_eq!(game.act(&id(1), Move::AllIn, 0), Ok(Step::Await(2)));
        assert_eq!(game.act(&id(2), Move::AllIn, 0), Ok(Step::Settled));
        assert_eq!(balance(&game, 0), 150);
        assert_eq!(balance(&game, 1), 100);
        assert_eq!(balance(&game, 2), 100);
        assert_eq!(game.pot(), 0);
        assert_eq!(game.awarded(), 350);
    }

    #[test]
    fn timeout_checks_when_nothing_owed() {
        let mut game = table(&[(0, 500), (1, 500)]);
        game.start(Deck::new()).unwrap();
        game.prompt();
        game.act(&id(0), Move::Call, 0).unwrap();
        assert_eq!(game.act(&id(1), Move::Raise, 20), Ok(Step::Await(0)));
        assert_eq!(game.act(&id(0), Move::Call, 0), Ok(Step::Await(1)));
        assert_eq!(game.round(), Some(Round::Flop));
        assert_eq!(game.current_bet(), 0);
        game.drain();
        assert_eq!(game.expire(), Step::Await(0));
        let events = events(&game.drain());
        assert!(events.contains(&Event::PlayerAction(PlayerAction {
            player_id: id(1),
            action: Move::Check,
            amount: 0,
        })));
    }

    #[test]
    fn timeout_folds_when_short() {
        let mut game = table(&[(0, 500), (1, 100)]);
        game.start(Deck::new()).unwrap();
        game.prompt();
        game.act(&id(0), Move::Raise, 400).unwrap();
        assert_eq!(game.to_call(), 390);
        assert_eq!(game.expire(), Step::Settled);
        assert_eq!(balance(&game, 1), 90);
        assert_eq!(balance(&game, 0), 510);
    }

    #[test]
    fn mid_hand_leave_forfeits_contribution() {
        let mut game = table(&[(0, 500), (1, 500), (2, 500)]);
        game.start(Deck::new()).unwrap();
        assert_eq!(game.prompt(), Step::Await(0));
        assert_eq!(game.act(&id(0), Move::Raise, 40), Ok(Step::Await(1)));
        assert_eq!(game.act(&id(1), Move::Call, 0), Ok(Step::Await(2)));
        assert_eq!(game.remove_player(&id(1)), Ok(Step::Await(2)));
        let leaver = game.participant(&id(1)).unwrap();
        assert_eq!(leaver.status(), Status::Inactive);
        assert_eq!(game.pot(), 90);
        assert_eq!(game.act(&id(2), Move::Call, 0), Ok(Step::Await(2)));
        assert_eq!(game.pot(), 120);
        let mut step = Step::Await(2);
        while let Step::Await(_) = step {
            step = game.expire();
        }
        assert_eq!(step, Step::Settled);
        assert_eq!(balance(&game, 0) + balance(&game, 2), 1040);
        assert_eq!(game.next_hand(Deck::new()), Ok(Step::Dealt));
        assert!(game.participant(&id(1)).is_none());
    }

    #[test]
    fn short_stack_is_reaped_with_notice() {
        let mut game = table(&[(0, 500), (1, 14), (2, 500)]);
        game.start(Deck::new()).unwrap();
        assert_eq!(game.prompt(), Step::Await(0));
        assert_eq!(game.act(&id(0), Move::Fold, 0), Ok(Step::Await(1)));
        assert_eq!(game.act(&id(1), Move::Fold, 0), Ok(Step::Settled));
        assert_eq!(balance(&game, 1), 9);
        game.drain();
        assert_eq!(game.next_hand(Deck::new()), Ok(Step::Dealt));
        assert!(game.participant(&id(1)).is_none());
        let reaped = game
            .drain()
            .into_iter()
            .filter(|o| matches!(o, Output::Reaped { .. }))
            .collect::<Vec<_>>();
        assert_eq!(
            reaped,
            vec![Output::Reaped {
                player: id(1),
                balance: 9
            }]
        );
    }

    #[test]
    fn leaver_is_reaped_quietly() {
        let mut game = table(&[(0, 500), (1, 500), (2, 500)]);
        game.start(Deck::new()).unwrap();
        assert_eq!(game.prompt(), Step::Await(0));
        assert_eq!(game.remove_player(&id(1)), Ok(Step::Await(0)));
        assert_eq!(game.act(&id(0), Move::Fold, 0), Ok(Step::Settled));
        game.drain();
        game.next_hand(Deck::new()).unwrap();
        assert!(!game.drain().iter().any(|o| matches!(o, Output::Reaped { .. })));
    }

    #[test]
    fn leaving_current_seat_passes_turn() {
        let mut game = table(&[(0, 500), (1, 500), (2, 500)]);
        game.start(Deck::new()).unwrap();
        assert_eq!(game.prompt(), Step::Await(0));
        assert_eq!(game.remove_player(&id(0)), Ok(Step::Await(1)));
    }

    #[test]
    fn heads_up_leave_ends_hand() {
        let mut game = table(&[(0, 500), (1, 500)]);
        game.start(Deck::new()).unwrap();
        assert_eq!(game.prompt(), Step::Await(0));
        assert_eq!(game.remove_player(&id(1)), Ok(Step::Settled));
        assert_eq!(balance(&game, 0), 510);
        assert_eq!(game.next_hand(Deck::new()), Ok(Step::Idle));
        assert_eq!(game.phase(), Phase::Waiting);
    }

    #[test]
    fn round_close_publishes_round_bets() {
        let mut game = table(&[(0, 500), (1, 500)]);
        game.start(Deck::new()).unwrap();
        game.prompt();
        game.act(&id(0), Move::Call, 0).unwrap();
        game.act(&id(1), Move::Check, 0).unwrap();
        game.drain();
        assert_eq!(game.act(&id(1), Move::Check, 0), Ok(Step::Await(0)));
        assert_eq!(game.act(&id(0), Move::Bet, 20), Ok(Step::Await(1)));
        assert_eq!(game.act(&id(1), Move::Call, 0), Ok(Step::Await(1)));
        assert_eq!(game.round(), Some(Round::Turn));
        let outputs = game.drain();
        assert_eq!(
            chips(&outputs),
            vec![vec![ChipChange::new(id(0), -20), ChipChange::new(id(1), -20)]]
        );
    }

    #[test]
    fn checked_round_publishes_nothing() {
        let mut game = table(&[(0, 500), (1, 500)]);
        game.start(Deck::new()).unwrap();
        game.prompt();
        game.act(&id(0), Move::Call, 0).unwrap();
        game.act(&id(1), Move::Check, 0).unwrap();
        game.drain();
        game.act(&id(1), Move::Check, 0).unwrap();
        game.act(&id(0), Move::Check, 0).unwrap();
        assert!(chips(&game.drain()).is_empty());
    }

    #[test]
    fn out_of_turn_is_refused() {
        let mut game = table(&[(0, 500), (1, 500)]);
        game.start(Deck::new()).unwrap();
        game.prompt();
        let pot = game.pot();
        assert_eq!(game.act(&id(1), Move::AllIn, 0), Err(HoldemError::NotYourTurn));
        assert_eq!(game.pot(), pot);
        assert_eq!(game.current(), Some(0));
    }

    #[test]
    fn invalid_action_is_reported_and_folded() {
        let mut game = table(&[(0, 500), (1, 500)]);
        game.start(Deck::new()).unwrap();
        game.prompt();
        game.drain();
        assert_eq!(game.act(&id(0), Move::Check, 0), Ok(Step::Settled));
        let outputs = game.drain();
        assert!(outputs.iter().any(|o| matches!(
            o,
            Output::Reject { to, error: HoldemError::InvalidAction(_) } if *to == id(0)
        )));
        assert_eq!(balance(&game, 1), 505);
    }

    #[test]
    fn raise_is_normalized_to_bet() {
        let mut game = table(&[(0, 500), (1, 500)]);
        game.start(Deck::new()).unwrap();
        game.prompt();
        game.act(&id(0), Move::Call, 0).unwrap();
        game.act(&id(1), Move::Check, 0).unwrap();
        game.drain();
        game.act(&id(1), Move::Raise, 30).unwrap();
        assert_eq!(game.current_bet(), 30);
        let events = events(&game.drain());
        assert!(events.contains(&Event::PlayerAction(PlayerAction {
            player_id: id(1),
            action: Move::Bet,
            amount: 30,
        })));
    }

    #[test]
    fn raise_below_minimum_is_refused() {
        let mut game = table(&[(0, 500), (1, 500), (2, 500)]);
        game.start(Deck::new()).unwrap();
        game.prompt();
        game.drain();
        game.act(&id(0), Move::Raise, 15).unwrap();
        let outputs = game.drain();
        assert!(outputs.iter().any(|o| matches!(o, Output::Reject { .. })));
        assert_eq!(game.participant(&id(0)).unwrap().status(), Status::Folded);
    }

    #[test]
    fn short_blind_is_all_in() {
        let mut game = Holdem::new(Rules {
            min_bet: 4,
            ..Rules::default()
        });
        game.add_player(0, Player::new(id(0), "", 500)).unwrap();
        game.add_player(1, Player::new(id(1), "", 7)).unwrap();
        game.start(Deck::new()).unwrap();
        assert_eq!(balance(&game, 1), 0);
        assert_eq!(game.pot(), 12);
        assert_eq!(game.prompt(), Step::Await(0));
        assert_eq!(game.act(&id(0), Move::Call, 0), Ok(Step::Settled));
    }

    #[test]
    fn waiting_players_join_next_hand() {
        let mut game = table(&[(0, 500), (1, 500)]);
        game.start(Deck::new()).unwrap();
        game.prompt();
        game.add_player(3, Player::new(id(3), "", 500)).unwrap();
        assert_eq!(game.participant(&id(3)).unwrap().status(), Status::Waiting);
        assert_eq!(game.act(&id(0), Move::Fold, 0), Ok(Step::Settled));
        assert_eq!(game.next_hand(Deck::new()), Ok(Step::Dealt));
        assert_eq!(game.participant(&id(3)).unwrap().status(), Status::Active);
        assert_eq!(game.dealer(), Some(1));
    }

    #[test]
    fn view_marks_positions() {
        let mut game = table(&[(0, 500), (2, 500), (4, 500)]);
        game.start(Deck::new()).unwrap();
        game.prompt();
        let view = game.view();
        let dealer = view.player(&id(0)).unwrap();
        let small = view.player(&id(2)).unwrap();
        let big = view.player(&id(4)).unwrap();
        assert!(dealer.is_dealer && dealer.is_current_turn);
        assert!(small.is_small_blind && small.current_bet_in_round == 5);
        assert!(big.is_big_blind && big.current_bet_in_round == 10);
        assert_eq!(view.pot, 15);
        assert!(view.community_cards.is_empty());
        let masked = view.masked(Some(&id(2)));
        assert!(masked.player(&id(0)).unwrap().hand.is_empty());
        assert_eq!(masked.player(&id(2)).unwrap().hand.len(), 2);
    }

    #[test]
    fn reset_keeps_stakes() {
        let mut game = Holdem::new(Rules {
            min_bet: 40,
            ..Rules::default()
        });
        game.add_player(0, Player::new(id(0), "", 500)).unwrap();
        game.add_player(1, Player::new(id(1), "", 500)).unwrap();
        game.start(Deck::new()).unwrap();
        game.reset();
        assert_eq!(game.phase(), Phase::Waiting);
        assert_eq!(game.participants().count(), 0);
        assert_eq!(game.stakes().small_blind(), 20);
        assert_eq!(game.stakes().big_blind(), 40);
    }

    #[test]
    fn dealer_visits_every_seat() {
        let positions = [0, 2, 3, 5];
        let seats = positions.map(|p| (p, 10_000));
        let mut game = table(&seats);
        let mut dealers = Vec::new();
        let mut step = game.start(Deck::new()).unwrap();
        for _ in 0..positions.len() {
            assert_eq!(step, Step::Dealt);
            dealers.extend(game.dealer());
            step = game.prompt();
            while let Step::Await(_) = step {
                step = game.expire();
            }
            assert_eq!(step, Step::Settled);
            step = game.next_hand(Deck::new()).unwrap();
        }
        dealers.sort();
        assert_eq!(dealers, positions.to_vec());
    }

    fn choose(game: &Holdem, rng: &mut SmallRng) -> (Move, Chips) {
        let position = game.current().unwrap();
        let balance = game.balance_at(position);
        let owed = game.to_call();
        let current = game.current_bet();
        let stake = current - owed;
        let big = game.stakes().big_blind();
        let minimum = (2 * current - stake).max(current + 1);
        let mut options = vec![(Move::Fold, 0), (Move::AllIn, 0)];
        match owed {
            0 => options.extend([(Move::Check, 0), (Move::Check, 0)]),
            _ => options.extend([(Move::Call, 0), (Move::Call, 0)]),
        }
        if current == 0 && balance >= big {
            options.push((Move::Bet, rng.random_range(big..=balance)));
        }
        if current > 0 && minimum <= balance {
            options.push((Move::Raise, rng.random_range(minimum..=balance)));
        }
        options[rng.random_range(0..options.len())]
    }

    #[test]
    fn random_traces_hold_invariants() {
        let ref mut rng = SmallRng::seed_from_u64(0xC0FFEE);
        for _ in 0..64 {
            let n = rng.random_range(2..=5usize);
            let seats = (0..n)
                .map(|p| (p, rng.random_range(10..=400)))
                .collect::<Vec<(Position, Chips)>>();
            let mut game = table(&seats);
            let mut deck = Deck::ordered();
            deck.shuffle(rng);
            let mut step = game.start(deck).unwrap();
            for _ in 0..16 {
                if step == Step::Idle {
                    break;
                }
                let before = game.participants().map(Participant::balance).sum::<Chips>() + game.pot();
                step = game.prompt();
                let mut guard = 0;
                while let Step::Await(position) = step {
                    let held = game.participants().map(Participant::balance).sum::<Chips>();
                    assert_eq!(held + game.pot(), before);
                    assert_eq!(game.pot(), game.contributions() - game.awarded());
                    let other = game
                        .participants()
                        .map(|p| p.id().clone())
                        .find(|p| Some(p) != game.to_act());
                    if let Some(other) = other {
                        let pot = game.pot();
                        assert_eq!(game.act(&other, Move::AllIn, 0), Err(HoldemError::NotYourTurn));
                        assert_eq!(game.pot(), pot);
                        assert_eq!(game.current(), Some(position));
                    }
                    let player = game.to_act().cloned().unwrap();
                    let (action, amount) = choose(&game, rng);
                    step = game.act(&player, action, amount).unwrap();
                    guard += 1;
                    assert!(guard < 500);
                }
                assert_eq!(step, Step::Settled);
                let after = game.participants().map(Participant::balance).sum::<Chips>();
                assert_eq!(after, before);
                assert_eq!(game.pot(), 0);
                assert_eq!(game.awarded(), game.contributions());
                for output in game.drain() {
                    if let Output::Broadcast {
                        event: Event::RoundEnd(view),
                        ..
                    } = output
                    {
                        view.players
                            .iter()
                            .filter(|p| !p.is_folded && !p.is_all_in)
                            .filter(|p| p.status == Status::Active)
                            .for_each(|p| assert_eq!(p.current_bet_in_round, view.current_bet));
                    }
                }
                let mut deck = Deck::ordered();
                deck.shuffle(rng);
                step = game.next_hand(deck).unwrap();
            }
        }
    }
}
