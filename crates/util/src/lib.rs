//! Core identifiers, type aliases, and constants for realtime poker tables.
//!
//! This crate provides the foundational types shared by the engine,
//! the table runtime, the chip pipeline, and the socket gateway.

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Chip balances, bets, and signed chip deltas.
pub type Chips = i64;
/// Seat index at a table. Unique within a table, not necessarily contiguous.
pub type Position = usize;

// ============================================================================
// TABLE PARAMETERS
// ============================================================================
/// Floor for the small blind regardless of table min-bet.
pub const SMALL_BLIND_FLOOR: Chips = 5;
/// Floor for the big blind regardless of table min-bet.
pub const BIG_BLIND_FLOOR: Chips = 10;
/// Cards dealt to each seat.
pub const HOLE_CARDS: usize = 2;
/// Community cards precomputed per hand.
pub const BOARD_CARDS: usize = 5;
/// Seconds a player has to act before a default action is taken.
pub const TURN_TIMEOUT: u64 = 10;
/// Milliseconds between a settled hand and the next deal.
pub const HAND_PAUSE: u64 = 1000;
/// Milliseconds between the deal and the first turn prompt.
pub const DEAL_PAUSE: u64 = 500;
/// Bounded outbound frame queue per socket.
pub const OUTBOX_CAPACITY: usize = 256;
/// Seconds in-flight hands get to finish during shutdown.
pub const SHUTDOWN_GRACE: u64 = 5;

// ============================================================================
// DEFAULT ROOM
// ============================================================================
pub const DEFAULT_ROOM_ID: &str = "room_1";
pub const DEFAULT_ROOM_NAME: &str = "Default Room";
pub const DEFAULT_ROOM_CAPACITY: usize = 100;
pub const DEFAULT_GAME_CAPACITY: usize = 5;
pub const DEFAULT_MIN_BET: Chips = 10;

// ============================================================================
// CHIP BUS TOPOLOGY
// ============================================================================
/// Durable topic exchange carrying chip deltas.
pub const CHIP_EXCHANGE: &str = "poker.game.events";
/// Durable queue drained by the chip consumer.
pub const CHIP_QUEUE: &str = "chip_updates_db";
/// Binding pattern covering every game type and room.
pub const CHIP_BINDING: &str = "poker.game.*.chip_update.*";

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use serde::Deserialize;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
    /// Cast ID<T> to ID<U> while preserving the underlying UUID.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            inner: uuid::Uuid::now_v7(),
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}
impl<'de, T> Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        uuid::Uuid::deserialize(deserializer).map(Self::from)
    }
}

/// Player identifier issued by the REST service.
/// Opaque string; the gateway never interprets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

/// Room identifier, e.g. `room_1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }
        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}
string_id!(PlayerId);
string_id!(RoomId);

/// One signed balance change inside a chip-delta batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipChange {
    pub player_id: PlayerId,
    pub change: Chips,
}

impl ChipChange {
    pub fn new(player_id: PlayerId, change: Chips) -> Self {
        Self { player_id, change }
    }
}

/// Game variant tag carried on the wire and in chip routing keys.
/// Hold'em is the only implemented variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum GameType {
    #[default]
    Holdem = 1,
}

impl From<GameType> for u8 {
    fn from(g: GameType) -> u8 {
        g as u8
    }
}
impl TryFrom<u8> for GameType {
    type Error = String;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::Holdem),
            n => Err(format!("unknown game type {}", n)),
        }
    }
}
impl Display for GameType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() -> std::io::Result<()> {
    std::fs::create_dir_all("logs")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time))?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).map_err(std::io::Error::other)
}
