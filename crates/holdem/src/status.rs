use serde::Deserialize;
use serde::Serialize;

/// Per-player status at a table. Serialized as its ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Status {
    /// seated after the hand started, dealt in next hand
    Waiting = 0,
    Active = 1,
    /// left; reaped at the next hand boundary
    Inactive = 2,
    Folded = 3,
}

impl From<Status> for u8 {
    fn from(s: Status) -> u8 {
        s as u8
    }
}
impl TryFrom<u8> for Status {
    type Error = String;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Self::Waiting),
            1 => Ok(Self::Active),
            2 => Ok(Self::Inactive),
            3 => Ok(Self::Folded),
            n => Err(format!("invalid player status {}", n)),
        }
    }
}

/// Engine lifecycle.
///
/// Waiting -> Starting -> Started -> Ending -> (Started | Waiting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Waiting,
    Starting,
    Started,
    Ending,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Starting => write!(f, "starting"),
            Self::Started => write!(f, "started"),
            Self::Ending => write!(f, "ending"),
        }
    }
}
