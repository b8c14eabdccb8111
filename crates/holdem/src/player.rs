use rtrp_core::*;
use serde::Deserialize;
use serde::Serialize;

/// Player profile as issued by the REST service.
/// `chips` is the bank balance used to seed the on-table balance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub profile_pic_url: String,
    #[serde(default)]
    pub chips: Chips,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, username: &str, chips: Chips) -> Self {
        Self {
            id: id.into(),
            username: username.to_string(),
            profile_pic_url: String::new(),
            chips,
        }
    }
}
