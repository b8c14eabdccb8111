use rtrp_core::*;

/// Blind amounts derived once from the table min-bet.
/// Preserved across hands and engine resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stakes {
    min_bet: Chips,
    small: Chips,
    big: Chips,
}

impl From<Chips> for Stakes {
    fn from(min_bet: Chips) -> Self {
        Self {
            min_bet,
            small: (min_bet / 2).max(SMALL_BLIND_FLOOR),
            big: min_bet.max(BIG_BLIND_FLOOR),
        }
    }
}

impl Stakes {
    pub fn min_bet(&self) -> Chips {
        self.min_bet
    }
    pub fn small_blind(&self) -> Chips {
        self.small
    }
    pub fn big_blind(&self) -> Chips {
        self.big
    }
}

/// Static table parameters handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    pub capacity: usize,
    pub min_bet: Chips,
    /// seconds advertised in turn prompts
    pub timeout: u64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_GAME_CAPACITY,
            min_bet: DEFAULT_MIN_BET,
            timeout: TURN_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn blinds_from_min_bet() {
        let stakes = Stakes::from(10);
        assert_eq!(stakes.small_blind(), 5);
        assert_eq!(stakes.big_blind(), 10);
        let stakes = Stakes::from(50);
        assert_eq!(stakes.small_blind(), 25);
        assert_eq!(stakes.big_blind(), 50);
    }
    #[test]
    fn blinds_have_floors() {
        let stakes = Stakes::from(2);
        assert_eq!(stakes.small_blind(), 5);
        assert_eq!(stakes.big_blind(), 10);
        assert_eq!(stakes.min_bet(), 2);
    }
}
