use rtrp_cards::*;
use rtrp_core::*;

/// One seat's stake in a settlement.
/// Folded seats carry no strength but their chips still fund the layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    position: Position,
    player: PlayerId,
    risked: Chips,
    strength: Option<Strength>,
    reward: Chips,
}

impl Claim {
    pub fn new(
        position: Position,
        player: PlayerId,
        risked: Chips,
        strength: Option<Strength>,
    ) -> Self {
        Self {
            position,
            player,
            risked,
            strength,
            reward: 0,
        }
    }
    pub fn position(&self) -> Position {
        self.position
    }
    pub fn player(&self) -> &PlayerId {
        &self.player
    }
    pub fn risked(&self) -> Chips {
        self.risked
    }
    pub fn reward(&self) -> Chips {
        self.reward
    }
    pub fn strength(&self) -> Option<&Strength> {
        self.strength.as_ref()
    }
    pub fn folded(&self) -> bool {
        self.strength.is_none()
    }
    fn add(&mut self, chips: Chips) {
        self.reward += chips;
    }
}

/// Computes chip distributions at showdown.
///
/// Walks strength tiers from the best hand down. Each tier collects
/// layered side pots: a layer up to level `l` takes `min(risked, l)`
/// beyond what was already paid out from every contributor, folded or
/// not, and splits it among tier members who risked at least `l`.
/// Odd chips go to the first eligible winner, so claims must be
/// ordered starting at the dealer's left.
pub struct Showdown {
    claims: Vec<Claim>,
    distributing: Chips,
    distributed: Chips,
    best: Option<Strength>,
}

impl From<Vec<Claim>> for Showdown {
    fn from(claims: Vec<Claim>) -> Self {
        Self {
            claims,
            distributing: 0,
            distributed: 0,
            best: None,
        }
    }
}

impl Showdown {
    /// Distributes all chips and returns the claims with rewards filled in.
    pub fn settle(mut self) -> Vec<Claim> {
        'winners: while let Some(strength) = self.strongest() {
            self.best = Some(strength);
            'pots: while let Some(amount) = self.remaining() {
                self.distributing = amount;
                self.distribute();
                if self.is_complete() {
                    break 'winners;
                } else {
                    continue 'pots;
                }
            }
        }
        self.sweep();
        self.claims
    }
    fn strongest(&self) -> Option<Strength> {
        self.claims
            .iter()
            .filter_map(|c| c.strength())
            .filter(|s| self.best.as_ref().is_none_or(|best| *s < best))
            .max()
            .cloned()
    }
    fn remaining(&mut self) -> Option<Chips> {
        self.distributed = self.distributing;
        self.claims
            .iter()
            .filter(|c| c.strength() == self.best.as_ref())
            .filter(|c| c.risked() > self.distributed)
            .map(|c| c.risked())
            .min()
    }
    fn winnings(&self) -> Chips {
        self.claims
            .iter()
            .map(|c| c.risked())
            .map(|r| std::cmp::min(r, self.distributing))
            .map(|r| (r - self.distributed).max(0))
            .sum()
    }
    fn distribute(&mut self) {
        let chips = self.winnings();
        let best = self.best.clone();
        let floor = self.distributed;
        let mut winners = self
            .claims
            .iter_mut()
            .filter(|c| !c.folded())
            .filter(|c| c.strength == best)
            .filter(|c| c.risked() > floor)
            .collect::<Vec<&mut Claim>>();
        let n = winners.len() as Chips;
        if n == 0 {
            return;
        }
        let share = chips / n;
        let bonus = chips % n;
        for winner in winners.iter_mut() {
            winner.add(share);
        }
        if let Some(first) = winners.first_mut() {
            first.add(bonus);
        }
    }
    /// chips risked above every contender's level, e.g. by a seat that
    /// folded after out-betting everyone, go to the best hand
    fn sweep(&mut self) {
        let leftover = self.staked() - self.rewarded();
        if leftover <= 0 {
            return;
        }
        let best = self.claims.iter().filter_map(|c| c.strength()).max().cloned();
        if let Some(winner) = self
            .claims
            .iter_mut()
            .find(|c| !c.folded() && c.strength == best)
        {
            winner.add(leftover);
        }
    }
    fn staked(&self) -> Chips {
        self.claims.iter().map(|c| c.risked()).sum()
    }
    fn rewarded(&self) -> Chips {
        self.claims.iter().map(|c| c.reward()).sum()
    }
    fn is_complete(&self) -> bool {
        self.staked() == self.rewarded()
    }
}
