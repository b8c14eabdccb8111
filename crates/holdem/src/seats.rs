use super::*;
use rtrp_core::*;
use std::collections::BTreeMap;

/// Ring of seats for the current hand.
///
/// An arena keyed by position. `next` and `prev` walk the ordered set
/// of seated positions cyclically, so gaps left by reaped players are
/// skipped naturally.
#[derive(Debug, Clone, Default)]
pub struct Seats(BTreeMap<Position, Seat>);

impl FromIterator<Seat> for Seats {
    fn from_iter<I: IntoIterator<Item = Seat>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| (s.position(), s)).collect())
    }
}

impl Seats {
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn get(&self, pos: Position) -> Option<&Seat> {
        self.0.get(&pos)
    }
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Seat> {
        self.0.get_mut(&pos)
    }
    pub fn find(&self, player: &PlayerId) -> Option<&Seat> {
        self.0.values().find(|s| s.player() == player)
    }
    pub fn iter(&self) -> impl Iterator<Item = &Seat> {
        self.0.values()
    }
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Seat> {
        self.0.values_mut()
    }
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.0.keys().copied()
    }
    /// The seated position after `pos`, wrapping around.
    pub fn next(&self, pos: Position) -> Position {
        self.0
            .range(pos + 1..)
            .next()
            .or_else(|| self.0.iter().next())
            .map(|(p, _)| *p)
            .unwrap_or(pos)
    }
    /// The seated position before `pos`, wrapping around.
    pub fn prev(&self, pos: Position) -> Position {
        self.0
            .range(..pos)
            .next_back()
            .or_else(|| self.0.iter().next_back())
            .map(|(p, _)| *p)
            .unwrap_or(pos)
    }
    /// Every seat once, starting at `from` and following the ring.
    pub fn walk(&self, from: Position) -> impl Iterator<Item = &Seat> {
        self.0.range(from..).chain(self.0.range(..from)).map(|(_, s)| s)
    }
    /// Seats still holding cards.
    pub fn live(&self) -> impl Iterator<Item = &Seat> {
        self.iter().filter(|s| !s.folded())
    }
}
