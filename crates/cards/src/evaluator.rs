use super::category::Category;
use super::hand::Hand;
use super::rank::Rank;
use super::strength::Strength;
use super::suit::Suit;

const WHEEL: u16 = 0b_1000000001111;

/// A lazy evaluator for a hand's strength.
///
/// Using the compact bitset representation of the Hand, we search
/// categories from strongest to weakest with rank and suit masks.
/// Works for any number of cards up to seven.
pub struct Evaluator(Hand);
impl From<Hand> for Evaluator {
    fn from(h: Hand) -> Self {
        Self(h)
    }
}

impl Evaluator {
    pub fn strength(&self) -> Strength {
        None.or_else(|| self.find_straight_flush())
            .or_else(|| self.find_4_oak())
            .or_else(|| self.find_3_oak_2_oak())
            .or_else(|| self.find_flush())
            .or_else(|| self.find_straight())
            .or_else(|| self.find_3_oak())
            .or_else(|| self.find_2_oak_2_oak())
            .or_else(|| self.find_2_oak())
            .unwrap_or_else(|| self.find_1_oak())
    }

    fn find_1_oak(&self) -> Strength {
        Strength::from((Category::HighCard, self.kickers(&[], 5)))
    }
    fn find_2_oak(&self) -> Option<Strength> {
        self.find_rank_of_n_oak(2, &[]).map(|pair| {
            let mut breaks = vec![pair.value()];
            breaks.extend(self.kickers(&[pair], 3));
            Strength::from((Category::OnePair, breaks))
        })
    }
    fn find_3_oak(&self) -> Option<Strength> {
        self.find_rank_of_n_oak(3, &[]).map(|trips| {
            let mut breaks = vec![trips.value()];
            breaks.extend(self.kickers(&[trips], 2));
            Strength::from((Category::ThreeOfAKind, breaks))
        })
    }
    fn find_4_oak(&self) -> Option<Strength> {
        self.find_rank_of_n_oak(4, &[]).map(|quads| {
            let mut breaks = vec![quads.value()];
            breaks.extend(self.kickers(&[quads], 1));
            Strength::from((Category::FourOfAKind, breaks))
        })
    }
    fn find_2_oak_2_oak(&self) -> Option<Strength> {
        self.find_rank_of_n_oak(2, &[]).and_then(|hi| {
            self.find_rank_of_n_oak(2, &[hi]).map(|lo| {
                let mut breaks = vec![hi.value(), lo.value()];
                breaks.extend(self.kickers(&[hi, lo], 1));
                Strength::from((Category::TwoPair, breaks))
            })
        })
    }
    fn find_3_oak_2_oak(&self) -> Option<Strength> {
        self.find_rank_of_n_oak(3, &[]).and_then(|trips| {
            self.find_rank_of_n_oak(2, &[trips]).map(|pair| {
                Strength::from((Category::FullHouse, vec![trips.value(), pair.value()]))
            })
        })
    }
    fn find_straight(&self) -> Option<Strength> {
        self.find_rank_of_straight(self.0)
            .map(|top| Strength::from((Category::Straight, vec![top.value()])))
    }
    fn find_flush(&self) -> Option<Strength> {
        self.find_suit_of_flush().map(|suit| {
            let ranks = u16::from(self.0.of(&suit));
            let breaks = Rank::all()
                .rev()
                .filter(|r| ranks & u16::from(*r) != 0)
                .take(5)
                .map(|r| r.value())
                .collect();
            Strength::from((Category::Flush, breaks))
        })
    }
    fn find_straight_flush(&self) -> Option<Strength> {
        self.find_suit_of_flush().and_then(|suit| {
            self.find_rank_of_straight(self.0.of(&suit))
                .map(|top| match top {
                    Rank::Ace => Strength::from((Category::RoyalFlush, vec![top.value()])),
                    _ => Strength::from((Category::StraightFlush, vec![top.value()])),
                })
        })
    }

    fn find_rank_of_straight(&self, hand: Hand) -> Option<Rank> {
        let ranks = u16::from(hand);
        let mut bits = ranks;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        if bits > 0 {
            Some(Rank::from(bits))
        } else if WHEEL == (WHEEL & ranks) {
            Some(Rank::Five)
        } else {
            None
        }
    }
    fn find_suit_of_flush(&self) -> Option<Suit> {
        Suit::all()
            .into_iter()
            .find(|suit| self.0.of(suit).size() >= 5)
    }
    /// highest rank held at least `n` times, ignoring `skip`
    fn find_rank_of_n_oak(&self, n: u32, skip: &[Rank]) -> Option<Rank> {
        Rank::all()
            .rev()
            .filter(|r| !skip.contains(r))
            .find(|r| (u64::from(self.0) & u64::from(*r)).count_ones() >= n)
    }
    /// highest `n` distinct ranks present, ignoring `used`
    fn kickers(&self, used: &[Rank], n: usize) -> Vec<u8> {
        let ranks = u16::from(self.0);
        Rank::all()
            .rev()
            .filter(|r| !used.contains(r))
            .filter(|r| ranks & u16::from(*r) != 0)
            .take(n)
            .map(|r| r.value())
            .collect()
    }
}
