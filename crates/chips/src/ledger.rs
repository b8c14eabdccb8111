use super::*;
use rtrp_core::*;
use std::collections::HashMap;
use std::collections::HashSet;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Books {
    published: Vec<ChipUpdate>,
    failures: usize,
    balances: HashMap<PlayerId, Chips>,
    processed: HashSet<ID<ChipUpdate>>,
}

/// In-memory chip sink and bank.
///
/// Records every published update and keeps balances with the same
/// clamping and dedup rules as the Postgres applier. Can be primed to
/// fail a number of publishes.
#[derive(Debug, Default)]
pub struct Ledger {
    books: Mutex<Books>,
}

impl Ledger {
    /// A ledger whose next `failures` publishes are refused.
    pub fn failing(failures: usize) -> Self {
        Self {
            books: Mutex::new(Books {
                failures,
                ..Books::default()
            }),
        }
    }
    pub fn with_balances(balances: impl IntoIterator<Item = (PlayerId, Chips)>) -> Self {
        Self {
            books: Mutex::new(Books {
                balances: balances.into_iter().collect(),
                ..Books::default()
            }),
        }
    }
    pub async fn published(&self) -> Vec<ChipUpdate> {
        self.books.lock().await.published.clone()
    }
    pub async fn balance(&self, player: &PlayerId) -> Option<Chips> {
        self.books.lock().await.balances.get(player).copied()
    }
}

#[async_trait::async_trait]
impl ChipSink for Ledger {
    async fn publish(&self, update: &ChipUpdate) -> anyhow::Result<()> {
        let mut books = self.books.lock().await;
        if books.failures > 0 {
            books.failures -= 1;
            anyhow::bail!("ledger refused {}", update.message_id);
        }
        books.published.push(update.clone());
        Ok(())
    }
}

#[async_trait::async_trait]
impl Bank for Ledger {
    async fn apply(&mut self, update: &ChipUpdate) -> anyhow::Result<Applied> {
        let books = self.books.get_mut();
        if !books.processed.insert(update.message_id) {
            return Ok(Applied::Duplicate);
        }
        for change in update.player_changes.iter() {
            if let Some(balance) = books.balances.get_mut(&change.player_id) {
                *balance = (*balance + change.change).max(0);
            }
        }
        Ok(Applied::Fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(changes: &[(&str, Chips)]) -> ChipUpdate {
        ChipUpdate::new(
            GameType::Holdem,
            RoomId::from("room_1"),
            changes
                .iter()
                .map(|(p, c)| ChipChange::new(PlayerId::from(*p), *c))
                .collect(),
        )
    }

    #[tokio::test]
    async fn applies_and_clamps() {
        let mut ledger = Ledger::with_balances([(PlayerId::from("a"), 100), (PlayerId::from("b"), 10)]);
        let batch = update(&[("a", -40), ("b", -25)]);
        assert_eq!(ledger.apply(&batch).await.unwrap(), Applied::Fresh);
        assert_eq!(ledger.balance(&PlayerId::from("a")).await, Some(60));
        assert_eq!(ledger.balance(&PlayerId::from("b")).await, Some(0));
    }

    #[tokio::test]
    async fn redelivery_is_skipped() {
        let mut ledger = Ledger::with_balances([(PlayerId::from("a"), 100)]);
        let batch = update(&[("a", 15)]);
        ledger.apply(&batch).await.unwrap();
        assert_eq!(ledger.apply(&batch).await.unwrap(), Applied::Duplicate);
        assert_eq!(ledger.balance(&PlayerId::from("a")).await, Some(115));
    }

    #[tokio::test]
    async fn unknown_players_are_ignored() {
        let mut ledger = Ledger::default();
        ledger.apply(&update(&[("ghost", 50)])).await.unwrap();
        assert_eq!(ledger.balance(&PlayerId::from("ghost")).await, None);
    }

    #[tokio::test]
    async fn primed_failures() {
        let ledger = Ledger::failing(1);
        let batch = update(&[("a", 1)]);
        assert!(ledger.publish(&batch).await.is_err());
        assert!(ledger.publish(&batch).await.is_ok());
        assert_eq!(ledger.published().await.len(), 1);
    }
}
