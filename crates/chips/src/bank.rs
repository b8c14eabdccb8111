use super::*;

/// Outcome of applying one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Fresh,
    Duplicate,
}

/// Bank of record. Applies every change as `max(0, balance + change)`
/// and applies a given message id at most once.
#[async_trait::async_trait]
pub trait Bank: Send {
    async fn apply(&mut self, update: &ChipUpdate) -> anyhow::Result<Applied>;
}
