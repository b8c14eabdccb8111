use super::*;

/// Destination for chip updates.
#[async_trait::async_trait]
pub trait ChipSink: Send + Sync {
    /// Delivers one update. Returns once the destination has it.
    async fn publish(&self, update: &ChipUpdate) -> anyhow::Result<()>;
}
