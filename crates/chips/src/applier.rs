use super::*;
use rtrp_database::*;
use tokio_postgres::Client;

/// Marks a message applied; affects no row when it already was.
const CLAIM: &str = const_format::concatcp!(
    "INSERT INTO ",
    PROCESSED,
    " (message_id, processed_at) VALUES ($1, NOW()) ON CONFLICT (message_id) DO NOTHING"
);
/// Balances never go negative.
const CREDIT: &str = const_format::concatcp!(
    "UPDATE ",
    PLAYERS,
    " SET chips = GREATEST(chips + $1::BIGINT, 0), updated_at = NOW() WHERE id::TEXT = $2"
);

impl Schema for ChipUpdate {
    fn name() -> &'static str {
        PROCESSED
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            PROCESSED,
            " (
                message_id   UUID PRIMARY KEY,
                processed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_",
            PROCESSED,
            "_at ON ",
            PROCESSED,
            " (processed_at);"
        )
    }
    fn truncates() -> &'static str {
        const_format::concatcp!("TRUNCATE TABLE ", PROCESSED, ";")
    }
}

/// Postgres bank of record.
///
/// Each update runs in one transaction: claim the message id, then
/// apply every change. A claimed id means the update was seen before.
pub struct Applier {
    client: Client,
}

impl Applier {
    /// Wraps a connection and makes sure the dedup table exists.
    pub async fn new(client: Client) -> anyhow::Result<Self> {
        client.batch_execute(ChipUpdate::creates()).await?;
        client.batch_execute(ChipUpdate::indices()).await?;
        log::info!("[consumer] {} ready", ChipUpdate::name());
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Bank for Applier {
    async fn apply(&mut self, update: &ChipUpdate) -> anyhow::Result<Applied> {
        let tx = self.client.transaction().await?;
        let id = update.message_id.inner();
        if tx.execute(CLAIM, &[&id]).await? == 0 {
            tx.rollback().await?;
            return Ok(Applied::Duplicate);
        }
        for change in update.player_changes.iter() {
            let rows = tx
                .execute(CREDIT, &[&change.change, &change.player_id.as_str()])
                .await?;
            if rows == 0 {
                log::warn!("[consumer] no player {} for {}", change.player_id, update.message_id);
            }
        }
        tx.commit().await?;
        Ok(Applied::Fresh)
    }
}
