use super::*;
use futures::StreamExt;
use lapin::Channel;
use lapin::Connection;
use lapin::message::Delivery;
use lapin::options::BasicAckOptions;
use lapin::options::BasicConsumeOptions;
use lapin::options::BasicNackOptions;
use lapin::options::BasicQosOptions;
use lapin::options::BasicRejectOptions;
use lapin::options::QueueBindOptions;
use lapin::options::QueueDeclareOptions;
use lapin::types::FieldTable;
use rtrp_core::*;

/// What to tell the broker about one delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Ack,
    /// transient failure, redeliver
    Requeue,
    /// malformed, never redeliver
    Reject,
}

/// Decodes and applies one message body.
pub async fn handle(bank: &mut dyn Bank, body: &[u8]) -> Disposition {
    let update = match serde_json::from_slice::<ChipUpdate>(body) {
        Ok(update) => update,
        Err(e) => {
            log::error!("[consumer] malformed message: {}", e);
            return Disposition::Reject;
        }
    };
    match bank.apply(&update).await {
        Ok(Applied::Fresh) => {
            log::info!(
                "[consumer] applied {} from {} ({} changes)",
                update.message_id,
                update.room_id,
                update.player_changes.len()
            );
            Disposition::Ack
        }
        Ok(Applied::Duplicate) => {
            log::info!("[consumer] skipped duplicate {}", update.message_id);
            Disposition::Ack
        }
        Err(e) => {
            log::error!("[consumer] failed to apply {}: {}", update.message_id, e);
            Disposition::Requeue
        }
    }
}

/// Drains the chip queue into a [`Bank`].
pub struct Consumer {
    connection: Connection,
    channel: Channel,
    tag: String,
}

impl Consumer {
    /// Declares the durable queue, binds it to every chip routing key,
    /// and limits unacked deliveries to `prefetch`.
    pub async fn connect(url: &str, name: &str, prefetch: u16) -> anyhow::Result<Self> {
        let (connection, channel) = exchange(url, name).await?;
        channel
            .queue_declare(
                CHIP_QUEUE,
                QueueDeclareOptions {
                    durable: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await?;
        channel
            .queue_bind(
                CHIP_QUEUE,
                CHIP_EXCHANGE,
                CHIP_BINDING,
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await?;
        channel
            .basic_qos(prefetch, BasicQosOptions::default())
            .await?;
        log::info!("[consumer] bound {} on {}", CHIP_QUEUE, CHIP_BINDING);
        Ok(Self {
            connection,
            channel,
            tag: name.to_string(),
        })
    }
    /// Runs until the broker cancels the subscription or the connection drops.
    pub async fn run(&self, bank: &mut dyn Bank) -> anyhow::Result<()> {
        let mut deliveries = self
            .channel
            .basic_consume(
                CHIP_QUEUE,
                &self.tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;
        log::info!("[consumer] consuming as {}", self.tag);
        while let Some(delivery) = deliveries.next().await {
            let delivery = delivery?;
            let disposition = handle(bank, &delivery.data).await;
            Self::settle(&delivery, disposition).await?;
        }
        log::info!("[consumer] subscription ended");
        Ok(())
    }
    pub async fn close(&self) {
        if let Err(e) = self.connection.close(200, "shutdown").await {
            log::warn!("[consumer] close failed: {}", e);
        }
    }
    async fn settle(delivery: &Delivery, disposition: Disposition) -> anyhow::Result<()> {
        match disposition {
            Disposition::Ack => delivery.ack(BasicAckOptions::default()).await?,
            Disposition::Requeue => {
                delivery
                    .nack(BasicNackOptions {
                        requeue: true,
                        ..BasicNackOptions::default()
                    })
                    .await?
            }
            Disposition::Reject => delivery.reject(BasicRejectOptions { requeue: false }).await?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Down;

    #[async_trait::async_trait]
    impl Bank for Down {
        async fn apply(&mut self, _: &ChipUpdate) -> anyhow::Result<Applied> {
            anyhow::bail!("database unavailable")
        }
    }

    fn body(update: &ChipUpdate) -> Vec<u8> {
        serde_json::to_vec(update).unwrap()
    }

    #[tokio::test]
    async fn acks_applied_and_duplicate() {
        let mut ledger = Ledger::with_balances([(PlayerId::from("a"), 50)]);
        let update = ChipUpdate::new(
            GameType::Holdem,
            RoomId::from("room_1"),
            vec![ChipChange::new(PlayerId::from("a"), 25)],
        );
        assert_eq!(handle(&mut ledger, &body(&update)).await, Disposition::Ack);
        assert_eq!(handle(&mut ledger, &body(&update)).await, Disposition::Ack);
        assert_eq!(ledger.balance(&PlayerId::from("a")).await, Some(75));
    }

    #[tokio::test]
    async fn rejects_malformed() {
        let mut ledger = Ledger::default();
        assert_eq!(handle(&mut ledger, b"{not json").await, Disposition::Reject);
        assert_eq!(handle(&mut ledger, br#"{"player_changes":[]}"#).await, Disposition::Reject);
    }

    #[tokio::test]
    async fn requeues_on_bank_failure() {
        let update = ChipUpdate::new(GameType::Holdem, RoomId::from("r"), Vec::new());
        assert_eq!(handle(&mut Down, &body(&update)).await, Disposition::Requeue);
    }
}
