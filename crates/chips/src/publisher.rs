use super::*;
use lapin::BasicProperties;
use lapin::Channel;
use lapin::Connection;
use lapin::ConnectionProperties;
use lapin::ExchangeKind;
use lapin::options::BasicPublishOptions;
use lapin::options::ConfirmSelectOptions;
use lapin::options::ExchangeDeclareOptions;
use lapin::types::FieldTable;
use rtrp_core::*;

/// Persistent delivery mode.
const PERSISTENT: u8 = 2;

/// Opens a named AMQP connection and declares the durable chip exchange.
pub async fn exchange(url: &str, name: &str) -> anyhow::Result<(Connection, Channel)> {
    let properties = ConnectionProperties::default().with_connection_name(name.into());
    let connection = Connection::connect(url, properties).await?;
    let channel = connection.create_channel().await?;
    channel
        .exchange_declare(
            CHIP_EXCHANGE,
            ExchangeKind::Topic,
            ExchangeDeclareOptions {
                durable: true,
                ..ExchangeDeclareOptions::default()
            },
            FieldTable::default(),
        )
        .await?;
    log::info!("[publisher] connected as {}, exchange {} ready", name, CHIP_EXCHANGE);
    Ok((connection, channel))
}

/// AMQP chip sink with publisher confirms.
///
/// One channel, shared by every table's relay. Each publish waits for
/// the broker's ack before returning.
pub struct Publisher {
    connection: Connection,
    channel: Channel,
}

impl Publisher {
    pub async fn connect(url: &str, name: &str) -> anyhow::Result<Self> {
        let (connection, channel) = exchange(url, name).await?;
        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await?;
        Ok(Self {
            connection,
            channel,
        })
    }
    pub async fn close(&self) {
        if let Err(e) = self.connection.close(200, "shutdown").await {
            log::warn!("[publisher] close failed: {}", e);
        }
    }
}

#[async_trait::async_trait]
impl ChipSink for Publisher {
    async fn publish(&self, update: &ChipUpdate) -> anyhow::Result<()> {
        let payload = serde_json::to_vec(update)?;
        let properties = BasicProperties::default()
            .with_delivery_mode(PERSISTENT)
            .with_content_type("application/json".into())
            .with_message_id(update.message_id.to_string().into());
        let confirmation = self
            .channel
            .basic_publish(
                CHIP_EXCHANGE,
                &update.routing_key(),
                BasicPublishOptions::default(),
                &payload,
                properties,
            )
            .await?
            .await?;
        if confirmation.is_nack() {
            anyhow::bail!("broker nacked {}", update.message_id);
        }
        log::debug!("[publisher] published {} to {}", update.message_id, update.routing_key());
        Ok(())
    }
}
