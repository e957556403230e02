//! Post-commit event publishing.

use async_trait::async_trait;

use crate::domain::events::OrderEvent;

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &OrderEvent) -> anyhow::Result<()>;
}

/// Publishes JSON-encoded events on NATS, one subject per event type.
pub struct NatsPublisher {
    client: async_nats::Client,
}

impl NatsPublisher {
    pub fn new(client: async_nats::Client) -> Self { Self { client } }
}

#[async_trait]
impl EventPublisher for NatsPublisher {
    async fn publish(&self, event: &OrderEvent) -> anyhow::Result<()> {
        let payload = serde_json::to_vec(event)?;
        self.client.publish(event.subject().to_string(), payload.into()).await?;
        Ok(())
    }
}

/// Used when no broker is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, event: &OrderEvent) -> anyhow::Result<()> {
        tracing::debug!(subject = event.subject(), "no broker configured, event dropped");
        Ok(())
    }
}
