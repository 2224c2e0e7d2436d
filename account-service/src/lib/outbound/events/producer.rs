use std::time::Duration;

use async_trait::async_trait;
use auth::EventPublishError;
use auth::LoginEvent;
use rdkafka::config::ClientConfig;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;
use rdkafka::util::Timeout;
use thiserror::Error;

use super::dispatcher::LoginEventSubscriber;
use super::messages::LoginEventMessage;
use crate::config::KafkaConfig;

#[derive(Debug, Error)]
pub enum KafkaProducerError {
    #[error("Failed to send message to Kafka: {0}")]
    SendError(String),

    #[error("Failed to serialize message: {0}")]
    SerializationError(String),
}

impl From<KafkaProducerError> for EventPublishError {
    fn from(err: KafkaProducerError) -> Self {
        EventPublishError::PublishFailed(err.to_string())
    }
}

/// Forwards login events to a Kafka topic, keyed by user id.
pub struct KafkaLoginEventProducer {
    producer: FutureProducer,
    topic: String,
    timeout: Duration,
}

impl KafkaLoginEventProducer {
    /// Create a producer with "at least once" delivery semantics
    ///
    /// # Notes:
    /// - `acks=all`: Wait for all in-sync replicas to acknowledge
    /// - `enable.idempotence=true`: No duplicates from producer retries
    pub fn new(config: &KafkaConfig) -> Result<Self, anyhow::Error> {
        tracing::info!(
            brokers = %config.brokers,
            topic = %config.topic,
            "Initializing Kafka producer for login events"
        );

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", "30000")
            .set("compression.type", "gzip")
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("retries", "10")
            .set("retry.backoff.ms", "100")
            .create()?;

        Ok(Self {
            producer,
            topic: config.topic.clone(),
            timeout: Duration::from_secs(30),
        })
    }

    async fn send(&self, message: &LoginEventMessage) -> Result<(), KafkaProducerError> {
        let payload = serde_json::to_string(message)
            .map_err(|e| KafkaProducerError::SerializationError(e.to_string()))?;

        let record = FutureRecord::to(&self.topic)
            .key(&message.user_id)
            .payload(&payload);

        self.producer
            .send(record, Timeout::After(self.timeout))
            .await
            .map(|_| {
                tracing::debug!(
                    topic = %self.topic,
                    user_id = %message.user_id,
                    "Login event published"
                );
            })
            .map_err(|(err, _)| KafkaProducerError::SendError(err.to_string()))
    }
}

#[async_trait]
impl LoginEventSubscriber for KafkaLoginEventProducer {
    fn name(&self) -> &str {
        "kafka"
    }

    async fn on_login(&self, event: &LoginEvent) -> Result<(), EventPublishError> {
        self.send(&LoginEventMessage::from(event))
            .await
            .map_err(EventPublishError::from)
    }
}
