use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::error::KafkaError;
use rdkafka::error::RDKafkaErrorCode;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;
use rdkafka::util::Timeout;

use crate::config::KafkaConfig;
use crate::domain::account::errors::NotificationError;
use crate::domain::account::models::Notification;
use crate::domain::account::ports::NotificationSender;
use crate::outbound::notifications::messages::NotificationMessage;

/// Hands rendered messages to a mail relay through a Kafka topic.
pub struct KafkaNotificationProducer {
    producer: FutureProducer,
    topic: String,
    timeout: Duration,
}

impl KafkaNotificationProducer {
    /// Create a producer with "at least once" delivery semantics
    ///
    /// # Notes:
    /// - `acks=all`: Wait for all in-sync replicas to acknowledge
    /// - `enable.idempotence=true`: Prevents duplicate messages during retries
    pub fn new(config: &KafkaConfig) -> Result<Self, KafkaError> {
        tracing::info!(
            brokers = %config.brokers,
            topic = %config.topic,
            "Initializing Kafka notification producer"
        );

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", "30000")
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
}

fn delivery_error(err: KafkaError) -> NotificationError {
    match err.rdkafka_error_code() {
        Some(RDKafkaErrorCode::MessageTimedOut) => NotificationError::Timeout(err.to_string()),
        _ => NotificationError::DeliveryFailed(err.to_string()),
    }
}

#[async_trait]
impl NotificationSender for KafkaNotificationProducer {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        let payload = serde_json::to_string(&NotificationMessage::from(notification))
            .map_err(|e| NotificationError::SerializationFailed(e.to_string()))?;

        // Keyed by recipient so messages to one address stay ordered.
        let record = FutureRecord::to(&self.topic)
            .key(notification.to.as_str())
            .payload(&payload);

        self.producer
            .send(record, Timeout::After(self.timeout))
            .await
            .map(|_| {
                tracing::debug!(
                    topic = %self.topic,
                    subject = %notification.subject,
                    "Notification queued"
                );
            })
            .map_err(|(err, _)| delivery_error(err))
    }
}
