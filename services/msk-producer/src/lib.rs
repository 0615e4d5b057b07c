//! Send a handful of fixed messages to a Kafka topic and flush.

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::error::KafkaError;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};

pub const SERVICE: &str = "msk-producer";
const DEFAULT_BROKERS: &str = "b-1.glidingpathdev.gnkmpn.c2.kafka.ap-south-1.amazonaws.com,b-2.glidingpathdev.gnkmpn.c2.kafka.ap-south-1.amazonaws.com";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("kafka: {0}")]
    Kafka(#[from] KafkaError),
    #[error("{0}")]
    Rejected(String),
}

/// `MSK_*` variables: `MSK_BOOTSTRAP_SERVERS` (comma separated), `MSK_TOPIC`,
/// `MSK_COUNT`, `MSK_MESSAGE_PREFIX`, `MSK_SECURITY_PROTOCOL`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bootstrap_servers: String,
    pub topic: String,
    pub count: u32,
    pub message_prefix: String,
    pub security_protocol: String,
    pub send_timeout_ms: u64,
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        cloudlab_core::load_config(SERVICE, Some("MSK"), &[
            ("bootstrap_servers", DEFAULT_BROKERS),
            ("topic", "demo-topic"),
            ("count", "5"),
            ("message_prefix", "Hello MSK"),
            ("security_protocol", "plaintext"),
            ("send_timeout_ms", "10000"),
        ])
    }

    pub fn brokers(&self) -> Vec<String> {
        self.bootstrap_servers.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        (0..self.count).map(|i| format!("{} {i}", self.message_prefix)).collect()
    }
}

#[async_trait]
pub trait TopicSink: Send + Sync {
    async fn send(&self, topic: &str, payload: &str) -> Result<(), SinkError>;
    async fn flush(&self) -> Result<(), SinkError>;
}

pub struct KafkaSink {
    producer: FutureProducer,
    timeout: Duration,
}

impl KafkaSink {
    pub fn new(settings: &Settings) -> Result<Self, SinkError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", settings.brokers().join(","))
            .set("security.protocol", &settings.security_protocol)
            .set("message.timeout.ms", settings.send_timeout_ms.to_string())
            .create()?;
        Ok(Self { producer, timeout: Duration::from_millis(settings.send_timeout_ms) })
    }
}

#[async_trait]
impl TopicSink for KafkaSink {
    #[instrument(skip(self, payload), fields(otel.kind = "producer", messaging.destination = topic))]
    async fn send(&self, topic: &str, payload: &str) -> Result<(), SinkError> {
        let record: FutureRecord<'_, (), str> = FutureRecord::to(topic).payload(payload);
        self.producer.send(record, Timeout::After(self.timeout)).await.map_err(|(e, _msg)| SinkError::Kafka(e))?;
        Ok(())
    }

    async fn flush(&self) -> Result<(), SinkError> {
        let producer = self.producer.clone();
        let timeout = self.timeout;
        tokio::task::spawn_blocking(move || producer.flush(Timeout::After(timeout)))
            .await
            .map_err(|e| SinkError::Rejected(format!("flush task failed: {e}")))??;
        Ok(())
    }
}

/// Send every configured message in order, then flush once. Stops at the
/// first failed send. Returns what was sent.
pub async fn produce_demo<S: TopicSink + ?Sized>(sink: &S, settings: &Settings) -> Result<Vec<String>, SinkError> {
    let mut sent = Vec::with_capacity(settings.count as usize);
    for message in settings.messages() {
        sink.send(&settings.topic, &message).await?;
        info!(topic=%settings.topic, %message, "sent");
        println!("Sent: {message}");
        sent.push(message);
    }
    sink.flush().await?;
    println!("All messages sent!");
    Ok(sent)
}
