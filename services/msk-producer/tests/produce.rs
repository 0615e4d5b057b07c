use async_trait::async_trait;
use msk_producer::{produce_demo, Settings, SinkError, TopicSink};
use std::sync::Mutex;

#[derive(Default)]
struct Recording {
    sent: Mutex<Vec<(String, String)>>,
    flushes: Mutex<u32>,
    fail_on: Option<usize>,
}

#[async_trait]
impl TopicSink for Recording {
    async fn send(&self, topic: &str, payload: &str) -> Result<(), SinkError> {
        let mut sent = self.sent.lock().unwrap();
        if Some(sent.len()) == self.fail_on { return Err(SinkError::Rejected("broker unavailable".into())); }
        sent.push((topic.to_string(), payload.to_string()));
        Ok(())
    }
    async fn flush(&self) -> Result<(), SinkError> {
        *self.flushes.lock().unwrap() += 1;
        Ok(())
    }
}

fn settings() -> Settings {
    Settings {
        bootstrap_servers: "localhost:9092".into(),
        topic: "demo-topic".into(),
        count: 5,
        message_prefix: "Hello MSK".into(),
        security_protocol: "plaintext".into(),
        send_timeout_ms: 100,
    }
}

#[tokio::test]
async fn sends_five_messages_then_flushes_once() {
    let sink = Recording::default();
    let sent = produce_demo(&sink, &settings()).await.unwrap();
    assert_eq!(sent, (0..5).map(|i| format!("Hello MSK {i}")).collect::<Vec<_>>());
    let recorded = sink.sent.lock().unwrap().clone();
    assert!(recorded.iter().all(|(topic, _)| topic == "demo-topic"));
    assert_eq!(recorded.len(), 5);
    assert_eq!(*sink.flushes.lock().unwrap(), 1);
}

#[tokio::test]
async fn send_failure_stops_before_flush() {
    let sink = Recording { fail_on: Some(2), ..Default::default() };
    let err = produce_demo(&sink, &settings()).await.unwrap_err();
    assert_eq!(err.to_string(), "broker unavailable");
    assert_eq!(sink.sent.lock().unwrap().len(), 2);
    assert_eq!(*sink.flushes.lock().unwrap(), 0);
}

// Requires a broker at MSK_BOOTSTRAP_SERVERS.
#[cfg(feature = "integration")]
#[tokio::test]
async fn kafka_sink_round_trip() {
    use msk_producer::KafkaSink;
    let mut s = Settings::load().unwrap();
    s.count = 1;
    let sink = KafkaSink::new(&s).unwrap();
    if let Err(e) = produce_demo(&sink, &s).await { eprintln!("Kafka not available, skipping: {e}"); }
}
