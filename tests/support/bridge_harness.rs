#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use kafka_bridge::Config;
use kafka_bridge::core::message::{Message, codec};
use kafka_bridge::error::{ConsumerError, ProbeError, SinkError};
use kafka_bridge::runtime::observability::{BridgeEvent, Observer};
use kafka_bridge::transport::sinks::{Sink, SinkKind};
use kafka_bridge::transport::source::MessageSource;

pub const TOPIC: &str = "NativeCmsPublicationEvents";
pub const GROUP: &str = "kafka-bridge";

/// The message used throughout the publishing pipeline examples.
pub fn publication_message(tid: Option<&str>, origin_region: Option<&str>) -> Message {
    let mut headers = HashMap::from([
        (
            "Message-Id".to_string(),
            "fc429b46-2500-4fe7-88bb-fd507fbaf00c".to_string(),
        ),
        (
            "Message-Timestamp".to_string(),
            "2015-07-06T07:03:09.362Z".to_string(),
        ),
        (
            "Message-Type".to_string(),
            "cms-content-published".to_string(),
        ),
        (
            "Origin-System-Id".to_string(),
            "http://cmdb.ft.com/systems/methode-web-pub".to_string(),
        ),
        ("Content-Type".to_string(), "application/json".to_string()),
    ]);
    if let Some(tid) = tid {
        headers.insert("X-Request-Id".to_string(), tid.to_string());
    }
    if let Some(region) = origin_region {
        headers.insert("Origin-Region".to_string(), region.to_string());
    }
    Message::new(
        headers,
        r#"{"uuid":"7543220a-2389-11e5-bd83-71cb60e8f08c","type":"EOM::CompoundStory","value":"test"}"#,
    )
}

/// A consumed proxy record carrying `message` as a base64 FTMSG frame.
pub fn proxy_record(message: &Message, offset: i64) -> serde_json::Value {
    serde_json::json!({
        "value": STANDARD.encode(codec::encode(message).expect("fixture message encodes")),
        "partition": 0,
        "offset": offset,
    })
}

/// Config that passes validation; callers fill in real addresses.
pub fn bridge_config(source: &str, sink: &str, sink_kind: &str) -> Config {
    let mut config = Config::default();
    config.consumer.addresses = vec![source.to_string()];
    config.consumer.group_id = GROUP.to_string();
    config.consumer.topic = TOPIC.to_string();
    config.consumer.backoff_secs = 1;
    config.sink.kind = sink_kind.to_string();
    config.sink.address = sink.to_string();
    config.sink.topic = Some(TOPIC.to_string());
    config
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<BridgeEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<BridgeEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Observer for RecordingObserver {
    fn record_event(&self, event: &BridgeEvent) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Serves scripted batches, then waits forever like an idle topic.
pub struct InMemorySource {
    batches: Mutex<VecDeque<Vec<Message>>>,
    healthy: bool,
    shut_down: AtomicBool,
}

impl InMemorySource {
    pub fn new(batches: Vec<Vec<Message>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
            healthy: true,
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new(Vec::new())
        }
    }

    pub fn was_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageSource for InMemorySource {
    async fn next_batch(&self) -> Result<Vec<Message>, ConsumerError> {
        let next = self.batches.lock().unwrap().pop_front();
        match next {
            Some(batch) => Ok(batch),
            None => std::future::pending().await,
        }
    }

    async fn connectivity_check(&self) -> Result<String, ProbeError> {
        if self.healthy {
            Ok("in-memory source is reachable".into())
        } else {
            Err(ProbeError::AllFailed("in-memory source is down".into()))
        }
    }

    async fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
    }
}

/// Records every delivered message. Optionally slow, to observe draining.
pub struct InMemorySink {
    received: Mutex<Vec<Message>>,
    delay: Duration,
    healthy: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self {
            received: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
            healthy: true,
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new()
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    pub fn received(&self) -> Vec<Message> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sink for InMemorySink {
    fn kind(&self) -> SinkKind {
        SinkKind::PlainHttp
    }

    async fn send(&self, message: &Message) -> Result<(), SinkError> {
        tokio::time::sleep(self.delay).await;
        self.received.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn connectivity_check(&self) -> Result<String, ProbeError> {
        if self.healthy {
            Ok("in-memory sink is reachable".into())
        } else {
            Err(ProbeError::Status {
                target: "memory://sink/__health".into(),
                status: 503,
            })
        }
    }
}

/// Poll `condition` until it holds or five seconds pass.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within 5s");
}
