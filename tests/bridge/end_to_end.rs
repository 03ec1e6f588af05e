use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kafka_bridge::core::consumer_loop::ConsumerState;
use kafka_bridge::daemon::Bridge;
use kafka_bridge::error::ConfigError;
use kafka_bridge::BridgeError;
use kafka_bridge::runtime::observability::{BridgeEvent, NoopObserver};

use crate::support::{
    GROUP, InMemorySink, InMemorySource, RecordingObserver, TOPIC, bridge_config, eventually,
    proxy_record, publication_message,
};

const INSTANCE_PATH: &str = "/consumers/kafka-bridge/instances/bridge-1";

#[tokio::test]
async fn relays_from_source_proxy_to_notifier() {
    let source = MockServer::start().await;
    let notifier = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/consumers/{GROUP}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instance_id": "bridge-1",
            "base_uri": format!("http://proxy.internal{INSTANCE_PATH}"),
        })))
        .mount(&source)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{INSTANCE_PATH}/topics/{TOPIC}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            proxy_record(&publication_message(Some("tid_e2e"), None), 1),
            proxy_record(&publication_message(Some("tid_loop"), Some("eu")), 2),
        ])))
        .up_to_n_times(1)
        .mount(&source)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{INSTANCE_PATH}/topics/{TOPIC}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&source)
        .await;
    Mock::given(method("DELETE"))
        .and(path(INSTANCE_PATH))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&source)
        .await;
    Mock::given(method("POST"))
        .and(path("/notify"))
        .and(header("X-Request-Id", "tid_e2e"))
        .and(header("X-Origin-System-Id", "http://cmdb.ft.com/systems/methode-web-pub"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&notifier)
        .await;

    let mut config = bridge_config(&source.uri(), &notifier.uri(), "plainHTTP");
    config.region = Some("eu".into());
    let observer = Arc::new(RecordingObserver::default());
    let bridge = Arc::new(Bridge::from_config(config, observer.clone()).unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let shutdown = CancellationToken::new();

    let running = tokio::spawn({
        let bridge = Arc::clone(&bridge);
        let shutdown = shutdown.clone();
        async move { bridge.run_with_listener(listener, shutdown).await }
    });

    eventually(|| {
        let counts = bridge.consumer().stats();
        counts.forwarded == 1 && counts.skipped == 1
    })
    .await;
    shutdown.cancel();
    running.await.unwrap().unwrap();

    assert_eq!(bridge.consumer().state(), ConsumerState::Stopped);
    assert!(observer.events().iter().any(|event| matches!(
        event,
        BridgeEvent::MessageSkipped { transaction_id, .. } if transaction_id == "tid_loop"
    )));
    notifier.verify().await;
    source.verify().await;
}

#[tokio::test]
async fn enriches_messages_before_they_reach_the_sink() {
    let source = Arc::new(InMemorySource::new(vec![vec![
        publication_message(None, None),
        publication_message(Some("tid_kept"), Some("us")),
        publication_message(Some("tid_dropped"), Some("us")),
    ]]));
    let sink = Arc::new(InMemorySink::new());
    let mut config = bridge_config("http://unused", "http://unused", "plainHTTP");
    config.region = Some("us".into());
    let bridge = Arc::new(
        Bridge::from_parts(config, source.clone(), sink.clone(), Arc::new(NoopObserver)).unwrap(),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let shutdown = CancellationToken::new();

    let running = tokio::spawn({
        let bridge = Arc::clone(&bridge);
        let shutdown = shutdown.clone();
        async move { bridge.run_with_listener(listener, shutdown).await }
    });
    eventually(|| {
        let counts = bridge.consumer().stats();
        counts.forwarded + counts.skipped == 3
    })
    .await;
    shutdown.cancel();
    running.await.unwrap().unwrap();

    let received = sink.received();
    assert_eq!(received.len(), 1);
    let generated = received[0].transaction_id().unwrap();
    assert!(generated.starts_with("tid_") && generated.ends_with("_kafka_bridge"));
    assert_eq!(received[0].header("Origin-Region"), Some("eu"));
    assert!(source.was_shut_down());
}

#[tokio::test]
async fn shutdown_waits_for_in_flight_dispatch() {
    let source = Arc::new(InMemorySource::new(vec![vec![
        publication_message(Some("tid_slow_1"), None),
        publication_message(Some("tid_slow_2"), None),
    ]]));
    let sink = Arc::new(InMemorySink::slow(Duration::from_millis(200)));
    let mut config = bridge_config("http://unused", "http://unused", "plainHTTP");
    config.consumer.concurrent_dispatch = true;
    let bridge = Arc::new(
        Bridge::from_parts(config, source.clone(), sink.clone(), Arc::new(NoopObserver)).unwrap(),
    );
    let mut state = bridge.consumer().subscribe();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let shutdown = CancellationToken::new();

    let running = tokio::spawn({
        let bridge = Arc::clone(&bridge);
        let shutdown = shutdown.clone();
        async move { bridge.run_with_listener(listener, shutdown).await }
    });
    state
        .wait_for(|s| *s == ConsumerState::Dispatching)
        .await
        .unwrap();
    shutdown.cancel();
    running.await.unwrap().unwrap();

    assert_eq!(sink.received().len(), 2);
    assert!(source.was_shut_down());
}

#[tokio::test]
async fn unknown_sink_kind_fails_wiring() {
    let config = bridge_config("http://source", "http://sink", "carrier-pigeon");
    let err = Bridge::from_config(config, Arc::new(NoopObserver))
        .err()
        .unwrap();
    assert!(matches!(
        err,
        BridgeError::Config(ConfigError::UnknownSinkKind(ref kind)) if kind == "carrier-pigeon"
    ));
    assert!(err.to_string().contains("carrier-pigeon"));
}

#[tokio::test]
async fn unknown_region_fails_wiring() {
    let mut config = bridge_config("http://source", "http://sink", "plainHTTP");
    config.region = Some("apac".into());
    let source = Arc::new(InMemorySource::new(Vec::new()));
    let sink = Arc::new(InMemorySink::new());

    let result = Bridge::from_parts(config, source, sink, Arc::new(NoopObserver));

    assert!(matches!(
        result,
        Err(BridgeError::Config(ConfigError::UnknownRegion(_)))
    ));
}
