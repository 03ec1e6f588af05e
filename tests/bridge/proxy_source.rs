use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kafka_bridge::error::{ConsumerError, ProbeError};
use kafka_bridge::transport::http_client::build_bridge_client;
use kafka_bridge::transport::source::{MessageSource, ProxyConsumer, ProxyConsumerSettings};

use crate::support::{GROUP, TOPIC, proxy_record, publication_message};

const INSTANCE_PATH: &str = "/consumers/kafka-bridge/instances/rest-consumer-1";

fn settings(addresses: Vec<String>, auto_commit: bool) -> ProxyConsumerSettings {
    ProxyConsumerSettings {
        addresses,
        group_id: GROUP.into(),
        topic: TOPIC.into(),
        offset: "largest".into(),
        auto_commit,
        authorization_key: Some("Basic source".into()),
        backoff: Duration::from_millis(10),
    }
}

async fn mount_instance(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/consumers/{GROUP}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instance_id": "rest-consumer-1",
            "base_uri": format!("http://10.0.0.5:8082{INSTANCE_PATH}"),
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn creates_instance_and_decodes_records() {
    let server = MockServer::start().await;
    let message = publication_message(Some("tid_consumed"), None);

    Mock::given(method("POST"))
        .and(path(format!("/consumers/{GROUP}")))
        .and(header("Authorization", "Basic source"))
        .and(header("Content-Type", "application/vnd.kafka.v1+json"))
        .and(body_json(json!({
            "auto.offset.reset": "largest",
            "auto.commit.enable": "true",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instance_id": "rest-consumer-1",
            "base_uri": format!("http://10.0.0.5:8082{INSTANCE_PATH}"),
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{INSTANCE_PATH}/topics/{TOPIC}")))
        .and(header("Accept", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([
                proxy_record(&message, 1),
                {"value": "not base64 at all!", "partition": 0, "offset": 2},
            ])),
        )
        .mount(&server)
        .await;

    let consumer = ProxyConsumer::new(settings(vec![server.uri()], true), build_bridge_client());
    let batch = consumer.next_batch().await.unwrap();

    assert_eq!(batch, vec![message]);
    server.verify().await;
}

#[tokio::test]
async fn manual_commit_posts_offsets_after_a_batch() {
    let server = MockServer::start().await;
    mount_instance(&server).await;
    Mock::given(method("GET"))
        .and(path(format!("{INSTANCE_PATH}/topics/{TOPIC}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([proxy_record(
            &publication_message(Some("tid_commit"), None),
            7
        )])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{INSTANCE_PATH}/offsets")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let consumer = ProxyConsumer::new(settings(vec![server.uri()], false), build_bridge_client());
    assert_eq!(consumer.next_batch().await.unwrap().len(), 1);

    server.verify().await;
}

#[tokio::test]
async fn failed_poll_rotates_to_next_address() {
    let broken = MockServer::start().await;
    let healthy = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/consumers/{GROUP}")))
        .respond_with(ResponseTemplate::new(500).set_body_string("proxy down"))
        .expect(1)
        .mount(&broken)
        .await;
    mount_instance(&healthy).await;
    Mock::given(method("GET"))
        .and(path(format!("{INSTANCE_PATH}/topics/{TOPIC}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([proxy_record(
            &publication_message(Some("tid_failover"), None),
            1
        )])))
        .mount(&healthy)
        .await;

    let consumer = ProxyConsumer::new(
        settings(vec![broken.uri(), healthy.uri()], true),
        build_bridge_client(),
    );

    let first = consumer.next_batch().await.unwrap_err();
    assert!(matches!(first, ConsumerError::Status { status: 500, .. }));

    let second = consumer.next_batch().await.unwrap();
    assert_eq!(second[0].transaction_id(), Some("tid_failover"));
    broken.verify().await;
}

#[tokio::test]
async fn shutdown_deletes_the_consumer_instance() {
    let server = MockServer::start().await;
    mount_instance(&server).await;
    Mock::given(method("GET"))
        .and(path(format!("{INSTANCE_PATH}/topics/{TOPIC}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(INSTANCE_PATH))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let consumer = ProxyConsumer::new(settings(vec![server.uri()], true), build_bridge_client());
    assert!(consumer.next_batch().await.unwrap().is_empty());
    consumer.shutdown().await;

    server.verify().await;
}

#[tokio::test]
async fn connectivity_passes_when_first_address_serves_topic() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/topics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Other", TOPIC])))
        .expect(1)
        .mount(&first)
        .await;
    Mock::given(method("GET"))
        .and(path("/topics"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&second)
        .await;

    let consumer = ProxyConsumer::new(
        settings(vec![first.uri(), second.uri()], true),
        build_bridge_client(),
    );

    assert!(consumer.connectivity_check().await.is_ok());
    first.verify().await;
    second.verify().await;
}

#[tokio::test]
async fn connectivity_passes_when_only_a_later_address_is_healthy() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/topics"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&first)
        .await;
    Mock::given(method("GET"))
        .and(path("/topics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([TOPIC])))
        .mount(&second)
        .await;

    let consumer = ProxyConsumer::new(
        settings(vec![first.uri(), second.uri()], true),
        build_bridge_client(),
    );

    assert!(consumer.connectivity_check().await.is_ok());
}

#[tokio::test]
async fn connectivity_fails_only_when_every_address_fails() {
    let missing_topic = MockServer::start().await;
    let erroring = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/topics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["SomethingElse"])))
        .mount(&missing_topic)
        .await;
    Mock::given(method("GET"))
        .and(path("/topics"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&erroring)
        .await;

    let consumer = ProxyConsumer::new(
        settings(vec![missing_topic.uri(), erroring.uri()], true),
        build_bridge_client(),
    );

    let err = consumer.connectivity_check().await.unwrap_err();
    let ProbeError::AllFailed(summary) = &err else {
        panic!("expected AllFailed, got {err:?}");
    };
    assert!(summary.contains(&format!("For {}", missing_topic.uri())));
    assert!(summary.contains(&format!("For {}", erroring.uri())));
    assert!(summary.contains(TOPIC));
}
