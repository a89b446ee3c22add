// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! End-to-end tests of the agent system: configuration in, requests through
//! the request handle, aggregated responses out.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::backends::store::InMemoryStore;
use crate::backends::stub::stub_factory;
use crate::config::Config;
use crate::engine::AgentSystem;
use crate::errors::DispatchError;
use crate::odf::{ImmutableOdf, InfoItem, Node, OdfValue, Path, Value};
use crate::omi::{CallRequest, ReadRequest, ReturnCode, WriteRequest};
use crate::traits::{DataStore, Odf};

fn path(s: &str) -> Path {
    s.parse().unwrap()
}

fn reading(paths: &[&str], value: f64) -> ImmutableOdf {
    let nodes: Vec<Node> = paths
        .iter()
        .map(|p| {
            InfoItem::new(path(p))
                .unwrap()
                .with_values(vec![Value::new(OdfValue::Double(value), Utc::now())])
                .into()
        })
        .collect();
    ImmutableOdf::from_nodes(nodes).unwrap()
}

async fn start(yaml: &str) -> (AgentSystem, Arc<InMemoryStore>) {
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    crate::config::validate_config(&config).unwrap();
    let store = Arc::new(InMemoryStore::new(config.agent_system.history_length()));
    let system = AgentSystem::start(&config, &stub_factory(), store.clone())
        .await
        .unwrap();
    (system, store)
}

#[tokio::test]
async fn test_partial_failure_keeps_successful_portions() {
    let (system, _store) = start(
        r#"
agents:
  - name: healthy
    class: stub
    responsible: { "Objects/A": w }
  - name: broken
    class: failing
    responsible: { "Objects/B": w }
"#,
    )
    .await;

    let response = system
        .request_handle()
        .write(WriteRequest::new(reading(&["Objects/A/x", "Objects/B/y"], 1.0)))
        .await
        .unwrap();

    assert!(!response.is_success());
    assert!(response.result_for("healthy").unwrap().is_success());

    let broken = response.result_for("broken").unwrap();
    assert_eq!(broken.return_code, ReturnCode::InternalError);
    assert_eq!(broken.paths, vec![path("Objects/B/y")]);
    assert!(broken
        .description
        .as_deref()
        .unwrap()
        .contains("Simulated agent failure"));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_plain_agent_is_never_routed_to() {
    let (system, store) = start(
        r#"
agents:
  - name: bystander
    class: plain
    responsible: { "Objects/Plain": wc }
"#,
    )
    .await;
    assert!(!system.agent("bystander").unwrap().is_responsible());

    let requests = system.request_handle();
    let written = requests
        .write(WriteRequest::new(reading(&["Objects/Plain/x"], 7.0)))
        .await
        .unwrap();
    assert!(written.is_success());
    assert!(written.result_for("bystander").is_none());

    let stored = store.snapshot().await.unwrap();
    assert!(stored.contains(&path("Objects/Plain/x")));

    let called = requests
        .call(CallRequest::new(reading(&["Objects/Plain/x"], 0.0)))
        .await
        .unwrap();
    assert_eq!(called.results[0].return_code, ReturnCode::NotFound);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_agent_writes_are_not_routed_back_to_sender() {
    let (system, store) = start(
        r#"
agent_system:
  timeout_seconds: 2
agents:
  - name: relay
    class: relay
    responsible: { "Objects/Relay": w }
"#,
    )
    .await;

    let response = system
        .request_handle()
        .write(WriteRequest::new(reading(&["Objects/Relay/level"], 3.0)))
        .await
        .unwrap();

    assert!(response.is_success(), "{:?}", response.failures());
    let stored = store.read(&[path("Objects/Relay/level")], None).await.unwrap();
    assert!(stored.contains(&path("Objects/Relay/level")));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_slow_agent_times_out_without_blocking_siblings() {
    let (system, _store) = start(
        r#"
agent_system:
  timeout_seconds: 1
agents:
  - name: sluggish
    class: slow
    responsible: { "Objects/Slow": w }
    options: { delay_ms: 5000 }
  - name: quick
    class: stub
    responsible: { "Objects/Quick": w }
"#,
    )
    .await;

    let response = system
        .request_handle()
        .write(WriteRequest::new(reading(&["Objects/Slow/x", "Objects/Quick/y"], 1.0)))
        .await
        .unwrap();

    let timed_out = response.result_for("sluggish").unwrap();
    assert_eq!(timed_out.return_code, ReturnCode::Timeout);
    assert_eq!(timed_out.paths, vec![path("Objects/Slow/x")]);
    assert!(response.result_for("quick").unwrap().is_success());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_panicking_agent_is_reported_as_failure() {
    let (system, _store) = start(
        r#"
agents:
  - name: crashy
    class: panicking
    responsible: { "Objects/Crash": wc }
  - name: steady
    class: stub
    responsible: { "Objects/Steady": wc }
"#,
    )
    .await;

    let response = system
        .request_handle()
        .call(CallRequest::new(reading(&["Objects/Crash/x", "Objects/Steady/y"], 1.0)))
        .await
        .unwrap();

    let crashed = response.result_for("crashy").unwrap();
    assert_eq!(crashed.return_code, ReturnCode::InternalError);
    assert!(crashed.description.as_deref().unwrap().contains("panicked"));

    let steady = response.result_for("steady").unwrap();
    assert!(steady.is_success());
    assert!(steady.odf.as_ref().unwrap().contains(&path("Objects/Steady/y")));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_storage_agent_write_then_read_round_trip() {
    let (system, _store) = start(
        r#"
agent_system:
  history_length: 3
agents:
  - name: storage
    class: responsible_storage
    responsible: { "Objects/House": wc }
"#,
    )
    .await;
    let requests = system.request_handle();

    for value in [20.0, 21.0, 22.0, 23.0] {
        let response = requests
            .write(WriteRequest::new(reading(&["Objects/House/temp"], value)))
            .await
            .unwrap();
        assert!(response.result_for("storage").unwrap().is_success());
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let query = reading(&["Objects/House/temp"], 0.0).values_removed();
    let read = requests
        .read(ReadRequest::new(query.clone()).with_newest(10))
        .await
        .unwrap();
    let odf = read.combined_odf().unwrap();
    let item = odf
        .get(&path("Objects/House/temp"))
        .and_then(Node::as_info_item)
        .unwrap();
    let values: Vec<f64> = item.values().iter().filter_map(Value::as_f64).collect();
    assert_eq!(values, vec![21.0, 22.0, 23.0]);

    let called = requests.call(CallRequest::new(query)).await.unwrap();
    let latest = called.combined_odf().unwrap();
    let item = latest
        .get(&path("Objects/House/temp"))
        .and_then(Node::as_info_item)
        .unwrap();
    assert_eq!(item.newest_value().and_then(Value::as_f64), Some(23.0));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_publisher_writes_reach_the_store() {
    let (system, store) = start(
        r#"
agents:
  - name: thermometer
    class: publisher
    options:
      path: "Objects/Sensors/temp"
      interval_ms: 10
"#,
    )
    .await;

    let target = path("Objects/Sensors/temp");
    let mut published = false;
    for _ in 0..200 {
        if store.snapshot().await.unwrap().contains(&target) {
            published = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(published, "publisher never wrote to {}", target);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_requests_after_shutdown_are_rejected() {
    let (system, _store) = start("agents: []").await;
    let requests = system.request_handle();

    system.shutdown().await.unwrap();

    let result = requests
        .read(ReadRequest::new(ImmutableOdf::empty()))
        .await;
    assert_eq!(result.unwrap_err(), DispatchError::SystemShutdown);
}

#[tokio::test]
async fn test_unknown_agent_class_fails_startup() {
    let config: Config = serde_yaml::from_str(
        r#"
agents:
  - name: mystery
    class: thermostat
"#,
    )
    .unwrap();

    let result = AgentSystem::start(
        &config,
        &stub_factory(),
        Arc::new(InMemoryStore::default()),
    )
    .await;
    assert!(result.is_err());
}
