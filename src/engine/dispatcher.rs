// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Request fan-out to responsible agents and aggregation of their outcomes.
//!
//! A write or call is split by ownership (see [`RoutingTable`]). Each agent's
//! portion runs in its own spawned task wrapped in the configured timeout, so
//! a slow, failing or panicking agent only affects its own portion. Outcomes
//! are gathered into one [`ResponseRequest`] with one or more results per
//! portion:
//!
//! | Outcome              | Result                                   |
//! |----------------------|------------------------------------------|
//! | agent returned `Ok`  | the agent's results, tagged with its name |
//! | agent returned `Err` | `500` with agent name, paths and message  |
//! | timeout elapsed      | `503` with agent name and paths           |
//! | task panicked        | `500` with agent name and paths           |
//!
//! Unowned write paths go straight to the data store and unowned call paths
//! answer `404`. Reads never reach agents; they are served by the store.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::{JoinError, JoinHandle};
use tokio::time::error::Elapsed;

use crate::engine::routing::{Access, Portion, RoutingTable};
use crate::errors::{AgentError, DispatchError};
use crate::observability::messages::dispatch::{
    AgentPortionCompleted, AgentPortionFailed, AgentPortionTimedOut, RequestReceived,
    RequestRouted,
};
use crate::observability::messages::StructuredLog;
use crate::odf::Path;
use crate::omi::{
    CallRequest, OmiRequest, OmiResult, ReadRequest, ResponseRequest, ReturnCode, WriteRequest,
};
use crate::traits::{DbHandle, Odf, ResponsibleAgent};

type Timed = (Duration, Result<Result<ResponseRequest, AgentError>, Elapsed>);
type Pending = Vec<(String, Vec<Path>, JoinHandle<Timed>)>;

/// Routes requests to agents and the data store.
pub struct Dispatcher {
    routing: RoutingTable,
    store: DbHandle,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(routing: RoutingTable, store: DbHandle, timeout: Duration) -> Self {
        Self {
            routing,
            store,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn dispatch(&self, request: OmiRequest) -> Result<ResponseRequest, DispatchError> {
        match request {
            OmiRequest::Write(write) => self.dispatch_write(write).await,
            OmiRequest::Read(read) => self.dispatch_read(read).await,
            OmiRequest::Call(call) => self.dispatch_call(call).await,
        }
    }

    pub async fn dispatch_write(
        &self,
        write: WriteRequest,
    ) -> Result<ResponseRequest, DispatchError> {
        let leaves = leaf_paths(&write.odf);
        RequestReceived {
            kind: "write",
            leaf_count: leaves.len(),
            sender: write.sender.as_deref(),
        }
        .log();

        let routing = self.routing.route(&leaves, Access::Write, write.sender.as_deref());
        RequestRouted {
            kind: "write",
            agent_count: routing.portions.len(),
            unowned_count: routing.unowned.len(),
        }
        .log();

        let pending = self.spawn_portions(routing.portions, |agent, paths| {
            let portion = write.restricted_to(paths);
            async move { agent.handle_write(portion).await }
        });

        let mut results = Vec::new();
        if !routing.unowned.is_empty() {
            let unowned = write.odf.select_subtree(&routing.unowned);
            results.push(match self.store.write(&unowned).await {
                Ok(()) => OmiResult::success().with_paths(routing.unowned),
                Err(error) => OmiResult::failure(ReturnCode::InternalError, error.to_string())
                    .with_paths(routing.unowned),
            });
        }
        results.extend(self.collect(pending, "write").await);

        Ok(respond(results, write.ttl))
    }

    pub async fn dispatch_call(&self, call: CallRequest) -> Result<ResponseRequest, DispatchError> {
        let leaves = leaf_paths(&call.odf);
        RequestReceived {
            kind: "call",
            leaf_count: leaves.len(),
            sender: None,
        }
        .log();

        let routing = self.routing.route(&leaves, Access::Call, None);
        RequestRouted {
            kind: "call",
            agent_count: routing.portions.len(),
            unowned_count: routing.unowned.len(),
        }
        .log();

        let pending = self.spawn_portions(routing.portions, |agent, paths| {
            let portion = call.restricted_to(paths);
            async move { agent.handle_call(portion).await }
        });

        let mut results = Vec::new();
        if !routing.unowned.is_empty() {
            results.push(
                OmiResult::failure(ReturnCode::NotFound, "No agent is responsible for these paths")
                    .with_paths(routing.unowned),
            );
        }
        results.extend(self.collect(pending, "call").await);

        Ok(respond(results, call.ttl))
    }

    pub async fn dispatch_read(&self, read: ReadRequest) -> Result<ResponseRequest, DispatchError> {
        let requested = read.requested_paths();
        RequestReceived {
            kind: "read",
            leaf_count: requested.len(),
            sender: None,
        }
        .log();

        let odf = self.store.read(&requested, read.newest).await?;
        let missing: Vec<Path> = requested.into_iter().filter(|p| !odf.contains(p)).collect();

        let mut results = vec![OmiResult::success_with(odf)];
        if !missing.is_empty() {
            results.push(
                OmiResult::failure(ReturnCode::NotFound, "Paths not found").with_paths(missing),
            );
        }
        Ok(respond(results, read.ttl))
    }

    fn spawn_portions<F, Fut>(&self, portions: Vec<Portion>, handle: F) -> Pending
    where
        F: Fn(Arc<dyn ResponsibleAgent>, &[Path]) -> Fut,
        Fut: Future<Output = Result<ResponseRequest, AgentError>> + Send + 'static,
    {
        let timeout = self.timeout;
        portions
            .into_iter()
            .map(|portion| {
                let name = portion.agent_name().to_string();
                let work = handle(Arc::clone(&portion.agent), &portion.paths);
                let task = tokio::spawn(async move {
                    let started = Instant::now();
                    let outcome = tokio::time::timeout(timeout, work).await;
                    (started.elapsed(), outcome)
                });
                (name, portion.paths, task)
            })
            .collect()
    }

    async fn collect(&self, pending: Pending, kind: &'static str) -> Vec<OmiResult> {
        let mut results = Vec::new();
        for (agent, paths, task) in pending {
            results.extend(self.portion_results(kind, &agent, paths, task.await));
        }
        results
    }

    fn portion_results(
        &self,
        kind: &'static str,
        agent: &str,
        paths: Vec<Path>,
        outcome: Result<Timed, JoinError>,
    ) -> Vec<OmiResult> {
        match outcome {
            Ok((duration, Ok(Ok(response)))) => {
                AgentPortionCompleted {
                    agent,
                    kind,
                    duration,
                }
                .log();
                if response.results.is_empty() {
                    return vec![OmiResult::success().for_agent(agent).with_paths(paths)];
                }
                response
                    .results
                    .into_iter()
                    .map(|result| attribute(result, agent, &paths))
                    .collect()
            }
            Ok((_, Ok(Err(error)))) => {
                let reason = error.to_string();
                AgentPortionFailed {
                    agent,
                    kind,
                    reason: &reason,
                }
                .log();
                failed(ReturnCode::InternalError, reason, agent, paths)
            }
            Ok((_, Err(_))) => {
                AgentPortionTimedOut {
                    agent,
                    kind,
                    timeout: self.timeout,
                }
                .log();
                failed(
                    ReturnCode::Timeout,
                    format!("Agent '{}' did not respond within {:?}", agent, self.timeout),
                    agent,
                    paths,
                )
            }
            Err(join_error) => {
                let reason = if join_error.is_panic() {
                    format!("Agent '{}' panicked while handling {}", agent, kind)
                } else {
                    format!("Agent '{}' task was cancelled", agent)
                };
                AgentPortionFailed {
                    agent,
                    kind,
                    reason: &reason,
                }
                .log();
                failed(ReturnCode::InternalError, reason, agent, paths)
            }
        }
    }
}

/// Leaf paths of a request tree, without the root.
fn leaf_paths<O: Odf>(odf: &O) -> Vec<Path> {
    odf.leaves()
        .into_iter()
        .map(|node| node.path())
        .filter(|path| !path.is_root())
        .collect()
}

fn failed(code: ReturnCode, reason: String, agent: &str, paths: Vec<Path>) -> Vec<OmiResult> {
    vec![OmiResult::failure(code, reason)
        .for_agent(agent)
        .with_paths(paths)]
}

fn attribute(mut result: OmiResult, agent: &str, paths: &[Path]) -> OmiResult {
    if result.agent.is_none() {
        result.agent = Some(agent.to_string());
    }
    if result.paths.is_empty() {
        result.paths = paths.to_vec();
    }
    result
}

fn respond(results: Vec<OmiResult>, ttl: Duration) -> ResponseRequest {
    let mut response = if results.is_empty() {
        ResponseRequest::success()
    } else {
        ResponseRequest::new(results)
    };
    response.ttl = ttl;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::store::InMemoryStore;
    use crate::backends::stub::{FailingAgent, StubAgent};
    use crate::config::Permission;
    use crate::odf::{ImmutableOdf, InfoItem, Node, OdfValue, Value};
    use crate::traits::{BuiltAgent, DataStore};
    use chrono::Utc;

    fn path(s: &str) -> Path {
        s.parse().unwrap()
    }

    fn tree(paths: &[&str]) -> ImmutableOdf {
        let nodes: Vec<Node> = paths
            .iter()
            .map(|p| {
                InfoItem::new(path(p))
                    .unwrap()
                    .with_values(vec![Value::new(OdfValue::Int(1), Utc::now())])
                    .into()
            })
            .collect();
        ImmutableOdf::from_nodes(nodes).unwrap()
    }

    #[tokio::test]
    async fn test_empty_write_succeeds_without_routing() {
        let dispatcher = Dispatcher::new(
            RoutingTable::new(),
            Arc::new(InMemoryStore::default()),
            Duration::from_secs(1),
        );

        let response = dispatcher
            .dispatch_write(WriteRequest::new(ImmutableOdf::empty()))
            .await
            .unwrap();
        assert!(response.is_success());
        assert_eq!(response.results.len(), 1);
    }

    #[tokio::test]
    async fn test_agent_results_are_attributed() {
        let stub = Arc::new(StubAgent::new("house"));
        let mut routing = RoutingTable::new();
        routing.register(
            &BuiltAgent::Responsible(stub.clone()),
            path("Objects/House"),
            Permission::WRITE,
        );
        let dispatcher = Dispatcher::new(
            routing,
            Arc::new(InMemoryStore::default()),
            Duration::from_secs(1),
        );

        let response = dispatcher
            .dispatch_write(WriteRequest::new(tree(&["Objects/House/temp"])))
            .await
            .unwrap();

        let result = response.result_for("house").unwrap();
        assert!(result.is_success());
        assert_eq!(result.paths, vec![path("Objects/House/temp")]);
        assert_eq!(stub.received().len(), 1);
    }

    #[tokio::test]
    async fn test_call_failure_and_not_found() {
        let mut routing = RoutingTable::new();
        routing.register(
            &BuiltAgent::Responsible(Arc::new(FailingAgent::new("broken"))),
            path("Objects/Broken"),
            Permission::CALL,
        );
        let dispatcher = Dispatcher::new(
            routing,
            Arc::new(InMemoryStore::default()),
            Duration::from_secs(1),
        );

        let response = dispatcher
            .dispatch_call(CallRequest::new(tree(&["Objects/Broken/reset", "Objects/Nobody/x"])))
            .await
            .unwrap();

        assert_eq!(response.failures().len(), 2);
        let broken = response.result_for("broken").unwrap();
        assert_eq!(broken.return_code, ReturnCode::InternalError);
        assert!(broken.description.as_deref().unwrap().contains("Simulated agent failure"));

        let not_found = response
            .results
            .iter()
            .find(|r| r.return_code == ReturnCode::NotFound)
            .unwrap();
        assert_eq!(not_found.paths, vec![path("Objects/Nobody/x")]);
    }

    #[tokio::test]
    async fn test_read_reports_missing_paths() {
        let store = Arc::new(InMemoryStore::default());
        store.write(&tree(&["Objects/House/temp"])).await.unwrap();
        let dispatcher = Dispatcher::new(RoutingTable::new(), store, Duration::from_secs(1));

        let response = dispatcher
            .dispatch_read(ReadRequest::new(values_removed(&[
                "Objects/House/temp",
                "Objects/House/humidity",
            ])))
            .await
            .unwrap();

        assert_eq!(response.results.len(), 2);
        let odf = response.combined_odf().unwrap();
        assert!(odf.contains(&path("Objects/House/temp")));
        assert_eq!(response.failures()[0].paths, vec![path("Objects/House/humidity")]);
    }

    fn values_removed(paths: &[&str]) -> ImmutableOdf {
        tree(paths).values_removed()
    }
}
