// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::AgentConfig;
use crate::engine::RequestHandle;
use crate::errors::{AgentError, OdfError};
use crate::observability::messages::agent::PublishFailed;
use crate::observability::messages::StructuredLog;
use crate::odf::{ImmutableOdf, InfoItem, Node, OdfValue, Path, Value};
use crate::traits::{AgentBuilder, BuiltAgent, DbHandle, InternalAgent, Odf};

const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Periodically writes an incrementing counter to one InfoItem.
///
/// The agent has no request-handling capability: it only produces data, and
/// its writes travel through the request handle like any other client's.
pub struct PublisherAgent {
    name: String,
    path: Path,
    interval: Duration,
    requests: RequestHandle,
    running: Mutex<Option<(CancellationToken, JoinHandle<()>)>>,
}

impl PublisherAgent {
    pub fn new(
        name: impl Into<String>,
        path: Path,
        interval: Duration,
        requests: RequestHandle,
    ) -> Result<Self, OdfError> {
        InfoItem::new(path.clone())?;
        Ok(Self {
            name: name.into(),
            path,
            interval,
            requests,
            running: Mutex::new(None),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn reading(path: &Path, counter: i64) -> Result<ImmutableOdf, OdfError> {
        let item = InfoItem::new(path.clone())?
            .with_values(vec![Value::new(OdfValue::Long(counter), Utc::now())]);
        ImmutableOdf::from_nodes(vec![Node::from(item)])
    }

    async fn publish(name: &str, path: &Path, requests: &RequestHandle, counter: i64) {
        let reason = match Self::reading(path, counter) {
            Ok(odf) => match requests.write_as(name, odf).await {
                Ok(response) if response.is_success() => return,
                Ok(response) => response
                    .failures()
                    .iter()
                    .filter_map(|r| r.description.clone())
                    .collect::<Vec<_>>()
                    .join("; "),
                Err(error) => error.to_string(),
            },
            Err(error) => error.to_string(),
        };

        PublishFailed {
            agent: name,
            path: &path.to_string(),
            reason: &reason,
        }
        .log();
    }
}

#[async_trait]
impl InternalAgent for PublisherAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self) -> Result<(), AgentError> {
        let mut running = self
            .running
            .lock()
            .map_err(|e| AgentError::HandlerFailed {
                agent: self.name.clone(),
                reason: e.to_string(),
            })?;
        if running.is_some() {
            return Ok(());
        }

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let name = self.name.clone();
        let path = self.path.clone();
        let requests = self.requests.clone();
        let period = self.interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            let mut counter: i64 = 0;
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        Self::publish(&name, &path, &requests, counter).await;
                        counter += 1;
                    }
                }
            }
        });

        *running = Some((token, task));
        Ok(())
    }

    async fn stop(&self) -> Result<(), AgentError> {
        let running = self
            .running
            .lock()
            .map_err(|e| AgentError::HandlerFailed {
                agent: self.name.clone(),
                reason: e.to_string(),
            })?
            .take();

        if let Some((token, task)) = running {
            token.cancel();
            if let Err(error) = task.await {
                if error.is_panic() {
                    return Err(AgentError::HandlerFailed {
                        agent: self.name.clone(),
                        reason: "publisher task panicked".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Options: `path` (required) and `interval_ms` (default 1000).
pub struct PublisherBuilder;

impl AgentBuilder for PublisherBuilder {
    fn build(
        &self,
        config: &AgentConfig,
        request_handler: RequestHandle,
        _db_handler: DbHandle,
    ) -> Result<BuiltAgent, AgentError> {
        let invalid = |reason: String| AgentError::InvalidConfig {
            agent: config.name.clone(),
            reason,
        };

        let path: Path = config
            .option_str("path")
            .ok_or_else(|| invalid("missing 'path' option".to_string()))?
            .parse()
            .map_err(|e: OdfError| invalid(e.to_string()))?;
        let interval_ms = config.option_u64("interval_ms").unwrap_or(DEFAULT_INTERVAL_MS);
        if interval_ms == 0 {
            return Err(invalid("'interval_ms' must be positive".to_string()));
        }

        let agent = PublisherAgent::new(
            &config.name,
            path,
            Duration::from_millis(interval_ms),
            request_handler,
        )
        .map_err(|e| invalid(e.to_string()))?;
        Ok(BuiltAgent::Plain(Arc::new(agent)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::store::InMemoryStore;
    use crate::omi::ResponseRequest;

    fn config(options: &[(&str, serde_yaml::Value)]) -> AgentConfig {
        options
            .iter()
            .fold(AgentConfig::new("thermo", "publisher"), |c, (k, v)| {
                c.with_option(k, v.clone())
            })
    }

    #[test]
    fn test_builder_validates_options() {
        let cases = vec![
            (config(&[]), false),
            (config(&[("path", "Objects".into())]), false),
            (config(&[("path", "Sensors/temp".into())]), false),
            (
                config(&[("path", "Objects/Sensors/temp".into()), ("interval_ms", 0u64.into())]),
                false,
            ),
            (config(&[("path", "Objects/Sensors/temp".into())]), true),
        ];

        for (cfg, ok) in cases {
            let (handle, _mailbox) = RequestHandle::channel(1);
            let result = PublisherBuilder.build(&cfg, handle, Arc::new(InMemoryStore::default()));
            assert_eq!(result.is_ok(), ok, "options {:?}", cfg.options);
            if let Ok(agent) = result {
                assert!(!agent.is_responsible());
            }
        }
    }

    #[tokio::test]
    async fn test_publishes_incrementing_values_until_stopped() {
        let (handle, mut mailbox) = RequestHandle::channel(8);
        let agent = PublisherAgent::new(
            "thermo",
            "Objects/Sensors/temp".parse().unwrap(),
            Duration::from_millis(10),
            handle,
        )
        .unwrap();

        agent.start().await.unwrap();

        let mut counters = Vec::new();
        while counters.len() < 3 {
            let envelope = mailbox.recv().await.unwrap();
            let crate::omi::OmiRequest::Write(write) = envelope.request else {
                panic!("publisher should only write");
            };
            assert_eq!(write.sender.as_deref(), Some("thermo"));
            let item = write.odf.info_items()[0].clone();
            counters.push(item.newest_value().and_then(Value::as_f64).unwrap());
            envelope.reply.send(Ok(ResponseRequest::success())).unwrap();
        }

        agent.stop().await.unwrap();
        assert_eq!(counters, vec![0.0, 1.0, 2.0]);
    }
}
