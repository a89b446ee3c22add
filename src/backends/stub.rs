// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::backends::local::AgentFactory;
use crate::config::AgentConfig;
use crate::engine::RequestHandle;
use crate::errors::AgentError;
use crate::odf::ImmutableOdf;
use crate::omi::{CallRequest, ResponseRequest, WriteRequest};
use crate::traits::{AgentBuilder, BuiltAgent, DbHandle, InternalAgent, ResponsibleAgent};

/// A responsible agent that accepts everything and remembers what it received
pub struct StubAgent {
    pub name: String,
    received: Mutex<Vec<ImmutableOdf>>,
}

impl StubAgent {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn received(&self) -> Vec<ImmutableOdf> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl InternalAgent for StubAgent {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl ResponsibleAgent for StubAgent {
    async fn handle_write(&self, write: WriteRequest) -> Result<ResponseRequest, AgentError> {
        self.received.lock().unwrap().push(write.odf.clone());
        Ok(ResponseRequest::success())
    }

    async fn handle_call(&self, call: CallRequest) -> Result<ResponseRequest, AgentError> {
        self.received.lock().unwrap().push(call.odf.clone());
        Ok(ResponseRequest::success_with(call.odf))
    }
}

/// An agent that always fails for testing partial failure scenarios
pub struct FailingAgent {
    pub name: String,
}

impl FailingAgent {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    fn failure(&self) -> AgentError {
        AgentError::HandlerFailed {
            agent: self.name.clone(),
            reason: "Simulated agent failure".to_string(),
        }
    }
}

#[async_trait]
impl InternalAgent for FailingAgent {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl ResponsibleAgent for FailingAgent {
    async fn handle_write(&self, _write: WriteRequest) -> Result<ResponseRequest, AgentError> {
        Err(self.failure())
    }

    async fn handle_call(&self, _call: CallRequest) -> Result<ResponseRequest, AgentError> {
        Err(self.failure())
    }
}

/// An agent that answers only after `delay`
pub struct SlowAgent {
    pub name: String,
    pub delay: Duration,
}

impl SlowAgent {
    pub fn new(name: &str, delay: Duration) -> Self {
        Self {
            name: name.to_string(),
            delay,
        }
    }
}

#[async_trait]
impl InternalAgent for SlowAgent {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl ResponsibleAgent for SlowAgent {
    async fn handle_write(&self, _write: WriteRequest) -> Result<ResponseRequest, AgentError> {
        tokio::time::sleep(self.delay).await;
        Ok(ResponseRequest::success())
    }

    async fn handle_call(&self, _call: CallRequest) -> Result<ResponseRequest, AgentError> {
        tokio::time::sleep(self.delay).await;
        Ok(ResponseRequest::success())
    }
}

/// An agent whose handler task panics
pub struct PanickingAgent {
    pub name: String,
}

impl PanickingAgent {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl InternalAgent for PanickingAgent {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl ResponsibleAgent for PanickingAgent {
    async fn handle_write(&self, _write: WriteRequest) -> Result<ResponseRequest, AgentError> {
        panic!("Simulated agent panic");
    }

    async fn handle_call(&self, _call: CallRequest) -> Result<ResponseRequest, AgentError> {
        panic!("Simulated agent panic");
    }
}

/// An agent without the request-handling capability
pub struct PlainStubAgent {
    pub name: String,
}

impl PlainStubAgent {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl InternalAgent for PlainStubAgent {
    fn name(&self) -> &str {
        &self.name
    }
}

/// An agent that forwards every write it receives back into the system as its own
pub struct RelayAgent {
    pub name: String,
    requests: RequestHandle,
}

impl RelayAgent {
    pub fn new(name: &str, requests: RequestHandle) -> Self {
        Self {
            name: name.to_string(),
            requests,
        }
    }
}

#[async_trait]
impl InternalAgent for RelayAgent {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl ResponsibleAgent for RelayAgent {
    async fn handle_write(&self, write: WriteRequest) -> Result<ResponseRequest, AgentError> {
        Ok(self.requests.write_as(&self.name, write.odf).await?)
    }

    async fn handle_call(&self, _call: CallRequest) -> Result<ResponseRequest, AgentError> {
        Err(AgentError::Unsupported {
            agent: self.name.clone(),
            operation: "call",
        })
    }
}

/// Builds the stub agents above, selected by class name
pub struct StubBuilder;

impl StubBuilder {
    pub const CLASSES: [&'static str; 6] =
        ["stub", "failing", "slow", "panicking", "plain", "relay"];
}

impl AgentBuilder for StubBuilder {
    fn build(
        &self,
        config: &AgentConfig,
        request_handler: RequestHandle,
        _db_handler: DbHandle,
    ) -> Result<BuiltAgent, AgentError> {
        let name = config.name.as_str();
        Ok(match config.class.as_str() {
            "failing" => BuiltAgent::Responsible(Arc::new(FailingAgent::new(name))),
            "slow" => {
                let delay = Duration::from_millis(config.option_u64("delay_ms").unwrap_or(5_000));
                BuiltAgent::Responsible(Arc::new(SlowAgent::new(name, delay)))
            }
            "panicking" => BuiltAgent::Responsible(Arc::new(PanickingAgent::new(name))),
            "plain" => BuiltAgent::Plain(Arc::new(PlainStubAgent::new(name))),
            "relay" => BuiltAgent::Responsible(Arc::new(RelayAgent::new(name, request_handler))),
            _ => BuiltAgent::Responsible(Arc::new(StubAgent::new(name))),
        })
    }
}

/// Built-in classes plus every stub class
pub fn stub_factory() -> AgentFactory {
    let mut factory = AgentFactory::with_builtin();
    for class in StubBuilder::CLASSES {
        factory.register(class, Arc::new(StubBuilder));
    }
    factory
}
