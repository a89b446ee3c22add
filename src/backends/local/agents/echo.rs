// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::AgentConfig;
use crate::engine::RequestHandle;
use crate::errors::AgentError;
use crate::omi::{CallRequest, ResponseRequest, WriteRequest};
use crate::traits::{AgentBuilder, BuiltAgent, DbHandle, InternalAgent, ResponsibleAgent};

/// Answers writes and calls with the tree it received.
pub struct EchoAgent {
    name: String,
}

impl EchoAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl InternalAgent for EchoAgent {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl ResponsibleAgent for EchoAgent {
    async fn handle_write(&self, write: WriteRequest) -> Result<ResponseRequest, AgentError> {
        Ok(ResponseRequest::success_with(write.odf))
    }

    async fn handle_call(&self, call: CallRequest) -> Result<ResponseRequest, AgentError> {
        Ok(ResponseRequest::success_with(call.odf))
    }
}

pub struct EchoBuilder;

impl AgentBuilder for EchoBuilder {
    fn build(
        &self,
        config: &AgentConfig,
        _request_handler: RequestHandle,
        _db_handler: DbHandle,
    ) -> Result<BuiltAgent, AgentError> {
        Ok(BuiltAgent::Responsible(Arc::new(EchoAgent::new(&config.name))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::{ImmutableOdf, InfoItem, Node};
    use crate::traits::Odf;

    #[tokio::test]
    async fn test_echo_returns_received_tree() {
        let agent = EchoAgent::new("echo");
        let item = InfoItem::new("Objects/Echo/ping".parse().unwrap()).unwrap();
        let odf = ImmutableOdf::from_nodes(vec![Node::from(item)]).unwrap();

        let response = agent.handle_call(CallRequest::new(odf.clone())).await.unwrap();
        assert!(response.is_success());
        assert_eq!(response.combined_odf().unwrap(), odf);
    }
}
