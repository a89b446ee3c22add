// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::AgentConfig;
use crate::engine::RequestHandle;
use crate::errors::AgentError;
use crate::odf::Path;
use crate::omi::{CallRequest, ResponseRequest, WriteRequest};
use crate::traits::{AgentBuilder, BuiltAgent, DbHandle, InternalAgent, Odf, ResponsibleAgent};

/// Accepts writes for its owned paths into the data store.
///
/// A call on an owned path returns the stored subtree at the called paths,
/// latest values only.
pub struct StorageAgent {
    name: String,
    db: DbHandle,
}

impl StorageAgent {
    pub fn new(name: impl Into<String>, db: DbHandle) -> Self {
        Self {
            name: name.into(),
            db,
        }
    }
}

#[async_trait]
impl InternalAgent for StorageAgent {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl ResponsibleAgent for StorageAgent {
    async fn handle_write(&self, write: WriteRequest) -> Result<ResponseRequest, AgentError> {
        self.db.write(&write.odf).await?;
        Ok(ResponseRequest::success())
    }

    async fn handle_call(&self, call: CallRequest) -> Result<ResponseRequest, AgentError> {
        let paths: Vec<Path> = call.odf.leaves().into_iter().map(|n| n.path()).collect();
        let stored = self.db.read(&paths, None).await?;
        Ok(ResponseRequest::success_with(stored))
    }
}

pub struct StorageBuilder;

impl AgentBuilder for StorageBuilder {
    fn build(
        &self,
        config: &AgentConfig,
        _request_handler: RequestHandle,
        db_handler: DbHandle,
    ) -> Result<BuiltAgent, AgentError> {
        Ok(BuiltAgent::Responsible(Arc::new(StorageAgent::new(
            &config.name,
            db_handler,
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::store::InMemoryStore;
    use crate::odf::{ImmutableOdf, InfoItem, Node, OdfValue, Value};
    use chrono::Utc;

    #[tokio::test]
    async fn test_write_then_call_returns_stored_value() {
        let store = Arc::new(InMemoryStore::default());
        let agent = StorageAgent::new("storage", store.clone());

        let item = InfoItem::new("Objects/House/temp".parse().unwrap())
            .unwrap()
            .with_values(vec![Value::new(OdfValue::Double(21.5), Utc::now())]);
        let odf = ImmutableOdf::from_nodes(vec![Node::from(item.clone())]).unwrap();

        let written = agent.handle_write(WriteRequest::new(odf.clone())).await.unwrap();
        assert!(written.is_success());

        let called = agent
            .handle_call(CallRequest::new(odf.values_removed()))
            .await
            .unwrap();
        let stored = called.combined_odf().unwrap();
        let stored_item = stored.get(item.path()).and_then(Node::as_info_item).unwrap();
        assert_eq!(stored_item.newest_value().and_then(Value::as_f64), Some(21.5));
    }
}
