// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::sync::Arc;

use super::agents::{EchoBuilder, PublisherBuilder, StorageBuilder};
use crate::config::AgentConfig;
use crate::engine::RequestHandle;
use crate::errors::AgentFactoryError;
use crate::traits::{AgentBuilder, BuiltAgent, DbHandle};

/// Registry of agent builders keyed by class name.
///
/// The `class` field of an agent's configuration selects the builder:
/// - "responsible_storage" -> StorageAgent (writes owned paths to the data store)
/// - "publisher" -> PublisherAgent (periodically writes a value, handles nothing)
/// - "echo" -> EchoAgent (answers writes and calls with what it received)
///
/// New agent kinds are added by registering another builder; routing and
/// dispatch never change.
pub struct AgentFactory {
    builders: BTreeMap<String, Arc<dyn AgentBuilder>>,
}

impl AgentFactory {
    /// Factory with no builders registered
    pub fn empty() -> Self {
        Self {
            builders: BTreeMap::new(),
        }
    }

    /// Factory with the built-in agent classes registered
    pub fn with_builtin() -> Self {
        let mut factory = Self::empty();
        factory.register("responsible_storage", Arc::new(StorageBuilder));
        factory.register("publisher", Arc::new(PublisherBuilder));
        factory.register("echo", Arc::new(EchoBuilder));
        factory
    }

    /// Register `builder` under `class`, replacing any previous builder
    pub fn register(&mut self, class: &str, builder: Arc<dyn AgentBuilder>) {
        self.builders.insert(class.to_string(), builder);
    }

    /// Create an agent instance from configuration
    pub fn create_agent(
        &self,
        config: &AgentConfig,
        request_handler: RequestHandle,
        db_handler: DbHandle,
    ) -> Result<BuiltAgent, AgentFactoryError> {
        let builder = self
            .builders
            .get(&config.class)
            .ok_or_else(|| AgentFactoryError::UnknownClass {
                agent: config.name.clone(),
                class: config.class.clone(),
            })?;

        builder
            .build(config, request_handler, db_handler)
            .map_err(|source| AgentFactoryError::CreationFailed {
                agent: config.name.clone(),
                source,
            })
    }

    /// List all registered agent classes
    pub fn list_available_classes(&self) -> Vec<&str> {
        self.builders.keys().map(String::as_str).collect()
    }

    /// Check if a class is registered
    pub fn is_class_available(&self, class: &str) -> bool {
        self.builders.contains_key(class)
    }
}

impl Default for AgentFactory {
    fn default() -> Self {
        Self::with_builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::store::InMemoryStore;
    use crate::errors::AgentError;

    fn collaborators() -> (RequestHandle, DbHandle) {
        let (handle, _mailbox) = RequestHandle::channel(1);
        (handle, Arc::new(InMemoryStore::default()))
    }

    #[test]
    fn test_builtin_classes() {
        let factory = AgentFactory::with_builtin();
        assert_eq!(
            factory.list_available_classes(),
            vec!["echo", "publisher", "responsible_storage"]
        );
        assert!(factory.is_class_available("echo"));
        assert!(!factory.is_class_available("thermostat"));
    }

    #[test]
    fn test_capabilities_follow_class() {
        let factory = AgentFactory::with_builtin();
        let cases = vec![
            (
                AgentConfig::new("storage", "responsible_storage"),
                true,
            ),
            (AgentConfig::new("echo", "echo"), true),
            (
                AgentConfig::new("thermo", "publisher")
                    .with_option("path", "Objects/Sensors/temp".into()),
                false,
            ),
        ];

        for (config, responsible) in cases {
            let (handle, store) = collaborators();
            let agent = factory.create_agent(&config, handle, store).unwrap();
            assert_eq!(agent.name(), config.name);
            assert_eq!(agent.is_responsible(), responsible, "agent {}", config.name);
        }
    }

    #[test]
    fn test_unknown_class() {
        let factory = AgentFactory::with_builtin();
        let (handle, store) = collaborators();

        let result = factory.create_agent(&AgentConfig::new("x", "thermostat"), handle, store);
        assert!(matches!(
            result,
            Err(AgentFactoryError::UnknownClass { ref class, .. }) if class == "thermostat"
        ));
    }

    #[test]
    fn test_builder_rejection_is_wrapped() {
        let factory = AgentFactory::with_builtin();
        let (handle, store) = collaborators();

        let result = factory.create_agent(&AgentConfig::new("thermo", "publisher"), handle, store);
        match result {
            Err(AgentFactoryError::CreationFailed { agent, source }) => {
                assert_eq!(agent, "thermo");
                assert!(matches!(source, AgentError::InvalidConfig { .. }));
            }
            other => panic!("expected CreationFailed, got {:?}", other),
        }
    }
}
