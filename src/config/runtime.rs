// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::backends::local::AgentFactory;
use crate::backends::store::InMemoryStore;
use crate::config::Config;
use crate::engine::AgentSystem;
use crate::errors::AgentFactoryError;

/// Agent system runtime builder - wires storage, agent factory and agents from configuration.
///
/// The `RuntimeBuilder` creates the in-memory data store sized by
/// `agent_system.history_length` and starts an [`AgentSystem`] with the
/// built-in agent classes.
///
/// # Examples
///
/// ```
/// use omi_node::config::{Config, RuntimeBuilder};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let system = RuntimeBuilder::from_config(&Config::default()).await.unwrap();
///
/// assert!(system.agents().is_empty());
/// system.shutdown().await.unwrap();
/// # }
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Start an agent system with the built-in agent classes.
    pub async fn from_config(cfg: &Config) -> Result<AgentSystem, AgentFactoryError> {
        Self::with_factory(cfg, &AgentFactory::with_builtin()).await
    }

    /// Start an agent system with a caller-provided factory, e.g. one with extra
    /// classes registered.
    pub async fn with_factory(
        cfg: &Config,
        factory: &AgentFactory,
    ) -> Result<AgentSystem, AgentFactoryError> {
        let store = Arc::new(InMemoryStore::new(cfg.agent_system.history_length()));
        AgentSystem::start(cfg, factory, store).await
    }
}
