// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::backends::local::AgentFactory;
use crate::config::Config;
use crate::engine::handle::Envelope;
use crate::engine::{Dispatcher, RequestHandle, RoutingTable};
use crate::errors::{AgentError, AgentFactoryError};
use crate::observability::messages::agent::{
    AgentLifecycleFailed, AgentStarted, AgentStopped, OwnershipIgnored,
};
use crate::observability::messages::dispatch::{SystemStarted, SystemStopped};
use crate::observability::messages::StructuredLog;
use crate::traits::{BuiltAgent, DbHandle};

/// Running set of agents plus the request loop that serves them.
///
/// Startup builds every configured agent through the [`AgentFactory`],
/// registers owned paths of the responsible ones, spawns the request loop
/// and finally starts the agents, so an agent may issue requests from its
/// `start`. Requests submitted through [`RequestHandle`] are dispatched
/// concurrently; the loop never waits for one request before taking the next.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use omi_node::backends::local::AgentFactory;
/// use omi_node::backends::store::InMemoryStore;
/// use omi_node::config::load_and_validate_config;
/// use omi_node::engine::AgentSystem;
///
/// # async fn run() -> anyhow::Result<()> {
/// let config = load_and_validate_config("configs/demo.yaml")?;
/// let store = Arc::new(InMemoryStore::new(config.agent_system.history_length()));
/// let system = AgentSystem::start(&config, &AgentFactory::with_builtin(), store).await?;
///
/// let requests = system.request_handle();
/// // ... submit writes, reads and calls
///
/// system.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct AgentSystem {
    requests: RequestHandle,
    agents: Vec<BuiltAgent>,
    store: DbHandle,
    shutdown: CancellationToken,
    request_loop: JoinHandle<u64>,
}

impl AgentSystem {
    pub async fn start(
        config: &Config,
        factory: &AgentFactory,
        store: DbHandle,
    ) -> Result<Self, AgentFactoryError> {
        let options = &config.agent_system;
        let (requests, mailbox) = RequestHandle::channel(options.request_buffer());

        let mut routing = RoutingTable::new();
        let mut agents = Vec::with_capacity(config.agents.len());
        let mut owned_counts = Vec::with_capacity(config.agents.len());

        for agent_config in &config.agents {
            let agent = factory
                .create_agent(agent_config, requests.clone(), Arc::clone(&store))
                .map_err(|error| {
                    AgentLifecycleFailed {
                        agent: &agent_config.name,
                        stage: "build",
                        error: &error,
                    }
                    .log();
                    error
                })?;

            let owned = agent_config
                .owned_paths()
                .map_err(|errors| AgentFactoryError::CreationFailed {
                    agent: agent_config.name.clone(),
                    source: AgentError::InvalidConfig {
                        agent: agent_config.name.clone(),
                        reason: errors
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join("; "),
                    },
                })?;

            let mut registered = 0;
            for (prefix, permission) in owned {
                if routing.register(&agent, prefix.clone(), permission) {
                    registered += 1;
                } else {
                    OwnershipIgnored {
                        agent: agent.name(),
                        path: &prefix.to_string(),
                    }
                    .log();
                }
            }

            owned_counts.push(registered);
            agents.push(agent);
        }

        let responsible_count = agents.iter().filter(|a| a.is_responsible()).count();
        let dispatcher = Arc::new(Dispatcher::new(
            routing,
            Arc::clone(&store),
            options.timeout(),
        ));
        let shutdown = CancellationToken::new();
        let request_loop = tokio::spawn(run_request_loop(mailbox, dispatcher, shutdown.clone()));

        let system = Self {
            requests,
            agents,
            store,
            shutdown,
            request_loop,
        };

        let mut failure = None;
        for ((agent, agent_config), owned_paths) in system
            .agents
            .iter()
            .zip(&config.agents)
            .zip(owned_counts)
        {
            if let Err(source) = agent.start().await {
                AgentLifecycleFailed {
                    agent: agent.name(),
                    stage: "start",
                    error: &source,
                }
                .log();
                failure = Some((agent.name().to_string(), source));
                break;
            }
            AgentStarted {
                agent: agent.name(),
                class: &agent_config.class,
                owned_paths,
            }
            .log();
        }

        if let Some((agent, source)) = failure {
            // Agents that never started treat stop as a no-op.
            let _ = system.shutdown().await;
            return Err(AgentFactoryError::StartFailed { agent, source });
        }

        SystemStarted {
            agent_count: system.agents.len(),
            responsible_count,
            timeout: options.timeout(),
        }
        .log();

        Ok(system)
    }

    /// Handle for submitting requests, same as the one every agent holds.
    pub fn request_handle(&self) -> RequestHandle {
        self.requests.clone()
    }

    pub fn store(&self) -> DbHandle {
        Arc::clone(&self.store)
    }

    pub fn agents(&self) -> &[BuiltAgent] {
        &self.agents
    }

    pub fn agent(&self, name: &str) -> Option<&BuiltAgent> {
        self.agents.iter().find(|a| a.name() == name)
    }

    /// Stop every agent, then the request loop.
    ///
    /// All agents are asked to stop even if one fails; the first failure is
    /// returned. Requests still queued are answered with
    /// [`DispatchError::SystemShutdown`](crate::errors::DispatchError::SystemShutdown).
    pub async fn shutdown(self) -> Result<(), AgentError> {
        let mut first_error = None;
        for agent in &self.agents {
            match agent.stop().await {
                Ok(()) => AgentStopped {
                    agent: agent.name(),
                }
                .log(),
                Err(error) => {
                    AgentLifecycleFailed {
                        agent: agent.name(),
                        stage: "stop",
                        error: &error,
                    }
                    .log();
                    first_error.get_or_insert(error);
                }
            }
        }

        self.shutdown.cancel();
        let handled_requests = self.request_loop.await.unwrap_or_default();
        SystemStopped { handled_requests }.log();

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

async fn run_request_loop(
    mut mailbox: mpsc::Receiver<Envelope>,
    dispatcher: Arc<Dispatcher>,
    shutdown: CancellationToken,
) -> u64 {
    let mut handled = 0;
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            envelope = mailbox.recv() => match envelope {
                Some(Envelope { request, reply }) => {
                    handled += 1;
                    let dispatcher = Arc::clone(&dispatcher);
                    tokio::spawn(async move {
                        let response = dispatcher.dispatch(request).await;
                        // The requester may have stopped waiting.
                        let _ = reply.send(response);
                    });
                }
                None => break,
            },
        }
    }
    handled
}
