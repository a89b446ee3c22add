use async_trait::async_trait;
use std::sync::Arc;

use crate::config::AgentConfig;
use crate::engine::RequestHandle;
use crate::errors::AgentError;
use crate::omi::{CallRequest, ResponseRequest, WriteRequest};
use crate::traits::DbHandle;

/// A long-lived backend unit managed by the agent system.
#[async_trait]
pub trait InternalAgent: Send + Sync {
    fn name(&self) -> &str;

    /// Begin any background work. Called once after construction.
    async fn start(&self) -> Result<(), AgentError> {
        Ok(())
    }

    /// Stop background work. In-flight work is stopped on a best-effort basis.
    async fn stop(&self) -> Result<(), AgentError> {
        Ok(())
    }
}

/// Capability to receive write and call requests for owned paths.
///
/// The dispatcher only routes to agents built as
/// [`BuiltAgent::Responsible`], so an agent without this capability can never
/// be asked to handle a request.
#[async_trait]
pub trait ResponsibleAgent: InternalAgent {
    /// Handle the portion of a write that falls under the agent's owned paths.
    async fn handle_write(&self, write: WriteRequest) -> Result<ResponseRequest, AgentError>;

    /// Handle the portion of a call that falls under the agent's owned paths.
    async fn handle_call(&self, call: CallRequest) -> Result<ResponseRequest, AgentError>;
}

/// An instantiated agent, tagged with the capabilities it was built with.
#[derive(Clone)]
pub enum BuiltAgent {
    Plain(Arc<dyn InternalAgent>),
    Responsible(Arc<dyn ResponsibleAgent>),
}

impl BuiltAgent {
    pub fn name(&self) -> &str {
        match self {
            BuiltAgent::Plain(agent) => agent.name(),
            BuiltAgent::Responsible(agent) => agent.name(),
        }
    }

    /// Handling capability, if this agent has it.
    pub fn as_responsible(&self) -> Option<&Arc<dyn ResponsibleAgent>> {
        match self {
            BuiltAgent::Plain(_) => None,
            BuiltAgent::Responsible(agent) => Some(agent),
        }
    }

    pub fn is_responsible(&self) -> bool {
        self.as_responsible().is_some()
    }

    pub async fn start(&self) -> Result<(), AgentError> {
        match self {
            BuiltAgent::Plain(agent) => agent.start().await,
            BuiltAgent::Responsible(agent) => agent.start().await,
        }
    }

    pub async fn stop(&self) -> Result<(), AgentError> {
        match self {
            BuiltAgent::Plain(agent) => agent.stop().await,
            BuiltAgent::Responsible(agent) => agent.stop().await,
        }
    }
}

impl std::fmt::Debug for BuiltAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltAgent")
            .field("name", &self.name())
            .field("responsible", &self.is_responsible())
            .finish()
    }
}

/// Constructible capability: the single extension point for new agents.
///
/// A builder receives the agent's configuration and the two system
/// collaborators, which it may keep and use freely.
pub trait AgentBuilder: Send + Sync {
    fn build(
        &self,
        config: &AgentConfig,
        request_handler: RequestHandle,
        db_handler: DbHandle,
    ) -> Result<BuiltAgent, AgentError>;
}
