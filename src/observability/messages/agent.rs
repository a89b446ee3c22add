// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for agent construction and lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Building agents from configuration
//! * Starting and stopping agents
//! * Work done by agents on their own schedule

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Agent started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use omi_node::observability::messages::agent::AgentStarted;
///
/// let msg = AgentStarted {
///     agent: "storage",
///     class: "responsible_storage",
///     owned_paths: 1,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct AgentStarted<'a> {
    pub agent: &'a str,
    pub class: &'a str,
    pub owned_paths: usize,
}

impl Display for AgentStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Agent '{}' ({}) started, responsible for {} paths",
            self.agent, self.class, self.owned_paths
        )
    }
}

impl StructuredLog for AgentStarted<'_> {
    fn log(&self) {
        tracing::info!(
            agent = self.agent,
            class = self.class,
            owned_paths = self.owned_paths,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "agent",
            span_name = name,
            agent = self.agent,
            class = self.class,
        )
    }
}

/// Agent stopped.
///
/// # Log Level
/// `info!` - Important operational event
pub struct AgentStopped<'a> {
    pub agent: &'a str,
}

impl Display for AgentStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Agent '{}' stopped", self.agent)
    }
}

impl StructuredLog for AgentStopped<'_> {
    fn log(&self) {
        tracing::info!(agent = self.agent, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("agent", span_name = name, agent = self.agent)
    }
}

/// An agent could not be built, started or stopped.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use omi_node::observability::messages::agent::AgentLifecycleFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "missing option");
/// let msg = AgentLifecycleFailed {
///     agent: "thermometer",
///     stage: "build",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct AgentLifecycleFailed<'a> {
    pub agent: &'a str,
    pub stage: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for AgentLifecycleFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Agent '{}' failed during {}: {}",
            self.agent, self.stage, self.error
        )
    }
}

impl StructuredLog for AgentLifecycleFailed<'_> {
    fn log(&self) {
        tracing::error!(
            agent = self.agent,
            stage = self.stage,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "agent_failure",
            span_name = name,
            agent = self.agent,
            stage = self.stage,
        )
    }
}

/// A scheduled publish from an agent was rejected or failed.
///
/// # Log Level
/// `warn!` - The agent keeps running and retries on its next tick
pub struct PublishFailed<'a> {
    pub agent: &'a str,
    pub path: &'a str,
    pub reason: &'a str,
}

impl Display for PublishFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Agent '{}' failed to publish to '{}': {}",
            self.agent, self.path, self.reason
        )
    }
}

impl StructuredLog for PublishFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            agent = self.agent,
            path = self.path,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("publish", span_name = name, agent = self.agent)
    }
}

/// Owned paths declared for an agent without the request-handling capability.
///
/// # Log Level
/// `warn!` - Configuration has no effect
pub struct OwnershipIgnored<'a> {
    pub agent: &'a str,
    pub path: &'a str,
}

impl Display for OwnershipIgnored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Agent '{}' cannot handle requests, ignoring its ownership of '{}'",
            self.agent, self.path
        )
    }
}

impl StructuredLog for OwnershipIgnored<'_> {
    fn log(&self) {
        tracing::warn!(agent = self.agent, path = self.path, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("ownership", span_name = name, agent = self.agent)
    }
}
