// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for request routing and fan-out.
//!
//! This module contains message types for logging events related to:
//! * Requests entering the agent system
//! * Splitting a request across responsible agents
//! * Per-agent outcomes (success, failure, timeout)
//! * Agent system lifecycle

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Request accepted by the request loop.
///
/// # Log Level
/// `debug!` - Per-request detail
///
/// # Example
/// ```
/// use omi_node::observability::messages::dispatch::RequestReceived;
///
/// let msg = RequestReceived {
///     kind: "write",
///     leaf_count: 3,
///     sender: Some("thermometer"),
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct RequestReceived<'a> {
    pub kind: &'a str,
    pub leaf_count: usize,
    pub sender: Option<&'a str>,
}

impl Display for RequestReceived<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Received {} request for {} leaves from {}",
            self.kind,
            self.leaf_count,
            self.sender.unwrap_or("external client")
        )
    }
}

impl StructuredLog for RequestReceived<'_> {
    fn log(&self) {
        tracing::debug!(
            kind = self.kind,
            leaf_count = self.leaf_count,
            sender = self.sender,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "request",
            span_name = name,
            kind = self.kind,
            leaf_count = self.leaf_count,
        )
    }
}

/// Request split across responsible agents.
///
/// # Log Level
/// `debug!` - Per-request detail
pub struct RequestRouted<'a> {
    pub kind: &'a str,
    pub agent_count: usize,
    pub unowned_count: usize,
}

impl Display for RequestRouted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Routed {} request to {} agents, {} leaves unowned",
            self.kind, self.agent_count, self.unowned_count
        )
    }
}

impl StructuredLog for RequestRouted<'_> {
    fn log(&self) {
        tracing::debug!(
            kind = self.kind,
            agent_count = self.agent_count,
            unowned_count = self.unowned_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("routing", span_name = name, kind = self.kind)
    }
}

/// An agent handled its portion of a request.
///
/// # Log Level
/// `debug!` - Per-request detail
pub struct AgentPortionCompleted<'a> {
    pub agent: &'a str,
    pub kind: &'a str,
    pub duration: Duration,
}

impl Display for AgentPortionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Agent '{}' handled {} in {:?}",
            self.agent, self.kind, self.duration
        )
    }
}

impl StructuredLog for AgentPortionCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            agent = self.agent,
            kind = self.kind,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("agent_portion", span_name = name, agent = self.agent)
    }
}

/// An agent failed its portion of a request. Other portions are unaffected.
///
/// # Log Level
/// `warn!` - Partial failure reported back to the requester
///
/// # Example
/// ```
/// use omi_node::observability::messages::dispatch::AgentPortionFailed;
///
/// let msg = AgentPortionFailed {
///     agent: "lights",
///     kind: "write",
///     reason: "device offline",
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct AgentPortionFailed<'a> {
    pub agent: &'a str,
    pub kind: &'a str,
    pub reason: &'a str,
}

impl Display for AgentPortionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Agent '{}' failed to handle {}: {}",
            self.agent, self.kind, self.reason
        )
    }
}

impl StructuredLog for AgentPortionFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            agent = self.agent,
            kind = self.kind,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "agent_portion_failed",
            span_name = name,
            agent = self.agent,
            kind = self.kind,
        )
    }
}

/// An agent did not answer within the configured timeout.
///
/// # Log Level
/// `warn!` - Partial failure reported back to the requester
pub struct AgentPortionTimedOut<'a> {
    pub agent: &'a str,
    pub kind: &'a str,
    pub timeout: Duration,
}

impl Display for AgentPortionTimedOut<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Agent '{}' did not handle {} within {:?}",
            self.agent, self.kind, self.timeout
        )
    }
}

impl StructuredLog for AgentPortionTimedOut<'_> {
    fn log(&self) {
        tracing::warn!(
            agent = self.agent,
            kind = self.kind,
            timeout_ms = self.timeout.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("agent_timeout", span_name = name, agent = self.agent)
    }
}

/// Agent system is up and serving requests.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SystemStarted {
    pub agent_count: usize,
    pub responsible_count: usize,
    pub timeout: Duration,
}

impl Display for SystemStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Agent system started: {} agents ({} responsible), agent timeout {:?}",
            self.agent_count, self.responsible_count, self.timeout
        )
    }
}

impl StructuredLog for SystemStarted {
    fn log(&self) {
        tracing::info!(
            agent_count = self.agent_count,
            responsible_count = self.responsible_count,
            timeout_ms = self.timeout.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "agent_system",
            span_name = name,
            agent_count = self.agent_count,
        )
    }
}

/// Agent system stopped; the request loop has drained.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SystemStopped {
    pub handled_requests: u64,
}

impl Display for SystemStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Agent system stopped after {} requests",
            self.handled_requests
        )
    }
}

impl StructuredLog for SystemStopped {
    fn log(&self) {
        tracing::info!(handled_requests = self.handled_requests, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("agent_system", span_name = name)
    }
}
