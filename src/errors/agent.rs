// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for agent construction and request handling.

use thiserror::Error;

use crate::errors::{DispatchError, OdfError, StoreError};

/// Failure of a single agent while handling a request or starting up.
///
/// These are captured per agent by the dispatcher and surface as a failed
/// result for that agent's portion of the response.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error("Agent '{agent}' failed: {reason}")]
    HandlerFailed { agent: String, reason: String },

    #[error("Agent '{agent}' does not support {operation}")]
    Unsupported {
        agent: String,
        operation: &'static str,
    },

    #[error("Invalid configuration for agent '{agent}': {reason}")]
    InvalidConfig { agent: String, reason: String },

    #[error("Agent data store error: {0}")]
    Store(#[from] StoreError),

    #[error("Agent request could not be dispatched: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Agent produced an invalid tree: {0}")]
    Odf(#[from] OdfError),
}

/// Errors that can occur while creating agents from configuration
#[derive(Error, Debug)]
pub enum AgentFactoryError {
    /// No builder is registered under the configured class name
    #[error("Unknown agent class '{class}' for agent '{agent}'")]
    UnknownClass { agent: String, class: String },

    /// The builder rejected the configuration
    #[error("Failed to create agent '{agent}': {source}")]
    CreationFailed {
        agent: String,
        #[source]
        source: AgentError,
    },

    /// The agent was built but its `start` failed
    #[error("Failed to start agent '{agent}': {source}")]
    StartFailed {
        agent: String,
        #[source]
        source: AgentError,
    },
}
