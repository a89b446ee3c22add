// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors that can occur during agent system configuration validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// `agent_system.timeout_seconds` is zero, so every agent would time out
    ZeroTimeout,
    /// Two agents share the same name
    DuplicateAgentName {
        /// The duplicate agent name
        agent: String,
    },
    /// An agent claims responsibility for a path that is not a valid O-DF path
    InvalidResponsiblePath {
        /// The agent declaring the path
        agent: String,
        /// The offending path string
        path: String,
        /// Why the path was rejected
        reason: String,
    },
    /// A permission string other than `w`, `c` or `wc`
    InvalidPermission {
        /// The agent declaring the permission
        agent: String,
        /// The owned path
        path: String,
        /// The rejected permission string
        permission: String,
    },
    /// Two agents claim the same permission on the same path
    OwnershipConflict {
        /// The contested path
        path: String,
        /// The agents claiming it
        agents: Vec<String>,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::ZeroTimeout => {
                write!(f, "agent_system.timeout_seconds must be greater than zero")
            }
            ValidationError::DuplicateAgentName { agent } => {
                write!(f, "Duplicate agent name: '{}'", agent)
            }
            ValidationError::InvalidResponsiblePath {
                agent,
                path,
                reason,
            } => {
                write!(
                    f,
                    "Agent '{}' is responsible for invalid path '{}': {}",
                    agent, path, reason
                )
            }
            ValidationError::InvalidPermission {
                agent,
                path,
                permission,
            } => {
                write!(
                    f,
                    "Agent '{}' has invalid permission '{}' for '{}' (expected w, c or wc)",
                    agent, permission, path
                )
            }
            ValidationError::OwnershipConflict { path, agents } => {
                write!(
                    f,
                    "Path '{}' is claimed with the same permission by multiple agents: {}",
                    path,
                    agents.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors from loading an agent system configuration file
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration validation failed:\n{}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
