// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_AGENT_TIMEOUT_SECONDS, DEFAULT_HISTORY_LENGTH, DEFAULT_REQUEST_BUFFER,
};
use crate::errors::{ConfigError, ValidationError};
use crate::observability::messages::validation::{ValidationCompleted, ValidationFailed};
use crate::observability::messages::StructuredLog;
use crate::odf::Path;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::time::Duration;

/// Main configuration structure for the agent system.
///
/// Holds the system-wide options and one entry per internal agent. It is
/// typically loaded from a YAML file (TOML is accepted for `.toml` files).
///
/// # Example
/// ```yaml
/// agent_system:
///   timeout_seconds: 5
///   history_length: 10
/// agents:
///   - name: storage
///     class: responsible_storage
///     responsible:
///       "Objects/House": wc
///   - name: thermometer
///     class: publisher
///     options:
///       path: "Objects/Sensors/temp"
///       interval_ms: 1000
/// ```
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub agent_system: AgentSystemOptions,
    #[serde(default)]
    pub agents: Vec<AgentConfig>,
}

/// System-wide options.
///
/// # Fields
/// * `timeout_seconds` - How long one agent may take to handle its portion of a request
/// * `history_length` - Values kept per InfoItem by the in-memory data store
/// * `request_buffer` - Capacity of the request loop mailbox
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AgentSystemOptions {
    pub timeout_seconds: Option<u64>,
    pub history_length: Option<usize>,
    pub request_buffer: Option<usize>,
}

impl AgentSystemOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_AGENT_TIMEOUT_SECONDS))
    }

    pub fn history_length(&self) -> usize {
        self.history_length.unwrap_or(DEFAULT_HISTORY_LENGTH).max(1)
    }

    pub fn request_buffer(&self) -> usize {
        self.request_buffer.unwrap_or(DEFAULT_REQUEST_BUFFER).max(1)
    }
}

/// Configuration for a single internal agent.
///
/// # Fields
/// * `name` - Unique agent name, used in logs and response results
/// * `class` - Builder to instantiate, as registered in the `AgentFactory`
/// * `responsible` - Owned path prefixes mapped to permissions (`w`, `c` or `wc`)
/// * `options` - Agent-specific settings
#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    pub name: String,
    pub class: String,
    #[serde(default)]
    pub responsible: BTreeMap<String, String>,
    #[serde(default)]
    pub options: HashMap<String, serde_yaml::Value>,
}

impl AgentConfig {
    pub fn new(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            responsible: BTreeMap::new(),
            options: HashMap::new(),
        }
    }

    pub fn with_responsible(mut self, path: &str, permission: &str) -> Self {
        self.responsible.insert(path.to_string(), permission.to_string());
        self
    }

    pub fn with_option(mut self, key: &str, value: serde_yaml::Value) -> Self {
        self.options.insert(key.to_string(), value);
        self
    }

    /// Each `responsible` entry parsed; a bad entry reports every problem it has.
    pub fn owned_entries(
        &self,
    ) -> impl Iterator<Item = Result<(Path, Permission), Vec<ValidationError>>> + '_ {
        self.responsible
            .iter()
            .map(|(path, permission)| self.parse_owned_entry(path, permission))
    }

    /// Owned paths with parsed permissions.
    pub fn owned_paths(&self) -> Result<Vec<(Path, Permission)>, Vec<ValidationError>> {
        let mut owned = Vec::new();
        let mut errors = Vec::new();
        for entry in self.owned_entries() {
            match entry {
                Ok(entry) => owned.push(entry),
                Err(entry_errors) => errors.extend(entry_errors),
            }
        }

        if errors.is_empty() {
            Ok(owned)
        } else {
            Err(errors)
        }
    }

    fn parse_owned_entry(
        &self,
        path: &str,
        permission: &str,
    ) -> Result<(Path, Permission), Vec<ValidationError>> {
        let parsed = path.parse::<Path>().map_err(|e| {
            ValidationError::InvalidResponsiblePath {
                agent: self.name.clone(),
                path: path.to_string(),
                reason: e.to_string(),
            }
        });
        let parsed_permission =
            Permission::parse(permission).ok_or_else(|| ValidationError::InvalidPermission {
                agent: self.name.clone(),
                path: path.to_string(),
                permission: permission.to_string(),
            });

        match (parsed, parsed_permission) {
            (Ok(parsed), Ok(permission)) => Ok((parsed, permission)),
            (parsed, permission) => Err(parsed.err().into_iter().chain(permission.err()).collect()),
        }
    }

    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(serde_yaml::Value::as_str)
    }

    pub fn option_u64(&self, key: &str) -> Option<u64> {
        self.options.get(key).and_then(serde_yaml::Value::as_u64)
    }
}

/// Request kinds an agent accepts on an owned path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permission {
    pub write: bool,
    pub call: bool,
}

impl Permission {
    pub const WRITE: Permission = Permission { write: true, call: false };
    pub const CALL: Permission = Permission { write: false, call: true };
    pub const WRITE_CALL: Permission = Permission { write: true, call: true };

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "w" => Some(Self::WRITE),
            "c" => Some(Self::CALL),
            "wc" | "cw" => Some(Self::WRITE_CALL),
            _ => None,
        }
    }
}

/// Load a config from a YAML (or `.toml`) file
pub fn load_config<P: AsRef<std::path::Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let cfg = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&content)?,
        _ => serde_yaml::from_str(&content)?,
    };
    Ok(cfg)
}

/// Load and validate a config file
///
/// Validation checks agent names, owned paths and permissions so that a
/// broken configuration is rejected before any agent is built.
pub fn load_and_validate_config<P: AsRef<std::path::Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    if let Err(errors) = crate::config::validate_config(&cfg) {
        ValidationFailed {
            error_count: errors.len(),
        }
        .log();
        return Err(ConfigError::Invalid(errors));
    }

    ValidationCompleted {
        agent_count: cfg.agents.len(),
        owned_path_count: cfg.agents.iter().map(|a| a.responsible.len()).sum(),
    }
    .log();
    Ok(cfg)
}
