// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation for agent system integrity.
//!
//! Validation runs before any agent is built so that routing never has to
//! deal with ambiguous or malformed ownership. All checks accumulate their
//! errors, letting users see every problem at once rather than fixing them
//! one by one.
//!
//! # Validation Pipeline
//!
//! 1. **System Options**: The agent timeout is non-zero
//! 2. **Uniqueness Validation**: Ensures all agent names are unique
//! 3. **Ownership Validation**: Every `responsible` entry is a valid O-DF path
//!    with a `w`, `c` or `wc` permission
//! 4. **Conflict Detection**: No path is owned with the same permission by
//!    more than one agent
//!
//! Conflict detection only runs when the ownership entries parsed, since it
//! compares normalized paths.
//!
//! # Examples
//!
//! ```rust
//! use omi_node::config::{validate_config, AgentConfig, Config};
//! use omi_node::errors::ValidationError;
//!
//! let config = Config {
//!     agents: vec![
//!         AgentConfig::new("lights", "echo").with_responsible("Objects/House/Lights", "w"),
//!         AgentConfig::new("switches", "echo").with_responsible("Objects/House/Lights/", "wc"),
//!     ],
//!     ..Default::default()
//! };
//!
//! let errors = validate_config(&config).unwrap_err();
//! assert!(matches!(errors[0], ValidationError::OwnershipConflict { .. }));
//! ```

use std::collections::{BTreeMap, HashSet};

use crate::config::{Config, Permission};
use crate::errors::ValidationError;
use crate::odf::Path;

/// Validates a configuration for structural integrity.
///
/// # Returns
///
/// * `Ok(())` - Configuration is valid and agents can be built from it
/// * `Err(Vec<ValidationError>)` - List of all validation errors found
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.agent_system.timeout_seconds == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    if let Err(duplicate_errors) = validate_unique_agent_names(config) {
        errors.extend(duplicate_errors);
    }

    match collect_ownership(config) {
        Ok(ownership) => {
            if let Err(conflicts) = validate_no_conflicts(&ownership) {
                errors.extend(conflicts);
            }
        }
        Err(ownership_errors) => errors.extend(ownership_errors),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_unique_agent_names(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for agent in &config.agents {
        if !seen.insert(&agent.name) {
            errors.push(ValidationError::DuplicateAgentName {
                agent: agent.name.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

type Ownership = BTreeMap<Path, Vec<(String, Permission)>>;

/// Parses every `responsible` entry, grouping claims by normalized path.
fn collect_ownership(config: &Config) -> Result<Ownership, Vec<ValidationError>> {
    let mut ownership: Ownership = BTreeMap::new();
    let mut errors = Vec::new();

    for agent in &config.agents {
        for entry in agent.owned_entries() {
            match entry {
                Ok((path, permission)) => ownership
                    .entry(path)
                    .or_default()
                    .push((agent.name.clone(), permission)),
                Err(entry_errors) => errors.extend(entry_errors),
            }
        }
    }

    if errors.is_empty() {
        Ok(ownership)
    } else {
        Err(errors)
    }
}

/// A path may be split between a writer and a caller, never shared for the same kind.
fn validate_no_conflicts(ownership: &Ownership) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (path, claims) in ownership {
        let writers: Vec<String> = claims
            .iter()
            .filter(|(_, p)| p.write)
            .map(|(name, _)| name.clone())
            .collect();
        let callers: Vec<String> = claims
            .iter()
            .filter(|(_, p)| p.call)
            .map(|(name, _)| name.clone())
            .collect();

        let mut contested: Vec<String> = Vec::new();
        for group in [writers, callers] {
            if group.len() > 1 {
                for name in group {
                    if !contested.contains(&name) {
                        contested.push(name);
                    }
                }
            }
        }

        if !contested.is_empty() {
            errors.push(ValidationError::OwnershipConflict {
                path: path.to_string(),
                agents: contested,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;

    fn config_with(agents: Vec<AgentConfig>) -> Config {
        Config {
            agents,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_empty_config() {
        assert!(validate_config(&config_with(vec![])).is_ok());
    }

    #[test]
    fn test_valid_disjoint_ownership() {
        let config = config_with(vec![
            AgentConfig::new("storage", "responsible_storage")
                .with_responsible("Objects/House", "wc"),
            AgentConfig::new("thermo", "publisher"),
            AgentConfig::new("lights", "echo").with_responsible("Objects/House/Lights", "w"),
        ]);

        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_split_write_and_call_owners_are_valid() {
        let config = config_with(vec![
            AgentConfig::new("writer", "echo").with_responsible("Objects/Door", "w"),
            AgentConfig::new("caller", "echo").with_responsible("/Objects/Door/", "c"),
        ]);

        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_duplicate_agent_names() {
        let config = config_with(vec![
            AgentConfig::new("a", "echo"),
            AgentConfig::new("b", "echo"),
            AgentConfig::new("a", "publisher"),
        ]);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateAgentName {
                agent: "a".to_string()
            }]
        );
    }

    #[test]
    fn test_invalid_paths_and_permissions() {
        let config = config_with(vec![AgentConfig::new("a", "echo")
            .with_responsible("House/Lights", "w")
            .with_responsible("Objects/Door", "rw")]);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::InvalidResponsiblePath { path, .. } if path == "House/Lights"
        )));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::InvalidPermission { permission, .. } if permission == "rw"
        )));
    }

    #[test]
    fn test_ownership_conflict_after_normalization() {
        let config = config_with(vec![
            AgentConfig::new("a", "echo").with_responsible("Objects/Door", "wc"),
            AgentConfig::new("b", "echo").with_responsible("Objects/Door/", "c"),
        ]);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::OwnershipConflict {
                path: "Objects/Door".to_string(),
                agents: vec!["a".to_string(), "b".to_string()],
            }]
        );
    }

    #[test]
    fn test_multiple_errors() {
        let config = config_with(vec![
            AgentConfig::new("a", "echo").with_responsible("Objects/X", "w"),
            AgentConfig::new("a", "echo").with_responsible("Objects/X", "w"),
            AgentConfig::new("c", "echo").with_responsible("Objects/Y", "z"),
        ]);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ValidationError::DuplicateAgentName { .. }));
        assert!(matches!(errors[1], ValidationError::InvalidPermission { .. }));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut config = config_with(vec![AgentConfig::new("a", "echo")]);
        config.agent_system.timeout_seconds = Some(0);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::ZeroTimeout]);

        config.agent_system.timeout_seconds = Some(1);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_bad_path_and_permission_in_one_entry_are_both_reported() {
        let config = config_with(vec![
            AgentConfig::new("a", "echo").with_responsible("House", "x"),
        ]);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ValidationError::InvalidResponsiblePath { .. }));
        assert!(matches!(errors[1], ValidationError::InvalidPermission { .. }));
    }
}
