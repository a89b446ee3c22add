// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::Permission;
use crate::odf::Path;
use crate::traits::{BuiltAgent, ResponsibleAgent};

/// Which permission a request needs on the paths it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Write,
    Call,
}

impl Access {
    fn allowed_by(self, permission: Permission) -> bool {
        match self {
            Access::Write => permission.write,
            Access::Call => permission.call,
        }
    }
}

#[derive(Clone)]
struct Owner {
    prefix: Path,
    permission: Permission,
    agent: Arc<dyn ResponsibleAgent>,
}

/// The part of a request one agent is responsible for.
#[derive(Clone)]
pub struct Portion {
    pub agent: Arc<dyn ResponsibleAgent>,
    pub paths: Vec<Path>,
}

impl Portion {
    pub fn agent_name(&self) -> &str {
        self.agent.name()
    }
}

impl std::fmt::Debug for Portion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Portion")
            .field("agent", &self.agent_name())
            .field("paths", &self.paths)
            .finish()
    }
}

/// Leaf paths of a request split by owner.
#[derive(Debug, Default)]
pub struct Routing {
    pub portions: Vec<Portion>,
    pub unowned: Vec<Path>,
}

/// Registry of owned path prefixes, built once from the started agents.
///
/// Only agents built with the request-handling capability are registered;
/// ownership declared by a plain agent is ignored.
#[derive(Clone, Default)]
pub struct RoutingTable {
    owners: Vec<Owner>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `agent` as owner of `prefix`. Returns false for plain agents.
    pub fn register(&mut self, agent: &BuiltAgent, prefix: Path, permission: Permission) -> bool {
        match agent.as_responsible() {
            Some(responsible) => {
                self.owners.push(Owner {
                    prefix,
                    permission,
                    agent: Arc::clone(responsible),
                });
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Owner of `path`: the longest owned ancestor-or-self prefix with the needed permission.
    pub fn owner_of(&self, path: &Path, access: Access) -> Option<&Arc<dyn ResponsibleAgent>> {
        self.owners
            .iter()
            .filter(|o| access.allowed_by(o.permission) && path.starts_with_path(&o.prefix))
            .max_by_key(|o| o.prefix.len())
            .map(|o| &o.agent)
    }

    /// Split `paths` by owner.
    ///
    /// Paths owned by `sender` are treated as unowned, so an agent's own
    /// writes are never routed back to it. Owners of shorter ancestor
    /// prefixes are bypassed as well: such a path always goes to the store.
    pub fn route(&self, paths: &[Path], access: Access, sender: Option<&str>) -> Routing {
        let mut by_agent: BTreeMap<String, Portion> = BTreeMap::new();
        let mut unowned = Vec::new();

        for path in paths {
            match self.owner_of(path, access) {
                Some(agent) if Some(agent.name()) != sender => {
                    by_agent
                        .entry(agent.name().to_string())
                        .or_insert_with(|| Portion {
                            agent: Arc::clone(agent),
                            paths: Vec::new(),
                        })
                        .paths
                        .push(path.clone());
                }
                _ => unowned.push(path.clone()),
            }
        }

        Routing {
            portions: by_agent.into_values().collect(),
            unowned,
        }
    }
}
