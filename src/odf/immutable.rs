// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::OdfError;
use crate::odf::tree::{self, sealed::Sealed, MergeMode, NodeIndex};
use crate::odf::{Node, Path};
use crate::traits::Odf;

/// Persistent O-DF tree.
///
/// Nodes live behind `Arc`s in a shared, path-ordered map. Cloning is a
/// reference count increment; merging copies the map of pointers on write
/// (`Arc::make_mut`) and shares every node it does not touch. A clone taken
/// before a merge keeps observing the old tree, so snapshots can be handed
/// to concurrent readers without locking.
#[derive(Debug, Clone, PartialEq)]
pub struct ImmutableOdf {
    nodes: Arc<BTreeMap<Path, Arc<Node>>>,
}

impl ImmutableOdf {
    /// Tree holding only the root.
    pub fn empty() -> Self {
        Self::from_index(NodeIndex::from_connected(std::iter::empty()))
    }

    /// Whether two trees share the same underlying map.
    pub fn ptr_eq(&self, other: &ImmutableOdf) -> bool {
        Arc::ptr_eq(&self.nodes, &other.nodes)
    }

    /// Whether both trees hold the very same allocation for the node at `path`.
    pub fn shares_node(&self, other: &ImmutableOdf, path: &Path) -> bool {
        match (self.nodes.get(path), other.nodes.get(path)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn merge<O: Odf>(mut self, other: &O, mode: MergeMode) -> Result<Self, OdfError> {
        let upserts = tree::plan_merge(|p| self.get(p), other.nodes(), mode)?;
        if upserts.is_empty() {
            return Ok(self);
        }
        let map = Arc::make_mut(&mut self.nodes);
        for node in upserts {
            map.insert(node.path(), Arc::new(node));
        }
        Ok(self)
    }
}

impl Default for ImmutableOdf {
    fn default() -> Self {
        Self::empty()
    }
}

impl Sealed for ImmutableOdf {
    fn from_index(index: NodeIndex) -> Self {
        let nodes = index
            .into_inner()
            .into_iter()
            .map(|(path, node)| (path, Arc::new(node)))
            .collect();
        Self {
            nodes: Arc::new(nodes),
        }
    }
}

impl Odf for ImmutableOdf {
    fn get(&self, path: &Path) -> Option<&Node> {
        self.nodes.get(path).map(Arc::as_ref)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn nodes(&self) -> Vec<&Node> {
        self.nodes.values().map(Arc::as_ref).collect()
    }

    fn union<O: Odf>(self, other: &O) -> Result<Self, OdfError> {
        self.merge(other, MergeMode::Union)
    }

    fn update<O: Odf>(self, other: &O) -> Result<Self, OdfError> {
        self.merge(other, MergeMode::Update)
    }

    fn remove_paths(mut self, paths: &[Path]) -> Self {
        if !self.nodes.keys().any(|p| tree::is_removed(p, paths)) {
            return self;
        }
        Arc::make_mut(&mut self.nodes).retain(|p, _| !tree::is_removed(p, paths));
        self
    }

    fn children(&self, path: &Path) -> Vec<&Node> {
        // Descendants of `path` form one contiguous range right after it.
        self.nodes
            .range(path.clone()..)
            .skip(1)
            .take_while(|(p, _)| path.is_ancestor_of(p))
            .filter(|(p, _)| p.len() == path.len() + 1)
            .map(|(_, node)| node.as_ref())
            .collect()
    }
}

impl Serialize for ImmutableOdf {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.nodes())
    }
}
