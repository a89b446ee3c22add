// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Serialize, Serializer};
use std::collections::HashMap;

use crate::errors::OdfError;
use crate::odf::tree::{self, sealed::Sealed, MergeMode, NodeIndex};
use crate::odf::{Node, Path};
use crate::traits::Odf;

/// In-place O-DF tree backed by a plain hash index.
///
/// Meant for write-heavy owners such as a server-side cache. It has no
/// internal synchronization: share it behind a lock that serializes writers.
#[derive(Debug, Clone, PartialEq)]
pub struct MutableOdf {
    nodes: HashMap<Path, Node>,
}

impl MutableOdf {
    /// Tree holding only the root.
    pub fn empty() -> Self {
        Self::from_index(NodeIndex::from_connected(std::iter::empty()))
    }

    /// Merge `other` into this tree without giving up ownership.
    ///
    /// On error nothing has been written.
    pub fn union_in_place<O: Odf>(&mut self, other: &O) -> Result<(), OdfError> {
        self.merge_in_place(other, MergeMode::Union)
    }

    pub fn update_in_place<O: Odf>(&mut self, other: &O) -> Result<(), OdfError> {
        self.merge_in_place(other, MergeMode::Update)
    }

    /// Add a single node, synthesizing its missing ancestors.
    pub fn insert(&mut self, node: Node) -> Result<(), OdfError> {
        let single = MutableOdf::from_nodes([node])?;
        self.union_in_place(&single)
    }

    pub fn remove_in_place(&mut self, paths: &[Path]) {
        self.nodes.retain(|p, _| !tree::is_removed(p, paths));
    }

    /// Mutable access to one node. Keep its kind and path unchanged.
    pub fn modify<F>(&mut self, path: &Path, f: F) -> bool
    where
        F: FnOnce(&Node) -> Node,
    {
        match self.nodes.get_mut(path) {
            Some(node) => {
                let replacement = f(node);
                if replacement.kind() == node.kind() && replacement.path() == *path {
                    *node = replacement;
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }

    fn merge_in_place<O: Odf>(&mut self, other: &O, mode: MergeMode) -> Result<(), OdfError> {
        let upserts = tree::plan_merge(|p| self.nodes.get(p), other.nodes(), mode)?;
        for node in upserts {
            self.nodes.insert(node.path(), node);
        }
        Ok(())
    }
}

impl Default for MutableOdf {
    fn default() -> Self {
        Self::empty()
    }
}

impl Sealed for MutableOdf {
    fn from_index(index: NodeIndex) -> Self {
        Self {
            nodes: index.into_inner().into_iter().collect(),
        }
    }
}

impl Odf for MutableOdf {
    fn get(&self, path: &Path) -> Option<&Node> {
        self.nodes.get(path)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn nodes(&self) -> Vec<&Node> {
        let mut entries: Vec<(&Path, &Node)> = self.nodes.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, node)| node).collect()
    }

    fn union<O: Odf>(mut self, other: &O) -> Result<Self, OdfError> {
        self.union_in_place(other)?;
        Ok(self)
    }

    fn update<O: Odf>(mut self, other: &O) -> Result<Self, OdfError> {
        self.update_in_place(other)?;
        Ok(self)
    }

    fn remove_paths(mut self, paths: &[Path]) -> Self {
        self.remove_in_place(paths);
        self
    }
}

impl Serialize for MutableOdf {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.nodes())
    }
}
