// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Construction and merge logic shared by both tree representations.
//!
//! `NodeIndex::build` turns an unordered node collection into a fully
//! connected, path-keyed index:
//!
//! 1. nodes are indexed by path, same-kind duplicates are merged;
//! 2. every missing ancestor is synthesized as an empty `Object`;
//! 3. a default `Objects` root is added when absent;
//! 4. kind conflicts and nodes below an InfoItem are rejected.
//!
//! Merging (`plan_merge`) computes the nodes to upsert before anything is
//! written, so a failed merge leaves the target untouched.

use std::collections::BTreeMap;

use crate::errors::OdfError;
use crate::odf::{Node, Object, Objects, Path};

pub mod sealed {
    use super::NodeIndex;

    /// Construction from an index that is already connected and rooted.
    pub trait Sealed {
        fn from_index(index: NodeIndex) -> Self;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Combine everything, concatenating values.
    Union,
    /// Incoming InfoItem values replace stored values.
    Update,
}

/// Connected path index; always contains the root.
#[derive(Debug, Clone, Default)]
pub struct NodeIndex(pub(crate) BTreeMap<Path, Node>);

impl NodeIndex {
    pub fn build<I>(nodes: I) -> Result<Self, OdfError>
    where
        I: IntoIterator<Item = Node>,
    {
        let mut index: BTreeMap<Path, Node> = BTreeMap::new();

        for node in nodes {
            let path = node.path();
            let merged = match index.get(&path) {
                Some(existing) => existing.union(&node)?,
                None => node,
            };
            index.insert(path, merged);
        }

        let explicit: Vec<Path> = index.keys().cloned().collect();
        for path in &explicit {
            for ancestor in path.ancestors() {
                match index.get(&ancestor) {
                    Some(Node::InfoItem(_)) => {
                        return Err(OdfError::LeafWithChildren {
                            leaf: ancestor.to_string(),
                            child: path.to_string(),
                        })
                    }
                    Some(_) => {}
                    None if ancestor.is_root() => {
                        index.insert(ancestor, Node::Objects(Objects::default()));
                    }
                    None => {
                        index.insert(ancestor.clone(), Node::Object(Object::new(ancestor)?));
                    }
                }
            }
        }

        index
            .entry(Path::root())
            .or_insert_with(|| Node::Objects(Objects::default()));

        Ok(Self(index))
    }

    /// Index from nodes taken out of an existing tree, closed under ancestors.
    pub(crate) fn from_connected<'a, I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = &'a Node>,
    {
        let mut index: BTreeMap<Path, Node> = nodes
            .into_iter()
            .map(|node| (node.path(), node.clone()))
            .collect();
        index
            .entry(Path::root())
            .or_insert_with(|| Node::Objects(Objects::default()));
        Self(index)
    }

    pub(crate) fn into_inner(self) -> BTreeMap<Path, Node> {
        self.0
    }
}

/// Nodes that must be written into the left tree to merge `incoming` into it.
pub(crate) fn plan_merge<'a, 'b, F, I>(
    lookup: F,
    incoming: I,
    mode: MergeMode,
) -> Result<Vec<Node>, OdfError>
where
    F: Fn(&Path) -> Option<&'a Node>,
    I: IntoIterator<Item = &'b Node>,
{
    let mut upserts = Vec::new();
    for node in incoming {
        let merged = match lookup(&node.path()) {
            Some(existing) => match mode {
                MergeMode::Union => existing.union(node)?,
                MergeMode::Update => existing.update(node)?,
            },
            None => node.clone(),
        };
        upserts.push(merged);
    }
    Ok(upserts)
}

/// Nodes of `nodes` at or below any of `selected`, plus their ancestors.
pub(crate) fn select<'a, I>(nodes: I, selected: &[Path]) -> Vec<&'a Node>
where
    I: IntoIterator<Item = &'a Node>,
{
    nodes
        .into_iter()
        .filter(|node| {
            let path = node.path();
            selected
                .iter()
                .any(|s| path.starts_with_path(s) || path.is_ancestor_of(s))
        })
        .collect()
}

/// True when `path` lies inside one of the removed subtrees.
pub(crate) fn is_removed(path: &Path, removed: &[Path]) -> bool {
    if path.is_root() {
        return false;
    }
    removed.iter().any(|r| path.starts_with_path(r))
}
