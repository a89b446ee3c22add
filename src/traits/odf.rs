// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;

use crate::errors::OdfError;
use crate::odf::tree::{self, sealed::Sealed, NodeIndex};
use crate::odf::{ImmutableOdf, InfoItem, MutableOdf, Node, Object, Objects, Path};

/// Shared contract of the O-DF tree containers.
///
/// Both [`ImmutableOdf`] and [`MutableOdf`] are always fully connected: every
/// node's parent is present and the single root is an `Objects` node.
/// Mutating operations take `self` by value. The immutable variant builds a
/// new value sharing unchanged nodes (clone it first to keep the original);
/// the mutable variant edits its index in place and hands itself back.
pub trait Odf: Sized + Sealed {
    /// Build a container from an unordered collection of nodes.
    fn from_nodes<I>(nodes: I) -> Result<Self, OdfError>
    where
        I: IntoIterator<Item = Node>,
    {
        NodeIndex::build(nodes).map(Self::from_index)
    }

    fn get(&self, path: &Path) -> Option<&Node>;

    /// Number of nodes, root included.
    fn len(&self) -> usize;

    /// All nodes ordered by path, so parents precede their children.
    fn nodes(&self) -> Vec<&Node>;

    /// Path-by-path merge; see [`Node::union`].
    fn union<O: Odf>(self, other: &O) -> Result<Self, OdfError>;

    /// Like [`Odf::union`], but incoming InfoItems carrying values replace the stored values.
    fn update<O: Odf>(self, other: &O) -> Result<Self, OdfError>;

    /// Drop the subtrees rooted at `paths`. Removing the root keeps only the root.
    fn remove_paths(self, paths: &[Path]) -> Self;

    fn contains(&self, path: &Path) -> bool {
        self.get(path).is_some()
    }

    /// True when the tree holds nothing but its root.
    fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    fn root(&self) -> Option<&Objects> {
        self.get(&Path::root()).and_then(Node::as_objects)
    }

    fn paths(&self) -> Vec<Path> {
        self.nodes().into_iter().map(Node::path).collect()
    }

    fn info_items(&self) -> Vec<&InfoItem> {
        self.nodes()
            .into_iter()
            .filter_map(Node::as_info_item)
            .collect()
    }

    fn objects(&self) -> Vec<&Object> {
        self.nodes().into_iter().filter_map(Node::as_object).collect()
    }

    /// Direct children of `path`.
    fn children(&self, path: &Path) -> Vec<&Node> {
        self.nodes()
            .into_iter()
            .filter(|node| node.path().parent().as_ref() == Some(path))
            .collect()
    }

    /// Nodes without children.
    fn leaves(&self) -> Vec<&Node> {
        let nodes = self.nodes();
        let parents: HashSet<Path> = nodes.iter().filter_map(|n| n.path().parent()).collect();
        nodes
            .into_iter()
            .filter(|node| !parents.contains(&node.path()))
            .collect()
    }

    /// The given paths with their descendants and ancestors.
    fn select_subtree(&self, paths: &[Path]) -> Self {
        Self::from_index(NodeIndex::from_connected(tree::select(self.nodes(), paths)))
    }

    /// Same structure with every value stripped.
    fn values_removed(&self) -> Self {
        let stripped: Vec<Node> = self.nodes().into_iter().map(Node::values_removed).collect();
        Self::from_index(NodeIndex::from_connected(stripped.iter()))
    }

    /// Node-by-node equality, across representations.
    fn same_content<O: Odf>(&self, other: &O) -> bool {
        self.nodes() == other.nodes()
    }

    fn to_immutable(&self) -> ImmutableOdf {
        ImmutableOdf::from_index(NodeIndex::from_connected(self.nodes()))
    }

    fn to_mutable(&self) -> MutableOdf {
        MutableOdf::from_index(NodeIndex::from_connected(self.nodes()))
    }
}
