// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::OdfError;

/// Name of the implicit root segment every O-DF path starts with.
pub const ROOT_SEGMENT: &str = "Objects";

/// Hierarchical address of a node inside an O-DF tree.
///
/// A path is a non-empty list of non-empty segments whose first segment is
/// always `Objects`. Paths order segment by segment, so an ancestor always
/// sorts before its descendants.
///
/// ```
/// use omi_node::odf::Path;
///
/// let path: Path = "Objects/House/Room/temp".parse().unwrap();
/// assert_eq!(path.name(), "temp");
/// assert_eq!(path.parent().unwrap().to_string(), "Objects/House/Room");
/// assert!(Path::root().is_ancestor_of(&path));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(Vec<String>);

impl Path {
    /// The `Objects` root path.
    pub fn root() -> Self {
        Self(vec![ROOT_SEGMENT.to_string()])
    }

    /// Build a path from already split segments.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, OdfError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        let display = segments.join("/");

        match segments.first() {
            None => return Err(OdfError::invalid_path(display, "path is empty")),
            Some(first) if first != ROOT_SEGMENT => {
                return Err(OdfError::invalid_path(
                    display,
                    format!("first segment must be '{}'", ROOT_SEGMENT),
                ))
            }
            _ => {}
        }
        if segments.iter().any(|s| s.is_empty()) {
            return Err(OdfError::invalid_path(display, "empty segment"));
        }
        if segments.iter().any(|s| s.contains('/')) {
            return Err(OdfError::invalid_path(display, "segment contains '/'"));
        }

        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Last segment; the node name.
    pub fn name(&self) -> &str {
        // Never empty by construction.
        self.0.last().map(String::as_str).unwrap_or(ROOT_SEGMENT)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    pub fn parent(&self) -> Option<Path> {
        if self.is_root() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// All strict ancestors, root first.
    pub fn ancestors(&self) -> Vec<Path> {
        (1..self.0.len())
            .map(|end| Self(self.0[..end].to_vec()))
            .collect()
    }

    /// Path of a direct child with the given name.
    pub fn child(&self, name: &str) -> Result<Path, OdfError> {
        if name.is_empty() || name.contains('/') {
            return Err(OdfError::invalid_path(
                format!("{}/{}", self, name),
                "child name must be a single non-empty segment",
            ));
        }
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Ok(Self(segments))
    }

    /// True when `self` equals `other` or is one of its ancestors.
    pub fn starts_with_path(&self, other: &Path) -> bool {
        self.0.starts_with(&other.0)
    }

    /// True when `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        other.0.len() > self.0.len() && other.0.starts_with(&self.0)
    }
}

impl FromStr for Path {
    type Err = OdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix('/').unwrap_or(s);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(OdfError::invalid_path(s, "path is empty"));
        }
        Self::from_segments(trimmed.split('/')).map_err(|e| match e {
            OdfError::InvalidPath { reason, .. } => OdfError::invalid_path(s, reason),
            other => other,
        })
    }
}

impl TryFrom<&str> for Path {
    type Error = OdfError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
