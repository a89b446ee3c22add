// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while constructing or merging O-DF nodes and trees.
//!
//! All of these are construction-time failures: they are reported to the
//! caller of the build/merge operation and never deferred to lookup time.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OdfError {
    /// Path string or segment list is empty, has empty segments, or is not rooted at `Objects`.
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// An InfoItem whose name differs from the last segment of its path.
    #[error("Name '{name}' does not match last segment of path '{path}'")]
    NameMismatch { name: String, path: String },

    /// Two nodes of different kinds claim the same path.
    #[error("Conflicting node kinds at '{path}': {existing} vs {incoming}")]
    KindConflict {
        path: String,
        existing: &'static str,
        incoming: &'static str,
    },

    /// A node was placed below an InfoItem.
    #[error("InfoItem '{leaf}' cannot have child '{child}'")]
    LeafWithChildren { leaf: String, child: String },
}

impl OdfError {
    pub(crate) fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        OdfError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
