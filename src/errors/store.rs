// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::errors::OdfError;

/// Errors reported by a data store behind a `DbHandle`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Stored tree could not be updated: {0}")]
    Odf(#[from] OdfError),

    #[error("Data store unavailable: {0}")]
    Unavailable(String),
}
