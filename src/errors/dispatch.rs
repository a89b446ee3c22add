// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::errors::{OdfError, StoreError};

/// Errors that prevent a request from being dispatched at all.
///
/// Failures of individual agents are not represented here; they are
/// reported inside the aggregated `ResponseRequest`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// The request loop has stopped and no longer accepts requests.
    #[error("Agent system is shut down")]
    SystemShutdown,

    #[error("Request tree is invalid: {0}")]
    Odf(#[from] OdfError),

    #[error("Data store failed: {0}")]
    Store(#[from] StoreError),
}
