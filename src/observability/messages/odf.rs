// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for O-DF tree and value handling.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A value could not be cast to its declared type and was kept as a string.
///
/// # Log Level
/// `debug!` - Lenient input is expected; the value is still stored
///
/// # Example
/// ```
/// use omi_node::observability::messages::odf::ValueCoercionFallback;
///
/// let msg = ValueCoercionFallback {
///     raw: "warm",
///     declared: "xs:double",
///     reason: "invalid float literal",
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct ValueCoercionFallback<'a> {
    pub raw: &'a str,
    pub declared: &'a str,
    pub reason: &'a str,
}

impl Display for ValueCoercionFallback<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Value '{}' is not a valid {}, keeping it as a string: {}",
            self.raw, self.declared, self.reason
        )
    }
}

impl StructuredLog for ValueCoercionFallback<'_> {
    fn log(&self) {
        tracing::debug!(
            raw = self.raw,
            declared = self.declared,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "value_coercion",
            span_name = name,
            declared = self.declared,
        )
    }
}

/// Values were dropped from the store to respect the history length.
///
/// # Log Level
/// `trace!` - Routine housekeeping
pub struct HistoryTrimmed<'a> {
    pub path: &'a str,
    pub dropped: usize,
    pub kept: usize,
}

impl Display for HistoryTrimmed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Trimmed {} old values from '{}', {} kept",
            self.dropped, self.path, self.kept
        )
    }
}

impl StructuredLog for HistoryTrimmed<'_> {
    fn log(&self) {
        tracing::trace!(
            path = self.path,
            dropped = self.dropped,
            kept = self.kept,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("history_trim", span_name = name, path = self.path)
    }
}
