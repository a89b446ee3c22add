// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for consistent, human-readable output
//! and [`StructuredLog`] to emit itself at its documented level.
//!
//! # Organization
//!
//! * `agent` - Agent construction and lifecycle events
//! * `dispatch` - Request routing and per-agent outcomes
//! * `odf` - Value coercion and tree events
//! * `validation` - Configuration validation results

use tracing::Span;

pub mod agent;
pub mod dispatch;
pub mod odf;
pub mod validation;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// A span carrying the message fields, for scoping related events.
    fn span(&self, name: &str) -> Span;
}
