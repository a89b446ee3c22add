// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging throughout the node. Message types follow a struct-based pattern with a
//! `Display` implementation for the human-readable text and a [`StructuredLog`]
//! implementation that emits the same event with typed fields.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::agent` - Agent construction and lifecycle events
//! * `messages::dispatch` - Request routing, fan-out and per-agent outcomes
//! * `messages::odf` - Tree and value handling events
//! * `messages::validation` - Configuration validation results
//!
//! # Usage
//!
//! ```rust
//! use omi_node::observability::messages::agent::AgentStarted;
//! use omi_node::observability::messages::StructuredLog;
//!
//! let msg = AgentStarted {
//!     agent: "storage",
//!     class: "responsible_storage",
//!     owned_paths: 2,
//! };
//!
//! msg.log();
//! ```
//!
//! [`StructuredLog`]: messages::StructuredLog

pub mod messages;
