// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Agent and storage backends for the O-MI node.
//!
//! # Available Backends
//!
//! ## Local Backend
//! In-process agents built from configuration by class name:
//! - **responsible_storage**: owns a subtree, persists writes and answers calls
//!   with the latest stored values
//! - **publisher**: writes an incrementing counter to one path on an interval
//! - **echo**: owns a subtree and answers writes and calls with the tree it received
//!
//! ## Store Backend
//! The node-wide [`DataStore`](crate::traits::DataStore) that receives writes no
//! agent owns and serves every read:
//! - **InMemoryStore**: one mutable O-DF tree with bounded value history per item
//!
//! ## Stub Backend (Test-Only)
//! Agents for exercising dispatch (only available in test builds):
//! - **StubAgent**: accepts everything and records what it received
//! - **FailingAgent**, **SlowAgent**, **PanickingAgent**: the three failure shapes
//!   a portion can take
//! - **RelayAgent**: writes back into the system as itself
//!
//! # Architecture
//!
//! ```text
//! Configuration → AgentFactory → AgentBuilder → BuiltAgent → AgentSystem
//! ```
//!
//! # Examples
//!
//! ```rust
//! use omi_node::backends::local::AgentFactory;
//!
//! let factory = AgentFactory::with_builtin();
//! assert!(factory.is_class_available("responsible_storage"));
//! assert!(factory.is_class_available("publisher"));
//! ```

pub mod local;
pub mod store;
#[cfg(test)]
pub mod stub;
