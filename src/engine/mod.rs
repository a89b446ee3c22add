// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod dispatcher;
mod handle;
pub mod routing;
mod system;
#[cfg(test)]
mod integration_tests;

pub use dispatcher::Dispatcher;
pub use handle::RequestHandle;
pub(crate) use handle::Envelope;
pub use routing::{Access, Portion, Routing, RoutingTable};
pub use system::AgentSystem;
