// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod agents;
pub mod factory;

pub use agents::*;
pub use factory::AgentFactory;
