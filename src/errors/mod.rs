// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod agent;
mod config;
mod dispatch;
mod odf;
mod store;

pub use agent::{AgentError, AgentFactoryError};
pub use config::{ConfigError, ValidationError};
pub use dispatch::DispatchError;
pub use odf::OdfError;
pub use store::StoreError;
