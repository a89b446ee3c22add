// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod echo;
pub mod publisher;
pub mod storage;

pub use echo::{EchoAgent, EchoBuilder};
pub use publisher::{PublisherAgent, PublisherBuilder};
pub use storage::{StorageAgent, StorageBuilder};
