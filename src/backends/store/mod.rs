// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod in_memory;

pub use in_memory::InMemoryStore;
