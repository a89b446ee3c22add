// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod merge;

pub use merge::{merge_attributes, union_distinct};
