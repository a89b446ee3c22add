// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // agents + data store
pub mod config;     // config + runtime builder
pub mod engine;     // routing, dispatch, request loop
pub mod errors;     // error handling
pub mod observability;
pub mod odf;        // O-DF tree model
pub mod omi;        // O-MI request/response messages
pub mod traits;     // unified abstractions
pub mod utils;
