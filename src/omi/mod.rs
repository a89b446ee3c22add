// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! O-MI request and response messages.
//!
//! These are the in-memory shapes a transport/parsing layer produces and
//! consumes; every request carries an [`ImmutableOdf`](crate::odf::ImmutableOdf)
//! payload.

mod requests;
mod response;

pub use requests::{CallRequest, OmiRequest, ReadRequest, WriteRequest, DEFAULT_TTL};
pub use response::{OmiResult, ResponseRequest, ReturnCode};
