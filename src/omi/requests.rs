// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::time::Duration;

use crate::odf::{ImmutableOdf, Path};
use crate::traits::Odf;

/// Time-to-live used when a request does not specify one.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

/// Write new values (and descriptive data) into the tree.
#[derive(Debug, Clone, Serialize)]
pub struct WriteRequest {
    pub odf: ImmutableOdf,
    pub ttl: Duration,
    pub callback: Option<String>,
    /// Name of the agent issuing the write, if any.
    pub sender: Option<String>,
}

impl WriteRequest {
    pub fn new(odf: ImmutableOdf) -> Self {
        Self {
            odf,
            ttl: DEFAULT_TTL,
            callback: None,
            sender: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn from_agent(mut self, agent: impl Into<String>) -> Self {
        self.sender = Some(agent.into());
        self
    }

    /// Same request restricted to the given paths.
    pub fn restricted_to(&self, paths: &[Path]) -> Self {
        Self {
            odf: self.odf.select_subtree(paths),
            ..self.clone()
        }
    }
}

/// Read current (or the newest N) values of the requested paths.
#[derive(Debug, Clone, Serialize)]
pub struct ReadRequest {
    pub odf: ImmutableOdf,
    pub ttl: Duration,
    pub newest: Option<usize>,
}

impl ReadRequest {
    pub fn new(odf: ImmutableOdf) -> Self {
        Self {
            odf,
            ttl: DEFAULT_TTL,
            newest: None,
        }
    }

    pub fn with_newest(mut self, newest: usize) -> Self {
        self.newest = Some(newest);
        self
    }

    /// Paths named by the request: its leaves.
    pub fn requested_paths(&self) -> Vec<Path> {
        self.odf.leaves().into_iter().map(|n| n.path()).collect()
    }
}

/// Invoke the method behind the given InfoItems, with the written values as parameters.
#[derive(Debug, Clone, Serialize)]
pub struct CallRequest {
    pub odf: ImmutableOdf,
    pub ttl: Duration,
    pub callback: Option<String>,
}

impl CallRequest {
    pub fn new(odf: ImmutableOdf) -> Self {
        Self {
            odf,
            ttl: DEFAULT_TTL,
            callback: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn restricted_to(&self, paths: &[Path]) -> Self {
        Self {
            odf: self.odf.select_subtree(paths),
            ..self.clone()
        }
    }
}

/// Any request accepted by the agent system's request loop.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OmiRequest {
    Write(WriteRequest),
    Read(ReadRequest),
    Call(CallRequest),
}

impl OmiRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            OmiRequest::Write(_) => "write",
            OmiRequest::Read(_) => "read",
            OmiRequest::Call(_) => "call",
        }
    }

    pub fn ttl(&self) -> Duration {
        match self {
            OmiRequest::Write(w) => w.ttl,
            OmiRequest::Read(r) => r.ttl,
            OmiRequest::Call(c) => c.ttl,
        }
    }
}

impl From<WriteRequest> for OmiRequest {
    fn from(request: WriteRequest) -> Self {
        OmiRequest::Write(request)
    }
}

impl From<ReadRequest> for OmiRequest {
    fn from(request: ReadRequest) -> Self {
        OmiRequest::Read(request)
    }
}

impl From<CallRequest> for OmiRequest {
    fn from(request: CallRequest) -> Self {
        OmiRequest::Call(request)
    }
}
