// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::errors::OdfError;
use crate::odf::{ImmutableOdf, Path};
use crate::omi::DEFAULT_TTL;
use crate::traits::Odf;

/// O-MI return codes, following HTTP status semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReturnCode {
    Success,
    BadRequest,
    NotFound,
    InternalError,
    NotImplemented,
    Timeout,
}

impl ReturnCode {
    pub fn code(&self) -> u16 {
        match self {
            ReturnCode::Success => 200,
            ReturnCode::BadRequest => 400,
            ReturnCode::NotFound => 404,
            ReturnCode::InternalError => 500,
            ReturnCode::NotImplemented => 501,
            ReturnCode::Timeout => 503,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ReturnCode::Success)
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Outcome for one portion of a request.
///
/// `agent` names who produced it (absent for the data store or the
/// dispatcher itself); `paths` are the leaf paths the portion covered.
#[derive(Debug, Clone, Serialize)]
pub struct OmiResult {
    pub return_code: ReturnCode,
    pub description: Option<String>,
    pub agent: Option<String>,
    pub paths: Vec<Path>,
    pub odf: Option<ImmutableOdf>,
}

impl OmiResult {
    pub fn success() -> Self {
        Self {
            return_code: ReturnCode::Success,
            description: None,
            agent: None,
            paths: Vec::new(),
            odf: None,
        }
    }

    pub fn success_with(odf: ImmutableOdf) -> Self {
        Self {
            odf: Some(odf),
            ..Self::success()
        }
    }

    pub fn failure(return_code: ReturnCode, description: impl Into<String>) -> Self {
        Self {
            return_code,
            description: Some(description.into()),
            ..Self::success()
        }
    }

    pub fn for_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    pub fn with_paths(mut self, paths: Vec<Path>) -> Self {
        self.paths = paths;
        self
    }

    pub fn is_success(&self) -> bool {
        self.return_code.is_success()
    }
}

/// Response to any O-MI request: one or more results.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseRequest {
    pub results: Vec<OmiResult>,
    pub ttl: Duration,
}

impl ResponseRequest {
    pub fn new(results: Vec<OmiResult>) -> Self {
        Self {
            results,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn success() -> Self {
        Self::new(vec![OmiResult::success()])
    }

    pub fn success_with(odf: ImmutableOdf) -> Self {
        Self::new(vec![OmiResult::success_with(odf)])
    }

    pub fn failure(return_code: ReturnCode, description: impl Into<String>) -> Self {
        Self::new(vec![OmiResult::failure(return_code, description)])
    }

    /// True when every result succeeded.
    pub fn is_success(&self) -> bool {
        self.results.iter().all(OmiResult::is_success)
    }

    pub fn failures(&self) -> Vec<&OmiResult> {
        self.results.iter().filter(|r| !r.is_success()).collect()
    }

    /// Result produced by the named agent.
    pub fn result_for(&self, agent: &str) -> Option<&OmiResult> {
        self.results.iter().find(|r| r.agent.as_deref() == Some(agent))
    }

    /// Union of the trees of all successful results.
    pub fn combined_odf(&self) -> Result<ImmutableOdf, OdfError> {
        self.results
            .iter()
            .filter(|r| r.is_success())
            .filter_map(|r| r.odf.as_ref())
            .try_fold(ImmutableOdf::empty(), |acc, odf| acc.union(odf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::{InfoItem, Node};

    fn tree(p: &str) -> ImmutableOdf {
        let leaf = InfoItem::new(p.parse().unwrap()).unwrap();
        ImmutableOdf::from_nodes(vec![Node::from(leaf)]).unwrap()
    }

    #[test]
    fn test_return_codes() {
        assert_eq!(ReturnCode::Success.code(), 200);
        assert_eq!(ReturnCode::NotFound.to_string(), "404");
        assert!(!ReturnCode::InternalError.is_success());
    }

    #[test]
    fn test_partial_failure_response() {
        let response = ResponseRequest::new(vec![
            OmiResult::success_with(tree("Objects/A/x")).for_agent("a"),
            OmiResult::failure(ReturnCode::InternalError, "boom").for_agent("b"),
        ]);

        assert!(!response.is_success());
        assert_eq!(response.failures().len(), 1);
        assert!(response.result_for("a").unwrap().is_success());
        assert_eq!(
            response.result_for("b").unwrap().description.as_deref(),
            Some("boom")
        );
    }

    #[test]
    fn test_combined_odf_skips_failures() {
        let mut failed = OmiResult::failure(ReturnCode::InternalError, "boom");
        failed.odf = Some(tree("Objects/C/z"));
        let response = ResponseRequest::new(vec![
            OmiResult::success_with(tree("Objects/A/x")),
            OmiResult::success_with(tree("Objects/B/y")),
            failed,
        ]);

        let combined = response.combined_odf().unwrap();
        assert!(combined.contains(&"Objects/A/x".parse().unwrap()));
        assert!(combined.contains(&"Objects/B/y".parse().unwrap()));
        assert!(!combined.contains(&"Objects/C".parse().unwrap()));
    }
}
