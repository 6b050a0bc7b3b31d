//! Routing error type.
//!
//! Failing to find a path is not an error: see
//! [`RouteOutcome::NoPath`](crate::RouteOutcome::NoPath).

use std::fmt;

use thiserror::Error;

use bm_core::NodeId;
use bm_graph::GraphError;

/// Which [`SearchLimits`](crate::SearchLimits) bound stopped a search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AbortReason {
    Cancelled,
    DeadlineExceeded,
    ExpansionLimit,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AbortReason::Cancelled        => "cancelled",
            AbortReason::DeadlineExceeded => "deadline exceeded",
            AbortReason::ExpansionLimit   => "expansion limit reached",
        })
    }
}

/// Errors produced by `bm-route`.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("node {0} not found in graph")]
    MissingNode(NodeId),

    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("search aborted ({reason}) after {expanded} expansions")]
    Aborted { reason: AbortReason, expanded: usize },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type RouteResult<T> = Result<T, RouteError>;
