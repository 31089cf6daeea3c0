//! Routing-engine error type.
//!
//! An unreachable destination is *not* an error: it is reported as
//! [`SearchStatus::NoPathFound`](crate::SearchStatus) on a normal result.

use std::time::Duration;

use thiserror::Error;

use wf_core::{CoordError, NodeId};

/// Errors produced by `wf-spatial`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("network has no nodes")]
    EmptyGraph,

    #[error("no edge from {from} to {to}")]
    EdgeNotFound { from: NodeId, to: NodeId },

    #[error("search stopped after settling {settled} nodes in {elapsed:?}")]
    SearchTimedOut { settled: usize, elapsed: Duration },

    #[error("edge {from} -> {to} has invalid length {length_m} (must be finite and >= 0)")]
    InvalidLength { from: NodeId, to: NodeId, length_m: f64 },

    #[error("external node id {0} added twice")]
    DuplicateExternalId(i64),

    #[error(transparent)]
    InvalidCoordinate(#[from] CoordError),
}

pub type RouteResult<T> = Result<T, RouteError>;
