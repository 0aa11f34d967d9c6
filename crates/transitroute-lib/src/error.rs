use std::path::PathBuf;

use thiserror::Error;

use crate::graph::NodeId;

/// Convenient result alias for the transitroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a start, goal or spur node id is absent from the graph.
    #[error("unknown node id: {id}")]
    NodeNotFound { id: NodeId },

    /// Raised when asked to detach an edge that is not (or no longer) present.
    ///
    /// The k-shortest-paths planner treats this as a no-op.
    #[error("no edge from {from} to {to} with the requested attributes")]
    EdgeNotFound { from: NodeId, to: NodeId },

    /// Raised when the search frontier is exhausted before reaching the goal.
    #[error("no path exists between {start} and {goal}")]
    NoPathExists { start: NodeId, goal: NodeId },

    /// Raised when an edge carries a negative or non-finite cost.
    #[error("invalid {attribute} on edge {from} -> {to}: {value}")]
    InvalidWeight {
        from: NodeId,
        to: NodeId,
        attribute: &'static str,
        value: f64,
    },

    /// Raised when a temporarily removed edge could not be reinstated.
    #[error("failed to restore edge {from} -> {to}: {reason}")]
    GraphMutationFailure {
        from: NodeId,
        to: NodeId,
        reason: String,
    },

    /// Raised when fewer than one route is requested.
    #[error("route count must be at least 1 (got {k})")]
    InvalidRouteCount { k: usize },

    /// Raised when a search exceeds its configured deadline.
    #[error("search from {start} to {goal} timed out")]
    Timeout { start: NodeId, goal: NodeId },

    /// Raised when a network declares the same node id twice.
    #[error("duplicate node id: {id}")]
    DuplicateNode { id: NodeId },

    /// Raised when a network document could not be read from disk.
    #[error("failed to read network from {path}: {source}")]
    NetworkRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raised when a computed route plan lacks any routes.
    #[error("route plan was empty")]
    EmptyRoutePlan,

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error leaves the caller's request unanswerable.
    ///
    /// `EdgeNotFound` is the only non-fatal condition: it is reported by
    /// transient edge bookkeeping and never aborts a planning call.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::EdgeNotFound { .. })
    }
}
