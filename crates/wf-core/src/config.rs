//! Search configuration.
//!
//! # Design
//!
//! A search on a well-formed city network finishes in milliseconds, but a
//! query between disconnected components of a continental graph settles every
//! reachable node before giving up.  `SearchLimits` bounds that work: a cap on
//! finalised nodes, a wall-clock deadline, or both.  The default is
//! unbounded, which reproduces plain Dijkstra / A* behaviour.

use std::time::Duration;

/// Upper bounds on the work a single search may perform.
///
/// Plain `Copy` data; one value is shared by both routers of a comparison.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchLimits {
    /// At most this many nodes are finalised; the search stops once the cap
    /// is reached without finalising the destination.  `None` = no cap.
    pub max_settled: Option<usize>,

    /// Stop once this much wall time has elapsed since the search started.
    /// Checked once per finalised node.  `None` = no deadline.
    pub deadline: Option<Duration>,
}

impl SearchLimits {
    /// No cap, no deadline.
    pub const UNBOUNDED: SearchLimits = SearchLimits { max_settled: None, deadline: None };

    pub fn with_max_settled(mut self, n: usize) -> Self {
        self.max_settled = Some(n);
        self
    }

    pub fn with_deadline(mut self, d: Duration) -> Self {
        self.deadline = Some(d);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_settled.is_none() && self.deadline.is_none()
    }

    /// `true` if a search that has finalised `settled` nodes and run for
    /// `elapsed` must stop.
    #[inline]
    pub fn exceeded(&self, settled: usize, elapsed: Duration) -> bool {
        self.max_settled.is_some_and(|cap| settled >= cap)
            || self.deadline.is_some_and(|d| elapsed >= d)
    }
}
