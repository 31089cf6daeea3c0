//! `wf-spatial` — road network, nearest-node lookup, and shortest-path search.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`network`]  | `RoadNetwork` (CSR multigraph + R-tree), `RoadNetworkBuilder` |
//! | [`router`]   | `Router` trait, `SearchResult`, `DijkstraRouter`, `AStarRouter` |
//! | [`geometry`] | `reconstruct_geometry`, `path_length_m`                     |
//! | [`error`]    | `RouteError`, `RouteResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on result types.           |

pub mod error;
pub mod geometry;
pub mod network;
pub mod router;

#[cfg(test)]
mod tests;

pub use error::{RouteError, RouteResult};
pub use geometry::{path_edges, path_length_m, reconstruct_geometry};
pub use network::{RoadNetwork, RoadNetworkBuilder, TargetGroup, TargetGroups};
pub use router::{
    AStarRouter, DijkstraRouter, Router, SearchResult, SearchStatus, Strategy,
    shortest_path_astar, shortest_path_dijkstra,
};
