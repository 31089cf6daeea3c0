//! `wf-core` — foundational types for the `wayfind` routing engine.
//!
//! This crate is a dependency of every other `wf-*` crate.  It has no `wf-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`                                    |
//! | [`geo`]         | `GeoPoint`, haversine distance, unit-sphere mapping   |
//! | [`config`]      | `SearchLimits` (settle cap and deadline)              |
//! | [`error`]       | `CoordError`, `CoordResult`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SearchLimits;
pub use error::{CoordError, CoordResult};
pub use geo::{EARTH_RADIUS_M, GeoPoint, haversine_m};
pub use ids::{EdgeId, NodeId};
