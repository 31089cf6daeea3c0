//! Coordinate validation error type.
//!
//! Sub-crates wrap `CoordError` as one variant of their own error enums via a
//! `#[from]` conversion, so validation failures propagate with `?`.

use thiserror::Error;

/// Errors produced by `wf-core`.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordError {
    #[error("invalid coordinate (lat {lat}, lon {lon}): latitude must be within ±90 and longitude within ±180")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

/// Shorthand result type for coordinate validation.
pub type CoordResult<T> = Result<T, CoordError>;
