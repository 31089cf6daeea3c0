//! Error types for wf-compare.

use thiserror::Error;

use wf_core::GeoPoint;
use wf_spatial::RouteError;

/// Errors that can occur while comparing or reporting routes.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("{0} lies outside the service boundary")]
    OutsideBoundary(GeoPoint),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Alias for `Result<T, CompareError>`.
pub type CompareResult<T> = Result<T, CompareError>;
