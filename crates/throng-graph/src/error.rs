//! Error types for graph construction.

use thiserror::Error;

/// Errors arising from [`PolylineGraphBuilder::build`](crate::PolylineGraphBuilder::build).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GraphError {
    /// No polylines were added.
    #[error("graph must have at least one polyline")]
    Empty,
    /// Resampling spacing is NaN, infinite, zero or negative.
    #[error("spacing must be finite and positive, got {value}")]
    InvalidSpacing {
        /// The invalid value.
        value: f64,
    },
    /// Junction radius is NaN, infinite or negative.
    #[error("junction radius must be finite and non-negative, got {value}")]
    InvalidRadius {
        /// The invalid value.
        value: f64,
    },
    /// A polyline has fewer than two vertices, a non-finite vertex, or
    /// zero length.
    #[error("polyline {index} is degenerate")]
    DegeneratePolyline {
        /// Index of the polyline in insertion order.
        index: usize,
    },
    /// More polylines than route-point handles can address.
    #[error("too many polylines: {count}")]
    TooManyPolylines {
        /// Number of polylines added.
        count: usize,
    },
    /// A polyline resamples to more points than a handle can address.
    #[error("polyline {index} resamples to {count} points")]
    TooManyPoints {
        /// Index of the polyline.
        index: usize,
        /// Number of resampled points.
        count: usize,
    },
}
