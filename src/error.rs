// Copyright 2026 the Regula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use thiserror::Error;

/// Errors surfaced to the caller of the shape pipeline.
///
/// All of these are local to one polyline except [`ShapeError::EmptyInput`],
/// which is fatal for a batch.
#[derive(Error, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum ShapeError {
    /// A polyline needs at least two points to be approximated.
    #[error("polyline has {found} point(s), at least 2 are required")]
    InsufficientPoints {
        /// The number of points the polyline actually had.
        found: usize,
    },
    /// A coordinate was NaN or infinite.
    #[error("point {index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Index of the offending point in its polyline.
        index: usize,
    },
    /// The simplification tolerance ratio is outside `(0, 1)`.
    #[error("tolerance ratio {0} is outside (0, 1)")]
    InvalidTolerance(f64),
    /// Too few outline samples were requested for a circle or ellipse.
    #[error("{0} outline samples requested, at least {min} are required", min = crate::MIN_SAMPLE_POINTS)]
    InvalidSampleCount(usize),
    /// The contour encloses less area than the configured minimum.
    #[error("contour area {area} is below the minimum of {min_area}")]
    BelowMinimumArea {
        /// Area enclosed by the original contour.
        area: f64,
        /// The configured minimum.
        min_area: f64,
    },
    /// A batch contained no path groups at all.
    #[error("no path groups to process")]
    EmptyInput,
}

/// Reasons a least-squares ellipse fit can fail.
///
/// These are recovered from internally: the classifier falls back to the
/// circularity measure alone.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum FitError {
    /// At least five points are needed to determine a conic.
    #[error("at least 5 points are needed to fit an ellipse, got {0}")]
    TooFewPoints(usize),
    /// The scatter matrix is singular, e.g. for collinear points.
    #[error("ellipse fit is ill-conditioned")]
    IllConditioned,
    /// The best conic through the points is not a real ellipse.
    #[error("best fitting conic is not an ellipse")]
    NotAnEllipse,
}
