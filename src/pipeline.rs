// Copyright 2026 the Regula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The full pipeline: approximate, classify, regularize and complete.
//!
//! Each polyline is processed independently. A batch of grouped polylines
//! can be processed in parallel with the `rayon` feature.

use alloc::vec::Vec;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{
    approximate, classify, complete, regularize, Classification, ClassifyOptions,
    CompletedContour, Point, Polyline, RegularizeOptions, RegularizedShape, ShapeError,
    ShapeLabel,
};

/// Configuration of the whole pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeOptions {
    /// Simplification tolerance as a fraction of the perimeter, in `(0, 1)`.
    pub tolerance_ratio: f64,
    /// Classification thresholds.
    pub classify: ClassifyOptions,
    /// Regularization settings.
    pub regularize: RegularizeOptions,
    /// Contours enclosing less area than this are rejected with
    /// [`ShapeError::BelowMinimumArea`]. Zero or less disables the check.
    pub min_area: f64,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        ShapeOptions {
            tolerance_ratio: 0.02,
            classify: ClassifyOptions::default(),
            regularize: RegularizeOptions::default(),
            min_area: 0.0,
        }
    }
}

impl ShapeOptions {
    /// Check the options.
    pub fn validate(&self) -> Result<(), ShapeError> {
        if !(self.tolerance_ratio > 0.0 && self.tolerance_ratio < 1.0) {
            return Err(ShapeError::InvalidTolerance(self.tolerance_ratio));
        }
        self.regularize.validate()
    }
}

/// Everything the pipeline produced for one polyline.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeOutcome {
    /// The classifier's decision and its measurements.
    pub classification: Classification,
    /// The canonical reconstruction.
    pub regularized: RegularizedShape,
    /// The convex completion of the reconstruction.
    pub completed: CompletedContour,
}

impl ShapeOutcome {
    /// The final label.
    ///
    /// This is the classifier's label, unless the geometry could not support
    /// it and regularization fell back to [`ShapeLabel::Unknown`].
    #[inline]
    pub fn label(&self) -> ShapeLabel {
        self.regularized.label
    }

    /// Hand the completed contour to a renderer.
    pub fn draw<S: ContourSink + ?Sized>(
        &self,
        sink: &mut S,
        style: &DrawStyle,
    ) -> Result<(), S::Error> {
        sink.draw_contour(self.completed.points(), style)
    }
}

/// Run the pipeline on one polyline.
///
/// # Errors
///
/// Fails when the options are invalid, when the polyline has fewer than two
/// points or a non-finite coordinate, or when it encloses less than
/// `min_area`.
pub fn process(polyline: &Polyline, options: &ShapeOptions) -> Result<ShapeOutcome, ShapeError> {
    options.validate()?;
    polyline.validate()?;
    if options.min_area > 0.0 {
        let area = polyline.area();
        if area < options.min_area {
            return Err(ShapeError::BelowMinimumArea {
                area,
                min_area: options.min_area,
            });
        }
    }
    let approx = approximate(polyline, options.tolerance_ratio)?;
    let classification = classify(polyline, &approx, &options.classify);
    let regularized = regularize(&classification, polyline, &approx, &options.regularize)?;
    let completed = complete(&regularized);
    Ok(ShapeOutcome {
        classification,
        regularized,
        completed,
    })
}

/// One sub-path of a [`PathGroup`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subpath {
    /// Identifier of the sub-path within its group.
    pub id: f64,
    /// The samples, as a closed polyline.
    pub polyline: Polyline,
}

/// A group of sub-paths sharing a path identifier.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathGroup {
    /// The path identifier.
    pub id: f64,
    /// Sub-paths, by ascending identifier.
    pub subpaths: Vec<Subpath>,
}

/// Polylines grouped in two levels, path and sub-path.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathGroups {
    groups: Vec<PathGroup>,
    rejected_rows: usize,
}

impl PathGroups {
    /// Groups from already assembled parts.
    pub fn new(groups: Vec<PathGroup>) -> PathGroups {
        PathGroups {
            groups,
            rejected_rows: 0,
        }
    }

    /// Group rows of `[path_id, subpath_id, x, y]`.
    ///
    /// Groups and their sub-paths are ordered by ascending identifier; the
    /// samples of a sub-path keep the order of the rows. Each sub-path
    /// becomes a closed polyline. Rows with a non-finite value are dropped
    /// and counted in [`rejected_rows`](Self::rejected_rows).
    pub fn from_rows(rows: impl IntoIterator<Item = [f64; 4]>) -> PathGroups {
        let mut rejected_rows = 0;
        let mut valid = Vec::new();
        for (index, row) in rows.into_iter().enumerate() {
            if row.iter().all(|v| v.is_finite()) {
                // Fold -0.0 into 0.0 so that both land in one group.
                valid.push([row[0] + 0.0, row[1] + 0.0, row[2], row[3]]);
            } else {
                log::warn!("dropping row {index} with a non-finite value: {row:?}");
                rejected_rows += 1;
            }
        }
        // Stable, so samples stay in row order.
        valid.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));

        let mut groups: Vec<PathGroup> = Vec::new();
        let mut current: Option<(f64, f64, Vec<Point>)> = None;
        for [path, subpath, x, y] in valid {
            match &mut current {
                Some((p, s, points)) if *p == path && *s == subpath => {
                    points.push(Point::new(x, y));
                }
                _ => {
                    if let Some(done) = current.take() {
                        push_subpath(&mut groups, done);
                    }
                    current = Some((path, subpath, alloc::vec![Point::new(x, y)]));
                }
            }
        }
        if let Some(done) = current {
            push_subpath(&mut groups, done);
        }
        PathGroups {
            groups,
            rejected_rows,
        }
    }

    /// The groups, by ascending identifier.
    #[inline]
    pub fn groups(&self) -> &[PathGroup] {
        &self.groups
    }

    /// Number of groups.
    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of input rows dropped for holding a non-finite value.
    #[inline]
    pub fn rejected_rows(&self) -> usize {
        self.rejected_rows
    }
}

fn push_subpath(groups: &mut Vec<PathGroup>, (path, id, points): (f64, f64, Vec<Point>)) {
    let subpath = Subpath {
        id,
        polyline: Polyline::closed(points),
    };
    match groups.last_mut() {
        Some(group) if group.id == path => group.subpaths.push(subpath),
        _ => groups.push(PathGroup {
            id: path,
            subpaths: alloc::vec![subpath],
        }),
    }
}

/// Per polyline results of a batch, nested like the input groups.
pub type BatchResults = Vec<Vec<Result<ShapeOutcome, ShapeError>>>;

/// Run the pipeline on every polyline of every group.
///
/// Errors for a single polyline are reported in its place and do not stop
/// the batch.
///
/// # Errors
///
/// Fails as a whole only for invalid options, or when there are no groups.
pub fn process_groups(groups: &PathGroups, options: &ShapeOptions) -> Result<BatchResults, ShapeError> {
    options.validate()?;
    if groups.is_empty() {
        return Err(ShapeError::EmptyInput);
    }
    #[cfg(feature = "rayon")]
    let results = groups
        .groups()
        .par_iter()
        .map(|group| {
            group
                .subpaths
                .par_iter()
                .map(|subpath| process_subpath(group, subpath, options))
                .collect()
        })
        .collect();
    #[cfg(not(feature = "rayon"))]
    let results = groups
        .groups()
        .iter()
        .map(|group| {
            group
                .subpaths
                .iter()
                .map(|subpath| process_subpath(group, subpath, options))
                .collect()
        })
        .collect();
    Ok(results)
}

fn process_subpath(
    group: &PathGroup,
    subpath: &Subpath,
    options: &ShapeOptions,
) -> Result<ShapeOutcome, ShapeError> {
    let result = process(&subpath.polyline, options);
    if let Err(e) = &result {
        log::warn!("skipping path {} sub-path {}: {e}", group.id, subpath.id);
    }
    result
}

/// Stroke style for drawing a contour.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawStyle {
    /// Stroke color, as RGB.
    pub color: [u8; 3],
    /// Stroke width.
    pub stroke_width: f64,
}

impl Default for DrawStyle {
    fn default() -> Self {
        DrawStyle {
            color: [0, 0, 0],
            stroke_width: 2.0,
        }
    }
}

/// A renderer accepting ordered contours.
pub trait ContourSink {
    /// The error type of the renderer.
    type Error;

    /// Draw the closed outline through `contour`.
    fn draw_contour(&mut self, contour: &[Point], style: &DrawStyle) -> Result<(), Self::Error>;
}
