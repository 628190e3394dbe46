// Copyright 2026 the Regula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canonical reconstruction of classified shapes.

use alloc::vec::Vec;

use crate::{
    ApproxPolygon, Circle, Classification, Ellipse, Evidence, Point, Polyline, Rect, Roundness,
    ShapeError, ShapeLabel, MIN_SAMPLE_POINTS,
};

/// How the circle of a [`ShapeLabel::Circle`] is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CircleFit {
    /// Centered on the least-squares ellipse, with its semi-major axis as radius.
    #[default]
    FittedEllipse,
    /// The minimum enclosing circle of the original samples.
    EnclosingCircle,
}

/// Options for [`regularize()`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegularizeOptions {
    /// Number of points sampled around circles and ellipses.
    ///
    /// At least [`MIN_SAMPLE_POINTS`].
    pub sample_points: usize,
    /// How circles are fitted.
    pub circle_fit: CircleFit,
}

impl Default for RegularizeOptions {
    fn default() -> Self {
        RegularizeOptions {
            sample_points: 360,
            circle_fit: CircleFit::default(),
        }
    }
}

impl RegularizeOptions {
    /// Check the options.
    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.sample_points < MIN_SAMPLE_POINTS {
            return Err(ShapeError::InvalidSampleCount(self.sample_points));
        }
        Ok(())
    }
}

/// The measurements a regularized shape was built from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeParameters {
    /// An axis-aligned rectangle.
    Rect {
        /// The corner with the smallest coordinates.
        origin: Point,
        /// Extent along x.
        width: f64,
        /// Extent along y.
        height: f64,
    },
    /// A circle.
    Circle(Circle),
    /// An ellipse, with its major axis first in `radii`.
    Ellipse(Ellipse),
    /// A polygon, given by its vertices.
    Polygon(Vec<Point>),
}

/// The idealized reconstruction of one contour.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegularizedShape {
    /// The class the reconstruction is for.
    pub label: ShapeLabel,
    /// Type specific measurements.
    pub parameters: ShapeParameters,
    /// The outline, in order.
    ///
    /// Has at least three distinct points and nonzero area, except for
    /// [`ShapeLabel::Line`] and [`ShapeLabel::Unknown`].
    pub points: Vec<Point>,
}

impl RegularizedShape {
    fn rect(label: ShapeLabel, bounds: Rect) -> Option<RegularizedShape> {
        let bounds = bounds.abs();
        if bounds.is_zero_area() || !bounds.area().is_finite() {
            return None;
        }
        Some(RegularizedShape {
            label,
            parameters: ShapeParameters::Rect {
                origin: bounds.origin(),
                width: bounds.width(),
                height: bounds.height(),
            },
            points: bounds.corners().to_vec(),
        })
    }

    fn circle(circle: Circle, n: usize) -> Option<RegularizedShape> {
        if !(circle.radius > 0.0 && circle.is_finite()) {
            return None;
        }
        Some(RegularizedShape {
            label: ShapeLabel::Circle,
            parameters: ShapeParameters::Circle(circle),
            points: circle.sample(n),
        })
    }

    fn ellipse(ellipse: Ellipse, n: usize) -> Option<RegularizedShape> {
        if !(ellipse.semi_minor() > 0.0 && ellipse.is_finite()) {
            return None;
        }
        Some(RegularizedShape {
            label: ShapeLabel::Ellipse,
            parameters: ShapeParameters::Ellipse(ellipse),
            points: ellipse.sample(n),
        })
    }

    fn polygon(label: ShapeLabel, approx: &ApproxPolygon) -> RegularizedShape {
        let vertices = approx.vertices().to_vec();
        RegularizedShape {
            label,
            parameters: ShapeParameters::Polygon(vertices.clone()),
            points: vertices,
        }
    }
}

/// Build the canonical outline for a classified contour.
///
/// Squares and rectangles become the four corners of the original
/// contour's bounding box, in [`Rect::corners`] order. Circles and ellipses
/// are sampled evenly from their fitted parameters. Every other label keeps
/// the approximated vertices.
///
/// The measurements in `classification` are reused; when they do not match
/// the label, the contour is measured again as in [`regularize_label`].
///
/// # Errors
///
/// Fails only when `options` are invalid.
pub fn regularize(
    classification: &Classification,
    original: &Polyline,
    approx: &ApproxPolygon,
    options: &RegularizeOptions,
) -> Result<RegularizedShape, ShapeError> {
    options.validate()?;
    let label = classification.label;
    let shape = match (label, &classification.evidence) {
        (
            ShapeLabel::Square | ShapeLabel::Rectangle,
            Evidence::Quadrilateral { contour_bounds, .. },
        ) => RegularizedShape::rect(label, *contour_bounds),
        (
            ShapeLabel::Circle,
            Evidence::Round(Roundness {
                ellipse: Ok(ellipse),
                ..
            }),
        ) => RegularizedShape::circle(
            fit_circle(Some(*ellipse), original, options.circle_fit),
            options.sample_points,
        ),
        (
            ShapeLabel::Ellipse,
            Evidence::Round(Roundness {
                ellipse: Ok(ellipse),
                ..
            }),
        ) => RegularizedShape::ellipse(*ellipse, options.sample_points),
        _ => return regularize_label(label, original, approx, options),
    };
    Ok(shape.unwrap_or_else(|| degenerate(label, approx)))
}

/// Build the canonical outline for a contour known only by its label.
///
/// The contour is measured again. A circle whose ellipse fit fails falls
/// back to the minimum enclosing circle. Geometry that cannot support the
/// label (a flat rectangle, an unfittable ellipse) is passed through as
/// [`ShapeLabel::Unknown`].
///
/// # Errors
///
/// Fails only when `options` are invalid.
pub fn regularize_label(
    label: ShapeLabel,
    original: &Polyline,
    approx: &ApproxPolygon,
    options: &RegularizeOptions,
) -> Result<RegularizedShape, ShapeError> {
    options.validate()?;
    let n = options.sample_points;
    let shape = match label {
        ShapeLabel::Square | ShapeLabel::Rectangle => original
            .bounding_box()
            .and_then(|bounds| RegularizedShape::rect(label, bounds)),
        ShapeLabel::Circle => {
            let ellipse = match options.circle_fit {
                CircleFit::FittedEllipse => Ellipse::fit(original.points()).ok(),
                CircleFit::EnclosingCircle => None,
            };
            RegularizedShape::circle(fit_circle(ellipse, original, options.circle_fit), n)
        }
        ShapeLabel::Ellipse => Ellipse::fit(original.points())
            .ok()
            .and_then(|ellipse| RegularizedShape::ellipse(ellipse, n)),
        _ => Some(RegularizedShape::polygon(label, approx)),
    };
    Ok(shape.unwrap_or_else(|| degenerate(label, approx)))
}

fn fit_circle(ellipse: Option<Ellipse>, original: &Polyline, strategy: CircleFit) -> Circle {
    match (strategy, ellipse) {
        (CircleFit::FittedEllipse, Some(ellipse)) => {
            Circle::new(ellipse.center, ellipse.semi_major())
        }
        _ => Circle::enclosing(original.points()).unwrap_or_default(),
    }
}

fn degenerate(label: ShapeLabel, approx: &ApproxPolygon) -> RegularizedShape {
    log::warn!("cannot regularize {label} geometry, passing it through as unknown");
    RegularizedShape::polygon(ShapeLabel::Unknown, approx)
}
