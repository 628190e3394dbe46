// Copyright 2026 the Regula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rule-based classification of simplified polylines.
//!
//! The decision procedure looks at the number of vertices that survived
//! simplification first, since that cheaply separates the polygonal
//! classes. Only approximations with more than six vertices are measured
//! further, by their isoperimetric circularity `4π·area/perimeter²` and the
//! axis ratio of a least-squares ellipse through the original samples.
//!
//! The result carries the measurements that decided it (see [`Evidence`]),
//! so regularization does not have to repeat them.

use core::f64::consts::PI;
use core::fmt;

use crate::{ApproxPolygon, Ellipse, FitError, Polyline, Rect};

/// The closed set of shape classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeLabel {
    /// Two vertices.
    Line,
    /// Three vertices.
    Triangle,
    /// Four vertices, bounding box about as wide as it is tall.
    Square,
    /// Four vertices, any other aspect ratio.
    Rectangle,
    /// Six vertices.
    RegularPolygon,
    /// Five vertices; a regular polygon with its own label.
    Pentagon,
    /// Round, with equal axes.
    Circle,
    /// Round, elongated.
    Ellipse,
    /// Many vertices, moderately compact.
    Star,
    /// Many vertices, anything less compact.
    Complex,
    /// Degenerate geometry.
    Unknown,
}

impl ShapeLabel {
    /// A human readable name.
    pub fn name(self) -> &'static str {
        match self {
            ShapeLabel::Line => "Line",
            ShapeLabel::Triangle => "Triangle",
            ShapeLabel::Square => "Square",
            ShapeLabel::Rectangle => "Rectangle",
            ShapeLabel::RegularPolygon => "Regular polygon",
            ShapeLabel::Pentagon => "Pentagon",
            ShapeLabel::Circle => "Circle",
            ShapeLabel::Ellipse => "Ellipse",
            ShapeLabel::Star => "Star",
            ShapeLabel::Complex => "Complex",
            ShapeLabel::Unknown => "Unknown",
        }
    }

    /// Whether this is one of the regular polygon classes (5 or 6 vertices).
    pub fn is_regular_polygon(self) -> bool {
        matches!(self, ShapeLabel::Pentagon | ShapeLabel::RegularPolygon)
    }
}

impl fmt::Display for ShapeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An inclusive range of ratios.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatioRange {
    /// Smallest ratio in the range.
    pub min: f64,
    /// Largest ratio in the range.
    pub max: f64,
}

impl RatioRange {
    /// A new inclusive range.
    #[inline]
    pub const fn new(min: f64, max: f64) -> RatioRange {
        RatioRange { min, max }
    }

    /// Whether `ratio` is within the range, bounds included.
    #[inline]
    pub fn contains(&self, ratio: f64) -> bool {
        self.min <= ratio && ratio <= self.max
    }
}

/// Circularity cut-offs separating round, star-like and irregular outlines.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CircularityThresholds {
    /// Above this an outline is round (a circle or an ellipse).
    pub circle: f64,
    /// Above this, and not round, an outline is a star.
    pub star: f64,
}

impl Default for CircularityThresholds {
    fn default() -> Self {
        CircularityThresholds {
            circle: 0.85,
            star: 0.5,
        }
    }
}

/// Options for [`classify()`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassifyOptions {
    /// Circularity cut-offs.
    pub circularity: CircularityThresholds,
    /// Major to minor axis ratios that count as a circle.
    pub circle_axis_ratio: RatioRange,
    /// Bounding box aspect ratios (width over height) that count as a square.
    pub square_aspect_ratio: RatioRange,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        ClassifyOptions {
            circularity: CircularityThresholds::default(),
            circle_axis_ratio: RatioRange::new(0.9, 1.1),
            square_aspect_ratio: RatioRange::new(0.95, 1.05),
        }
    }
}

/// Why a contour could not be measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Degeneracy {
    /// The vertices do not span a two-dimensional box.
    ZeroExtent,
    /// The contour encloses no area.
    ZeroArea,
    /// The contour has zero length.
    ZeroPerimeter,
    /// The fitted ellipse is flat.
    ZeroMinorAxis,
}

/// Circularity and ellipse fit of a contour.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roundness {
    /// Area enclosed by the original contour.
    pub area: f64,
    /// Length of the original contour, closing edge included.
    pub perimeter: f64,
    /// `4π·area/perimeter²`, clamped to at most 1.
    pub circularity: f64,
    /// The least-squares ellipse through the original samples.
    pub ellipse: Result<Ellipse, FitError>,
}

impl Roundness {
    /// Measure a contour.
    ///
    /// Fails with the reason when the contour has no length or no area.
    pub fn measure(contour: &Polyline) -> Result<Roundness, Degeneracy> {
        // The area is that of the closed region, so the perimeter must be too.
        let perimeter = contour.closed_perimeter();
        if !(perimeter > 0.0) {
            return Err(Degeneracy::ZeroPerimeter);
        }
        let area = contour.area();
        if !(area > 0.0) {
            return Err(Degeneracy::ZeroArea);
        }
        // Discretization can push this slightly above 1.
        let circularity = (4.0 * PI * area / (perimeter * perimeter)).min(1.0);
        Ok(Roundness {
            area,
            perimeter,
            circularity,
            ellipse: Ellipse::fit(contour.points()),
        })
    }
}

/// The measurements behind a classification.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Evidence {
    /// The vertex count alone decided.
    VertexCount(usize),
    /// A four-vertex approximation and its bounding boxes.
    Quadrilateral {
        /// Bounding box of the approximated vertices; its aspect ratio decides.
        vertex_bounds: Rect,
        /// Bounding box of the original samples.
        contour_bounds: Rect,
        /// Width over height of `vertex_bounds`.
        aspect_ratio: f64,
    },
    /// Circularity and ellipse fit of a many-vertex approximation.
    Round(Roundness),
    /// The geometry could not be measured; the label is [`ShapeLabel::Unknown`].
    Degenerate(Degeneracy),
}

/// A label, together with the measurements that justified it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Classification {
    /// The assigned class.
    pub label: ShapeLabel,
    /// What decided it.
    pub evidence: Evidence,
}

impl Classification {
    #[inline]
    fn new(label: ShapeLabel, evidence: Evidence) -> Classification {
        Classification { label, evidence }
    }

    #[inline]
    fn degenerate(reason: Degeneracy) -> Classification {
        Classification::new(ShapeLabel::Unknown, Evidence::Degenerate(reason))
    }
}

/// Classify an approximated polygon.
///
/// The first matching rule wins:
///
/// 1. 2 vertices: [`Line`](ShapeLabel::Line).
/// 2. 3 vertices: [`Triangle`](ShapeLabel::Triangle).
/// 3. 4 vertices: [`Square`](ShapeLabel::Square) when the aspect ratio of
///    the vertices' bounding box is within `square_aspect_ratio`, otherwise
///    [`Rectangle`](ShapeLabel::Rectangle).
/// 4. 5 vertices: [`Pentagon`](ShapeLabel::Pentagon).
/// 5. 6 vertices: [`RegularPolygon`](ShapeLabel::RegularPolygon).
/// 6. More: measure the circularity of `original`, and fit an ellipse to it.
///    Above the circle threshold it is a [`Circle`](ShapeLabel::Circle) if
///    the axis ratio is within `circle_axis_ratio`, an
///    [`Ellipse`](ShapeLabel::Ellipse) otherwise. Above the star threshold it
///    is a [`Star`](ShapeLabel::Star); below, [`Complex`](ShapeLabel::Complex).
///    When the ellipse fit fails, only the last two outcomes are possible.
///
/// Anything degenerate (zero height, area, perimeter or minor axis) is
/// [`Unknown`](ShapeLabel::Unknown).
pub fn classify(
    original: &Polyline,
    approx: &ApproxPolygon,
    options: &ClassifyOptions,
) -> Classification {
    let n = approx.vertex_count();
    let classification = match n {
        0 | 1 => Classification::degenerate(Degeneracy::ZeroExtent),
        2 => Classification::new(ShapeLabel::Line, Evidence::VertexCount(n)),
        3 => Classification::new(ShapeLabel::Triangle, Evidence::VertexCount(n)),
        4 => classify_quadrilateral(original, approx, options),
        5 => Classification::new(ShapeLabel::Pentagon, Evidence::VertexCount(n)),
        6 => Classification::new(ShapeLabel::RegularPolygon, Evidence::VertexCount(n)),
        _ => match Roundness::measure(original) {
            Ok(roundness) => classify_round(roundness, options),
            Err(reason) => Classification::degenerate(reason),
        },
    };
    log::debug!(
        "classified {n}-vertex approximation as {}",
        classification.label
    );
    classification
}

fn classify_quadrilateral(
    original: &Polyline,
    approx: &ApproxPolygon,
    options: &ClassifyOptions,
) -> Classification {
    let vertex_bounds = approx.bounding_box();
    let aspect_ratio = match vertex_bounds.aspect_ratio() {
        Some(ratio) if ratio > 0.0 => ratio,
        _ => return Classification::degenerate(Degeneracy::ZeroExtent),
    };
    let contour_bounds = original.bounding_box().unwrap_or(vertex_bounds);
    let label = if options.square_aspect_ratio.contains(aspect_ratio) {
        ShapeLabel::Square
    } else {
        ShapeLabel::Rectangle
    };
    Classification::new(
        label,
        Evidence::Quadrilateral {
            vertex_bounds,
            contour_bounds,
            aspect_ratio,
        },
    )
}

fn classify_round(roundness: Roundness, options: &ClassifyOptions) -> Classification {
    let thresholds = options.circularity;
    let circularity = roundness.circularity;
    let label = match roundness.ellipse {
        Ok(ellipse) if circularity > thresholds.circle => match ellipse.axis_ratio() {
            Some(ratio) if options.circle_axis_ratio.contains(ratio) => ShapeLabel::Circle,
            Some(_) => ShapeLabel::Ellipse,
            None => return Classification::degenerate(Degeneracy::ZeroMinorAxis),
        },
        _ if thresholds.star < circularity && circularity <= thresholds.circle => {
            ShapeLabel::Star
        }
        _ => ShapeLabel::Complex,
    };
    Classification::new(label, Evidence::Round(roundness))
}
