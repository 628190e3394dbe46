// Copyright 2026 the Regula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polylines: ordered sequences of samples.

use alloc::vec::Vec;
use core::iter;

use crate::{Point, Rect, ShapeError, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// An ordered sequence of points, one sampled sub-path.
///
/// A polyline is either open or closed. A closed polyline has an implicit
/// edge from its last point back to its first; the points themselves never
/// repeat the first point at the end.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polyline {
    points: Vec<Point>,
    closed: bool,
}

impl Polyline {
    /// An open polyline through `points`.
    pub fn new(points: impl Into<Vec<Point>>) -> Polyline {
        Polyline {
            points: points.into(),
            closed: false,
        }
    }

    /// A closed polyline through `points`.
    ///
    /// If the last point repeats the first, it is dropped; the closing edge
    /// is implied.
    pub fn closed(points: impl Into<Vec<Point>>) -> Polyline {
        let mut points = points.into();
        if points.len() > 2 && points.first() == points.last() {
            points.pop();
        }
        Polyline {
            points,
            closed: true,
        }
    }

    /// The samples of this polyline.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the polyline has no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the polyline has an implied closing edge.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Check that the polyline can be fed to the shape pipeline.
    ///
    /// It needs at least two points, all of them finite.
    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.points.len() < 2 {
            return Err(ShapeError::InsufficientPoints {
                found: self.points.len(),
            });
        }
        match self.points.iter().position(|p| !p.is_finite()) {
            Some(index) => Err(ShapeError::NonFiniteCoordinate { index }),
            None => Ok(()),
        }
    }

    /// Iterate over the edges, including the closing edge of a closed polyline.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let closing = match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(first), Some(last)) if self.points.len() > 1 => Some((*last, *first)),
            _ => None,
        };
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(closing)
    }

    /// Total length, the sum of the edge lengths.
    pub fn perimeter(&self) -> f64 {
        self.segments().map(|(p0, p1)| p0.distance(p1)).sum()
    }

    /// Length of the boundary of the region [`area`](Self::area) measures.
    ///
    /// This is the perimeter, plus the closing edge when the polyline is
    /// open.
    pub fn closed_perimeter(&self) -> f64 {
        let closing = match (self.closed, self.points.first(), self.points.last()) {
            (false, Some(first), Some(last)) => last.distance(*first),
            _ => 0.0,
        };
        self.perimeter() + closing
    }

    /// Signed area of the region bounded by the polyline and its closing
    /// edge, by the shoelace formula.
    ///
    /// The closing edge is always included here, open or not, since area is
    /// only meaningful for a closed region. The sign is positive for
    /// counter-clockwise winding in a y-up space.
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }

    /// Absolute area enclosed by the polyline.
    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// The axis-aligned bounding box, or `None` if there are no points.
    pub fn bounding_box(&self) -> Option<Rect> {
        Rect::bounding(&self.points)
    }

    /// The mean of the samples, or `None` if there are no points.
    pub fn centroid(&self) -> Option<Point> {
        centroid(&self.points)
    }
}

/// Signed shoelace area of the closed polygon through `points`.
pub fn signed_area(points: &[Point]) -> f64 {
    let Some(&first) = points.first() else {
        return 0.0;
    };
    // Translate to the first point to reduce cancellation.
    let twice: f64 = points
        .iter()
        .zip(points.iter().skip(1).chain(iter::once(&first)))
        .map(|(p0, p1)| (*p0 - first).cross(*p1 - first))
        .sum();
    0.5 * twice
}

/// The mean of `points`, or `None` if there are none.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    Some((sum / points.len() as f64).to_point())
}

impl FromIterator<Point> for Polyline {
    fn from_iter<T: IntoIterator<Item = Point>>(iter: T) -> Self {
        Polyline::new(iter.into_iter().collect::<Vec<_>>())
    }
}
