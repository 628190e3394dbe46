// Copyright 2026 the Regula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Convex completion of regularized outlines.

use alloc::vec::Vec;

use crate::{Point, RegularizedShape};

/// The convex hull of `points`, by Andrew's monotone chain.
///
/// The hull winds counter-clockwise (in a y-up space, so its shoelace area
/// is positive) and starts at the point with the smallest x, then smallest
/// y. Collinear points along an edge are dropped, as are duplicates.
///
/// With fewer than three distinct points there is no hull, and the input is
/// returned unchanged. If all points are collinear, the two extremes are
/// returned.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_by(Point::lexicographic_cmp);
    sorted.dedup();
    if sorted.len() < 3 {
        return points.to_vec();
    }

    let mut hull: Vec<Point> = Vec::with_capacity(sorted.len() + 1);
    // Lower chain, left to right.
    for &p in &sorted {
        while hull.len() >= 2 && !left_turn(&hull, p) {
            hull.pop();
        }
        hull.push(p);
    }
    // Upper chain, right to left.
    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len && !left_turn(&hull, p) {
            hull.pop();
        }
        hull.push(p);
    }
    // The upper chain ends back at the first point.
    hull.pop();
    hull
}

/// Whether the last two points of `chain` followed by `p` turn strictly left.
#[inline]
fn left_turn(chain: &[Point], p: Point) -> bool {
    let [.., a, b] = chain else {
        return true;
    };
    p.orientation(*a, *b) > 0.0
}

/// The convex completion of a regularized shape, ready for rendering.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompletedContour {
    points: Vec<Point>,
}

impl CompletedContour {
    /// The hull of `points`, see [`convex_hull`].
    pub fn from_points(points: &[Point]) -> CompletedContour {
        CompletedContour {
            points: convex_hull(points),
        }
    }

    /// The vertices, counter-clockwise.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Take the vertices.
    #[inline]
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether `pt` lies inside or on the contour.
    ///
    /// Only meaningful for a true hull of three or more vertices; a
    /// pass-through contour contains nothing.
    pub fn contains(&self, pt: Point) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        // Scale the slack with the size of the contour.
        let scale = self
            .points
            .iter()
            .map(|p| p.distance_squared(self.points[0]))
            .fold(0.0, f64::max);
        let slack = 1e-12 * scale.max(1.0);
        (0..n).all(|i| pt.orientation(self.points[i], self.points[(i + 1) % n]) >= -slack)
    }
}

/// Close a regularized shape by taking the convex hull of its points.
///
/// Rectangles, circles and ellipses are already convex, so this only
/// changes polygonal outlines that are not.
pub fn complete(shape: &RegularizedShape) -> CompletedContour {
    let completed = CompletedContour::from_points(&shape.points);
    log::debug!(
        "completed {} outline of {} points to {} hull vertices",
        shape.label,
        shape.points.len(),
        completed.len()
    );
    completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{polyline::signed_area, Circle, Rect, ShapeLabel, ShapeParameters};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn polygon_shape(points: Vec<Point>) -> RegularizedShape {
        RegularizedShape {
            label: ShapeLabel::Complex,
            parameters: ShapeParameters::Polygon(points.clone()),
            points,
        }
    }

    #[test]
    fn square_is_its_own_hull() {
        let corners = Rect::new(10.0, 10.0, 110.0, 110.0).corners();
        assert_eq!(convex_hull(&corners), corners.to_vec());
    }

    #[test]
    fn concave_vertex_is_removed() {
        let arrow = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(0.0, 10.0),
            Point::new(3.0, 5.0),
        ];
        assert_eq!(
            convex_hull(&arrow),
            [
                Point::new(0.0, 0.0),
                Point::new(10.0, 5.0),
                Point::new(0.0, 10.0),
            ]
        );
    }

    #[test]
    fn collinear_and_duplicate_points_dropped() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(0.0, 0.0),
        ];
        assert_eq!(
            convex_hull(&pts),
            [
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ]
        );
        let line = [Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 2.0)];
        assert_eq!(convex_hull(&line), [Point::new(0.0, 0.0), Point::new(2.0, 2.0)]);
    }

    #[test]
    fn fewer_than_three_distinct_points_pass_through() {
        let line = [Point::new(100.0, 0.0), Point::new(0.0, 0.0)];
        assert_eq!(convex_hull(&line), line.to_vec());
        let repeated = [Point::new(1.0, 1.0), Point::new(1.0, 1.0), Point::new(2.0, 1.0)];
        assert_eq!(convex_hull(&repeated), repeated.to_vec());
        assert!(convex_hull(&[]).is_empty());
    }

    #[test]
    fn negative_zero_sorts_with_zero() {
        let pts = [
            Point::new(-0.0, 5.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 5.0),
        ];
        let completed = CompletedContour::from_points(&pts);
        assert_eq!(
            completed.points(),
            [
                Point::new(0.0, 0.0),
                Point::new(10.0, 5.0),
                Point::new(0.0, 10.0),
            ]
        );
        for p in &pts {
            assert!(completed.contains(*p), "{p:?} outside hull");
        }
    }

    #[test]
    fn random_points_are_contained() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let pts: Vec<Point> = (0..100)
                .map(|_| Point::new(rng.random_range(-50.0..50.0), rng.random_range(-20.0..80.0)))
                .collect();
            let completed = complete(&polygon_shape(pts.clone()));
            assert!(completed.len() >= 3);
            assert!(signed_area(completed.points()) > 0.0);
            for p in &pts {
                assert!(completed.contains(*p), "{p:?} outside hull");
            }
            // Completion is idempotent.
            let again = complete(&polygon_shape(completed.points().to_vec()));
            assert_eq!(again, completed);
        }
    }

    #[test]
    fn star_is_filled_in() {
        let outer = Circle::new((0.0, 0.0), 100.0).sample(5);
        let inner = Circle::new((0.0, 0.0), 40.0).sample(10);
        let star: Vec<Point> = (0..10)
            .map(|i| if i % 2 == 0 { outer[i / 2] } else { inner[i] })
            .collect();
        let completed = complete(&polygon_shape(star));
        assert_eq!(completed.len(), 5);
        for p in &outer {
            assert!(completed.points().contains(p));
        }
    }
}
