// Copyright 2026 the Regula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simplification of a polyline to a minimal vertex set.
//!
//! This is the Ramer–Douglas–Peucker algorithm. The tolerance is given
//! relative to the perimeter of the input, so that the same ratio works for
//! small and large contours alike.
//!
//! Closed polylines are simplified as a loop: the loop is cut at an
//! approximately farthest-apart pair of samples, and each of the two chains
//! is simplified separately. A final pass then drops vertices lying within
//! the tolerance of the line through their neighbours. Together these make
//! the result independent of where along the outline the samples start.

use alloc::vec;
use smallvec::SmallVec;

use crate::{Point, Polyline, Rect, ShapeError};

/// The simplified vertex set of a polyline.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApproxPolygon {
    vertices: SmallVec<[Point; 8]>,
    epsilon: f64,
    closed: bool,
}

impl ApproxPolygon {
    /// An approximation from an already simplified vertex set.
    ///
    /// For callers running their own simplification. Fewer than two vertices
    /// are accepted, and classify as degenerate.
    pub fn from_vertices(
        vertices: impl IntoIterator<Item = Point>,
        epsilon: f64,
        closed: bool,
    ) -> ApproxPolygon {
        ApproxPolygon {
            vertices: vertices.into_iter().collect(),
            epsilon,
            closed,
        }
    }

    /// The surviving vertices, in the order of the input.
    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Number of surviving vertices; at least 2 when produced by [`approximate`].
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// The absolute tolerance the simplification ran with.
    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Whether the source was simplified as a closed loop.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The axis-aligned bounding box of the vertices.
    pub fn bounding_box(&self) -> Rect {
        Rect::bounding(&self.vertices).unwrap_or_default()
    }
}

/// Simplify `polyline` within `tolerance_ratio` times its perimeter.
///
/// Typical ratios are in the range 0.01 to 0.02. A polyline that is not
/// marked closed but whose last point repeats its first is simplified as a
/// loop as well.
///
/// # Errors
///
/// Fails when the ratio is outside `(0, 1)`, or when the polyline has fewer
/// than two points or a non-finite coordinate.
pub fn approximate(polyline: &Polyline, tolerance_ratio: f64) -> Result<ApproxPolygon, ShapeError> {
    if !(tolerance_ratio > 0.0 && tolerance_ratio < 1.0) {
        return Err(ShapeError::InvalidTolerance(tolerance_ratio));
    }
    polyline.validate()?;
    let epsilon = tolerance_ratio * polyline.perimeter();

    let mut points = polyline.points();
    let ends_meet = points.len() > 2 && points.first() == points.last();
    let closed = polyline.is_closed() || ends_meet;
    if ends_meet {
        points = &points[..points.len() - 1];
    }

    let n = points.len();
    let mut keep = vec![false; n];
    if closed {
        let (first, second) = split_pair(points);
        keep[first] = true;
        keep[second] = true;
        if first != second {
            rdp(points, first, second, epsilon, &mut keep);
            // The second chain wraps around; index first + n is `first` again.
            rdp(points, second, first + n, epsilon, &mut keep);
        }
    } else {
        keep[0] = true;
        keep[n - 1] = true;
        rdp(points, 0, n - 1, epsilon, &mut keep);
    }

    let mut vertices: SmallVec<[Point; 8]> = points
        .iter()
        .zip(&keep)
        .filter(|(_, k)| **k)
        .map(|(p, _)| *p)
        .collect();
    if vertices.len() < 2 {
        // Every sample coincides; nothing but the endpoints can survive.
        vertices.push(points[n - 1]);
    }
    drop_collinear(&mut vertices, epsilon, closed);
    log::debug!(
        "simplified {} samples to {} vertices (epsilon {epsilon:.3}, closed: {closed})",
        polyline.len(),
        vertices.len()
    );
    Ok(ApproxPolygon {
        vertices,
        epsilon,
        closed,
    })
}

/// Index of the point farthest from `origin`, the first one on ties.
fn farthest_from(points: &[Point], origin: Point) -> usize {
    let mut best = (0, 0.0);
    for (i, p) in points.iter().enumerate() {
        let d = p.distance_squared(origin);
        if d > best.1 {
            best = (i, d);
        }
    }
    best.0
}

/// Indices of an approximately farthest-apart pair of points, in order.
///
/// Starting from the first point, repeatedly jumps to the point farthest
/// from the current one. The distance never decreases, and a few jumps
/// settle on a diameter for the outlines met in practice.
fn split_pair(points: &[Point]) -> (usize, usize) {
    let mut a = 0;
    let mut b = farthest_from(points, points[0]);
    for _ in 0..3 {
        let next = farthest_from(points, points[b]);
        if next == a {
            break;
        }
        (a, b) = (b, next);
    }
    (a.min(b), a.max(b))
}

/// Ramer–Douglas–Peucker over `start..=end`, marking survivors in `keep`.
///
/// Indices are taken modulo the number of points, so a chain may wrap
/// around the end of a closed loop. Where several samples are at the
/// maximal distance, as along an edge parallel to the chord, the chain is
/// split at the first of them.
fn rdp(points: &[Point], start: usize, end: usize, epsilon: f64, keep: &mut [bool]) {
    let n = points.len();
    // Distances this close to the maximum count as ties.
    let slack = 1e-9 * epsilon;
    let mut pending = vec![(start, end)];
    while let Some((start, end)) = pending.pop() {
        if end <= start + 1 {
            continue;
        }
        let (a, b) = (points[start % n], points[end % n]);
        let mut max_dist = -1.0;
        let mut max_idx = start;
        for i in (start + 1)..end {
            let d = points[i % n].line_distance(a, b);
            if d > max_dist + slack {
                max_dist = d;
                max_idx = i;
            }
        }
        if max_dist > epsilon {
            keep[max_idx % n] = true;
            pending.push((start, max_idx));
            pending.push((max_idx, end));
        }
    }
}

/// Remove vertices within `epsilon` of the line through their neighbours.
///
/// The closest one goes first, and the pass repeats until every vertex
/// stands out. The endpoints of an open polyline stay, and at least two
/// vertices are always left.
fn drop_collinear(vertices: &mut SmallVec<[Point; 8]>, epsilon: f64, closed: bool) {
    loop {
        let n = vertices.len();
        if n <= 2 {
            return;
        }
        let inner = if closed { 0..n } else { 1..n - 1 };
        let flattest = inner
            .map(|i| {
                let prev = vertices[(i + n - 1) % n];
                let next = vertices[(i + 1) % n];
                (i, vertices[i].line_distance(prev, next))
            })
            .min_by(|(_, d0), (_, d1)| d0.total_cmp(d1));
        match flattest {
            Some((i, d)) if d <= epsilon => {
                vertices.remove(i);
            }
            _ => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Circle;
    use alloc::vec::Vec;

    fn dense_square(side: f64, per_edge: usize) -> Polyline {
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(side, 0.0),
            Point::new(side, side),
            Point::new(0.0, side),
        ];
        let mut pts = Vec::new();
        for i in 0..4 {
            let (a, b) = (corners[i], corners[(i + 1) % 4]);
            for k in 0..per_edge {
                let t = k as f64 / per_edge as f64;
                pts.push(Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t));
            }
        }
        Polyline::closed(pts)
    }

    #[test]
    fn two_points_survive() {
        let pl = Polyline::new([Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        let approx = approximate(&pl, 0.02).unwrap();
        assert_eq!(
            approx.vertices(),
            &[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]
        );
        assert!((approx.epsilon() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn collinear_points_collapse_to_endpoints() {
        let pl: Polyline = (0..5).map(|i| Point::new(i as f64, i as f64)).collect();
        let approx = approximate(&pl, 0.01).unwrap();
        assert_eq!(
            approx.vertices(),
            &[Point::new(0.0, 0.0), Point::new(4.0, 4.0)]
        );
    }

    #[test]
    fn open_zigzag_retains_peaks() {
        let pl = Polyline::new([
            Point::new(0.0, 0.0),
            Point::new(2.0, 5.0),
            Point::new(4.0, 0.0),
            Point::new(6.0, 5.0),
            Point::new(8.0, 0.0),
        ]);
        assert_eq!(approximate(&pl, 0.01).unwrap().vertex_count(), 5);
    }

    #[test]
    fn closed_square_reduces_to_corners() {
        let approx = approximate(&dense_square(100.0, 25), 0.02).unwrap();
        assert!(approx.is_closed());
        assert_eq!(
            approx.vertices(),
            &[
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(100.0, 100.0),
                Point::new(0.0, 100.0),
            ]
        );
    }

    #[test]
    fn start_on_an_edge_adds_no_vertex() {
        let mut pts = dense_square(100.0, 20).points().to_vec();
        pts.rotate_left(10);
        assert_eq!(pts[0], Point::new(50.0, 0.0));
        let approx = approximate(&Polyline::closed(pts), 0.02).unwrap();
        assert_eq!(
            approx.vertices(),
            &[
                Point::new(100.0, 0.0),
                Point::new(100.0, 100.0),
                Point::new(0.0, 100.0),
                Point::new(0.0, 0.0),
            ]
        );
    }

    #[test]
    fn parallel_edges_keep_true_corners() {
        // Opposite edges of a hexagon are parallel to the chord between
        // opposite corners, so every sample on them is equally far.
        let corners = Circle::new((0.0, 0.0), 50.0).sample(6);
        let mut pts = Vec::new();
        for (i, a) in corners.iter().enumerate() {
            let b = corners[(i + 1) % 6];
            pts.extend((0..10).map(|k| a.lerp(b, k as f64 / 10.0)));
        }
        for offset in [0, 1, 5, 9, 10, 33] {
            let mut rotated = pts.clone();
            rotated.rotate_left(offset);
            let approx = approximate(&Polyline::closed(rotated), 0.02).unwrap();
            assert_eq!(approx.vertex_count(), 6, "offset {offset}");
            for v in approx.vertices() {
                assert!(
                    corners.iter().any(|c| c.distance(*v) < 1e-9),
                    "{v:?} is not a corner (offset {offset})"
                );
            }
        }
    }

    #[test]
    fn near_collinear_vertices_are_dropped() {
        let mut vertices: SmallVec<[Point; 8]> = [
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.5),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ]
        .into_iter()
        .collect();
        drop_collinear(&mut vertices, 1.0, true);
        assert_eq!(
            vertices.as_slice(),
            &[
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(100.0, 100.0),
                Point::new(0.0, 100.0),
            ]
        );

        // Open ends stay put, even when collinear with their neighbour.
        let mut open: SmallVec<[Point; 8]> = (0..4).map(|i| Point::new(i as f64, 0.0)).collect();
        drop_collinear(&mut open, 1.0, false);
        assert_eq!(open.as_slice(), &[Point::new(0.0, 0.0), Point::new(3.0, 0.0)]);
    }

    #[test]
    fn long_loop_does_not_recurse() {
        let pl = Polyline::closed(Circle::new((0.0, 0.0), 50.0).sample(100_000));
        let approx = approximate(&pl, 1e-6).unwrap();
        assert!(approx.vertex_count() > 100);
        assert!(approx.vertex_count() < 100_000);
    }

    #[test]
    fn repeated_endpoint_is_treated_as_loop() {
        let mut pts = dense_square(50.0, 10).points().to_vec();
        pts.push(pts[0]);
        let approx = approximate(&Polyline::new(pts), 0.02).unwrap();
        assert!(approx.is_closed());
        assert_eq!(approx.vertex_count(), 4);
    }

    #[test]
    fn closed_straight_stroke_is_two_vertices() {
        let pl = Polyline::closed((0..30).map(|i| Point::new(3.0 * i as f64, 10.0)).collect::<Vec<_>>());
        let approx = approximate(&pl, 0.01).unwrap();
        assert_eq!(
            approx.vertices(),
            &[Point::new(0.0, 10.0), Point::new(87.0, 10.0)]
        );
    }

    #[test]
    fn circle_keeps_many_vertices() {
        let pl = Polyline::closed(Circle::new((100.0, 100.0), 50.0).sample(60));
        let approx = approximate(&pl, 0.01).unwrap();
        assert!(approx.vertex_count() > 6);
        assert!(approx.vertex_count() < 60);
    }

    #[test]
    fn coincident_points_degenerate_to_two() {
        let pl = Polyline::closed([Point::new(1.0, 1.0); 5]);
        assert_eq!(approximate(&pl, 0.02).unwrap().vertex_count(), 2);
    }

    #[test]
    fn rejects_bad_input() {
        let single = Polyline::new([Point::new(1.0, 2.0)]);
        assert_eq!(
            approximate(&single, 0.02),
            Err(ShapeError::InsufficientPoints { found: 1 })
        );
        let pl = Polyline::new([Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        assert_eq!(
            approximate(&pl, 0.0),
            Err(ShapeError::InvalidTolerance(0.0))
        );
        assert_eq!(
            approximate(&pl, 1.5),
            Err(ShapeError::InvalidTolerance(1.5))
        );
    }
}
