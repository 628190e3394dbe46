// Copyright 2026 the Regula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Implementation of circle shape.

use alloc::vec::Vec;
use core::f64::consts::TAU;

use crate::{Point, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A circle.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle {
    /// The center.
    pub center: Point,
    /// The radius.
    pub radius: f64,
}

impl Circle {
    /// A new circle from center and radius.
    #[inline]
    pub fn new(center: impl Into<Point>, radius: f64) -> Circle {
        Circle {
            center: center.into(),
            radius,
        }
    }

    /// The smallest circle containing every point.
    ///
    /// This is Welzl's algorithm in its iterative form. Returns `None` for an
    /// empty slice.
    pub fn enclosing(points: &[Point]) -> Option<Circle> {
        let (&first, rest) = points.split_first()?;
        let mut circle = Circle::new(first, 0.0);
        for (i, &p) in rest.iter().enumerate() {
            if circle.contains(p) {
                continue;
            }
            // p is on the boundary of the enclosing circle of points[..=i + 1].
            circle = Circle::new(p, 0.0);
            for (j, &q) in points[..=i].iter().enumerate() {
                if circle.contains(q) {
                    continue;
                }
                circle = Circle::diametral(p, q);
                for &r in &points[..j] {
                    if !circle.contains(r) {
                        circle = Circle::circumscribed(p, q, r);
                    }
                }
            }
        }
        Some(circle)
    }

    /// The circle having the segment `p0`–`p1` as a diameter.
    #[inline]
    pub fn diametral(p0: Point, p1: Point) -> Circle {
        Circle::new(p0.midpoint(p1), 0.5 * p0.distance(p1))
    }

    /// The circle through three points.
    ///
    /// When the points are collinear there is no such circle, and the
    /// diametral circle of the two farthest apart is returned instead.
    pub fn circumscribed(a: Point, b: Point, c: Point) -> Circle {
        let ab = b - a;
        let ac = c - a;
        let ab_len2 = ab.hypot2();
        let ac_len2 = ac.hypot2();
        let d_recip = 0.5 / ab.cross(ac);
        let x = (ac.y * ab_len2 - ab.y * ac_len2) * d_recip;
        let y = (ab.x * ac_len2 - ac.x * ab_len2) * d_recip;
        if !(x.is_finite() && y.is_finite()) {
            let pairs = [(a, b), (a, c), (b, c)];
            let (p0, p1) = pairs
                .into_iter()
                .max_by(|(a0, a1), (b0, b1)| {
                    a0.distance_squared(*a1)
                        .total_cmp(&b0.distance_squared(*b1))
                })
                .unwrap_or((a, b));
            return Circle::diametral(p0, p1);
        }
        let offset = Vec2::new(x, y);
        Circle::new(a + offset, offset.hypot())
    }

    /// Whether `pt` lies inside or on the circle, up to a small relative
    /// tolerance.
    #[inline]
    pub fn contains(&self, pt: Point) -> bool {
        let slack = 1e-9 * self.radius.abs().max(1.0);
        self.center.distance(pt) <= self.radius + slack
    }

    /// `n` points evenly spaced around the circle, counter-clockwise (in a
    /// y-up space) from angle zero.
    ///
    /// The starting point is not repeated at the end.
    pub fn sample(&self, n: usize) -> Vec<Point> {
        let step = TAU / n as f64;
        (0..n)
            .map(|i| point_on_circle(self.center, self.radius, step * i as f64))
            .collect()
    }

    /// Is this circle finite?
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.center.is_finite() && self.radius.is_finite()
    }
}

#[inline]
fn point_on_circle(center: Point, radius: f64, angle: f64) -> Point {
    center + radius * Vec2::from_angle(angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn assert_approx_eq(x: f64, y: f64) {
        assert!((x - y).abs() < 1e-7, "{x} != {y}");
    }

    #[test]
    fn sample_is_on_circle() {
        let c = Circle::new((5.0, -3.0), 12.0);
        let pts = c.sample(36);
        assert_eq!(pts.len(), 36);
        for p in &pts {
            assert_approx_eq(p.distance(c.center), 12.0);
        }
        assert_approx_eq(pts[0].x, 17.0);
        assert_approx_eq(pts[0].y, -3.0);
        // A quarter turn later we are straight "up".
        assert_approx_eq(pts[9].x, 5.0);
        assert_approx_eq(pts[9].y, 9.0);
    }

    #[test]
    fn circumscribed_right_triangle() {
        let c = Circle::circumscribed(
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(0.0, 3.0),
        );
        assert_approx_eq(c.center.x, 2.0);
        assert_approx_eq(c.center.y, 1.5);
        assert_approx_eq(c.radius, 2.5);
    }

    #[test]
    fn circumscribed_collinear_falls_back() {
        let c = Circle::circumscribed(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(4.0, 0.0),
        );
        assert_approx_eq(c.center.x, 5.0);
        assert_approx_eq(c.radius, 5.0);
    }

    #[test]
    fn enclosing_regular_polygon() {
        let c = Circle::new((50.0, 40.0), 20.0);
        let e = Circle::enclosing(&c.sample(60)).unwrap();
        assert_approx_eq(e.center.x, 50.0);
        assert_approx_eq(e.center.y, 40.0);
        assert_approx_eq(e.radius, 20.0);
    }

    #[test]
    fn enclosing_contains_random_points() {
        let mut rng = StdRng::seed_from_u64(7);
        let pts: Vec<Point> = (0..200)
            .map(|_| Point::new(rng.random_range(-50.0..50.0), rng.random_range(0.0..30.0)))
            .collect();
        let e = Circle::enclosing(&pts).unwrap();
        assert!(pts.iter().all(|p| e.contains(*p)));
        assert!(Circle::enclosing(&[]).is_none());
        let single = Circle::enclosing(&[Point::new(1.0, 2.0)]).unwrap();
        assert_eq!(single, Circle::new((1.0, 2.0), 0.0));
    }
}
