// Copyright 2026 the Regula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Implementation of ellipse shape, and least-squares fitting.

use alloc::vec::Vec;
use core::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::common::Mat3;
use crate::polyline::centroid;
use crate::{FitError, Point, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// An ellipse.
///
/// The ellipse is a circle stretched by `radii` along the x and y axes,
/// rotated counter-clockwise (in a y-up space) by `rotation` radians, then
/// translated to `center`.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ellipse {
    /// The center.
    pub center: Point,
    /// The two semi-axes, before rotation.
    pub radii: Vec2,
    /// Rotation of the first semi-axis from the x axis, in radians.
    pub rotation: f64,
}

impl Ellipse {
    /// A new ellipse from center, radii, and rotation.
    #[inline]
    pub fn new(center: impl Into<Point>, radii: impl Into<Vec2>, rotation: f64) -> Ellipse {
        let radii = radii.into();
        Ellipse {
            center: center.into(),
            radii: Vec2::new(radii.x.abs(), radii.y.abs()),
            rotation,
        }
    }

    /// Fit an ellipse to a set of points, minimizing algebraic distance.
    ///
    /// This is the direct least-squares method of Fitzgibbon, Pilu and
    /// Fisher, in the numerically stable formulation of Halíř and Flusser:
    /// the 6x6 generalized eigenproblem is reduced to a 3x3 ordinary one.
    /// Points are centered and scaled to unit RMS distance first, which keeps
    /// the scatter matrices well conditioned for pixel-scale input.
    ///
    /// The result is normalized so that `radii.x >= radii.y`, with `rotation`
    /// giving the direction of the major axis in `(-π/2, π/2]`.
    pub fn fit(points: &[Point]) -> Result<Ellipse, FitError> {
        if points.len() < 5 {
            return Err(FitError::TooFewPoints(points.len()));
        }
        let mean = centroid(points).ok_or(FitError::TooFewPoints(0))?;
        let ms = points.iter().map(|p| p.distance_squared(mean)).sum::<f64>() / points.len() as f64;
        let scale = ms.sqrt();
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(FitError::IllConditioned);
        }
        let inv_scale = scale.recip();

        // Scatter matrix, split into quadratic and linear blocks.
        let mut s1 = Mat3::ZERO;
        let mut s2 = Mat3::ZERO;
        let mut s3 = Mat3::ZERO;
        for p in points {
            let v = (*p - mean) * inv_scale;
            let quad = [v.x * v.x, v.x * v.y, v.y * v.y];
            let lin = [v.x, v.y, 1.0];
            s1.add_outer(quad, quad);
            s2.add_outer(quad, lin);
            s3.add_outer(lin, lin);
        }
        let s3_inv = s3.inverse().ok_or(FitError::IllConditioned)?;
        // Linear coefficients as a function of the quadratic ones.
        let t = s3_inv.mul(&s2.transpose()).scale(-1.0);
        let reduced = s1.add(&s2.mul(&t));
        // Premultiply by the inverse of the constraint 4ac - b² = 1.
        let m = Mat3([
            reduced.0[2].map(|x| 0.5 * x),
            reduced.0[1].map(|x| -x),
            reduced.0[0].map(|x| 0.5 * x),
        ]);

        // The elliptical solution is the eigenvector with the largest
        // eigenvalue; the others violate the constraint.
        let lambda = m
            .eigenvalues()
            .into_iter()
            .filter(|l| l.is_finite())
            .max_by(f64::total_cmp)
            .ok_or(FitError::NotAnEllipse)?;
        let mut quad = m.eigenvector(lambda).ok_or(FitError::IllConditioned)?;
        if 4.0 * quad[0] * quad[2] - quad[1] * quad[1] <= 0.0 {
            return Err(FitError::NotAnEllipse);
        }
        if quad[0] < 0.0 {
            quad = quad.map(|x| -x);
        }
        let lin = t.mul_vec(quad);
        let unit = Ellipse::from_conic(quad, lin).ok_or(FitError::NotAnEllipse)?;

        let fitted = Ellipse {
            center: mean + unit.center.to_vec2() * scale,
            radii: unit.radii * scale,
            rotation: unit.rotation,
        };
        if fitted.is_finite() {
            Ok(fitted)
        } else {
            Err(FitError::NotAnEllipse)
        }
    }

    /// Geometric parameters of the conic `ax² + bxy + cy² + dx + ey + f = 0`.
    ///
    /// Expects the coefficients normalized so that `a > 0`.
    fn from_conic([a, b, c]: [f64; 3], [d, e, f]: [f64; 3]) -> Option<Ellipse> {
        let den = b * b - 4.0 * a * c;
        if den >= 0.0 {
            return None;
        }
        let center = Point::new((2.0 * c * d - b * e) / den, (2.0 * a * e - b * d) / den);
        let num = 2.0 * (a * e * e + c * d * d - b * d * e + den * f);
        let q = (a - c).hypot(b);
        let major = (num * (a + c + q)).sqrt() / -den;
        let minor = (num * (a + c - q)).sqrt() / -den;
        if !(major > 0.0 && minor > 0.0) {
            return None;
        }
        let rotation = if b != 0.0 {
            ((c - a - q) / b).atan()
        } else if a <= c {
            0.0
        } else {
            FRAC_PI_2
        };
        Some(Ellipse {
            center,
            radii: Vec2::new(major, minor),
            rotation,
        })
    }

    /// The semi-major axis length.
    #[inline]
    pub fn semi_major(&self) -> f64 {
        self.radii.x.max(self.radii.y)
    }

    /// The semi-minor axis length.
    #[inline]
    pub fn semi_minor(&self) -> f64 {
        self.radii.x.min(self.radii.y)
    }

    /// Full length of the major axis.
    #[inline]
    pub fn major_axis(&self) -> f64 {
        2.0 * self.semi_major()
    }

    /// Full length of the minor axis.
    #[inline]
    pub fn minor_axis(&self) -> f64 {
        2.0 * self.semi_minor()
    }

    /// Ratio of the major to the minor axis, `None` when the minor axis is zero.
    #[inline]
    pub fn axis_ratio(&self) -> Option<f64> {
        let ratio = self.semi_major() / self.semi_minor();
        ratio.is_finite().then_some(ratio)
    }

    /// The area of the ellipse.
    #[inline]
    pub fn area(&self) -> f64 {
        PI * self.radii.x * self.radii.y
    }

    /// `n` points evenly spaced in parameter around the ellipse,
    /// counter-clockwise (in a y-up space) from the end of the first axis.
    ///
    /// The starting point is not repeated at the end.
    pub fn sample(&self, n: usize) -> Vec<Point> {
        let u = Vec2::from_angle(self.rotation);
        let v = u.turn_90();
        let step = TAU / n as f64;
        (0..n)
            .map(|i| {
                let (sin, cos) = (step * i as f64).sin_cos();
                self.center + u * (self.radii.x * cos) + v * (self.radii.y * sin)
            })
            .collect()
    }

    /// Is this ellipse finite?
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.center.is_finite() && self.radii.is_finite() && self.rotation.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Circle;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn assert_approx_eq(x: f64, y: f64, eps: f64) {
        assert!((x - y).abs() < eps, "{x} != {y}");
    }

    /// Difference of two axis directions, modulo a half turn.
    fn angle_diff(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(PI);
        d.min(PI - d)
    }

    #[test]
    fn fit_recovers_rotated_ellipse() {
        let truth = Ellipse::new((30.0, -20.0), (40.0, 15.0), 0.5);
        let fitted = Ellipse::fit(&truth.sample(100)).unwrap();
        assert_approx_eq(fitted.center.x, 30.0, 1e-6);
        assert_approx_eq(fitted.center.y, -20.0, 1e-6);
        assert_approx_eq(fitted.radii.x, 40.0, 1e-6);
        assert_approx_eq(fitted.radii.y, 15.0, 1e-6);
        assert!(angle_diff(fitted.rotation, 0.5) < 1e-6);
    }

    #[test]
    fn fit_normalizes_major_axis_first() {
        // Tall ellipse: the major axis is vertical.
        let truth = Ellipse::new((0.0, 0.0), (10.0, 30.0), 0.0);
        let fitted = Ellipse::fit(&truth.sample(50)).unwrap();
        assert_approx_eq(fitted.semi_major(), 30.0, 1e-6);
        assert_approx_eq(fitted.radii.x, 30.0, 1e-6);
        assert!(angle_diff(fitted.rotation, FRAC_PI_2) < 1e-6);
    }

    #[test]
    fn fit_circle_has_unit_axis_ratio() {
        let circle = Circle::new((100.0, 100.0), 50.0);
        let fitted = Ellipse::fit(&circle.sample(60)).unwrap();
        assert_approx_eq(fitted.center.x, 100.0, 1e-6);
        assert_approx_eq(fitted.center.y, 100.0, 1e-6);
        assert_approx_eq(fitted.major_axis(), 100.0, 1e-6);
        assert_approx_eq(fitted.axis_ratio().unwrap(), 1.0, 1e-6);
    }

    #[test]
    fn fit_noisy_ellipse() {
        let mut rng = StdRng::seed_from_u64(42);
        let truth = Ellipse::new((250.0, 180.0), (90.0, 45.0), -0.3);
        let noisy: Vec<Point> = truth
            .sample(200)
            .into_iter()
            .map(|p| p + Vec2::new(rng.random_range(-0.5..0.5), rng.random_range(-0.5..0.5)))
            .collect();
        let fitted = Ellipse::fit(&noisy).unwrap();
        assert_approx_eq(fitted.center.x, 250.0, 0.5);
        assert_approx_eq(fitted.center.y, 180.0, 0.5);
        assert_approx_eq(fitted.radii.x, 90.0, 1.0);
        assert_approx_eq(fitted.radii.y, 45.0, 1.0);
        assert!(angle_diff(fitted.rotation, -0.3) < 0.02);
    }

    #[test]
    fn fit_failures() {
        let few: Vec<Point> = (0..4).map(|i| Point::new(i as f64, 0.0)).collect();
        assert_eq!(Ellipse::fit(&few), Err(FitError::TooFewPoints(4)));

        let collinear: Vec<Point> = (0..20)
            .map(|i| Point::new(i as f64, 2.0 * i as f64 + 1.0))
            .collect();
        assert_eq!(Ellipse::fit(&collinear), Err(FitError::IllConditioned));

        let same = [Point::new(3.0, 3.0); 8];
        assert_eq!(Ellipse::fit(&same), Err(FitError::IllConditioned));
    }

    #[test]
    fn sample_respects_rotation() {
        let e = Ellipse::new((0.0, 0.0), (20.0, 5.0), FRAC_PI_2);
        let pts = e.sample(4);
        // First sample is at the end of the (now vertical) major axis.
        assert_approx_eq(pts[0].x, 0.0, 1e-9);
        assert_approx_eq(pts[0].y, 20.0, 1e-9);
        assert_approx_eq(pts[1].x, -5.0, 1e-9);
        assert_approx_eq(pts[1].y, 0.0, 1e-9);
        assert_approx_eq(e.area(), 100.0 * PI, 1e-9);
    }
}
