// Copyright 2026 the Regula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations

#![allow(missing_docs)]

use arrayvec::ArrayVec;

/// Defines a trait that chooses between libstd or libm implementations of float methods.
macro_rules! define_float_funcs {
    ($(
        fn $name:ident(self $(,$arg:ident: $arg_ty:ty)*) -> $ret:ty
        => $lname:ident;
    )+) => {
        #[cfg(not(feature = "std"))]
        pub(crate) trait FloatFuncs : Sized {
            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret;)+
        }

        #[cfg(not(feature = "std"))]
        impl FloatFuncs for f64 {
            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("regula requires either the `std` or `libm` feature")
            })+
        }
    }
}

define_float_funcs! {
    fn abs(self) -> Self => fabs;
    fn atan(self) -> Self => atan;
    fn atan2(self, other: Self) -> Self => atan2;
    fn cbrt(self) -> Self => cbrt;
    fn copysign(self, sign: Self) -> Self => copysign;
    fn hypot(self, other: Self) -> Self => hypot;
    fn mul_add(self, a: Self, b: Self) -> Self => fma;
    fn sin_cos(self) -> (Self, Self) => sincos;
    fn sqrt(self) -> Self => sqrt;
}

/// Find real roots of cubic equation.
///
/// It handles the case where `c3` is zero (in that case, solving the
/// quadratic equation).
///
/// See: <https://momentsingraphics.de/CubicRoots.html>, which is in turn
/// based on Jim Blinn's "How to Solve a Cubic Equation".
///
/// Return values of x for which c0 + c1 x + c2 x² + c3 x³ = 0.
pub fn solve_cubic(c0: f64, c1: f64, c2: f64, c3: f64) -> ArrayVec<f64, 3> {
    let mut result = ArrayVec::new();
    let c3_recip = c3.recip();
    const ONETHIRD: f64 = 1. / 3.;
    let scaled_c2 = c2 * (ONETHIRD * c3_recip);
    let scaled_c1 = c1 * (ONETHIRD * c3_recip);
    let scaled_c0 = c0 * c3_recip;
    if !(scaled_c0.is_finite() && scaled_c1.is_finite() && scaled_c2.is_finite()) {
        // cubic coefficient is zero or nearly so.
        for root in solve_quadratic(c0, c1, c2) {
            result.push(root);
        }
        return result;
    }
    let (c0, c1, c2) = (scaled_c0, scaled_c1, scaled_c2);
    // (d0, d1, d2) is called "Delta" in article
    let d0 = (-c2).mul_add(c2, c1);
    let d1 = (-c1).mul_add(c2, c0);
    let d2 = c2 * c0 - c1 * c1;
    // d is called "Discriminant"
    let d = 4.0 * d0 * d2 - d1 * d1;
    // de is called "Depressed.x", Depressed.y = d0
    let de = (-2.0 * c2).mul_add(d0, d1);
    if d < 0.0 {
        let sq = (-0.25 * d).sqrt();
        let r = -0.5 * de;
        let t1 = (r + sq).cbrt() + (r - sq).cbrt();
        result.push(t1 - c2);
    } else if d == 0.0 {
        let t1 = (-d0).sqrt().copysign(de);
        result.push(t1 - c2);
        result.push(-2.0 * t1 - c2);
    } else {
        let th = d.sqrt().atan2(-de) * ONETHIRD;
        let (th_sin, th_cos) = th.sin_cos();
        let r0 = th_cos;
        let ss3 = th_sin * 3.0f64.sqrt();
        let r1 = 0.5 * (-th_cos + ss3);
        let r2 = 0.5 * (-th_cos - ss3);
        let t = 2.0 * (-d0).sqrt();
        result.push(t.mul_add(r0, -c2));
        result.push(t.mul_add(r1, -c2));
        result.push(t.mul_add(r2, -c2));
    }
    result
}

/// Find real roots of quadratic equation.
///
/// Return values of x for which c0 + c1 x + c2 x² = 0.
///
/// If the equation is nearly linear, the root of the linear part is
/// returned. In the degenerate case where all coefficients are zero, a
/// single `0.0` is returned.
pub fn solve_quadratic(c0: f64, c1: f64, c2: f64) -> ArrayVec<f64, 2> {
    let mut result = ArrayVec::new();
    let sc0 = c0 * c2.recip();
    let sc1 = c1 * c2.recip();
    if !sc0.is_finite() || !sc1.is_finite() {
        // c2 is zero or very small, treat as linear eqn
        let root = -c0 / c1;
        if root.is_finite() {
            result.push(root);
        } else if c0 == 0.0 && c1 == 0.0 {
            result.push(0.0);
        }
        return result;
    }
    let arg = sc1 * sc1 - 4. * sc0;
    let root1 = if !arg.is_finite() {
        // sc1 * sc1 overflowed; use sc1 x + x² = 0 for one root.
        -sc1
    } else {
        if arg < 0.0 {
            return result;
        } else if arg == 0.0 {
            result.push(-0.5 * sc1);
            return result;
        }
        // See https://math.stackexchange.com/questions/866331
        -0.5 * (sc1 + arg.sqrt().copysign(sc1))
    };
    let root2 = sc0 / root1;
    if root2.is_finite() {
        if root2 > root1 {
            result.push(root1);
            result.push(root2);
        } else {
            result.push(root2);
            result.push(root1);
        }
    } else {
        result.push(root1);
    }
    result
}

/// A row-major 3x3 matrix, just enough linear algebra for conic fitting.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Mat3(pub(crate) [[f64; 3]; 3]);

impl Mat3 {
    pub(crate) const ZERO: Mat3 = Mat3([[0.0; 3]; 3]);

    /// Accumulate the outer product `a bᵀ`.
    #[inline]
    pub(crate) fn add_outer(&mut self, a: [f64; 3], b: [f64; 3]) {
        for (row, ai) in self.0.iter_mut().zip(a) {
            for (cell, bj) in row.iter_mut().zip(b) {
                *cell += ai * bj;
            }
        }
    }

    pub(crate) fn transpose(&self) -> Mat3 {
        let m = &self.0;
        Mat3([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    pub(crate) fn mul(&self, other: &Mat3) -> Mat3 {
        let mut out = Mat3::ZERO;
        for i in 0..3 {
            for j in 0..3 {
                out.0[i][j] = (0..3).map(|k| self.0[i][k] * other.0[k][j]).sum();
            }
        }
        out
    }

    pub(crate) fn mul_vec(&self, v: [f64; 3]) -> [f64; 3] {
        self.0.map(|row| row[0] * v[0] + row[1] * v[1] + row[2] * v[2])
    }

    pub(crate) fn add(&self, other: &Mat3) -> Mat3 {
        let mut out = *self;
        for (row, other_row) in out.0.iter_mut().zip(other.0) {
            for (cell, o) in row.iter_mut().zip(other_row) {
                *cell += o;
            }
        }
        out
    }

    pub(crate) fn scale(&self, s: f64) -> Mat3 {
        Mat3(self.0.map(|row| row.map(|x| x * s)))
    }

    pub(crate) fn trace(&self) -> f64 {
        self.0[0][0] + self.0[1][1] + self.0[2][2]
    }

    pub(crate) fn determinant(&self) -> f64 {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Sum of the principal 2x2 minors.
    pub(crate) fn minor_sum(&self) -> f64 {
        let m = &self.0;
        (m[0][0] * m[1][1] - m[0][1] * m[1][0])
            + (m[0][0] * m[2][2] - m[0][2] * m[2][0])
            + (m[1][1] * m[2][2] - m[1][2] * m[2][1])
    }

    /// The inverse, or `None` when the matrix is singular relative to its scale.
    pub(crate) fn inverse(&self) -> Option<Mat3> {
        let m = &self.0;
        let det = self.determinant();
        let scale = m.iter().flatten().fold(0.0f64, |acc, x| acc.max(x.abs()));
        if !det.is_finite() || scale == 0.0 || det.abs() <= 1e-12 * scale * scale * scale {
            return None;
        }
        let inv_det = det.recip();
        let cof = |r0: usize, r1: usize, c0: usize, c1: usize| {
            m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0]
        };
        Some(Mat3([
            [cof(1, 2, 1, 2), -cof(0, 2, 1, 2), cof(0, 1, 1, 2)],
            [-cof(1, 2, 0, 2), cof(0, 2, 0, 2), -cof(0, 1, 0, 2)],
            [cof(1, 2, 0, 1), -cof(0, 2, 0, 1), cof(0, 1, 0, 1)],
        ])
        .scale(inv_det))
    }

    /// Real eigenvalues, from the characteristic polynomial.
    pub(crate) fn eigenvalues(&self) -> ArrayVec<f64, 3> {
        // det(M - λI) = -λ³ + tr λ² - minors λ + det
        solve_cubic(self.determinant(), -self.minor_sum(), self.trace(), -1.0)
    }

    /// An eigenvector for the (simple) eigenvalue `lambda`.
    ///
    /// The null space of `M - λI` is spanned by the cross product of two of
    /// its rows; the pair giving the largest product is the best conditioned.
    pub(crate) fn eigenvector(&self, lambda: f64) -> Option<[f64; 3]> {
        let mut rows = self.0;
        for (i, row) in rows.iter_mut().enumerate() {
            row[i] -= lambda;
        }
        let cross = |a: [f64; 3], b: [f64; 3]| {
            [
                a[1] * b[2] - a[2] * b[1],
                a[2] * b[0] - a[0] * b[2],
                a[0] * b[1] - a[1] * b[0],
            ]
        };
        let norm2 = |v: [f64; 3]| v[0] * v[0] + v[1] * v[1] + v[2] * v[2];
        let best = [
            cross(rows[0], rows[1]),
            cross(rows[0], rows[2]),
            cross(rows[1], rows[2]),
        ]
        .into_iter()
        .max_by(|a, b| norm2(*a).total_cmp(&norm2(*b)))?;
        let n = norm2(best).sqrt();
        if n == 0.0 || !n.is_finite() {
            return None;
        }
        Some(best.map(|x| x / n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrayvec::ArrayVec;

    fn verify<const N: usize>(mut roots: ArrayVec<f64, N>, expected: &[f64]) {
        assert_eq!(expected.len(), roots.len());
        let epsilon = 1e-12;
        roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for i in 0..expected.len() {
            assert!((roots[i] - expected[i]).abs() < epsilon);
        }
    }

    #[test]
    fn test_solve_cubic() {
        verify(solve_cubic(-5.0, 0.0, 0.0, 1.0), &[5.0f64.cbrt()]);
        verify(solve_cubic(-5.0, -1.0, 0.0, 1.0), &[1.90416085913492]);
        verify(solve_cubic(0.0, -1.0, 0.0, 1.0), &[-1.0, 0.0, 1.0]);
        verify(solve_cubic(-2.0, -3.0, 0.0, 1.0), &[-1.0, 2.0]);
        verify(solve_cubic(2.0, -3.0, 0.0, 1.0), &[-2.0, 1.0]);
        verify(solve_cubic(2.0, 3.0, 1.0, 0.0), &[-2.0, -1.0]);
    }

    #[test]
    fn test_solve_quadratic() {
        verify(solve_quadratic(-5.0, 0.0, 1.0), &[-(5.0f64.sqrt()), 5.0f64.sqrt()]);
        verify(solve_quadratic(5.0, 0.0, 1.0), &[]);
        verify(solve_quadratic(5.0, 1.0, 0.0), &[-5.0]);
        verify(solve_quadratic(1.0, 2.0, 1.0), &[-1.0]);
    }

    #[test]
    fn inverse_round_trip() {
        let m = Mat3([[4.0, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 2.0]]);
        let inv = m.inverse().unwrap();
        let id = m.mul(&inv);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((id.0[i][j] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn singular_has_no_inverse() {
        let m = Mat3([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 1.0]]);
        assert!(m.inverse().is_none());
    }

    #[test]
    fn diagonal_eigen() {
        let m = Mat3([[2.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 5.0]]);
        let mut values = m.eigenvalues();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(values.len(), 3);
        assert!((values[0] + 1.0).abs() < 1e-9);
        assert!((values[1] - 2.0).abs() < 1e-9);
        assert!((values[2] - 5.0).abs() < 1e-9);
        let v = m.eigenvector(5.0).unwrap();
        assert!(v[0].abs() < 1e-12 && v[1].abs() < 1e-12);
        assert!((v[2].abs() - 1.0).abs() < 1e-12);
    }
}
