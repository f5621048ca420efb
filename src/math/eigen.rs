//! Cyclic Jacobi eigen-decomposition of symmetric 3×3 matrices.

use crate::float_types::Real;
use nalgebra::{Matrix3, Vector3};

/// Upper bound on full Jacobi sweeps; ill-conditioned input stops here
/// instead of iterating forever.
pub const MAX_JACOBI_SWEEPS: usize = 32;

/// Eigenvalues and the orthonormal eigenvectors (as columns of `vectors`)
/// of a symmetric matrix. `values[i]` belongs to column `i`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenDecomposition {
    pub values: Vector3<Real>,
    pub vectors: Matrix3<Real>,
    /// Number of sweeps that were performed.
    pub sweeps: usize,
}

/// Decompose a symmetric matrix with the default sweep limit.
pub fn symmetric_eigen(m: &Matrix3<Real>) -> EigenDecomposition {
    symmetric_eigen_with_limit(m, MAX_JACOBI_SWEEPS)
}

/// Decompose a symmetric matrix, performing at most `max_sweeps` sweeps.
///
/// Only the upper triangle is trusted; each sweep annihilates the
/// `(0,1)`, `(0,2)` and `(1,2)` entries in turn. Iteration ends once the
/// off-diagonal Frobenius norm drops below `Real::EPSILON` times the
/// Frobenius norm of the input.
pub fn symmetric_eigen_with_limit(m: &Matrix3<Real>, max_sweeps: usize) -> EigenDecomposition {
    let mut a = *m;
    // enforce exact symmetry from the upper triangle
    a[(1, 0)] = a[(0, 1)];
    a[(2, 0)] = a[(0, 2)];
    a[(2, 1)] = a[(1, 2)];

    let mut v = Matrix3::identity();
    let threshold = Real::EPSILON * a.norm();
    let mut sweeps = 0;

    while sweeps < max_sweeps && off_diagonal_norm(&a) > threshold {
        for (p, q) in [(0, 1), (0, 2), (1, 2)] {
            let (c, s) = schur2(&a, p, q);
            if s == 0.0 {
                continue;
            }
            let mut j = Matrix3::identity();
            j[(p, p)] = c;
            j[(p, q)] = s;
            j[(q, p)] = -s;
            j[(q, q)] = c;
            a = j.transpose() * a * j;
            v *= j;
        }
        sweeps += 1;
    }

    EigenDecomposition {
        values: Vector3::new(a[(0, 0)], a[(1, 1)], a[(2, 2)]),
        vectors: v,
        sweeps,
    }
}

fn off_diagonal_norm(a: &Matrix3<Real>) -> Real {
    (2.0 * (a[(0, 1)] * a[(0, 1)] + a[(0, 2)] * a[(0, 2)] + a[(1, 2)] * a[(1, 2)])).sqrt()
}

/// Cosine/sine of the Jacobi rotation that zeroes `a[(p, q)]`.
fn schur2(a: &Matrix3<Real>, p: usize, q: usize) -> (Real, Real) {
    let apq = a[(p, q)];
    if apq.abs() <= Real::MIN_POSITIVE {
        return (1.0, 0.0);
    }
    let r = (a[(q, q)] - a[(p, p)]) / (2.0 * apq);
    let t = if r >= 0.0 {
        1.0 / (r + (1.0 + r * r).sqrt())
    } else {
        -1.0 / (-r + (1.0 + r * r).sqrt())
    };
    let c = 1.0 / (1.0 + t * t).sqrt();
    (c, t * c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::EPSILON;
    use approx::assert_relative_eq;

    #[test]
    fn diagonal_matrix_needs_no_sweep() {
        let m = Matrix3::from_diagonal(&Vector3::new(3.0, 2.0, 1.0));
        let eigen = symmetric_eigen(&m);
        assert_eq!(eigen.sweeps, 0);
        assert_eq!(eigen.values, Vector3::new(3.0, 2.0, 1.0));
        assert_eq!(eigen.vectors, Matrix3::identity());
    }

    #[test]
    fn reconstructs_input() {
        let m = Matrix3::new(4.0, 1.0, 0.5, 1.0, 3.0, 0.25, 0.5, 0.25, 2.0);
        let eigen = symmetric_eigen(&m);
        let rebuilt =
            eigen.vectors * Matrix3::from_diagonal(&eigen.values) * eigen.vectors.transpose();
        assert_relative_eq!(rebuilt, m, epsilon = EPSILON * 10.0);
        assert_relative_eq!(
            eigen.vectors.transpose() * eigen.vectors,
            Matrix3::identity(),
            epsilon = EPSILON * 10.0
        );
        assert!(eigen.sweeps <= MAX_JACOBI_SWEEPS);
    }

    #[test]
    fn sweep_limit_is_honored() {
        let m = Matrix3::new(1.0, 2.0, 3.0, 2.0, 4.0, 5.0, 3.0, 5.0, 6.0);
        let eigen = symmetric_eigen_with_limit(&m, 1);
        assert_eq!(eigen.sweeps, 1);
    }
}
