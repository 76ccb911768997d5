//! Geometric utilities for joint angle computations.

use nalgebra::Point3;

/// Guards the cosine denominator against zero-length limb vectors.
pub const ANGLE_EPSILON: f64 = 1e-8;

/// Angle in degrees at vertex `p2` formed by `p1` and `p3`, always in `[0, 180]`.
///
/// The cosine is clamped before `acos`, so degenerate limbs (coincident
/// points) yield 90° rather than NaN.
pub fn joint_angle(p1: &Point3<f64>, p2: &Point3<f64>, p3: &Point3<f64>) -> f64 {
    let v1 = p1 - p2;
    let v2 = p3 - p2;

    let cosine = v1.dot(&v2) / (v1.norm() * v2.norm() + ANGLE_EPSILON);
    cosine.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Midpoint between two points
pub fn midpoint(a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    nalgebra::center(a, b)
}
