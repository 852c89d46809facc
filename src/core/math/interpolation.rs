use nalgebra::{Point2, Vector3};

const EPSILON: f32 = 1e-5;

/// Signed parallelogram area spanned by edge `a -> b` and the vector `a -> p`.
///
/// Positive when `p` lies clockwise of the edge in screen space (y down).
#[inline(always)]
pub fn edge_function(a: Point2<f32>, b: Point2<f32>, p: Point2<f32>) -> f32 {
    let e = b - a;
    let ap = p - a;
    e.x * ap.y - e.y * ap.x
}

/// Twice the signed screen-space area of triangle (v0, v1, v2).
#[inline(always)]
pub fn signed_area(v0: Point2<f32>, v1: Point2<f32>, v2: Point2<f32>) -> f32 {
    edge_function(v0, v1, v2)
}

/// Calculates the barycentric weights (w0, w1, w2) of point p
/// with respect to triangle (v0, v1, v2).
///
/// Each weight is the signed area of the sub-triangle opposite its vertex
/// divided by the full signed area, so the weights sum to 1 and are all
/// non-negative inside the triangle whatever its winding.
///
/// Returns `None` if the triangle is degenerate (area is near zero).
pub fn barycentric_coordinates(
    p: Point2<f32>,
    v0: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
) -> Option<Vector3<f32>> {
    let total_area_x2 = signed_area(v0, v1, v2);
    if total_area_x2.abs() < EPSILON {
        return None;
    }
    let inv_total_area_x2 = 1.0 / total_area_x2;

    let area_v1v2 = edge_function(v1, v2, p);
    let area_v2v0 = edge_function(v2, v0, p);
    let area_v0v1 = edge_function(v0, v1, p);

    Some(Vector3::new(
        area_v1v2 * inv_total_area_x2,
        area_v2v0 * inv_total_area_x2,
        area_v0v1 * inv_total_area_x2,
    ))
}

/// Checks if the barycentric coordinates represent a point inside the triangle.
/// Returns true if all three weights are >= 0.
#[inline(always)]
pub fn is_inside_triangle(bary: Vector3<f32>) -> bool {
    bary.x >= 0.0 && bary.y >= 0.0 && bary.z >= 0.0
}

/// Compute perspective-correct barycentric coordinates (w0', w1', w2').
///
///   a = w0 / W0, b = w1 / W1, c = w2 / W2
///   inv_w = a + b + c
///   w0' = a / inv_w, ...
///
/// Interpolating an attribute with the corrected weights equals
/// `(A0/W0 * w0 + A1/W1 * w1 + A2/W2 * w2) / inv_w`.
///
/// Returns `None` when any `W` or the sum is near zero.
pub fn perspective_correct_barycentric(
    bary: Vector3<f32>,
    w0: f32,
    w1: f32,
    w2: f32,
) -> Option<Vector3<f32>> {
    if w0.abs() < EPSILON || w1.abs() < EPSILON || w2.abs() < EPSILON {
        return None;
    }

    let a = bary.x / w0;
    let b = bary.y / w1;
    let c = bary.z / w2;

    let sum = a + b + c;
    if sum.abs() < EPSILON * EPSILON {
        return None;
    }
    let inv_sum = 1.0 / sum;
    Some(Vector3::new(a * inv_sum, b * inv_sum, c * inv_sum))
}

/// Interpolates a per-vertex value that varies with 1/x in screen space
/// (NDC depth or view depth): `1 / (w0/v0 + w1/v1 + w2/v2)`.
pub fn interpolate_reciprocal(bary: Vector3<f32>, v0: f32, v1: f32, v2: f32) -> Option<f32> {
    if v0.abs() < f32::EPSILON || v1.abs() < f32::EPSILON || v2.abs() < f32::EPSILON {
        return None;
    }
    let sum = bary.x / v0 + bary.y / v1 + bary.z / v2;
    if sum.abs() < f32::EPSILON {
        return None;
    }
    Some(1.0 / sum)
}

/// Reciprocal interpolation of NDC depth, admitting vertices on the near
/// plane (z = 0).
///
/// Vertices with zero weight are ignored; a covering weight on a zero-depth
/// vertex drives the reciprocal sum to infinity, i.e. depth 0.
pub fn interpolate_depth(bary: Vector3<f32>, z0: f32, z1: f32, z2: f32) -> Option<f32> {
    let mut sum = 0.0;
    for (weight, z) in [(bary.x, z0), (bary.y, z1), (bary.z, z2)] {
        if weight <= 0.0 {
            continue;
        }
        if z <= 0.0 {
            return Some(0.0);
        }
        sum += weight / z;
    }
    if sum <= 0.0 || !sum.is_finite() {
        return if sum.is_infinite() { Some(0.0) } else { None };
    }
    Some(1.0 / sum)
}
