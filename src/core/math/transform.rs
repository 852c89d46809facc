use nalgebra::{Matrix4, Point2, Point3, Vector3, Vector4};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for creating various transformation matrices.
///
/// All matrices are Left-Handed (+Z points into the screen) and use the
/// column-vector convention, so a world-view-projection chain is written
/// `projection * view * world`.
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Creates a rotation matrix around the X-axis.
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Y-axis.
    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Z-axis.
    pub fn rotation_z(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,  -s,   0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Euler rotation applied X first, then Y, then Z (angles in radians).
    pub fn rotation(pitch: f32, yaw: f32, roll: f32) -> Matrix4<f32> {
        Self::rotation_z(roll) * Self::rotation_y(yaw) * Self::rotation_x(pitch)
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a non-uniform scaling matrix.
    pub fn scaling_nonuniform(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            scale.x, 0.0,     0.0,     0.0,
            0.0,     scale.y, 0.0,     0.0,
            0.0,     0.0,     scale.z, 0.0,
            0.0,     0.0,     0.0,     1.0,
        )
    }

    /// Camera-to-world matrix from an orthonormal basis and an origin.
    pub fn basis(
        right: &Vector3<f32>,
        up: &Vector3<f32>,
        forward: &Vector3<f32>,
        origin: &Point3<f32>,
    ) -> Matrix4<f32> {
        Matrix4::new(
            right.x, up.x, forward.x, origin.x,
            right.y, up.y, forward.y, origin.y,
            right.z, up.z, forward.z, origin.z,
            0.0,     0.0,  0.0,       1.0,
        )
    }

    /// Creates a Perspective Projection matrix (Left-Handed).
    ///
    /// `fov` is the tangent of half the vertical field of view. Maps the
    /// view frustum to x, y in [-1, 1] and z in [0, 1]; w receives view depth.
    pub fn perspective_lh(fov: f32, aspect_ratio: f32, near: f32, far: f32) -> Matrix4<f32> {
        let x_scale = 1.0 / (aspect_ratio * fov);
        let y_scale = 1.0 / fov;
        let range = far / (far - near);

        Matrix4::new(
            x_scale, 0.0,     0.0,   0.0,
            0.0,     y_scale, 0.0,   0.0,
            0.0,     0.0,     range, -near * range,
            0.0,     0.0,     1.0,   0.0,
        )
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Performs perspective division on xyz and keeps the original w.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>) -> Vector4<f32> {
    let w = clip.w;
    if w.abs() > 1e-6 {
        let inv_w = 1.0 / w;
        Vector4::new(clip.x * inv_w, clip.y * inv_w, clip.z * inv_w, w)
    } else {
        // Lands outside the frustum test, so the triangle is dropped.
        Vector4::new(f32::INFINITY, f32::INFINITY, f32::INFINITY, w)
    }
}

/// Converts NDC coordinates to Screen coordinates (Viewport Transform).
/// Note: Y-axis is flipped (NDC +Y is up, Screen +Y is down).
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> Point2<f32> {
    Point2::new((ndc_x + 1.0) * 0.5 * width, (1.0 - ndc_y) * 0.5 * height)
}

/// Transforms a direction by the upper 3x3 of `matrix` (no translation).
#[inline]
pub fn transform_vector(matrix: &Matrix4<f32>, v: &Vector3<f32>) -> Vector3<f32> {
    matrix.fixed_view::<3, 3>(0, 0) * v
}

/// Transforms a point by `matrix`, dropping the homogeneous w.
#[inline]
pub fn transform_point(matrix: &Matrix4<f32>, p: &Point3<f32>) -> Point3<f32> {
    let h = matrix * p.to_homogeneous();
    Point3::new(h.x, h.y, h.z)
}
