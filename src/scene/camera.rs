use crate::core::math::transform::{TransformFactory, transform_vector};
use nalgebra::{Matrix4, Point3, Vector3};
use std::f32::consts::FRAC_PI_2;

/// Pitch is kept strictly inside (-90, 90) degrees so that
/// cross(world_up, forward) never vanishes.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Per-frame camera deltas, already integrated over the frame time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraInput {
    /// Displacement along the camera forward axis.
    pub forward: f32,
    /// Displacement along the camera right axis.
    pub right: f32,
    /// Displacement along the world up axis.
    pub up: f32,
    /// Pitch delta in radians (positive looks up).
    pub pitch: f32,
    /// Yaw delta in radians (positive turns right).
    pub yaw: f32,
}

/// First-person camera owning the View and Projection matrices.
///
/// The basis (forward, right, up) is orthonormal after every update and
/// `view_matrix` is always the inverse of `inv_view_matrix`.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Point3<f32>,

    forward: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,

    total_pitch: f32,
    total_yaw: f32,

    /// Vertical field of view in degrees.
    fov_angle: f32,
    /// tan(fov_angle / 2).
    fov: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,

    // --- Cached Matrices ---
    inv_view_matrix: Matrix4<f32>,
    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(90.0, Point3::origin(), 1.0)
    }
}

impl Camera {
    pub fn new(fov_angle_degrees: f32, origin: Point3<f32>, aspect_ratio: f32) -> Self {
        let mut cam = Self {
            origin,
            forward: Vector3::z(),
            right: Vector3::x(),
            up: Vector3::y(),
            total_pitch: 0.0,
            total_yaw: 0.0,
            fov_angle: fov_angle_degrees,
            fov: 1.0,
            aspect_ratio,
            near: 0.1,
            far: 100.0,
            inv_view_matrix: Matrix4::identity(),
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.initialize(fov_angle_degrees, origin, aspect_ratio);
        cam
    }

    /// Resets origin and field of view and rebuilds both matrices.
    pub fn initialize(&mut self, fov_angle_degrees: f32, origin: Point3<f32>, aspect_ratio: f32) {
        self.fov_angle = fov_angle_degrees;
        self.fov = (fov_angle_degrees.to_radians() / 2.0).tan();
        self.origin = origin;
        self.aspect_ratio = aspect_ratio;

        self.calculate_view_matrix();
        self.calculate_projection_matrix();
    }

    /// Rebuilds the orthonormal basis from the accumulated pitch/yaw and
    /// derives the camera-to-world matrix and its inverse.
    pub fn calculate_view_matrix(&mut self) {
        // Pitch about X first (negated: +pitch tilts the view up), then yaw about Y.
        let rotation = TransformFactory::rotation(-self.total_pitch, self.total_yaw, 0.0);
        self.forward = transform_vector(&rotation, &Vector3::z()).normalize();
        self.right = Vector3::y().cross(&self.forward).normalize();
        self.up = self.forward.cross(&self.right).normalize();

        self.inv_view_matrix =
            TransformFactory::basis(&self.right, &self.up, &self.forward, &self.origin);
        self.view_matrix = self
            .inv_view_matrix
            .try_inverse()
            .unwrap_or_else(Matrix4::identity);
    }

    /// Left-handed perspective projection from fov, aspect ratio, near and far.
    pub fn calculate_projection_matrix(&mut self) {
        self.projection_matrix =
            TransformFactory::perspective_lh(self.fov, self.aspect_ratio, self.near, self.far);
    }

    /// Applies one frame of movement and rotation, then recomputes the matrices.
    pub fn update(&mut self, input: &CameraInput) {
        self.origin += self.forward * input.forward;
        self.origin += self.right * input.right;
        self.origin += Vector3::y() * input.up;

        self.total_pitch = (self.total_pitch + input.pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.total_yaw += input.yaw;

        self.calculate_view_matrix();
        self.calculate_projection_matrix();
    }

    /// Sets absolute pitch/yaw in radians.
    pub fn set_orientation(&mut self, pitch: f32, yaw: f32) {
        self.total_pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.total_yaw = yaw;
        self.calculate_view_matrix();
    }

    /// Moves the camera without changing its orientation.
    pub fn set_origin(&mut self, origin: Point3<f32>) {
        self.origin = origin;
        self.calculate_view_matrix();
    }

    pub fn set_fov_angle(&mut self, fov_angle_degrees: f32) {
        self.fov_angle = fov_angle_degrees;
        self.fov = (fov_angle_degrees.to_radians() / 2.0).tan();
        self.calculate_projection_matrix();
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.calculate_projection_matrix();
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
        self.calculate_projection_matrix();
    }

    pub fn origin(&self) -> Point3<f32> {
        self.origin
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.forward
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn fov_angle(&self) -> f32 {
        self.fov_angle
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn inv_view_matrix(&self) -> Matrix4<f32> {
        self.inv_view_matrix
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }
}
