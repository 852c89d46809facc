use crate::core::color::ColorRGB;
use nalgebra::Vector3;

/// A light source that is infinitely far away (e.g., Sun).
/// Rays are parallel.
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    /// Direction the light travels, normalized.
    pub direction: Vector3<f32>,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(direction: Vector3<f32>, intensity: f32) -> Self {
        Self {
            direction: direction.normalize(),
            intensity,
        }
    }

    /// Direction FROM the surface point TO the light source.
    pub fn direction_to_light(&self) -> Vector3<f32> {
        -self.direction
    }

    /// Cosine falloff between a surface normal and the light, clamped at zero.
    pub fn observed_area(&self, normal: &Vector3<f32>) -> f32 {
        normal.dot(&self.direction_to_light()).max(0.0)
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vector3::new(0.577, -0.577, 0.577), 7.0)
    }
}

/// Everything the pixel shader needs to know about the lighting environment.
#[derive(Debug, Clone)]
pub struct Lighting {
    pub light: DirectionalLight,
    pub ambient: ColorRGB,
    /// Lambert diffuse reflectance.
    pub kd: f32,
    /// Phong exponent at full glossiness.
    pub shininess: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            light: DirectionalLight::default(),
            ambient: ColorRGB::new(0.025, 0.025, 0.025),
            kd: 1.0,
            shininess: 25.0,
        }
    }
}
