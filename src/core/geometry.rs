use crate::core::color::ColorRGB;
use nalgebra::{Point3, Vector2, Vector3, Vector4};
use std::ops::{Add, Mul};

/// Represents a single vertex in mesh-local space.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    /// Position in local object space.
    pub position: Point3<f32>,
    /// Base color, used by the vertex-color shading path.
    pub color: ColorRGB,
    /// Texture coordinates (UV), origin at the top-left of the texture.
    pub texcoord: Vector2<f32>,
    /// Normal vector for lighting calculations.
    pub normal: Vector3<f32>,
    /// Tangent vector (xyz) for Normal Mapping.
    pub tangent: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, texcoord: Vector2<f32>) -> Self {
        Self {
            position,
            color: ColorRGB::new(1.0, 1.0, 1.0),
            texcoord,
            normal,
            tangent: Vector3::zeros(),
        }
    }

    /// A vertex carrying only a position and a flat color.
    pub fn colored(position: Point3<f32>, color: ColorRGB) -> Self {
        Self {
            position,
            color,
            texcoord: Vector2::zeros(),
            normal: Vector3::new(0.0, 0.0, -1.0),
            tangent: Vector3::zeros(),
        }
    }

    pub fn with_tangent(mut self, tangent: Vector3<f32>) -> Self {
        self.tangent = tangent;
        self
    }

    pub fn with_color(mut self, color: ColorRGB) -> Self {
        self.color = color;
        self
    }
}

/// A vertex after the transform stage.
///
/// `position.xyz` holds NDC coordinates (already divided by w) while
/// `position.w` keeps the pre-division clip-space w, which the rasterizer
/// needs for perspective-correct interpolation.
#[derive(Debug, Clone, Copy)]
pub struct VertexOut {
    pub position: Vector4<f32>,
    pub color: ColorRGB,
    pub texcoord: Vector2<f32>,
    /// World-space normal.
    pub normal: Vector3<f32>,
    /// World-space tangent.
    pub tangent: Vector3<f32>,
    /// World position minus camera origin; normalized only at the pixel stage.
    pub view_direction: Vector3<f32>,
}

impl VertexOut {
    /// Renormalizes the direction attributes after interpolation.
    ///
    /// A zero tangent (mesh without UVs) stays zero so shaders can detect it.
    pub fn normalize_directions(&mut self) {
        self.normal = self.normal.try_normalize(1e-12).unwrap_or(self.normal);
        self.tangent = self.tangent.try_normalize(1e-12).unwrap_or_else(Vector3::zeros);
        self.view_direction = self
            .view_direction
            .try_normalize(1e-12)
            .unwrap_or(self.view_direction);
    }
}

// Linear combination support for barycentric interpolation of the attributes.
impl Add for VertexOut {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            position: self.position + other.position,
            color: self.color + other.color,
            texcoord: self.texcoord + other.texcoord,
            normal: self.normal + other.normal,
            tangent: self.tangent + other.tangent,
            view_direction: self.view_direction + other.view_direction,
        }
    }
}

impl Mul<f32> for VertexOut {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            position: self.position * scalar,
            color: self.color * scalar,
            texcoord: self.texcoord * scalar,
            normal: self.normal * scalar,
            tangent: self.tangent * scalar,
            view_direction: self.view_direction * scalar,
        }
    }
}
