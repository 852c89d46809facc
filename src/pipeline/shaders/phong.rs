use crate::core::color::{ColorRGB, grey};
use crate::core::geometry::VertexOut;
use crate::core::pipeline::Shader;
use crate::scene::light::Lighting;
use crate::scene::material::Material;
use nalgebra::{Matrix3, Vector3};
use serde::Deserialize;
use std::f32::consts::PI;

/// Which lighting term the shader outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingMode {
    /// Diffuse + specular + ambient, scaled by the observed area.
    #[default]
    Combined,
    /// The cosine term only, as grey.
    ObservedArea,
    Diffuse,
    Specular,
}

impl ShadingMode {
    pub const ALL: [ShadingMode; 4] = [
        ShadingMode::Combined,
        ShadingMode::ObservedArea,
        ShadingMode::Diffuse,
        ShadingMode::Specular,
    ];

    /// The next mode, wrapping after the last one.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

// --- BRDF Helper Functions ---

/// Lambertian diffuse: `kd * cd / PI`.
#[inline]
pub fn lambert(kd: f32, cd: ColorRGB) -> ColorRGB {
    cd * (kd / PI)
}

/// Phong specular lobe.
///
/// `l` is the direction the light travels, `v` points from the surface to
/// the eye and `n` is the shading normal; all normalized.
#[inline]
pub fn phong(ks: ColorRGB, exponent: f32, l: &Vector3<f32>, v: &Vector3<f32>, n: &Vector3<f32>) -> ColorRGB {
    let reflected = l - n * (2.0 * n.dot(l));
    let cos_alpha = reflected.dot(v).max(0.0);
    ks * cos_alpha.powf(exponent)
}

/// Lambert diffuse + Phong specular shader with optional normal mapping.
pub struct PhongShader<'a> {
    pub material: &'a Material,
    pub lighting: Lighting,
    pub shading_mode: ShadingMode,
    pub use_normal_map: bool,
}

impl<'a> PhongShader<'a> {
    pub fn new(material: &'a Material, lighting: Lighting) -> Self {
        Self {
            material,
            lighting,
            shading_mode: ShadingMode::Combined,
            use_normal_map: true,
        }
    }

    /// Geometry normal, or the normal map rotated into world space.
    fn shading_normal(&self, fragment: &VertexOut) -> Vector3<f32> {
        let n = fragment.normal;
        if !self.use_normal_map || fragment.tangent.norm_squared() < 1e-6 {
            return n;
        }

        // Re-orthogonalize Tangent (Gram-Schmidt) against the interpolated normal.
        let Some(t) = (fragment.tangent - n * n.dot(&fragment.tangent)).try_normalize(1e-6) else {
            return n;
        };
        let b = n.cross(&t);
        let tbn = Matrix3::from_columns(&[t, b, n]);

        // Remap [0, 1] -> [-1, 1] before rotating into world space.
        let sampled = self.material.normal.sample_normal(fragment.texcoord);
        let tangent_space = sampled * 2.0 - Vector3::new(1.0, 1.0, 1.0);
        (tbn * tangent_space).try_normalize(1e-6).unwrap_or(n)
    }

    fn specular(&self, fragment: &VertexOut, normal: &Vector3<f32>) -> ColorRGB {
        let ks = self.material.specular.sample(fragment.texcoord);
        let exponent = self.material.glossiness.sample(fragment.texcoord).x * self.lighting.shininess;
        let to_eye = -fragment.view_direction;
        phong(ks, exponent, &self.lighting.light.direction, &to_eye, normal)
    }

    fn diffuse(&self, fragment: &VertexOut) -> ColorRGB {
        let cd = self.material.diffuse.sample(fragment.texcoord);
        lambert(self.lighting.kd, cd) * self.lighting.light.intensity
    }
}

impl Shader for PhongShader<'_> {
    fn fragment(&self, fragment: &VertexOut) -> ColorRGB {
        let normal = self.shading_normal(fragment);
        let observed_area = self.lighting.light.observed_area(&normal);

        match self.shading_mode {
            ShadingMode::Combined => {
                let diffuse = self.diffuse(fragment);
                let specular = self.specular(fragment, &normal);
                (diffuse + specular + self.lighting.ambient) * observed_area
            }
            ShadingMode::ObservedArea => grey(observed_area),
            ShadingMode::Diffuse => self.diffuse(fragment) * observed_area,
            ShadingMode::Specular => self.specular(fragment, &normal) * observed_area,
        }
    }
}
