use crate::scene::texture::Texture;
use std::path::Path;

/// The texture set read by the Lambert/Phong shader.
///
/// Every map is required: a material only exists once all four textures
/// loaded, so shading never samples a missing texture.
#[derive(Debug, Clone)]
pub struct Material {
    /// Diffuse albedo.
    pub diffuse: Texture,
    /// Tangent-space normal map, channels in [0, 1].
    pub normal: Texture,
    /// Specular reflectance.
    pub specular: Texture,
    /// Glossiness; the red channel scales the Phong exponent.
    pub glossiness: Texture,
}

/// File locations of the four maps of a `Material`.
#[derive(Debug, Clone)]
pub struct MaterialPaths<'a> {
    pub diffuse: &'a Path,
    pub normal: &'a Path,
    pub specular: &'a Path,
    pub glossiness: &'a Path,
}

impl Material {
    pub fn new(diffuse: Texture, normal: Texture, specular: Texture, glossiness: Texture) -> Self {
        Self {
            diffuse,
            normal,
            specular,
            glossiness,
        }
    }

    /// Loads all four maps, failing on the first one that cannot be read.
    pub fn load(paths: &MaterialPaths<'_>) -> crate::error::Result<Self> {
        Ok(Self {
            diffuse: Texture::load(paths.diffuse)?,
            normal: Texture::load(paths.normal)?,
            specular: Texture::load(paths.specular)?,
            glossiness: Texture::load(paths.glossiness)?,
        })
    }
}
