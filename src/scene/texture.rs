use crate::core::color::ColorRGB;
use crate::error::{RenderError, Result};
use image::RgbImage;
use log::info;
use nalgebra::{Vector2, Vector3};
use std::path::Path;

/// Represents a 2D texture map.
///
/// Immutable after construction; sampled read-only by every shading
/// invocation of a frame.
#[derive(Debug, Clone)]
pub struct Texture {
    image: RgbImage,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref).map_err(|source| RenderError::TextureLoad {
            path: path_ref.to_path_buf(),
            source,
        })?;

        let texture = Self::from_image(img.to_rgb8())?;
        info!(
            "Loaded texture: {:?} ({}x{})",
            path_ref, texture.width, texture.height
        );
        Ok(texture)
    }

    /// Wraps an already decoded image. Empty images are rejected.
    pub fn from_image(image: RgbImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidTexture(format!(
                "texture has zero size ({width}x{height})"
            )));
        }
        Ok(Self {
            image,
            width,
            height,
        })
    }

    /// Builds a texture from tightly packed RGB8 texels.
    pub fn from_rgb8(width: u32, height: u32, texels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if texels.len() != expected {
            return Err(RenderError::InvalidTexture(format!(
                "expected {expected} bytes for {width}x{height} RGB texels, got {}",
                texels.len()
            )));
        }
        let image = RgbImage::from_raw(width, height, texels).ok_or_else(|| {
            RenderError::InvalidTexture(format!("cannot build {width}x{height} image"))
        })?;
        Self::from_image(image)
    }

    /// A single-texel texture of a constant color.
    pub fn solid(color: ColorRGB) -> Self {
        let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        let image = RgbImage::from_pixel(
            1,
            1,
            image::Rgb([to_u8(color.x), to_u8(color.y), to_u8(color.z)]),
        );
        Self {
            image,
            width: 1,
            height: 1,
        }
    }

    /// Nearest-neighbour sample with repeat addressing.
    /// UV (0, 0) is the top-left texel.
    pub fn sample(&self, uv: Vector2<f32>) -> ColorRGB {
        let (x, y) = self.texel_coords(uv);
        let pixel = self.image.get_pixel(x, y);

        // Return raw [0.0, 1.0] value
        ColorRGB::new(
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        )
    }

    /// Samples a tangent-space normal, channels still in [0, 1].
    ///
    /// The shader remaps to [-1, 1] before use.
    pub fn sample_normal(&self, uv: Vector2<f32>) -> Vector3<f32> {
        self.sample(uv)
    }

    fn texel_coords(&self, uv: Vector2<f32>) -> (u32, u32) {
        // Euclidean modulo keeps negative coordinates in range
        let u = uv.x.rem_euclid(1.0);
        let v = uv.y.rem_euclid(1.0);

        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);
        (x, y)
    }
}
