use crate::core::color::max_to_one;
use crate::core::framebuffer::FrameBuffer;
use crate::error::{RenderError, Result};
use image::{ImageBuffer, Rgb, RgbImage};
use log::info;
use std::path::Path;

/// Converts the color buffer to an 8-bit RGB image.
///
/// Colors go through `max_to_one`, the same normalization used for display.
pub fn color_buffer_to_image(framebuffer: &FrameBuffer) -> RgbImage {
    let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    ImageBuffer::from_fn(framebuffer.width as u32, framebuffer.height as u32, |x, y| {
        let color = framebuffer
            .get_pixel(x as usize, y as usize)
            .map(max_to_one)
            .unwrap_or_default();
        Rgb([to_u8(color.x), to_u8(color.y), to_u8(color.z)])
    })
}

/// Writes the color buffer to disk; the format follows the file extension.
pub fn save_color_buffer<P: AsRef<Path>>(framebuffer: &FrameBuffer, path: P) -> Result<()> {
    let path = path.as_ref();
    color_buffer_to_image(framebuffer)
        .save(path)
        .map_err(|source| RenderError::ImageSave {
            path: path.to_path_buf(),
            source,
        })?;
    info!("Saved color buffer to '{}'", path.display());
    Ok(())
}
