use nalgebra::Vector3;

/// Linear RGB color with non-negative channels.
pub type ColorRGB = Vector3<f32>;

/// Normalizes a color so that no channel exceeds 1.0.
///
/// When the largest channel is above one every channel is divided by it,
/// which keeps the hue instead of clipping channels independently.
pub fn max_to_one(color: ColorRGB) -> ColorRGB {
    let max = color.x.max(color.y).max(color.z);
    if max > 1.0 { color / max } else { color }
}

/// Packs a color into a 0RGB `u32` after `max_to_one` normalization.
pub fn to_argb(color: ColorRGB) -> u32 {
    let c = max_to_one(color);
    let r = (c.x.clamp(0.0, 1.0) * 255.0) as u32;
    let g = (c.y.clamp(0.0, 1.0) * 255.0) as u32;
    let b = (c.z.clamp(0.0, 1.0) * 255.0) as u32;

    (255 << 24) | (r << 16) | (g << 8) | b
}

/// Linearly remaps `depth` from `[min, max]` to `[0, 1]`, clamped.
///
/// NDC depth bunches up close to 1.0, so a narrow reference window is
/// needed to make the depth buffer visible.
pub fn depth_remap(depth: f32, min: f32, max: f32) -> f32 {
    let range = max - min;
    if range.abs() <= f32::EPSILON {
        return if depth >= max { 1.0 } else { 0.0 };
    }
    ((depth - min) / range).clamp(0.0, 1.0)
}

/// Builds a grey color from a single intensity.
#[inline]
pub fn grey(value: f32) -> ColorRGB {
    ColorRGB::new(value, value, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_to_one_preserves_hue() {
        let c = max_to_one(ColorRGB::new(2.0, 1.0, 0.5));
        assert!((c.x - 1.0).abs() < 1e-6);
        assert!((c.y - 0.5).abs() < 1e-6);
        assert!((c.z - 0.25).abs() < 1e-6);
    }

    #[test]
    fn max_to_one_leaves_in_range_colors() {
        let c = ColorRGB::new(0.2, 0.9, 1.0);
        assert_eq!(max_to_one(c), c);
    }

    #[test]
    fn argb_packing() {
        assert_eq!(to_argb(ColorRGB::new(1.0, 0.0, 0.0)), 0xFFFF0000);
        assert_eq!(to_argb(ColorRGB::new(0.0, 0.0, 0.0)), 0xFF000000);
        // Over-bright blue is normalized, not clipped per channel.
        assert_eq!(to_argb(ColorRGB::new(0.0, 1.0, 2.0)), 0xFF007FFF);
    }

    #[test]
    fn depth_remap_window() {
        assert_eq!(depth_remap(0.5, 0.997, 1.0), 0.0);
        assert_eq!(depth_remap(1.0, 0.997, 1.0), 1.0);
        assert!((depth_remap(0.9985, 0.997, 1.0) - 0.5).abs() < 1e-3);
    }
}
