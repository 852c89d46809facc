use crate::core::color::{ColorRGB, to_argb};

/// Depth value meaning "nothing drawn yet" (far plane in NDC depth).
pub const DEPTH_CLEAR: f32 = 1.0;

/// Represents a 2D buffer containing color and depth information.
///
/// Both buffers are frame-scoped: `clear` resets them before any pixel of
/// a new frame is touched, and only the rasterizer writes to them in between.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    color_buffer: Vec<ColorRGB>,
    /// NDC depth in [0, 1] per pixel.
    depth_buffer: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            color_buffer: vec![ColorRGB::zeros(); size],
            depth_buffer: vec![DEPTH_CLEAR; size],
        }
    }

    /// Fills the color buffer with `color` and resets depth to the sentinel.
    pub fn clear(&mut self, color: ColorRGB) {
        self.color_buffer.fill(color);
        self.depth_buffer.fill(DEPTH_CLEAR);
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Depth test and update.
    ///
    /// Passes only if `depth` lies in [0, 1] and is strictly closer than the
    /// stored value; on success the stored value is replaced. Exact ties keep
    /// whatever was drawn first.
    #[inline]
    pub fn depth_test_and_update(&mut self, x: usize, y: usize, depth: f32) -> bool {
        if !self.in_bounds(x, y) || !(0.0..=1.0).contains(&depth) {
            return false;
        }
        let idx = self.index(x, y);
        if depth >= self.depth_buffer[idx] {
            return false;
        }
        self.depth_buffer[idx] = depth;
        true
    }

    /// Pixel write. Should only be called AFTER depth_test_and_update returns true.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: ColorRGB) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.color_buffer[idx] = color;
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<ColorRGB> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.color_buffer[self.index(x, y)])
    }

    pub fn get_depth(&self, x: usize, y: usize) -> Option<f32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.depth_buffer[self.index(x, y)])
    }

    pub fn color_buffer(&self) -> &[ColorRGB] {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }

    /// Converts the frame into packed 0RGB pixels for presentation.
    pub fn to_argb_buffer(&self, buffer: &mut [u32]) {
        for (pixel, color) in buffer.iter_mut().zip(&self.color_buffer) {
            *pixel = to_argb(*color);
        }
    }
}
