use crate::core::color::ColorRGB;
use crate::core::geometry::VertexOut;
use serde::Deserialize;

/// Shader represents the programmable pixel stage of the pipeline.
///
/// The vertex stage is fixed-function (see `pipeline::vertex`); every shader
/// receives the same perspective-correct interpolated `VertexOut`.
pub trait Shader {
    /// Fragment shader stage.
    ///
    /// `fragment` has its normal, tangent and view direction renormalized,
    /// `position.z` holds the interpolated NDC depth and `position.w` the
    /// interpolated view depth.
    ///
    /// Returns a linear RGB color that may exceed 1.0; the rasterizer
    /// applies `max_to_one` before writing it to the framebuffer.
    fn fragment(&self, fragment: &VertexOut) -> ColorRGB;
}

/// What the rasterizer writes for an accepted fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Run the pixel shader.
    #[default]
    FinalColor,
    /// Grey-scale visualization of the remapped depth buffer.
    DepthBuffer,
}

impl RenderMode {
    pub const ALL: [RenderMode; 2] = [RenderMode::FinalColor, RenderMode::DepthBuffer];

    /// The next mode, wrapping after the last one.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_mode_cycles_and_wraps() {
        let mut mode = RenderMode::default();
        for k in 0..RenderMode::ALL.len() * 2 {
            assert_eq!(mode, RenderMode::ALL[k % RenderMode::ALL.len()]);
            mode = mode.next();
        }
        assert_eq!(RenderMode::DepthBuffer.next(), RenderMode::FinalColor);
    }
}
