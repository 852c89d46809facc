use crate::core::color::ColorRGB;
use crate::core::geometry::VertexOut;
use crate::core::pipeline::Shader;

/// Outputs the interpolated vertex color with no lighting.
/// Useful for debugging geometry and the rasterization pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlitShader;

impl Shader for UnlitShader {
    fn fragment(&self, fragment: &VertexOut) -> ColorRGB {
        fragment.color
    }
}
