use crate::core::color::ColorRGB;
use crate::core::framebuffer::FrameBuffer;
use crate::core::pipeline::Shader;
use crate::core::rasterizer::{RasterStats, Rasterizer};
use crate::pipeline::vertex::transform_mesh;
use crate::scene::camera::Camera;
use crate::scene::mesh::Mesh;
use log::debug;

/// The high-level renderer that orchestrates the pipeline stages.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
    /// Color every pixel starts the frame with.
    pub background: ColorRGB,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height),
            background: ColorRGB::new(0.39, 0.39, 0.39),
        }
    }

    /// Resets color to the background and depth to the far sentinel.
    pub fn clear(&mut self) {
        self.framebuffer.clear(self.background);
    }

    /// Renders one complete frame: clear, then draw every mesh in order.
    pub fn render_frame<S: Shader>(
        &mut self,
        meshes: &mut [Mesh],
        camera: &Camera,
        shader: &S,
    ) -> RasterStats {
        self.clear();

        let mut stats = RasterStats::default();
        for mesh in meshes.iter_mut() {
            stats.merge(&self.draw_mesh(mesh, camera, shader));
        }

        debug!(
            "frame: {} triangles ({} degenerate, {} outside frustum, {} culled, {} zero area), {} fragments",
            stats.triangles,
            stats.degenerate,
            stats.outside_frustum,
            stats.culled,
            stats.zero_area,
            stats.fragments
        );
        stats
    }

    /// Transforms a mesh for `camera` and rasterizes its triangles.
    ///
    /// Does not clear; several meshes share one depth buffer.
    pub fn draw_mesh<S: Shader>(&mut self, mesh: &mut Mesh, camera: &Camera, shader: &S) -> RasterStats {
        // 1. Vertex Processing
        transform_mesh(mesh, camera);

        // 2. Primitive Assembly & Rasterization
        let mut stats = RasterStats::default();
        for triangle in mesh.triangles() {
            let outcome = self.rasterizer.rasterize_indexed(
                &mut self.framebuffer,
                shader,
                &mesh.vertices_out,
                triangle,
            );
            stats.record(outcome);
        }
        stats
    }

    /// The final color buffer packed as 0xAARRGGBB, row-major.
    pub fn to_argb(&self) -> Vec<u32> {
        let mut buffer = vec![0; self.framebuffer.width * self.framebuffer.height];
        self.framebuffer.to_argb_buffer(&mut buffer);
        buffer
    }
}
