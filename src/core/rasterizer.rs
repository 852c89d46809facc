use crate::core::color::{depth_remap, grey, max_to_one};
use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::VertexOut;
use crate::core::math::interpolation::{
    barycentric_coordinates, interpolate_depth, interpolate_reciprocal, is_inside_triangle,
    perspective_correct_barycentric, signed_area,
};
use crate::core::math::transform::ndc_to_screen;
use crate::core::pipeline::{RenderMode, Shader};
use crate::core::primitive::is_degenerate;
use nalgebra::{Point2, Vector4};
use serde::Deserialize;

/// Triangles with a smaller doubled screen-space area are never rasterized.
const MIN_AREA: f32 = 1e-6;

/// The Rasterizer is responsible for drawing triangles onto the FrameBuffer.
pub struct Rasterizer {
    pub cull_mode: CullMode,
    pub render_mode: RenderMode,
    /// Reference depths mapped to black and white in `RenderMode::DepthBuffer`.
    pub depth_remap: (f32, f32),
}

/// Which screen-space winding is discarded.
///
/// Front-facing triangles have a positive signed area in screen space
/// (clockwise in the left-handed world as seen by the camera).
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CullMode {
    #[default]
    Back,
    Front,
    None,
}

/// Why a triangle produced no fragments, or that it was rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleOutcome {
    Rasterized { fragments: usize },
    Degenerate,
    OutsideFrustum,
    Culled,
    ZeroArea,
}

/// Per-frame counters, accumulated over every triangle submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterStats {
    pub triangles: usize,
    pub degenerate: usize,
    pub outside_frustum: usize,
    pub culled: usize,
    pub zero_area: usize,
    pub fragments: usize,
}

impl RasterStats {
    pub fn record(&mut self, outcome: TriangleOutcome) {
        self.triangles += 1;
        match outcome {
            TriangleOutcome::Rasterized { fragments } => self.fragments += fragments,
            TriangleOutcome::Degenerate => self.degenerate += 1,
            TriangleOutcome::OutsideFrustum => self.outside_frustum += 1,
            TriangleOutcome::Culled => self.culled += 1,
            TriangleOutcome::ZeroArea => self.zero_area += 1,
        }
    }

    pub fn merge(&mut self, other: &RasterStats) {
        self.triangles += other.triangles;
        self.degenerate += other.degenerate;
        self.outside_frustum += other.outside_frustum;
        self.culled += other.culled;
        self.zero_area += other.zero_area;
        self.fragments += other.fragments;
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Conservative per-vertex view-volume test on a post-divide position.
///
/// This never clips: a triangle with one vertex outside is dropped whole.
#[inline]
pub fn is_vertex_in_frustum(position: &Vector4<f32>) -> bool {
    position.w > 0.0
        && (-1.0..=1.0).contains(&position.x)
        && (-1.0..=1.0).contains(&position.y)
        && (0.0..=1.0).contains(&position.z)
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            cull_mode: CullMode::Back,
            render_mode: RenderMode::FinalColor,
            depth_remap: (0.997, 1.0),
        }
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull_mode = mode;
    }

    /// Rasterize one indexed triangle of `vertices`.
    ///
    /// `indices` must be valid for `vertices`; `Mesh` guarantees this.
    pub fn rasterize_indexed<S: Shader>(
        &self,
        framebuffer: &mut FrameBuffer,
        shader: &S,
        vertices: &[VertexOut],
        indices: [u32; 3],
    ) -> TriangleOutcome {
        if is_degenerate(&indices) {
            return TriangleOutcome::Degenerate;
        }
        let triangle = [
            &vertices[indices[0] as usize],
            &vertices[indices[1] as usize],
            &vertices[indices[2] as usize],
        ];
        self.rasterize_triangle(framebuffer, shader, triangle)
    }

    /// Rasterize a single triangle of transformed vertices.
    ///
    /// Performs the frustum test, viewport transform, culling, bounding-box
    /// traversal, perspective-correct interpolation, depth test and shading.
    pub fn rasterize_triangle<S: Shader>(
        &self,
        framebuffer: &mut FrameBuffer,
        shader: &S,
        triangle: [&VertexOut; 3],
    ) -> TriangleOutcome {
        if !triangle.iter().all(|v| is_vertex_in_frustum(&v.position)) {
            return TriangleOutcome::OutsideFrustum;
        }

        let width = framebuffer.width as f32;
        let height = framebuffer.height as f32;

        // 1. Viewport Transform
        let screen_coords =
            triangle.map(|v| ndc_to_screen(v.position.x, v.position.y, width, height));

        // 2. Zero-area guard and Backface Culling
        let area = signed_area(screen_coords[0], screen_coords[1], screen_coords[2]);
        if area.abs() < MIN_AREA {
            return TriangleOutcome::ZeroArea;
        }
        match self.cull_mode {
            CullMode::Back if area < 0.0 => return TriangleOutcome::Culled,
            CullMode::Front if area > 0.0 => return TriangleOutcome::Culled,
            _ => {}
        }

        // 3. Compute Bounding Box, clamped to [0, width] x [0, height]
        let (start_x, start_y, end_x, end_y) =
            Self::compute_bounding_box(&screen_coords, framebuffer.width, framebuffer.height);

        let ndc_depths = triangle.map(|v| v.position.z);
        let view_depths = triangle.map(|v| v.position.w);

        // 4. Pixel Loop
        let mut fragments = 0;
        for y in start_y..end_y {
            for x in start_x..end_x {
                let pixel_center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);

                let Some(bary) = barycentric_coordinates(
                    pixel_center,
                    screen_coords[0],
                    screen_coords[1],
                    screen_coords[2],
                ) else {
                    continue;
                };
                if !is_inside_triangle(bary) {
                    continue;
                }

                let Some(depth) =
                    interpolate_depth(bary, ndc_depths[0], ndc_depths[1], ndc_depths[2])
                else {
                    continue;
                };

                if !framebuffer.depth_test_and_update(x, y, depth) {
                    continue;
                }

                let color = match self.render_mode {
                    RenderMode::FinalColor => {
                        let Some(fragment) =
                            Self::interpolate_fragment(triangle, bary, depth, view_depths)
                        else {
                            continue;
                        };
                        max_to_one(shader.fragment(&fragment))
                    }
                    RenderMode::DepthBuffer => {
                        let (min, max) = self.depth_remap;
                        grey(depth_remap(depth, min, max))
                    }
                };

                framebuffer.set_pixel(x, y, color);
                fragments += 1;
            }
        }

        TriangleOutcome::Rasterized { fragments }
    }

    /// Perspective-correct interpolation of every vertex attribute.
    fn interpolate_fragment(
        triangle: [&VertexOut; 3],
        bary: nalgebra::Vector3<f32>,
        depth: f32,
        view_depths: [f32; 3],
    ) -> Option<VertexOut> {
        let corrected =
            perspective_correct_barycentric(bary, view_depths[0], view_depths[1], view_depths[2])?;
        let view_depth = interpolate_reciprocal(bary, view_depths[0], view_depths[1], view_depths[2])?;

        let mut fragment = *triangle[0] * corrected.x
            + *triangle[1] * corrected.y
            + *triangle[2] * corrected.z;
        fragment.position.z = depth;
        fragment.position.w = view_depth;
        fragment.normalize_directions();
        Some(fragment)
    }

    /// Returns `(start_x, start_y, end_x, end_y)` with exclusive ends.
    fn compute_bounding_box(
        points: &[Point2<f32>; 3],
        width: usize,
        height: usize,
    ) -> (usize, usize, usize, usize) {
        let min_x = points[0].x.min(points[1].x).min(points[2].x);
        let min_y = points[0].y.min(points[1].y).min(points[2].y);
        let max_x = points[0].x.max(points[1].x).max(points[2].x);
        let max_y = points[0].y.max(points[1].y).max(points[2].y);

        let clamp = |v: f32, limit: usize| v.clamp(0.0, limit as f32);
        (
            clamp(min_x, width).floor() as usize,
            clamp(min_y, height).floor() as usize,
            clamp(max_x, width).ceil() as usize,
            clamp(max_y, height).ceil() as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::ColorRGB;
    use nalgebra::{Vector2, Vector3};

    struct Flat(ColorRGB);

    impl Shader for Flat {
        fn fragment(&self, _fragment: &VertexOut) -> ColorRGB {
            self.0
        }
    }

    /// Records the UV the rasterizer hands to the shader.
    struct UvProbe(std::cell::Cell<Option<Vector2<f32>>>);

    impl Shader for UvProbe {
        fn fragment(&self, fragment: &VertexOut) -> ColorRGB {
            self.0.set(Some(fragment.texcoord));
            ColorRGB::zeros()
        }
    }

    fn vertex(x: f32, y: f32, z: f32, w: f32) -> VertexOut {
        VertexOut {
            position: Vector4::new(x, y, z, w),
            color: ColorRGB::new(1.0, 1.0, 1.0),
            texcoord: Vector2::zeros(),
            normal: Vector3::new(0.0, 0.0, -1.0),
            tangent: Vector3::x(),
            view_direction: Vector3::z(),
        }
    }

    fn front_facing(z: f32) -> [VertexOut; 3] {
        [
            vertex(0.0, 0.8, z, 1.0),
            vertex(0.8, -0.8, z, 1.0),
            vertex(-0.8, -0.8, z, 1.0),
        ]
    }

    fn count_color(fb: &FrameBuffer, color: ColorRGB) -> usize {
        fb.color_buffer().iter().filter(|c| **c == color).count()
    }

    #[test]
    fn rasterizes_front_facing_triangle() {
        let mut fb = FrameBuffer::new(20, 20);
        let red = ColorRGB::new(1.0, 0.0, 0.0);
        let tri = front_facing(0.5);

        let outcome = Rasterizer::new().rasterize_triangle(&mut fb, &Flat(red), [&tri[0], &tri[1], &tri[2]]);
        let TriangleOutcome::Rasterized { fragments } = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };
        assert!(fragments > 0);
        assert_eq!(fragments, count_color(&fb, red));
        assert_eq!(fb.get_pixel(10, 10), Some(red));
        assert_eq!(fb.get_pixel(0, 0), Some(ColorRGB::zeros()));
    }

    #[test]
    fn back_facing_triangle_is_culled_unless_disabled() {
        let mut fb = FrameBuffer::new(20, 20);
        let tri = front_facing(0.5);
        let reversed = [&tri[0], &tri[2], &tri[1]];
        let mut rasterizer = Rasterizer::new();

        let outcome = rasterizer.rasterize_triangle(&mut fb, &Flat(ColorRGB::x()), reversed);
        assert_eq!(outcome, TriangleOutcome::Culled);

        rasterizer.set_cull_mode(CullMode::None);
        let outcome = rasterizer.rasterize_triangle(&mut fb, &Flat(ColorRGB::x()), reversed);
        assert!(matches!(outcome, TriangleOutcome::Rasterized { fragments } if fragments > 0));
    }

    #[test]
    fn vertex_outside_frustum_drops_whole_triangle() {
        let mut fb = FrameBuffer::new(20, 20);
        let mut tri = front_facing(0.5);
        tri[1].position.x = 1.5;
        let outcome = Rasterizer::new().rasterize_triangle(&mut fb, &Flat(ColorRGB::x()), [&tri[0], &tri[1], &tri[2]]);
        assert_eq!(outcome, TriangleOutcome::OutsideFrustum);
        assert_eq!(count_color(&fb, ColorRGB::x()), 0);

        let mut behind = front_facing(0.5);
        behind[0].position.z = -0.1;
        let outcome = Rasterizer::new().rasterize_triangle(&mut fb, &Flat(ColorRGB::x()), [&behind[0], &behind[1], &behind[2]]);
        assert_eq!(outcome, TriangleOutcome::OutsideFrustum);
    }

    #[test]
    fn vertex_on_near_plane_is_inside_the_volume() {
        assert!(is_vertex_in_frustum(&Vector4::new(0.0, 0.0, 0.0, 0.1)));
        assert!(!is_vertex_in_frustum(&Vector4::new(0.0, 0.0, -1e-4, 0.1)));

        let mut fb = FrameBuffer::new(20, 20);
        let mut tri = front_facing(0.5);
        tri[2].position.z = 0.0;
        let outcome = Rasterizer::new().rasterize_triangle(&mut fb, &Flat(ColorRGB::x()), [&tri[0], &tri[1], &tri[2]]);
        assert!(matches!(outcome, TriangleOutcome::Rasterized { fragments } if fragments > 0));
        assert_eq!(fb.get_pixel(10, 10), Some(ColorRGB::x()));
        assert_eq!(fb.get_depth(10, 10), Some(0.0));
    }

    #[test]
    fn shaded_colors_are_normalized_before_storage() {
        let mut fb = FrameBuffer::new(20, 20);
        let tri = front_facing(0.5);
        let overbright = ColorRGB::new(4.0, 2.0, 0.0);
        Rasterizer::new().rasterize_triangle(&mut fb, &Flat(overbright), [&tri[0], &tri[1], &tri[2]]);
        assert_eq!(fb.get_pixel(10, 10), Some(ColorRGB::new(1.0, 0.5, 0.0)));
    }

    #[test]
    fn degenerate_and_collinear_triangles_are_skipped() {
        let mut fb = FrameBuffer::new(20, 20);
        let tri = front_facing(0.5);
        let rasterizer = Rasterizer::new();
        assert_eq!(
            rasterizer.rasterize_indexed(&mut fb, &Flat(ColorRGB::x()), &tri, [0, 1, 1]),
            TriangleOutcome::Degenerate
        );

        let line = [vertex(-0.5, -0.5, 0.5, 1.0), vertex(0.0, 0.0, 0.5, 1.0), vertex(0.5, 0.5, 0.5, 1.0)];
        assert_eq!(
            rasterizer.rasterize_triangle(&mut fb, &Flat(ColorRGB::x()), [&line[0], &line[1], &line[2]]),
            TriangleOutcome::ZeroArea
        );
    }

    #[test]
    fn nearer_triangle_wins_regardless_of_order() {
        let near = front_facing(0.3);
        let far = front_facing(0.6);
        let red = ColorRGB::new(1.0, 0.0, 0.0);
        let blue = ColorRGB::new(0.0, 0.0, 1.0);
        let rasterizer = Rasterizer::new();

        for near_first in [true, false] {
            let mut fb = FrameBuffer::new(20, 20);
            let draws: [(&[VertexOut; 3], ColorRGB); 2] = if near_first {
                [(&near, red), (&far, blue)]
            } else {
                [(&far, blue), (&near, red)]
            };
            for (tri, color) in draws {
                rasterizer.rasterize_triangle(&mut fb, &Flat(color), [&tri[0], &tri[1], &tri[2]]);
            }
            assert_eq!(fb.get_pixel(10, 10), Some(red));
            assert_eq!(count_color(&fb, blue), 0);
        }
    }

    #[test]
    fn exact_depth_tie_keeps_first_triangle() {
        let tri = front_facing(0.5);
        let rasterizer = Rasterizer::new();
        let mut fb = FrameBuffer::new(20, 20);
        let first = ColorRGB::new(0.0, 1.0, 0.0);
        rasterizer.rasterize_triangle(&mut fb, &Flat(first), [&tri[0], &tri[1], &tri[2]]);
        let outcome =
            rasterizer.rasterize_triangle(&mut fb, &Flat(ColorRGB::x()), [&tri[0], &tri[1], &tri[2]]);
        assert_eq!(outcome, TriangleOutcome::Rasterized { fragments: 0 });
        assert_eq!(fb.get_pixel(10, 10), Some(first));
    }

    #[test]
    fn uv_interpolation_is_perspective_correct() {
        // Right triangle covering the lower-left half of a 2x2 NDC square
        // with vertex depth growing from 1 to 4.
        let mut a = vertex(-1.0, 1.0, 0.5, 1.0);
        let mut b = vertex(1.0, -1.0, 0.5, 4.0);
        let mut c = vertex(-1.0, -1.0, 0.5, 4.0);
        a.texcoord = Vector2::new(0.0, 0.0);
        b.texcoord = Vector2::new(1.0, 1.0);
        c.texcoord = Vector2::new(0.0, 1.0);

        let mut rasterizer = Rasterizer::new();
        rasterizer.set_cull_mode(CullMode::None);
        let probe = UvProbe(std::cell::Cell::new(None));

        // A single-pixel framebuffer samples exactly at NDC (0, 0), where the
        // screen-space weights are (0.5, 0.5, 0.0).
        let mut fb = FrameBuffer::new(1, 1);
        rasterizer.rasterize_triangle(&mut fb, &probe, [&a, &b, &c]);
        let uv = probe.0.get().expect("pixel should be shaded");

        // Linear interpolation would give (0.5, 0.5); with w = (1, 4) the
        // near vertex dominates: weights (0.8, 0.2, 0.0).
        assert!((uv.x - 0.2).abs() < 1e-4);
        assert!((uv.y - 0.2).abs() < 1e-4);
        assert!((uv.x - 0.5).abs() > 0.25);
    }

    #[test]
    fn depth_mode_writes_remapped_grey() {
        let mut rasterizer = Rasterizer::new();
        rasterizer.render_mode = RenderMode::DepthBuffer;
        rasterizer.depth_remap = (0.0, 1.0);
        let tri = front_facing(0.25);
        let mut fb = FrameBuffer::new(20, 20);
        rasterizer.rasterize_triangle(&mut fb, &Flat(ColorRGB::x()), [&tri[0], &tri[1], &tri[2]]);
        let c = fb.get_pixel(10, 10).unwrap();
        assert!((c.x - 0.25).abs() < 1e-5 && c.x == c.y && c.y == c.z);
    }

    #[test]
    fn stats_accumulate_outcomes() {
        let mut stats = RasterStats::default();
        stats.record(TriangleOutcome::Degenerate);
        stats.record(TriangleOutcome::Rasterized { fragments: 7 });
        stats.record(TriangleOutcome::Culled);
        assert_eq!(stats.triangles, 3);
        assert_eq!(stats.fragments, 7);
        assert_eq!(stats.degenerate, 1);
        assert_eq!(stats.culled, 1);
    }
}
