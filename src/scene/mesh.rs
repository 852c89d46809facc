use crate::core::color::ColorRGB;
use crate::core::geometry::{Vertex, VertexOut};
use crate::core::primitive::{PrimitiveTopology, Triangles};
use crate::error::{RenderError, Result};
use nalgebra::{Matrix4, Point3, Vector2, Vector3};

/// A collection of vertices and indices representing a 3D object.
pub struct Mesh {
    /// List of vertices in local space.
    pub vertices: Vec<Vertex>,
    /// Index buffer, grouped into triangles according to `topology`.
    pub indices: Vec<u32>,
    pub topology: PrimitiveTopology,
    /// Local-to-world transform; may change every frame.
    pub world_matrix: Matrix4<f32>,
    /// Transformed vertices of the current frame.
    pub vertices_out: Vec<VertexOut>,
}

impl Mesh {
    /// Creates a mesh, rejecting index buffers that reference missing vertices.
    pub fn new(
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        topology: PrimitiveTopology,
    ) -> Result<Self> {
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(RenderError::InvalidMesh(format!(
                "index {bad} out of range for {} vertices",
                vertices.len()
            )));
        }
        Ok(Self {
            vertices,
            indices,
            topology,
            world_matrix: Matrix4::identity(),
            vertices_out: Vec::new(),
        })
    }

    pub fn with_world_matrix(mut self, world_matrix: Matrix4<f32>) -> Self {
        self.world_matrix = world_matrix;
        self
    }

    /// Candidate triangles in draw order.
    pub fn triangles(&self) -> Triangles<'_> {
        Triangles::new(&self.indices, self.topology)
    }

    /// A flat-colored triangle with clockwise winding as seen from -Z.
    pub fn create_test_triangle(color: ColorRGB) -> Self {
        let vertices = vec![
            Vertex::colored(Point3::new(0.0, 2.0, 0.0), color),
            Vertex::colored(Point3::new(1.5, -1.0, 0.0), color),
            Vertex::colored(Point3::new(-1.5, -1.0, 0.0), color),
        ];

        Self {
            vertices,
            indices: vec![0, 1, 2],
            topology: PrimitiveTopology::TriangleList,
            world_matrix: Matrix4::identity(),
            vertices_out: Vec::new(),
        }
    }

    /// A 3x3 vertex grid (6x6 units) encoded as a triangle strip with a
    /// degenerate restart between the two rows of quads.
    pub fn create_test_grid(topology: PrimitiveTopology) -> Self {
        let mut vertices = Vec::with_capacity(9);
        for row in 0..3 {
            for col in 0..3 {
                let position = Point3::new(-3.0 + 3.0 * col as f32, 3.0 - 3.0 * row as f32, 0.0);
                let uv = Vector2::new(0.5 * col as f32, 0.5 * row as f32);
                let color = ColorRGB::new(0.5 * col as f32, 0.5 * row as f32, 1.0);
                vertices.push(
                    Vertex::new(position, Vector3::new(0.0, 0.0, -1.0), uv)
                        .with_tangent(Vector3::x())
                        .with_color(color),
                );
            }
        }

        let indices = match topology {
            PrimitiveTopology::TriangleStrip => {
                vec![3, 0, 4, 1, 5, 2, 2, 6, 6, 3, 7, 4, 8, 5]
            }
            PrimitiveTopology::TriangleList => vec![
                3, 0, 4, 1, 4, 0, 4, 1, 5, 2, 5, 1, 6, 3, 7, 4, 7, 3, 7, 4, 8, 5, 8, 4,
            ],
        };

        Self {
            vertices,
            indices,
            topology,
            world_matrix: Matrix4::identity(),
            vertices_out: Vec::new(),
        }
    }
}
