use crate::core::geometry::{Vertex, VertexOut};
use crate::core::math::transform::{apply_perspective_division, transform_point, transform_vector};
use crate::scene::camera::Camera;
use crate::scene::mesh::Mesh;
use nalgebra::{Matrix4, Point3};

/// Transforms a single vertex to NDC and carries its shading attributes.
///
/// Normals and tangents only see the world matrix (they are directions);
/// the view direction is left un-normalized until the pixel stage.
#[inline]
pub fn transform_vertex(
    vertex: &Vertex,
    world: &Matrix4<f32>,
    world_view_projection: &Matrix4<f32>,
    camera_origin: &Point3<f32>,
) -> VertexOut {
    let clip = world_view_projection * vertex.position.to_homogeneous();
    let world_position = transform_point(world, &vertex.position);

    VertexOut {
        position: apply_perspective_division(&clip),
        color: vertex.color,
        texcoord: vertex.texcoord,
        normal: transform_vector(world, &vertex.normal),
        tangent: transform_vector(world, &vertex.tangent),
        view_direction: world_position - *camera_origin,
    }
}

/// Rebuilds `mesh.vertices_out` for the current camera.
pub fn transform_mesh(mesh: &mut Mesh, camera: &Camera) {
    let world = mesh.world_matrix;
    let camera_origin = camera.origin();
    // world -> view -> projection, written right-to-left for column vectors.
    let world_view_projection = camera.projection_matrix() * camera.view_matrix() * world;

    mesh.vertices_out.clear();
    mesh.vertices_out.reserve(mesh.vertices.len());
    mesh.vertices_out.extend(
        mesh.vertices
            .iter()
            .map(|v| transform_vertex(v, &world, &world_view_projection, &camera_origin)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::ColorRGB;
    use crate::core::math::transform::TransformFactory;
    use crate::core::primitive::PrimitiveTopology;
    use nalgebra::{Vector2, Vector3};

    #[test]
    fn vertex_on_axis_lands_at_screen_center() {
        let camera = Camera::new(90.0, Point3::origin(), 1.0);
        let mut mesh = Mesh::new(
            vec![Vertex::colored(Point3::new(0.0, 0.0, 10.0), ColorRGB::x())],
            vec![],
            PrimitiveTopology::TriangleList,
        )
        .unwrap();

        transform_mesh(&mut mesh, &camera);
        let out = &mesh.vertices_out[0];
        assert!(out.position.x.abs() < 1e-6);
        assert!(out.position.y.abs() < 1e-6);
        assert!(out.position.z > 0.0 && out.position.z < 1.0);
        // w keeps the view depth for perspective correction.
        assert!((out.position.w - 10.0).abs() < 1e-4);
    }

    #[test]
    fn x_and_y_are_divided_by_depth() {
        let camera = Camera::new(90.0, Point3::origin(), 1.0);
        let world = Matrix4::identity();
        let wvp = camera.projection_matrix() * camera.view_matrix() * world;

        let near = transform_vertex(
            &Vertex::colored(Point3::new(1.0, 1.0, 2.0), ColorRGB::x()),
            &world,
            &wvp,
            &camera.origin(),
        );
        let far = transform_vertex(
            &Vertex::colored(Point3::new(1.0, 1.0, 4.0), ColorRGB::x()),
            &world,
            &wvp,
            &camera.origin(),
        );
        assert!((near.position.x - 0.5).abs() < 1e-5);
        assert!((far.position.x - 0.25).abs() < 1e-5);
        assert!(far.position.z > near.position.z);
    }

    #[test]
    fn directions_use_world_matrix_only() {
        let camera = Camera::new(45.0, Point3::new(0.0, 0.0, -5.0), 1.0);
        let world = TransformFactory::translation(&Vector3::new(0.0, 0.0, 5.0))
            * TransformFactory::rotation_y(std::f32::consts::FRAC_PI_2);
        let wvp = camera.projection_matrix() * camera.view_matrix() * world;

        let vertex = Vertex::new(Point3::origin(), Vector3::new(0.0, 0.0, -1.0), Vector2::zeros())
            .with_tangent(Vector3::x());
        let out = transform_vertex(&vertex, &world, &wvp, &camera.origin());

        assert!((out.normal - Vector3::new(-1.0, 0.0, 0.0)).norm() < 1e-5);
        assert!((out.tangent - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-5);
        // World position (0,0,5) seen from (0,0,-5).
        assert!((out.view_direction - Vector3::new(0.0, 0.0, 10.0)).norm() < 1e-5);
    }

    #[test]
    fn vertices_out_is_rebuilt_each_frame() {
        let camera = Camera::default();
        let mut mesh = Mesh::create_test_triangle(ColorRGB::x());
        transform_mesh(&mut mesh, &camera);
        transform_mesh(&mut mesh, &camera);
        assert_eq!(mesh.vertices_out.len(), mesh.vertices.len());
    }
}
