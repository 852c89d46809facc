use crate::core::geometry::Vertex;
use crate::core::primitive::PrimitiveTopology;
use crate::error::{RenderError, Result};
use crate::scene::mesh::Mesh;
use log::{info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::path::Path;

/// Loads an OBJ file and returns a single triangle-list Mesh.
///
/// OBJ files are right-handed with the texture origin at the bottom-left.
/// Z is mirrored into the left-handed world (and the winding reversed to
/// match), V is flipped, and tangents are generated from the UVs.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    info!("Loading OBJ file: {}", path.display());

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true, // Unifies indices for Position/Normal/UV
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };

    let (models, _materials) =
        tobj::load_obj(path, &load_options).map_err(|e| RenderError::MeshLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut missing_normals = false;
    let mut has_any_texcoords = false;

    // Sub-meshes are merged; their indices are offset past earlier vertices.
    for model in models {
        let mesh = &model.mesh;
        let index_offset = vertices.len() as u32;
        let num_vertices = mesh.positions.len() / 3;

        let has_normals = mesh.normals.len() == mesh.positions.len();
        let has_texcoords = mesh.texcoords.len() / 2 == num_vertices;
        if !has_normals {
            warn!("Mesh '{}' has no normals; generating them from faces.", model.name);
            missing_normals = true;
        }
        if !has_texcoords {
            warn!("Mesh '{}' has no texture coordinates; tangents will be zero.", model.name);
        }
        has_any_texcoords |= has_texcoords;

        for i in 0..num_vertices {
            let position = Point3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                -mesh.positions[i * 3 + 2],
            );
            let normal = if has_normals {
                Vector3::new(
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    -mesh.normals[i * 3 + 2],
                )
            } else {
                Vector3::zeros()
            };
            let texcoord = if has_texcoords {
                Vector2::new(mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };
            vertices.push(Vertex::new(position, normal, texcoord));
        }

        // Mirroring Z flips handedness, so swap two corners of every face.
        for face in mesh.indices.chunks_exact(3) {
            indices.extend_from_slice(&[
                face[0] + index_offset,
                face[2] + index_offset,
                face[1] + index_offset,
            ]);
        }
    }

    if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
        return Err(RenderError::MeshLoad {
            path: path.to_path_buf(),
            reason: format!("face index {bad} out of range"),
        });
    }

    if missing_normals {
        compute_face_normals(&mut vertices, &indices);
    }
    if has_any_texcoords {
        compute_tangents(&mut vertices, &indices);
    }

    info!(
        "OBJ loaded successfully. Total vertices: {}, Total indices: {}",
        vertices.len(),
        indices.len()
    );

    Mesh::new(vertices, indices, PrimitiveTopology::TriangleList)
}

/// Fills zero normals with the average of the adjacent face normals.
///
/// Faces are front-facing when clockwise, so `cross(b - a, c - a)` points
/// towards the viewer.
pub fn compute_face_normals(vertices: &mut [Vertex], indices: &[u32]) {
    let mut accumulated = vec![Vector3::zeros(); vertices.len()];
    for face in indices.chunks_exact(3) {
        let [a, b, c] = [face[0] as usize, face[1] as usize, face[2] as usize];
        let (p0, p1, p2) = (vertices[a].position, vertices[b].position, vertices[c].position);
        // Unnormalized: larger faces weigh more.
        let n = (p1 - p0).cross(&(p2 - p0));
        for i in [a, b, c] {
            accumulated[i] += n;
        }
    }
    for (vertex, n) in vertices.iter_mut().zip(accumulated) {
        if vertex.normal.norm_squared() < 1e-12 {
            vertex.normal = n.try_normalize(1e-12).unwrap_or_else(|| Vector3::new(0.0, 0.0, -1.0));
        }
    }
}

/// Per-vertex tangents (dP/du) from the UV layout of adjacent faces,
/// orthogonalized against the normal.
pub fn compute_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    let mut accumulated = vec![Vector3::zeros(); vertices.len()];
    for face in indices.chunks_exact(3) {
        let [a, b, c] = [face[0] as usize, face[1] as usize, face[2] as usize];
        let edge1 = vertices[b].position - vertices[a].position;
        let edge2 = vertices[c].position - vertices[a].position;
        let duv1 = vertices[b].texcoord - vertices[a].texcoord;
        let duv2 = vertices[c].texcoord - vertices[a].texcoord;

        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() < 1e-12 {
            continue;
        }
        let tangent = (edge1 * duv2.y - edge2 * duv1.y) / det;
        for i in [a, b, c] {
            accumulated[i] += tangent;
        }
    }

    let mut zero_tangents = 0;
    for (vertex, t) in vertices.iter_mut().zip(accumulated) {
        let n = vertex.normal;
        // Gram-Schmidt
        let rejected = t - n * n.dot(&t);
        vertex.tangent = match rejected.try_normalize(1e-12) {
            Some(t) => t,
            None => {
                zero_tangents += 1;
                Vector3::zeros()
            }
        };
    }
    if zero_tangents > 0 {
        warn!("{zero_tangents} vertices have no usable tangent; normal mapping is skipped there.");
    }
}
