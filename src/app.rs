use crate::core::color::ColorRGB;
use crate::core::rasterizer::RasterStats;
use crate::error::Result;
use crate::io::config::{BuiltinShape, Config, MeshConfig};
use crate::io::image::save_color_buffer;
use crate::io::obj_loader::load_obj;
use crate::pipeline::renderer::Renderer;
use crate::pipeline::shaders::phong::PhongShader;
use crate::pipeline::shaders::unlit::UnlitShader;
use crate::scene::camera::{Camera, CameraInput};
use crate::scene::context::RenderContext;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use log::{debug, info};
use nalgebra::Point3;
use std::time::Instant;

/// Demo scene used when the config lists no meshes: the grid strip with the
/// red reference triangle just in front of it.
fn default_meshes() -> Vec<MeshConfig> {
    vec![
        MeshConfig::builtin(BuiltinShape::Grid, [0.0, 0.0, 0.0]),
        MeshConfig::builtin(BuiltinShape::Triangle, [0.0, 0.0, -1.0]),
    ]
}

fn build_mesh(mesh_config: &MeshConfig) -> Result<Mesh> {
    let mesh = match (&mesh_config.path, mesh_config.shape) {
        (Some(path), _) => load_obj(path)?,
        (None, Some(BuiltinShape::Triangle)) => {
            Mesh::create_test_triangle(ColorRGB::from(mesh_config.color))
        }
        (None, Some(BuiltinShape::Grid)) | (None, None) => {
            Mesh::create_test_grid(mesh_config.topology)
        }
    };
    Ok(mesh.with_world_matrix(mesh_config.world_matrix()))
}

/// Builds the session state described by `config`, loading every asset.
pub fn build_context(config: &Config) -> Result<RenderContext> {
    let render = &config.render;
    let cam = &config.camera;

    let aspect_ratio = render.width as f32 / render.height as f32;
    let mut camera = Camera::new(cam.fov, Point3::from(cam.position), aspect_ratio);
    camera.set_clip_planes(cam.near, cam.far);
    camera.set_orientation(cam.pitch.to_radians(), cam.yaw.to_radians());

    let mesh_configs = if config.meshes.is_empty() {
        info!("No meshes configured, using the built-in demo scene.");
        default_meshes()
    } else {
        Vec::new()
    };
    let meshes = config
        .meshes
        .iter()
        .chain(mesh_configs.iter())
        .map(build_mesh)
        .collect::<Result<Vec<_>>>()?;

    let mut context = RenderContext::new(camera, meshes);
    if let Some(paths) = config.material.paths()? {
        context = context.with_material(Material::load(&paths)?);
    }
    context.lighting = config.light.to_lighting()?;
    context.render_mode = render.render_mode;
    context.shading_mode = render.shading_mode;
    context.use_normal_map = render.use_normal_map;
    context.rotate = render.rotate;
    context.rotation_speed = render.rotation_speed;
    Ok(context)
}

/// Creates a renderer matching the `[render]` table.
pub fn build_renderer(config: &Config) -> Renderer {
    let render = &config.render;
    let mut renderer = Renderer::new(render.width, render.height);
    renderer.background = ColorRGB::from(render.background);
    renderer.rasterizer.set_cull_mode(render.cull_mode);
    renderer.rasterizer.depth_remap = (render.depth_remap[0], render.depth_remap[1]);
    renderer
}

/// Renders the current state of `context`.
///
/// Textured scenes use the Lambert/Phong shader, untextured ones the
/// vertex colors.
pub fn draw(context: &mut RenderContext, renderer: &mut Renderer) -> RasterStats {
    renderer.rasterizer.render_mode = context.render_mode;
    match &context.material {
        Some(material) => {
            let shader = PhongShader {
                material,
                lighting: context.lighting.clone(),
                shading_mode: context.shading_mode,
                use_normal_map: context.use_normal_map,
            };
            renderer.render_frame(&mut context.meshes, &context.camera, &shader)
        }
        None => renderer.render_frame(&mut context.meshes, &context.camera, &UnlitShader),
    }
}

/// Runs the application headless: simulate `frames` frames, then write
/// the final color buffer to `config.render.output`.
pub fn run(config: Config) -> Result<()> {
    let render = &config.render;
    info!(
        "Starting headless render ({}x{}, {} frames)...",
        render.width, render.height, render.frames
    );

    let mut context = build_context(&config)?;
    let mut renderer = build_renderer(&config);
    let start_time = Instant::now();

    let mut stats = RasterStats::default();
    for frame in 0..render.frames.max(1) {
        if frame > 0 {
            context.update(render.frame_time, &CameraInput::default());
        }
        stats = draw(&mut context, &mut renderer);
        debug!("Frame {frame} done.");
    }

    info!(
        "Render completed in {:.2?}: {} triangles, {} fragments in the last frame",
        start_time.elapsed(),
        stats.triangles,
        stats.fragments
    );
    save_color_buffer(&renderer.framebuffer, &render.output)?;
    info!("Done.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::RenderMode;

    #[test]
    fn empty_config_builds_the_demo_scene() {
        let config = Config::default();
        let context = build_context(&config).unwrap();
        assert_eq!(context.meshes.len(), 2);
        assert!(context.material.is_none());
        assert!(context.rotate);
    }

    #[test]
    fn demo_scene_renders_something() {
        let config = Config::parse("[render]\nwidth = 64\nheight = 48").unwrap();
        let mut context = build_context(&config).unwrap();
        let mut renderer = build_renderer(&config);
        let stats = draw(&mut context, &mut renderer);
        // 12 strip candidates + the reference triangle.
        assert_eq!(stats.triangles, 13);
        assert_eq!(stats.degenerate, 4);
        assert!(stats.fragments > 0);
    }

    #[test]
    fn depth_mode_is_forwarded_to_the_rasterizer() {
        let config = Config::parse("[render]\nwidth = 16\nheight = 16\nrender_mode = \"depth_buffer\"").unwrap();
        let mut context = build_context(&config).unwrap();
        let mut renderer = build_renderer(&config);
        draw(&mut context, &mut renderer);
        assert_eq!(renderer.rasterizer.render_mode, RenderMode::DepthBuffer);
    }

    #[test]
    fn missing_mesh_file_fails_the_session() {
        let config = Config::parse("[[meshes]]\npath = \"/nonexistent/softras.obj\"").unwrap();
        assert!(build_context(&config).is_err());
    }
}
