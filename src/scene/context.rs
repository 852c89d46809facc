use crate::core::math::transform::TransformFactory;
use crate::core::pipeline::RenderMode;
use crate::pipeline::shaders::phong::ShadingMode;
use crate::scene::camera::{Camera, CameraInput};
use crate::scene::light::Lighting;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use log::info;

/// Discrete, edge-triggered requests raised by the host for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSignals {
    pub cycle_render_mode: bool,
    pub cycle_shading_mode: bool,
    pub toggle_rotation: bool,
    pub toggle_normal_map: bool,
}

/// Holds all scene resources required for rendering.
pub struct RenderContext {
    pub camera: Camera,
    pub meshes: Vec<Mesh>,
    /// `None` renders vertex colors only.
    pub material: Option<Material>,
    pub lighting: Lighting,

    pub render_mode: RenderMode,
    pub shading_mode: ShadingMode,
    pub use_normal_map: bool,
    pub rotate: bool,
    /// Radians per second about each mesh's local Y axis.
    pub rotation_speed: f32,
}

impl RenderContext {
    pub fn new(camera: Camera, meshes: Vec<Mesh>) -> Self {
        Self {
            camera,
            meshes,
            material: None,
            lighting: Lighting::default(),
            render_mode: RenderMode::default(),
            shading_mode: ShadingMode::default(),
            use_normal_map: true,
            rotate: true,
            rotation_speed: 1.0,
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Advances the scene by `dt` seconds.
    pub fn update(&mut self, dt: f32, input: &CameraInput) {
        self.camera.update(input);

        if self.rotate {
            let rotation = TransformFactory::rotation_y(self.rotation_speed * dt);
            for mesh in &mut self.meshes {
                // Right-multiplied: spin in place before the mesh is placed.
                mesh.world_matrix *= rotation;
            }
        }
    }

    pub fn apply_signals(&mut self, signals: &FrameSignals) {
        if signals.cycle_render_mode {
            self.render_mode = self.render_mode.next();
            info!("Render mode: {:?}", self.render_mode);
        }
        if signals.cycle_shading_mode {
            self.shading_mode = self.shading_mode.next();
            info!("Shading mode: {:?}", self.shading_mode);
        }
        if signals.toggle_rotation {
            self.rotate = !self.rotate;
            info!("Rotation: {}", if self.rotate { "on" } else { "off" });
        }
        if signals.toggle_normal_map {
            self.use_normal_map = !self.use_normal_map;
            info!("Normal map: {}", if self.use_normal_map { "on" } else { "off" });
        }
    }
}
