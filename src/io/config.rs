use crate::core::color::ColorRGB;
use crate::core::math::transform::TransformFactory;
use crate::core::pipeline::RenderMode;
use crate::core::primitive::PrimitiveTopology;
use crate::core::rasterizer::CullMode;
use crate::error::{RenderError, Result};
use crate::pipeline::shaders::phong::ShadingMode;
use crate::scene::light::{DirectionalLight, Lighting};
use crate::scene::material::MaterialPaths;
use nalgebra::{Matrix4, Vector3};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A scene file. Every table and field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub material: MaterialConfig,
    #[serde(default)]
    pub meshes: Vec<MeshConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    // --- Output ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,
    /// Frames simulated before the snapshot is written.
    #[serde(default = "default_frames")]
    pub frames: usize,
    /// Seconds per simulated frame.
    #[serde(default = "default_frame_time")]
    pub frame_time: f32,
    #[serde(default = "default_background")]
    pub background: [f32; 3],

    // --- Modes ---
    #[serde(default)]
    pub render_mode: RenderMode,
    #[serde(default)]
    pub shading_mode: ShadingMode,
    #[serde(default)]
    pub cull_mode: CullMode,
    #[serde(default = "default_depth_remap")]
    pub depth_remap: [f32; 2],
    #[serde(default = "default_true")]
    pub use_normal_map: bool,
    #[serde(default = "default_true")]
    pub rotate: bool,
    /// Radians per second.
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            frames: default_frames(),
            frame_time: default_frame_time(),
            background: default_background(),
            render_mode: RenderMode::default(),
            shading_mode: ShadingMode::default(),
            cull_mode: CullMode::default(),
            depth_remap: default_depth_remap(),
            use_normal_map: true,
            rotate: true,
            rotation_speed: default_rotation_speed(),
        }
    }
}

fn default_width() -> usize {
    640
}
fn default_height() -> usize {
    480
}
fn default_output() -> String {
    "rasterizer_color_buffer.png".to_string()
}
fn default_frames() -> usize {
    1
}
fn default_frame_time() -> f32 {
    1.0 / 60.0
}
fn default_background() -> [f32; 3] {
    [0.39, 0.39, 0.39]
}
fn default_depth_remap() -> [f32; 2] {
    [0.997, 1.0]
}
fn default_true() -> bool {
    true
}
fn default_rotation_speed() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// Degrees, positive looks up.
    #[serde(default)]
    pub pitch: f32,
    /// Degrees, positive turns right.
    #[serde(default)]
    pub yaw: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
            pitch: 0.0,
            yaw: 0.0,
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 0.0, -10.0]
}
fn default_fov() -> f32 {
    45.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    100.0
}

#[derive(Debug, Deserialize)]
pub struct LightConfig {
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],
    #[serde(default = "default_shininess")]
    pub shininess: f32,
    #[serde(default = "default_kd")]
    pub kd: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: default_light_direction(),
            intensity: default_intensity(),
            ambient: default_ambient(),
            shininess: default_shininess(),
            kd: default_kd(),
        }
    }
}

fn default_light_direction() -> [f32; 3] {
    [0.577, -0.577, 0.577]
}
fn default_intensity() -> f32 {
    7.0
}
fn default_ambient() -> [f32; 3] {
    [0.025, 0.025, 0.025]
}
fn default_shininess() -> f32 {
    25.0
}
fn default_kd() -> f32 {
    1.0
}

impl LightConfig {
    pub fn to_lighting(&self) -> Result<Lighting> {
        let direction = Vector3::from(self.direction);
        if direction.norm_squared() < 1e-12 {
            return Err(RenderError::InvalidConfig(
                "light direction must be non-zero".to_string(),
            ));
        }
        Ok(Lighting {
            light: DirectionalLight::new(direction, self.intensity),
            ambient: ColorRGB::from(self.ambient),
            kd: self.kd,
            shininess: self.shininess,
        })
    }
}

/// Texture paths; all four or none.
#[derive(Debug, Default, Deserialize)]
pub struct MaterialConfig {
    pub diffuse: Option<PathBuf>,
    pub normal: Option<PathBuf>,
    pub specular: Option<PathBuf>,
    pub glossiness: Option<PathBuf>,
}

impl MaterialConfig {
    /// `Ok(None)` when no texture is configured, an error for a partial set.
    pub fn paths(&self) -> Result<Option<MaterialPaths<'_>>> {
        match (&self.diffuse, &self.normal, &self.specular, &self.glossiness) {
            (None, None, None, None) => Ok(None),
            (Some(diffuse), Some(normal), Some(specular), Some(glossiness)) => {
                Ok(Some(MaterialPaths {
                    diffuse,
                    normal,
                    specular,
                    glossiness,
                }))
            }
            _ => Err(RenderError::InvalidConfig(
                "[material] needs all of diffuse, normal, specular and glossiness, or none"
                    .to_string(),
            )),
        }
    }
}

/// Procedural meshes available without an asset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinShape {
    /// 3x3 vertex grid, vertex colors from its UVs.
    Grid,
    /// The flat-colored reference triangle.
    Triangle,
}

/// One mesh instance: an OBJ file or a built-in shape, plus its placement.
#[derive(Debug, Deserialize)]
pub struct MeshConfig {
    pub path: Option<PathBuf>,
    pub shape: Option<BuiltinShape>,
    /// Flat color of the built-in triangle.
    #[serde(default = "default_mesh_color")]
    pub color: [f32; 3],

    // --- Transform ---
    #[serde(default)]
    pub position: [f32; 3],
    /// Degrees about X, Y, Z.
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],

    /// Index encoding of the built-in grid. OBJ faces are always a list.
    #[serde(default)]
    pub topology: PrimitiveTopology,
}

fn default_mesh_color() -> [f32; 3] {
    [1.0, 0.0, 0.0]
}
fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl MeshConfig {
    /// A built-in shape placed at `position`.
    pub fn builtin(shape: BuiltinShape, position: [f32; 3]) -> Self {
        Self {
            path: None,
            shape: Some(shape),
            color: default_mesh_color(),
            position,
            rotation: [0.0; 3],
            scale: default_scale(),
            topology: PrimitiveTopology::TriangleStrip,
        }
    }

    /// Translation * rotation (X, then Y, then Z) * scale.
    pub fn world_matrix(&self) -> Matrix4<f32> {
        let [rx, ry, rz] = self.rotation.map(f32::to_radians);
        TransformFactory::translation(&Vector3::from(self.position))
            * TransformFactory::rotation(rx, ry, rz)
            * TransformFactory::scaling_nonuniform(&Vector3::from(self.scale))
    }

    fn validate(&self) -> Result<()> {
        match (&self.path, self.shape) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            _ => Err(RenderError::InvalidConfig(
                "each [[meshes]] entry needs exactly one of `path` or `shape`".to_string(),
            )),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| RenderError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses and validates a TOML scene description.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let render = &self.render;
        if render.width == 0 || render.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "resolution must be non-zero, got {}x{}",
                render.width, render.height
            )));
        }
        if render.depth_remap[0] >= render.depth_remap[1] {
            return Err(RenderError::InvalidConfig(format!(
                "depth_remap must be increasing, got {:?}",
                render.depth_remap
            )));
        }
        let camera = &self.camera;
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            return Err(RenderError::InvalidConfig(format!(
                "fov must be in (0, 180) degrees, got {}",
                camera.fov
            )));
        }
        if !(camera.near > 0.0 && camera.near < camera.far) {
            return Err(RenderError::InvalidConfig(format!(
                "clip planes must satisfy 0 < near < far, got {} and {}",
                camera.near, camera.far
            )));
        }
        self.material.paths()?;
        for mesh in &self.meshes {
            mesh.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_a_valid_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.render.width, 640);
        assert_eq!(config.render.output, "rasterizer_color_buffer.png");
        assert_eq!(config.render.render_mode, RenderMode::FinalColor);
        assert_eq!(config.render.cull_mode, CullMode::Back);
        assert_eq!(config.camera.fov, 45.0);
        assert_eq!(config.light.intensity, 7.0);
        assert!(config.meshes.is_empty());
        assert!(config.material.paths().unwrap().is_none());
    }

    #[test]
    fn modes_and_meshes_parse() {
        let config = Config::parse(
            r#"
            [render]
            width = 100
            height = 50
            render_mode = "depth_buffer"
            shading_mode = "observed_area"
            cull_mode = "none"

            [camera]
            position = [0.0, 1.0, -5.0]
            yaw = 30.0

            [[meshes]]
            path = "assets/vehicle.obj"
            position = [0.0, 0.0, 50.0]
            topology = "strip"
            "#,
        )
        .unwrap();

        assert_eq!(config.render.width, 100);
        assert_eq!(config.render.render_mode, RenderMode::DepthBuffer);
        assert_eq!(config.render.shading_mode, ShadingMode::ObservedArea);
        assert_eq!(config.render.cull_mode, CullMode::None);
        assert_eq!(config.camera.yaw, 30.0);
        assert_eq!(config.meshes.len(), 1);
        assert_eq!(config.meshes[0].topology, PrimitiveTopology::TriangleStrip);
        assert_eq!(config.meshes[0].scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn partial_material_is_rejected() {
        let err = Config::parse(
            r#"
            [material]
            diffuse = "diffuse.png"
            normal = "normal.png"
            "#,
        );
        assert!(matches!(err, Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn full_material_yields_paths() {
        let config = Config::parse(
            r#"
            [material]
            diffuse = "d.png"
            normal = "n.png"
            specular = "s.png"
            glossiness = "g.png"
            "#,
        )
        .unwrap();
        let paths = config.material.paths().unwrap().unwrap();
        assert_eq!(paths.normal, Path::new("n.png"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(Config::parse("[render]\nwidth = 0").is_err());
        assert!(Config::parse("[camera]\nnear = 5.0\nfar = 1.0").is_err());
        assert!(Config::parse("[render]\nrender_mode = \"wireframe\"").is_err());
        assert!(matches!(
            Config::parse("[render\n"),
            Err(RenderError::ConfigParse(_))
        ));
    }

    #[test]
    fn mesh_needs_exactly_one_source() {
        assert!(Config::parse("[[meshes]]\nshape = \"grid\"").is_ok());
        assert!(Config::parse("[[meshes]]\nposition = [0.0, 0.0, 1.0]").is_err());
        assert!(Config::parse("[[meshes]]\nshape = \"triangle\"\npath = \"a.obj\"").is_err());
    }

    #[test]
    fn mesh_world_matrix_scales_rotates_then_translates() {
        let config = Config::parse(
            r#"
            [[meshes]]
            shape = "triangle"
            position = [1.0, 2.0, 3.0]
            rotation = [0.0, 90.0, 0.0]
            scale = [2.0, 2.0, 2.0]
            "#,
        )
        .unwrap();
        let world = config.meshes[0].world_matrix();
        let p = world * nalgebra::Vector4::new(1.0, 0.0, 0.0, 1.0);
        // (1,0,0) -> scaled (2,0,0) -> rotated (0,0,-2) -> translated.
        assert!((p.xyz() - Vector3::new(1.0, 2.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn lighting_normalizes_direction() {
        let config = Config::parse("[light]\ndirection = [0.0, -2.0, 0.0]").unwrap();
        let lighting = config.light.to_lighting().unwrap();
        assert!((lighting.light.direction - Vector3::new(0.0, -1.0, 0.0)).norm() < 1e-6);
    }
}
