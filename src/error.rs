use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a rendering session.
///
/// Geometric rejection during rasterization (degenerate, culled or
/// out-of-frustum triangles) is routine and never surfaces here.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to load texture '{path}': {source}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("invalid texture: {0}")]
    InvalidTexture(String),
    #[error("failed to load mesh '{path}': {reason}")]
    MeshLoad { path: PathBuf, reason: String },
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
    #[error("failed to read config file '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, RenderError>;
