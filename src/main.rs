use clap::{Parser, ValueEnum};
use log::{error, info};
use softras::app;
use softras::core::pipeline::RenderMode;
use softras::io::config::Config;
use softras::pipeline::shaders::phong::ShadingMode;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RenderModeArg {
    FinalColor,
    DepthBuffer,
}

impl From<RenderModeArg> for RenderMode {
    fn from(arg: RenderModeArg) -> Self {
        match arg {
            RenderModeArg::FinalColor => RenderMode::FinalColor,
            RenderModeArg::DepthBuffer => RenderMode::DepthBuffer,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShadingModeArg {
    Combined,
    ObservedArea,
    Diffuse,
    Specular,
}

impl From<ShadingModeArg> for ShadingMode {
    fn from(arg: ShadingModeArg) -> Self {
        match arg {
            ShadingModeArg::Combined => ShadingMode::Combined,
            ShadingModeArg::ObservedArea => ShadingMode::ObservedArea,
            ShadingModeArg::Diffuse => ShadingMode::Diffuse,
            ShadingModeArg::Specular => ShadingMode::Specular,
        }
    }
}

/// Headless CPU rasterizer driven by a TOML scene file.
#[derive(Parser, Debug)]
#[command(name = "softras", version, about)]
struct Cli {
    /// Scene file (TOML). Built-in defaults are used when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Snapshot file, overrides `render.output`.
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Number of frames to simulate before the snapshot.
    #[arg(short, long)]
    frames: Option<usize>,

    #[arg(long, value_enum)]
    render_mode: Option<RenderModeArg>,

    #[arg(long, value_enum)]
    shading_mode: Option<ShadingModeArg>,
}

fn load_config(cli: &Cli) -> softras::error::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading config from '{}'", path.display());
            Config::load(path)?
        }
        None => {
            info!("No config given, using defaults.");
            Config::default()
        }
    };

    if let Some(output) = &cli.output {
        config.render.output = output.clone();
    }
    if let Some(frames) = cli.frames {
        config.render.frames = frames;
    }
    if let Some(mode) = cli.render_mode {
        config.render.render_mode = mode.into();
    }
    if let Some(mode) = cli.shading_mode {
        config.render.shading_mode = mode.into();
    }
    Ok(config)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = load_config(&cli).and_then(app::run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
