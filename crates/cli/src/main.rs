#![deny(unsafe_code)]
//! CLI binary for the citylights scene gallery.
//!
//! Subcommands:
//! - `render <scene>`: render one frame at a given time, write PNG
//! - `animate <scene>`: drive the frame loop headlessly, write a PNG sequence
//! - `replay <spec>`: re-render a saved scene spec
//! - `schema <scene>`: print a scene's parameter schema
//! - `list`: print scenes, presets and palettes
//!
//! Every `<scene>` argument also accepts a preset name (`a1` to `a8`).
//! Logging goes to stderr, filtered by `RUST_LOG` (default `warn`).

mod error;

use citylights_core::runtime::run_frames;
use citylights_core::{ManualScheduler, Palette, Scene, SceneMount, SceneSpec, Viewport};
use citylights_scenes::presets::list_presets;
use citylights_scenes::snapshot::{write_field_png, write_png};
use citylights_scenes::SceneKind;
use clap::{Parser, Subcommand};
use error::CliError;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "citylights", about = "Procedural city skyline gallery")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one frame and write a PNG.
    Render {
        /// Scene or preset name (e.g. "blurry-city", "a3").
        scene: String,

        /// Canvas width in pixels.
        #[arg(short = 'W', long, default_value_t = 640)]
        width: usize,

        /// Canvas height in pixels.
        #[arg(short = 'H', long, default_value_t = 360)]
        height: usize,

        /// Frame time in seconds.
        #[arg(short, long, default_value_t = 0.0)]
        time: f64,

        /// Output file path.
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,

        /// Scene parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Write the uncolored intensity through this palette instead
        /// (full-frame shader scenes only).
        #[arg(long)]
        mask: Option<String>,

        /// Also save the scene spec, for `replay`.
        #[arg(long)]
        save_spec: Option<PathBuf>,
    },
    /// Run the frame loop at a fixed rate and write every frame.
    Animate {
        /// Scene or preset name.
        scene: String,

        #[arg(short = 'W', long, default_value_t = 320)]
        width: usize,

        #[arg(short = 'H', long, default_value_t = 180)]
        height: usize,

        /// Number of frames to render.
        #[arg(short, long, default_value_t = 60)]
        frames: u64,

        /// Frames per second of the fixed-step clock.
        #[arg(long, default_value_t = 30.0)]
        fps: f64,

        /// Directory the `frame_NNNN.png` files go into.
        #[arg(short, long, default_value = "frames")]
        out_dir: PathBuf,

        /// Scene parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// Re-render a frame from a saved scene spec.
    Replay {
        /// Path to a spec JSON file.
        spec: PathBuf,

        /// Output file path.
        #[arg(short, long, default_value = "replay.png")]
        output: PathBuf,
    },
    /// Print a scene's parameter schema.
    Schema {
        /// Scene or preset name.
        scene: String,
    },
    /// List scenes, presets and palettes.
    List,
}

fn parse_params(raw: &str) -> Result<Value, CliError> {
    let params: Value = serde_json::from_str(raw)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    if !params.is_object() {
        return Err(CliError::Input("--params must be a JSON object".into()));
    }
    Ok(params)
}

fn load_spec(path: &Path) -> Result<SceneSpec, CliError> {
    let text = std::fs::read_to_string(path)?;
    let spec: SceneSpec = serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid spec {}: {e}", path.display())))?;
    spec.validate()?;
    Ok(spec)
}

/// Renders the frame a spec describes and writes it to `output`.
fn render_spec(spec: &SceneSpec, output: &Path) -> Result<(), CliError> {
    spec.validate()?;
    let mut scene = SceneKind::resolve(&spec.scene, &spec.params)?;
    let raster = scene.render_frame(&spec.frame_context())?;
    write_png(&raster, output)?;
    Ok(())
}

fn render_mask(spec: &SceneSpec, palette: &str, output: &Path) -> Result<(), CliError> {
    spec.validate()?;
    let palette = Palette::from_name(palette)
        .ok_or_else(|| CliError::Input(format!("unknown palette: {palette}")))?;
    let scene = SceneKind::resolve(&spec.scene, &spec.params)?;
    let field = scene.intensity(&spec.frame_context()).ok_or_else(|| {
        CliError::Input(format!("{} has no intensity field to mask", spec.scene))
    })??;
    write_field_png(&field, &palette, output)?;
    Ok(())
}

/// Mounts the scene on a headless scheduler and writes `frames` PNGs.
fn animate(
    name: &str,
    params: &Value,
    viewport: Viewport,
    frames: u64,
    fps: f64,
    out_dir: &Path,
) -> Result<u64, CliError> {
    std::fs::create_dir_all(out_dir)?;
    let scene = SceneKind::resolve(name, params)?;
    let mut scheduler = ManualScheduler::new(fps);
    let Some(mut mount) = SceneMount::mount(scene, Some(viewport), &mut scheduler)? else {
        return Ok(0);
    };
    run_frames(&mut mount, &mut scheduler, frames, |n, raster| {
        write_png(raster, &out_dir.join(format!("frame_{n:04}.png")))
    })?;
    let written = mount.frames_rendered();
    mount.teardown(&mut scheduler);
    tracing::info!(scene = name, frames = written, dir = %out_dir.display(), "animation written");
    Ok(written)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let scenes = SceneKind::list_scenes();
            let presets = list_presets();
            let palettes = Palette::list_names();
            if cli.json {
                let presets: Vec<Value> = presets
                    .iter()
                    .map(|p| json!({"name": p.name, "scene": p.scene, "description": p.description}))
                    .collect();
                let info = json!({
                    "scenes": scenes,
                    "presets": presets,
                    "palettes": palettes,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Scenes:");
                for name in scenes {
                    println!("  {name}");
                }
                println!("Presets:");
                for p in presets {
                    println!("  {:<4} {:<16} {}", p.name, p.scene, p.description);
                }
                println!("Palettes:");
                println!("  {}", palettes.join(", "));
            }
        }
        Command::Schema { scene } => {
            let built = SceneKind::resolve(&scene, &json!({}))?;
            let info = json!({
                "scene": scene,
                "params": built.params(),
                "schema": built.param_schema(),
            });
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&info["schema"])?);
            }
        }
        Command::Render {
            scene,
            width,
            height,
            time,
            output,
            params,
            mask,
            save_spec,
        } => {
            let spec = SceneSpec {
                scene,
                width,
                height,
                time,
                params: parse_params(&params)?,
            };
            match &mask {
                Some(palette) => render_mask(&spec, palette, &output)?,
                None => render_spec(&spec, &output)?,
            }
            if let Some(path) = &save_spec {
                std::fs::write(path, serde_json::to_string_pretty(&spec)?)?;
            }

            if cli.json {
                let info = json!({
                    "scene": spec.scene,
                    "width": width,
                    "height": height,
                    "time": time,
                    "mask": mask,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({width}x{height}, t={time}) -> {}",
                    spec.scene,
                    output.display()
                );
            }
        }
        Command::Animate {
            scene,
            width,
            height,
            frames,
            fps,
            out_dir,
            params,
        } => {
            let params = parse_params(&params)?;
            if width == 0 || height == 0 {
                return Err(CliError::Scene(citylights_core::SceneError::InvalidDimensions));
            }
            let written = animate(&scene, &params, Viewport::new(width, height), frames, fps, &out_dir)?;
            if cli.json {
                let info = json!({
                    "scene": scene,
                    "width": width,
                    "height": height,
                    "frames": written,
                    "fps": fps,
                    "out_dir": out_dir.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "animated {scene} ({width}x{height}, {written} frames at {fps} fps) -> {}",
                    out_dir.display()
                );
            }
        }
        Command::Replay { spec, output } => {
            let loaded = load_spec(&spec)?;
            render_spec(&loaded, &output)?;
            if cli.json {
                let info = json!({
                    "spec": spec.display().to_string(),
                    "scene": loaded.scene,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!("replayed {} -> {}", spec.display(), output.display());
            }
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_accepts_preset_and_flags() {
        let cli = Cli::try_parse_from([
            "citylights", "render", "a2", "-W", "32", "-H", "24", "--time", "1.5",
        ])
        .unwrap();
        match cli.command {
            Command::Render {
                scene, width, time, ..
            } => {
                assert_eq!(scene, "a2");
                assert_eq!(width, 32);
                assert_eq!(time, 1.5);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn params_must_be_an_object() {
        assert!(parse_params("{\"rows\": 3}").is_ok());
        assert_eq!(parse_params("[1, 2]").unwrap_err().exit_code(), 12);
        assert_eq!(parse_params("{oops").unwrap_err().exit_code(), 12);
    }

    #[test]
    fn saved_spec_replays_to_identical_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut spec = SceneSpec::new("windows-city", 24, 16);
        spec.time = 3.25;
        let spec_path = dir.path().join("spec.json");
        std::fs::write(&spec_path, serde_json::to_string(&spec).unwrap()).unwrap();

        let first = dir.path().join("first.png");
        let second = dir.path().join("second.png");
        render_spec(&spec, &first).unwrap();
        render_spec(&load_spec(&spec_path).unwrap(), &second).unwrap();
        assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
    }

    #[test]
    fn zero_sized_spec_is_a_scene_error() {
        let dir = tempfile::tempdir().unwrap();
        let spec = SceneSpec::new("heart", 0, 16);
        let err = render_spec(&spec, &dir.path().join("x.png")).unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn missing_spec_file_is_io_error() {
        let err = load_spec(Path::new("/nonexistent/spec.json")).unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn mask_needs_a_shader_scene() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("mask.png");
        let spec = SceneSpec::new("lines-only", 16, 16);
        assert_eq!(render_mask(&spec, "ocean", &out).unwrap_err().exit_code(), 12);
        let spec = SceneSpec::new("mono-cluster", 16, 16);
        render_mask(&spec, "ocean", &out).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn animate_writes_one_png_per_frame() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("seq");
        let written = animate("a7", &json!({}), Viewport::new(16, 12), 3, 30.0, &out).unwrap();
        assert_eq!(written, 3);
        for n in 1..=3 {
            assert!(out.join(format!("frame_{n:04}.png")).exists());
        }
    }
}
