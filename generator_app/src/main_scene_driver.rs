//! Headless scene driver
//!
//! Builds a small orbiting system around one mesh file, samples it at evenly
//! spaced instants and logs what a renderer would be asked to draw.
//!
//! Usage: scene_driver <meshFile> <seconds> <frames> [viewerConfig]
//!
//! The viewer configuration may also be named by `SCENE_DRIVER_CONFIG`.

use cg_engine::assets::{MeshIoError, MeshLibrary};
use cg_engine::core::{Config, ConfigError, ViewerConfig};
use cg_engine::foundation::collections::MeshId;
use cg_engine::foundation::logging;
use cg_engine::foundation::math::{Point3, Vec3};
use cg_engine::foundation::time::{Clock, ManualClock, Stopwatch};
use cg_engine::scene::{
    Color, GroupDesc, Light, LightKind, Material, Model, OrbitCamera, Rotate, SceneError, SceneGraph, Transform,
    Translate, World,
};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

const USAGE: &str = "Usage: scene_driver <meshFile> <seconds> <frames> [viewerConfig]";

const CONFIG_ENV: &str = "SCENE_DRIVER_CONFIG";

#[derive(Error, Debug)]
enum DriverError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid viewer configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Mesh(#[from] MeshIoError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

#[derive(Debug, Clone, PartialEq)]
struct DriverArgs {
    mesh: PathBuf,
    seconds: f32,
    frames: usize,
    config: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<DriverArgs, DriverError> {
    let [mesh, seconds, frames, rest @ ..] = args else {
        return Err(DriverError::Usage(format!("expected at least 3 arguments, got {}", args.len())));
    };
    if rest.len() > 1 {
        return Err(DriverError::Usage(format!("unexpected argument `{}`", rest[1])));
    }

    let seconds = seconds
        .parse::<f32>()
        .ok()
        .filter(|s| s.is_finite() && *s >= 0.0)
        .ok_or_else(|| DriverError::Usage(format!("invalid seconds `{seconds}`")))?;
    let frames = frames
        .parse::<usize>()
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| DriverError::Usage(format!("invalid frame count `{frames}`")))?;

    Ok(DriverArgs {
        mesh: PathBuf::from(mesh),
        seconds,
        frames,
        config: rest.first().map(PathBuf::from),
    })
}

fn load_config(path: Option<&Path>) -> Result<ViewerConfig, DriverError> {
    let config = match path.map(Path::to_path_buf).or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from)) {
        Some(path) => ViewerConfig::load_from_file(path)?,
        None => ViewerConfig::default(),
    };
    config.validate().map_err(DriverError::InvalidConfig)?;
    Ok(config)
}

/// Sun spinning in place, a planet on a spline orbit, a moon circling the planet
fn demo_scene(mesh: MeshId, source: &str, period: f32) -> SceneGraph {
    let orbit = vec![
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -10.0),
        Vec3::new(-10.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 10.0),
    ];

    let moon = GroupDesc::new(
        Transform::identity()
            .with_scale(Vec3::repeat(0.25))
            .with_translate(Translate::fixed(Vec3::new(2.0, 0.0, 0.0))),
    )
    .model(Model::new(mesh, source).with_material(Material::with_diffuse(Color::gray(0.6))));

    let planet = GroupDesc::new(
        Transform::identity()
            .with_scale(Vec3::repeat(0.5))
            .with_rotate(Rotate::spinning(period / 4.0, Vec3::y()))
            .with_translate(Translate::along(orbit, period)),
    )
    .model(Model::new(mesh, source).with_material(Material::with_diffuse(Color::from_rgb8(64, 128, 255))))
    .child(moon);

    let sun = GroupDesc::new(Transform::identity().with_rotate(Rotate::spinning(period, Vec3::y())))
        .model(
            Model::new(mesh, source)
                .with_material(Material::with_diffuse(Color::from_rgb8(255, 200, 0)).glowing(Color::new(1.0, 0.8, 0.0))),
        )
        .child(planet);

    SceneGraph::from_groups(vec![sun])
}

fn run(args: &DriverArgs) -> Result<(), DriverError> {
    let config = load_config(args.config.as_deref())?;
    logging::init_with_level(&config.log_level);

    let mut meshes = MeshLibrary::new();
    let mesh = meshes.load(&args.mesh)?;
    if let Some(entry) = meshes.entry(mesh) {
        if let Some(bounds) = entry.mesh.bounds() {
            log::info!(
                "{}: {} triangles, extents {:?}",
                entry.source.display(),
                entry.mesh.triangle_count(),
                bounds.extents()
            );
        }
    }

    let period = if args.seconds > 0.0 { args.seconds } else { 1.0 };
    let scene = demo_scene(mesh, &args.mesh.display().to_string(), period);
    let camera = OrbitCamera::from_position(Vec3::new(0.0, 20.0, 40.0), Vec3::zeros(), Vec3::y(), config.projection);
    let lights = vec![
        Light::new(LightKind::Point { position: Vec3::zeros() }),
        Light::new(LightKind::Directional {
            direction: Vec3::new(1.0, 1.0, 0.0),
        }),
    ];

    let mut world = World::new(config.window, camera, lights, scene, meshes)?;
    world.configure(&config);
    log::debug!("view-projection: {:?}", world.view_projection());

    let stopwatch = Stopwatch::start_new();
    let mut clock = ManualClock::default();
    let step = args.seconds / args.frames as f32;

    for index in 0..args.frames {
        clock.set(step * index as f32);
        let frame = world.frame(clock.elapsed_secs());

        log::info!("frame {index} at {:.3}s", frame.elapsed);
        for draw in &frame.draws {
            let centre = draw.world.transform_point(&Point3::origin());
            log::info!(
                "  group {:?} model {}: centre ({:.4}, {:.4}, {:.4})",
                draw.group,
                draw.model_index,
                centre.x,
                centre.y,
                centre.z
            );
        }
        for path in &frame.paths {
            log::debug!("  path of {:?}: {} points", path.group, path.points.len());
        }
        if config.show_normals {
            let normals = world.normal_overlay(&frame, config.normal_length);
            log::debug!("  {} normal segments", normals.len());
        }
    }

    log::info!(
        "sampled {} frames in {:.3} ms",
        args.frames,
        stopwatch.elapsed_secs() * 1000.0
    );
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let result = parse_args(&args).and_then(|args| run(&args));
    if let Err(e) = result {
        eprintln!("Error: {e}");
        if matches!(e, DriverError::Usage(_)) {
            eprintln!("{USAGE}");
        }
        std::process::exit(1);
    }
}
