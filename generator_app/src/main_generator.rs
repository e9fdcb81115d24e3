//! Mesh generator
//!
//! Writes a primitive or a tessellated Bézier patch set to a mesh file.
//!
//! Usage: generator <shape> <args...> <outputFile>
//!
//! The output record shape and precision come from the TOML or RON file
//! named by `GENERATOR_CONFIG`, when set.

use cg_engine::assets::{MeshFile, MeshIoError, PatchFile, PatchIoError};
use cg_engine::core::{ConfigError, GeneratorConfig};
use cg_engine::foundation::logging;
use cg_engine::geometry::{GeometryError, Mesh, PrimitiveGenerator};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

const USAGE: &str = "\
Usage: generator <shape> <args...> <outputFile>

Shapes:
  plane  <length> <divisions>
  box    <length> <divisions>
  sphere <radius> <slices> <stacks>
  cone   <radius> <height> <slices> <stacks>
  patch  <patchFile> <tessellationLevel>";

const EXIT_FAILURE: i32 = 1;

/// Invalid command line
#[derive(Error, Debug, PartialEq, Eq)]
enum CliError {
    #[error("missing shape")]
    MissingShape,

    #[error("unknown shape `{0}`")]
    UnknownShape(String),

    #[error("`{shape}` takes {expected} arguments and an output file, got {found} arguments")]
    WrongArity {
        shape: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid {name} `{value}`")]
    InvalidNumber { name: &'static str, value: String },
}

/// Generation failures after a well-formed command line
#[derive(Error, Debug)]
enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Patch(#[from] PatchIoError),

    #[error(transparent)]
    Write(#[from] MeshIoError),
}

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Plane { length: f32, divisions: u32 },
    Box { length: f32, divisions: u32 },
    Sphere { radius: f32, slices: u32, stacks: u32 },
    Cone { radius: f32, height: f32, slices: u32, stacks: u32 },
    Patch { input: PathBuf, level: u32 },
}

#[derive(Debug, Clone, PartialEq)]
struct Invocation {
    shape: Shape,
    output: PathBuf,
}

fn number<T: FromStr>(name: &'static str, value: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::InvalidNumber {
        name,
        value: value.to_string(),
    })
}

/// Parse the arguments following the program name
fn parse_args(args: &[String]) -> Result<Invocation, CliError> {
    let (shape, rest) = args.split_first().ok_or(CliError::MissingShape)?;

    let (name, arity): (&'static str, usize) = match shape.as_str() {
        "plane" => ("plane", 2),
        "box" => ("box", 2),
        "sphere" => ("sphere", 3),
        "cone" => ("cone", 4),
        "patch" => ("patch", 2),
        other => return Err(CliError::UnknownShape(other.to_string())),
    };

    let Some((output, params)) = rest.split_last().filter(|(_, params)| params.len() == arity) else {
        return Err(CliError::WrongArity {
            shape: name,
            expected: arity,
            found: rest.len().saturating_sub(1),
        });
    };

    let shape = match name {
        "plane" => Shape::Plane {
            length: number("length", &params[0])?,
            divisions: number("divisions", &params[1])?,
        },
        "box" => Shape::Box {
            length: number("length", &params[0])?,
            divisions: number("divisions", &params[1])?,
        },
        "sphere" => Shape::Sphere {
            radius: number("radius", &params[0])?,
            slices: number("slices", &params[1])?,
            stacks: number("stacks", &params[2])?,
        },
        "cone" => Shape::Cone {
            radius: number("radius", &params[0])?,
            height: number("height", &params[1])?,
            slices: number("slices", &params[2])?,
            stacks: number("stacks", &params[3])?,
        },
        _ => Shape::Patch {
            input: PathBuf::from(&params[0]),
            level: number("tessellation level", &params[1])?,
        },
    };

    Ok(Invocation {
        shape,
        output: PathBuf::from(output),
    })
}

fn generate(shape: &Shape) -> Result<Mesh, GenerateError> {
    let mesh = match shape {
        Shape::Plane { length, divisions } => PrimitiveGenerator::plane(*length, *divisions)?,
        Shape::Box { length, divisions } => PrimitiveGenerator::cube(*length, *divisions)?,
        Shape::Sphere { radius, slices, stacks } => PrimitiveGenerator::sphere(*radius, *slices, *stacks)?,
        Shape::Cone {
            radius,
            height,
            slices,
            stacks,
        } => PrimitiveGenerator::cone(*radius, *height, *slices, *stacks)?,
        Shape::Patch { input, level } => {
            let patches = PatchFile::load(input)?;
            if !patches.is_clean() {
                log::warn!("{}: {} problems while reading patches", input.display(), patches.warnings.len());
            }
            patches.value.tessellate(*level)?
        }
    };
    Ok(mesh)
}

fn run(invocation: &Invocation, config: &GeneratorConfig) -> Result<usize, GenerateError> {
    let mesh = generate(&invocation.shape)?;
    MeshFile::save(&mesh, &invocation.output, &config.write_options())?;
    Ok(mesh.vertex_count())
}

/// What `main` prints to stderr before exiting
#[derive(Debug)]
struct Failure {
    message: String,
    code: i32,
}

impl Failure {
    /// Bad command line: the error followed by the usage text
    fn usage(error: &CliError) -> Self {
        Self {
            message: format!("Error: {error}\n{USAGE}"),
            code: EXIT_FAILURE,
        }
    }

    fn fatal(error: &GenerateError) -> Self {
        Self {
            message: format!("Error: {error}"),
            code: EXIT_FAILURE,
        }
    }

    fn exit(&self) -> ! {
        eprintln!("{}", self.message);
        std::process::exit(self.code)
    }
}

/// Run one command line, returning the confirmation line
fn execute(args: &[String]) -> Result<String, Failure> {
    let config = GeneratorConfig::from_env().map_err(|e| Failure::fatal(&GenerateError::from(e)))?;
    logging::init_with_level(&config.log_level);

    let invocation = parse_args(args).map_err(|e| Failure::usage(&e))?;
    log::debug!("{invocation:?}");

    let vertices = run(&invocation, &config).map_err(|e| Failure::fatal(&e))?;
    Ok(format!("Written {vertices} vertices to {}", invocation.output.display()))
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    match execute(&args) {
        Ok(summary) => println!("{summary}"),
        Err(failure) => failure.exit(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_parse_each_shape() {
        assert_eq!(
            parse_args(&args("plane 2 3 plane.3d")).unwrap(),
            Invocation {
                shape: Shape::Plane { length: 2.0, divisions: 3 },
                output: PathBuf::from("plane.3d"),
            }
        );
        assert_eq!(
            parse_args(&args("box 1.5 2 box.3d")).unwrap().shape,
            Shape::Box { length: 1.5, divisions: 2 }
        );
        assert_eq!(
            parse_args(&args("sphere 1 10 10 sphere.3d")).unwrap().shape,
            Shape::Sphere { radius: 1.0, slices: 10, stacks: 10 }
        );
        assert_eq!(
            parse_args(&args("cone 1 2 4 3 cone.3d")).unwrap().shape,
            Shape::Cone { radius: 1.0, height: 2.0, slices: 4, stacks: 3 }
        );
        assert_eq!(
            parse_args(&args("patch teapot.patch 10 teapot.3d")).unwrap().shape,
            Shape::Patch { input: PathBuf::from("teapot.patch"), level: 10 }
        );
    }

    #[test]
    fn test_wrong_arity() {
        assert_eq!(
            parse_args(&args("sphere 1 10 sphere.3d")),
            Err(CliError::WrongArity { shape: "sphere", expected: 3, found: 2 })
        );
        assert_eq!(
            parse_args(&args("plane")),
            Err(CliError::WrongArity { shape: "plane", expected: 2, found: 0 })
        );
    }

    #[test]
    fn test_unknown_or_missing_shape() {
        assert_eq!(parse_args(&args("torus 1 2 out.3d")), Err(CliError::UnknownShape("torus".to_string())));
        assert_eq!(parse_args(&[]), Err(CliError::MissingShape));
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(matches!(
            parse_args(&args("plane two 3 out.3d")),
            Err(CliError::InvalidNumber { name: "length", .. })
        ));
        assert!(matches!(
            parse_args(&args("box 1 -2 out.3d")),
            Err(CliError::InvalidNumber { name: "divisions", .. })
        ));
    }

    #[test]
    fn test_generate_plane() {
        let mesh = generate(&Shape::Plane { length: 2.0, divisions: 1 }).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
    }

    #[test]
    fn test_zero_divisions_is_an_error() {
        assert!(matches!(
            generate(&Shape::Box { length: 1.0, divisions: 0 }),
            Err(GenerateError::Geometry(_))
        ));
    }

    #[test]
    fn test_missing_patch_file_is_an_error() {
        let shape = Shape::Patch {
            input: std::env::temp_dir().join("generator_missing_input.patch"),
            level: 2,
        };
        assert!(matches!(generate(&shape), Err(GenerateError::Patch(_))));
    }

    #[test]
    fn test_usage_errors_exit_with_usage_text() {
        for line in ["", "torus 1 2 out.3d", "sphere 1 10 out.3d", "plane x 2 out.3d"] {
            let failure = execute(&args(line)).unwrap_err();
            assert_eq!(failure.code, 1);
            assert!(failure.message.starts_with("Error: "));
            assert!(failure.message.ends_with(USAGE));
        }
        for shape in ["plane", "box", "sphere", "cone", "patch"] {
            assert!(USAGE.contains(&format!("  {shape} ")));
        }
    }

    #[test]
    fn test_generation_errors_exit_without_usage() {
        let failure = execute(&args("box 1 0 out.3d")).unwrap_err();
        assert_eq!(failure.code, 1);
        assert!(!failure.message.contains("Usage:"));
    }

    #[test]
    fn test_execute_writes_the_mesh() {
        let output = std::env::temp_dir().join(format!("generator_exec_{}.3d", std::process::id()));
        let line = format!("plane 2 1 {}", output.display());
        let summary = execute(&args(&line)).unwrap();
        let written = std::fs::read_to_string(&output).unwrap();
        std::fs::remove_file(&output).ok();

        assert!(summary.starts_with("Written 6 vertices to "));
        assert!(written.starts_with("6\n"));
    }
}
