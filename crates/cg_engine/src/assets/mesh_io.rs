//! Mesh text format
//!
//! ```text
//! <vertexCount>
//! x,y,z                        geometry-only record
//! x,y,z ; nx,ny,nz ; u,v       full record
//! ```
//!
//! Numbers are written as bare integers when exactly integral and in fixed
//! notation otherwise; the reader accepts any float syntax. One file uses a
//! single record shape, fixed by its first valid data line.

use super::{content_lines, parse_floats, ParseWarning, Parsed, WarningLog};
use crate::foundation::math::{Vec2, Vec3};
use crate::geometry::{Mesh, MeshError};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Mesh file I/O failures
#[derive(Error, Debug)]
pub enum MeshIoError {
    /// The file could not be read
    #[error("failed to read mesh file {path}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The file could not be written
    #[error("failed to write mesh file {path}: {source}")]
    Write {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// A caller-supplied writer failed
    #[error("failed to write mesh: {0}")]
    Sink(#[source] io::Error),

    /// The mesh handed to the writer breaks the triangle-list invariants
    #[error("refusing to write invalid mesh: {0}")]
    InvalidMesh(#[from] MeshError),
}

/// Which record shape to write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordFormat {
    /// Position, normal and texture coordinate per line
    #[default]
    Full,
    /// Position only
    GeometryOnly,
}

/// Options controlling the writer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Record shape to emit
    pub format: RecordFormat,

    /// Digits after the decimal point for non-integral values
    pub decimals: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            format: RecordFormat::Full,
            decimals: 4,
        }
    }
}

impl WriteOptions {
    /// Geometry-only records with the default precision
    pub fn geometry_only() -> Self {
        Self {
            format: RecordFormat::GeometryOnly,
            ..Self::default()
        }
    }
}

/// Format one number: bare integer when exactly integral, fixed notation otherwise
pub fn format_number(value: f32, decimals: usize) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.decimals$}")
    }
}

fn push_group(out: &mut String, values: &[f32], decimals: usize) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&format_number(*value, decimals));
    }
}

enum Record {
    Position(Vec3),
    Full(Vec3, Vec3, Vec2),
}

impl Record {
    fn parse(content: &str) -> Option<Self> {
        let groups: Vec<&str> = content.split(';').collect();
        match groups.as_slice() {
            [position] => parse_floats::<3>(position).map(|p| Self::Position(Vec3::from(p))),
            [position, normal, uv] => Some(Self::Full(
                Vec3::from(parse_floats::<3>(position)?),
                Vec3::from(parse_floats::<3>(normal)?),
                Vec2::from(parse_floats::<2>(uv)?),
            )),
            _ => None,
        }
    }

    fn format(&self) -> RecordFormat {
        match self {
            Self::Position(_) => RecordFormat::GeometryOnly,
            Self::Full(..) => RecordFormat::Full,
        }
    }
}

/// Reader and writer for the mesh text format
pub struct MeshFile;

impl MeshFile {
    /// Encode a mesh as text.
    ///
    /// A mesh without normals and texture coordinates is always written as
    /// geometry-only records, whatever `options.format` asks for.
    pub fn to_text(mesh: &Mesh, options: &WriteOptions) -> Result<String, MeshError> {
        mesh.validate()?;

        let attributes = match (options.format, &mesh.normals, &mesh.tex_coords) {
            (RecordFormat::Full, Some(normals), Some(tex_coords)) => Some((normals, tex_coords)),
            (RecordFormat::Full, _, _) => {
                log::debug!("mesh has no attributes, writing geometry-only records");
                None
            }
            (RecordFormat::GeometryOnly, _, _) => None,
        };

        let mut out = String::with_capacity(mesh.vertex_count() * 48 + 16);
        out.push_str(&mesh.vertex_count().to_string());
        out.push('\n');

        for (i, p) in mesh.positions.iter().enumerate() {
            push_group(&mut out, p.as_slice(), options.decimals);
            if let Some((normals, tex_coords)) = attributes {
                out.push_str(" ; ");
                push_group(&mut out, normals[i].as_slice(), options.decimals);
                out.push_str(" ; ");
                push_group(&mut out, tex_coords[i].as_slice(), options.decimals);
            }
            out.push('\n');
        }
        Ok(out)
    }

    /// Write a mesh to any writer
    pub fn write<W: Write>(mesh: &Mesh, writer: &mut W, options: &WriteOptions) -> Result<(), MeshIoError> {
        let text = Self::to_text(mesh, options)?;
        writer.write_all(text.as_bytes()).map_err(MeshIoError::Sink)
    }

    /// Write a mesh to a file, replacing it
    pub fn save<P: AsRef<Path>>(mesh: &Mesh, path: P, options: &WriteOptions) -> Result<(), MeshIoError> {
        let path = path.as_ref();
        let text = Self::to_text(mesh, options)?;
        let write_error = |source| MeshIoError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = BufWriter::new(File::create(path).map_err(write_error)?);
        writer.write_all(text.as_bytes()).map_err(write_error)?;
        writer.flush().map_err(write_error)?;

        log::info!("wrote {} vertices to {}", mesh.vertex_count(), path.display());
        Ok(())
    }

    /// Read a mesh file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Parsed<Mesh>, MeshIoError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| MeshIoError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = Self::parse_named(&text, &path.display().to_string());
        log::debug!(
            "loaded {} vertices from {} ({} warnings)",
            parsed.value.vertex_count(),
            path.display(),
            parsed.warnings.len()
        );
        Ok(parsed)
    }

    /// Parse mesh text
    pub fn parse(text: &str) -> Parsed<Mesh> {
        Self::parse_named(text, "<mesh>")
    }

    /// Parse mesh text, naming `source` in logged warnings
    pub fn parse_named(text: &str, source: &str) -> Parsed<Mesh> {
        let mut warnings = WarningLog::new(source);
        let mut lines = content_lines(text).peekable();

        let declared = match lines.peek().map(|(_, first)| first.parse::<usize>()) {
            Some(Ok(count)) => {
                lines.next();
                Some(count)
            }
            _ => {
                warnings.report(ParseWarning::MissingHeader);
                None
            }
        };

        let mut shape = None;
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut tex_coords = Vec::new();

        for (line, content) in lines {
            let Some(record) = Record::parse(content) else {
                warnings.report(ParseWarning::MalformedLine {
                    line,
                    content: content.to_string(),
                });
                continue;
            };

            match shape {
                None => shape = Some(record.format()),
                Some(expected) if expected != record.format() => {
                    warnings.report(ParseWarning::MixedRecordShape { line });
                    continue;
                }
                Some(_) => {}
            }

            match record {
                Record::Position(p) => positions.push(p),
                Record::Full(p, n, uv) => {
                    positions.push(p);
                    normals.push(n);
                    tex_coords.push(uv);
                }
            }
        }

        let parsed = positions.len();
        if let Some(declared) = declared {
            if declared != parsed {
                warnings.report(ParseWarning::CountMismatch { declared, parsed });
            }
        }

        let dropped = parsed % 3;
        if dropped > 0 {
            let keep = parsed - dropped;
            positions.truncate(keep);
            normals.truncate(keep);
            tex_coords.truncate(keep);
            warnings.report(ParseWarning::IncompleteTriangle { dropped });
        }

        let mesh = match shape {
            Some(RecordFormat::Full) => Mesh::with_attributes(positions, normals, tex_coords),
            _ => Mesh::from_positions(positions),
        };
        warnings.finish(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PrimitiveGenerator;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_format_number_integral_and_fixed() {
        assert_eq!(format_number(2.0, 4), "2");
        assert_eq!(format_number(-1.0, 4), "-1");
        assert_eq!(format_number(-0.0, 4), "0");
        assert_eq!(format_number(0.5, 4), "0.5000");
        assert_eq!(format_number(-0.123_456, 4), "-0.1235");
        assert_eq!(format_number(1.25, 2), "1.25");
    }

    #[test]
    fn test_plane_text_layout() {
        let mesh = PrimitiveGenerator::plane(2.0, 1).unwrap();
        let text = MeshFile::to_text(&mesh, &WriteOptions::default()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "6");
        assert_eq!(lines[1], "-1,0,1 ; 0,1,0 ; 0,0");
        assert_eq!(lines[2], "1,0,1 ; 0,1,0 ; 1,0");

        let geometry = MeshFile::to_text(&mesh, &WriteOptions::geometry_only()).unwrap();
        assert_eq!(geometry.lines().nth(1), Some("-1,0,1"));
    }

    #[test]
    fn test_full_round_trip() {
        let mesh = PrimitiveGenerator::sphere(1.5, 7, 5).unwrap();
        let text = MeshFile::to_text(&mesh, &WriteOptions::default()).unwrap();
        let parsed = MeshFile::parse(&text);
        assert!(parsed.is_clean(), "{:?}", parsed.warnings);

        let back = parsed.value;
        assert_eq!(back.vertex_count(), mesh.vertex_count());
        for (a, b) in back.positions.iter().zip(&mesh.positions) {
            assert_relative_eq!(a, b, epsilon = EPSILON);
        }
        for (a, b) in back.normals.unwrap().iter().zip(mesh.normals.as_ref().unwrap()) {
            assert_relative_eq!(a, b, epsilon = EPSILON);
        }
        for (a, b) in back.tex_coords.unwrap().iter().zip(mesh.tex_coords.as_ref().unwrap()) {
            assert_relative_eq!(a, b, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_geometry_only_round_trip() {
        let mesh = PrimitiveGenerator::cone(1.0, 2.0, 5, 3).unwrap();
        let text = MeshFile::to_text(&mesh, &WriteOptions::geometry_only()).unwrap();
        let back = MeshFile::parse(&text);
        assert!(back.is_clean());
        assert!(!back.value.has_attributes());
        for (a, b) in back.value.positions.iter().zip(&mesh.positions) {
            assert_relative_eq!(a, b, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_full_request_without_attributes_writes_geometry() {
        let mesh = PrimitiveGenerator::plane(1.0, 1).unwrap().into_geometry_only();
        let text = MeshFile::to_text(&mesh, &WriteOptions::default()).unwrap();
        assert!(!text.contains(';'));
    }

    #[test]
    fn test_refuses_invalid_mesh() {
        let mesh = Mesh::from_positions(vec![Vec3::zeros(); 2]);
        assert_eq!(
            MeshFile::to_text(&mesh, &WriteOptions::default()),
            Err(MeshError::IncompleteTriangle(2))
        );
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_failure_is_a_sink_error() {
        let mesh = PrimitiveGenerator::plane(1.0, 1).unwrap();
        let result = MeshFile::write(&mesh, &mut FailingWriter, &WriteOptions::default());
        match result {
            Err(MeshIoError::Sink(source)) => assert_eq!(source.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("expected a sink error, got {other:?}"),
        }

        let mut buffer = Vec::new();
        MeshFile::write(&mesh, &mut buffer, &WriteOptions::default()).unwrap();
        assert!(buffer.starts_with(b"6\n"));
    }

    #[test]
    fn test_short_file_keeps_parsed_lines() {
        let text = "5\n0,0,0\n1,0,0\n0,1,0\n";
        let parsed = MeshFile::parse(text);
        assert_eq!(parsed.value.vertex_count(), 3);
        assert_eq!(
            parsed.warnings,
            vec![ParseWarning::CountMismatch { declared: 5, parsed: 3 }]
        );
    }

    #[test]
    fn test_huge_header_is_only_a_mismatch() {
        let parsed = MeshFile::parse("99999999999999\n0,0,0\n1,0,0\n0,1,0\n");
        assert_eq!(parsed.value.vertex_count(), 3);
        assert_eq!(
            parsed.warnings,
            vec![ParseWarning::CountMismatch { declared: 99_999_999_999_999, parsed: 3 }]
        );

        let parsed = MeshFile::parse("18446744073709551615\n");
        assert!(parsed.value.is_empty());
        assert_eq!(
            parsed.warnings,
            vec![ParseWarning::CountMismatch { declared: usize::MAX, parsed: 0 }]
        );
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "3\n0,0,0\nnot a vertex\n1,0,0\n0,1\n0,1,0\n";
        let parsed = MeshFile::parse(text);
        assert_eq!(parsed.value.vertex_count(), 3);
        assert_eq!(
            parsed.warnings,
            vec![
                ParseWarning::MalformedLine { line: 3, content: "not a vertex".into() },
                ParseWarning::MalformedLine { line: 5, content: "0,1".into() },
            ]
        );
    }

    #[test]
    fn test_mixed_shapes_keep_first() {
        let text = "3\n0,0,0 ; 0,1,0 ; 0,0\n1,0,0\n1,0,0 ; 0,1,0 ; 1,0\n0,0,1 ; 0,1,0 ; 0,1\n";
        let parsed = MeshFile::parse(text);
        assert!(parsed.value.has_attributes());
        assert_eq!(parsed.value.vertex_count(), 3);
        assert_eq!(parsed.warnings, vec![ParseWarning::MixedRecordShape { line: 3 }]);
    }

    #[test]
    fn test_missing_header_and_trailing_vertex() {
        let text = "0,0,0\n1,0,0\n0,1,0\n5,5,5\n";
        let parsed = MeshFile::parse(text);
        assert_eq!(parsed.value.vertex_count(), 3);
        assert_eq!(
            parsed.warnings,
            vec![
                ParseWarning::MissingHeader,
                ParseWarning::IncompleteTriangle { dropped: 1 },
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let parsed = MeshFile::parse("");
        assert!(parsed.value.is_empty());
        assert_eq!(parsed.warnings, vec![ParseWarning::MissingHeader]);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let path = std::env::temp_dir().join("cg_engine_mesh_io_does_not_exist.3d");
        assert!(matches!(MeshFile::load(&path), Err(MeshIoError::Read { .. })));
    }
}
