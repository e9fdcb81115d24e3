//! Bézier patch control file
//!
//! ```text
//! <patchCount>
//! i0, i1, ..., i15          one line per patch
//! <controlPointCount>
//! x, y, z                   one line per control point
//! ```

use super::{content_lines, parse_floats, ParseWarning, Parsed, WarningLog};
use crate::foundation::math::Vec3;
use crate::geometry::bezier::{BezierPatch, PatchSet, PATCH_SIZE};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Patch file failures
#[derive(Error, Debug)]
pub enum PatchIoError {
    /// The file could not be read
    #[error("failed to read patch file {path}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Nothing usable was found in the file
    #[error("no usable patches in {0}")]
    NoPatches(PathBuf),
}

enum IndexLine {
    Patch([u32; PATCH_SIZE]),
    WrongCount(usize),
    Malformed,
}

fn parse_index_line(content: &str) -> IndexLine {
    let fields: Result<Vec<u32>, _> = content.split(',').map(|f| f.trim().parse::<u32>()).collect();
    match fields {
        Ok(indices) => match <[u32; PATCH_SIZE]>::try_from(indices.as_slice()) {
            Ok(patch) => IndexLine::Patch(patch),
            Err(_) => IndexLine::WrongCount(indices.len()),
        },
        Err(_) => IndexLine::Malformed,
    }
}

/// Reader for patch control files
pub struct PatchFile;

impl PatchFile {
    /// Read and resolve a patch file.
    ///
    /// Fails when the file cannot be read or yields no usable patch.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Parsed<PatchSet>, PatchIoError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PatchIoError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = Self::parse_named(&text, &path.display().to_string());
        if parsed.value.is_empty() {
            return Err(PatchIoError::NoPatches(path.to_path_buf()));
        }

        log::info!("loaded {} patches from {}", parsed.value.len(), path.display());
        Ok(parsed)
    }

    /// Parse patch file text
    pub fn parse(text: &str) -> Parsed<PatchSet> {
        Self::parse_named(text, "<patches>")
    }

    /// Parse patch file text, naming `source` in logged warnings.
    ///
    /// Patches with a malformed line or an index outside the control-point
    /// pool are dropped; everything else is kept.
    pub fn parse_named(text: &str, source: &str) -> Parsed<PatchSet> {
        let mut warnings = WarningLog::new(source);
        let mut lines = content_lines(text);

        let Some(patch_count) = lines.next().and_then(|(_, first)| first.parse::<usize>().ok()) else {
            warnings.report(ParseWarning::MissingHeader);
            return warnings.finish(PatchSet::default());
        };

        let mut index_lines = Vec::new();
        for _ in 0..patch_count {
            let Some((line, content)) = lines.next() else {
                break;
            };
            match parse_index_line(content) {
                IndexLine::Patch(indices) => index_lines.push(indices),
                IndexLine::WrongCount(found) => warnings.report(ParseWarning::WrongIndexCount { line, found }),
                IndexLine::Malformed => warnings.report(ParseWarning::MalformedLine {
                    line,
                    content: content.to_string(),
                }),
            }
        }

        let point_count = match lines.next() {
            Some((line, content)) => match content.parse::<usize>() {
                Ok(count) => Some(count),
                Err(_) => {
                    warnings.report(ParseWarning::MalformedLine {
                        line,
                        content: content.to_string(),
                    });
                    None
                }
            },
            None => {
                warnings.report(ParseWarning::MissingHeader);
                None
            }
        };

        let mut pool = Vec::new();
        for (line, content) in lines {
            match parse_floats::<3>(content) {
                Some(point) => pool.push(Vec3::from(point)),
                None => warnings.report(ParseWarning::MalformedLine {
                    line,
                    content: content.to_string(),
                }),
            }
        }

        if let Some(declared) = point_count {
            if declared != pool.len() {
                warnings.report(ParseWarning::CountMismatch {
                    declared,
                    parsed: pool.len(),
                });
            }
        }

        let mut patches = Vec::with_capacity(index_lines.len());
        for (patch, indices) in index_lines.iter().enumerate() {
            match BezierPatch::from_indices(indices, &pool) {
                Ok(resolved) => patches.push(resolved),
                Err(index) => warnings.report(ParseWarning::IndexOutOfRange {
                    patch,
                    index,
                    pool: pool.len(),
                }),
            }
        }

        if patches.len() != patch_count {
            warnings.report(ParseWarning::CountMismatch {
                declared: patch_count,
                parsed: patches.len(),
            });
        }

        warnings.finish(PatchSet::new(patches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One patch whose corners are distinct and every other point is the origin
    const CORNER_PATCH: &str = "\
1
1,0,0,2,0,0,0,0,0,0,0,0,3,0,0,4
5
0,0,0
-1,0,-1
1,0,-1
-1,0,1
1,2,1
";

    #[test]
    fn test_parse_corner_patch() {
        let parsed = PatchFile::parse(CORNER_PATCH);
        assert!(parsed.is_clean(), "{:?}", parsed.warnings);
        assert_eq!(parsed.value.len(), 1);

        let patch = &parsed.value.patches()[0];
        assert_eq!(patch.control_point(0, 0), Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(patch.control_point(0, 3), Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(patch.control_point(3, 0), Vec3::new(-1.0, 0.0, 1.0));
        assert_eq!(patch.control_point(3, 3), Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(patch.control_point(1, 1), Vec3::zeros());

        let mesh = parsed.value.tessellate(1).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
    }

    #[test]
    fn test_out_of_range_index_drops_patch() {
        let text = "2\n0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0\n0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,7\n1\n1,2,3\n";
        let parsed = PatchFile::parse(text);
        assert_eq!(parsed.value.len(), 1);
        assert_eq!(
            parsed.warnings,
            vec![
                ParseWarning::IndexOutOfRange { patch: 1, index: 7, pool: 1 },
                ParseWarning::CountMismatch { declared: 2, parsed: 1 },
            ]
        );
    }

    #[test]
    fn test_wrong_index_count_and_bad_point() {
        let text = "1\n0,1,2\n2\n0,0,0\nx,y,z\n";
        let parsed = PatchFile::parse(text);
        assert!(parsed.value.is_empty());
        assert_eq!(
            parsed.warnings,
            vec![
                ParseWarning::WrongIndexCount { line: 2, found: 3 },
                ParseWarning::MalformedLine { line: 5, content: "x,y,z".into() },
                ParseWarning::CountMismatch { declared: 2, parsed: 1 },
                ParseWarning::CountMismatch { declared: 1, parsed: 0 },
            ]
        );
    }

    #[test]
    fn test_huge_counts_are_only_mismatches() {
        let parsed = PatchFile::parse("18446744073709551615\n");
        assert!(parsed.value.is_empty());
        assert_eq!(
            parsed.warnings,
            vec![
                ParseWarning::MissingHeader,
                ParseWarning::CountMismatch { declared: usize::MAX, parsed: 0 },
            ]
        );

        let text = "1\n0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0\n99999999999999\n1,2,3\n";
        let parsed = PatchFile::parse(text);
        assert_eq!(parsed.value.len(), 1);
        assert_eq!(
            parsed.warnings,
            vec![ParseWarning::CountMismatch { declared: 99_999_999_999_999, parsed: 1 }]
        );
    }

    #[test]
    fn test_missing_header() {
        let parsed = PatchFile::parse("hello\n");
        assert!(parsed.value.is_empty());
        assert_eq!(parsed.warnings, vec![ParseWarning::MissingHeader]);
    }

    #[test]
    fn test_load_reports_no_patches() {
        let path = std::env::temp_dir().join(format!("cg_engine_empty_patch_{}.patch", std::process::id()));
        fs::write(&path, "0\n0\n").unwrap();
        let result = PatchFile::load(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(PatchIoError::NoPatches(_))));
    }
}
