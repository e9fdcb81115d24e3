//! Asset file formats and loading
//!
//! Parsers in this module are lenient: a bad line is skipped, a wrong count
//! is tolerated, and every such problem is logged and handed back to the
//! caller as a [`ParseWarning`] next to the value that could be recovered.
//! Only I/O failures surface as errors.

pub mod mesh_io;
pub mod mesh_library;
pub mod patch_io;

pub use mesh_io::{format_number, MeshFile, MeshIoError, RecordFormat, WriteOptions};
pub use mesh_library::{LoadedMesh, MeshLibrary};
pub use patch_io::{PatchFile, PatchIoError};

use thiserror::Error;

/// Recoverable data problem found while parsing a text asset
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// The first line is not a count
    #[error("missing count header")]
    MissingHeader,

    /// A line does not match the expected field pattern and was skipped
    #[error("line {line}: cannot parse `{content}`")]
    MalformedLine {
        /// 1-based line number
        line: usize,
        /// The offending line, trimmed
        content: String,
    },

    /// The header count disagrees with the number of records read
    #[error("header declares {declared} records but {parsed} were parsed")]
    CountMismatch {
        /// Count from the header
        declared: usize,
        /// Records actually parsed
        parsed: usize,
    },

    /// Trailing vertices that do not form a full triangle were dropped
    #[error("dropped {dropped} trailing vertices that do not form a triangle")]
    IncompleteTriangle {
        /// Number of vertices dropped
        dropped: usize,
    },

    /// A record uses the other record shape than the rest of the file
    #[error("line {line}: record shape differs from the first record")]
    MixedRecordShape {
        /// 1-based line number
        line: usize,
    },

    /// A patch references a control point that does not exist
    #[error("patch {patch}: control point index {index} out of range (pool has {pool})")]
    IndexOutOfRange {
        /// 0-based patch number
        patch: usize,
        /// The offending index
        index: u32,
        /// Size of the control-point pool
        pool: usize,
    },

    /// A patch line does not hold exactly 16 indices
    #[error("line {line}: expected 16 patch indices, found {found}")]
    WrongIndexCount {
        /// 1-based line number
        line: usize,
        /// Number of indices present
        found: usize,
    },
}

/// A parsed value together with the warnings raised while producing it
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    /// What could be recovered from the input
    pub value: T,

    /// Problems encountered, in input order
    pub warnings: Vec<ParseWarning>,
}

impl<T> Parsed<T> {
    /// Whether parsing raised no warnings
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Discard the warnings
    pub fn into_value(self) -> T {
        self.value
    }

    /// Transform the value, keeping the warnings
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        Parsed {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

/// Collects warnings for one input, logging each as it arrives
#[derive(Debug)]
pub(crate) struct WarningLog<'a> {
    source: &'a str,
    warnings: Vec<ParseWarning>,
}

impl<'a> WarningLog<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            source,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn report(&mut self, warning: ParseWarning) {
        log::warn!("{}: {}", self.source, warning);
        self.warnings.push(warning);
    }

    pub(crate) fn finish<T>(self, value: T) -> Parsed<T> {
        Parsed {
            value,
            warnings: self.warnings,
        }
    }
}

/// Parse a comma-separated group of exactly `N` finite floats
pub(crate) fn parse_floats<const N: usize>(group: &str) -> Option<[f32; N]> {
    let mut out = [0.0; N];
    let mut fields = group.split(',');
    for slot in &mut out {
        let value: f32 = fields.next()?.trim().parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        *slot = value;
    }
    if fields.next().is_some() {
        return None;
    }
    Some(out)
}

/// Non-empty lines of `text` with their 1-based line numbers, trimmed
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}
