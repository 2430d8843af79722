use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Suffix shared by stored manifests and their remote counterparts.
pub const MANIFEST_SUFFIX: &str = ".duckpkg.ini";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentError {
    #[error("package name is empty")]
    Empty,
    #[error("package name '{0}' contains an empty segment")]
    EmptySegment(String),
}

/// A slash-delimited package name such as `snwfdhmp/go`.
///
/// Invariant: at least one segment, and no segment is empty. Leading,
/// trailing, and doubled slashes are rejected at parse time rather than
/// silently producing degenerate store paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageIdent {
    parents: Vec<String>,
    name: String,
}

impl PackageIdent {
    pub fn parse(raw: &str) -> Result<Self, IdentError> {
        if raw.is_empty() {
            return Err(IdentError::Empty);
        }
        let mut segments: Vec<String> = raw.split('/').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(IdentError::EmptySegment(raw.to_string()));
        }
        let name = segments.pop().ok_or(IdentError::Empty)?;
        Ok(Self {
            parents: segments,
            name,
        })
    }

    /// Directory segments, i.e. everything but the manifest segment.
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// The final segment, which names the manifest file.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name of the stored manifest: `<name>.duckpkg.ini`.
    pub fn manifest_file_name(&self) -> String {
        format!("{}{MANIFEST_SUFFIX}", self.name)
    }

    /// Path of the manifest relative to a store root, one component per
    /// segment with the last suffixed by `.duckpkg.ini`.
    pub fn manifest_rel_path(&self) -> PathBuf {
        let mut path: PathBuf = self.parents.iter().collect();
        path.push(self.manifest_file_name());
        path
    }

    /// The identifier joined with `/` followed by the manifest suffix, as it
    /// appears in repository URLs.
    pub fn manifest_rel(&self) -> String {
        format!("{}{MANIFEST_SUFFIX}", self)
    }
}

impl fmt::Display for PackageIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for parent in &self.parents {
            write!(f, "{parent}/")?;
        }
        write!(f, "{}", self.name)
    }
}
