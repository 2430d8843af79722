use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{info, warn};

use duck_domain::PackageIdent;

use crate::config::{self, ConfigStore};
use crate::outcome::UserError;

/// Subdirectory of the global configuration directory used as the
/// user-global package store.
const GLOBAL_STORE_DIR: &str = "packages";

/// Existence/overwrite gates applied while resolving an install target.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolvePolicy {
    /// Overwrite an already-installed manifest.
    pub force: bool,
    /// Skip existence probes and continue past directory-creation errors.
    pub no_check: bool,
}

/// An open manifest file plus the path it writes to. The resolver hands it
/// to the fetcher, which owns it exclusively until the download finishes or
/// fails; dropping it closes the handle. Partial files are left in place
/// for a `--force` rerun to overwrite.
#[derive(Debug)]
pub struct ManifestSink {
    file: File,
    path: PathBuf,
}

impl ManifestSink {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Write for ManifestSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("package '{ident}' seems to be already installed (use --force to install over)")]
    AlreadyInstalled { ident: String },
    #[error("could not create '{}': {source}", .path.display())]
    Create {
        path: PathBuf,
        source: io::Error,
    },
    #[error("'{}' already exists and is not a directory", .path.display())]
    NotADirectory { path: PathBuf },
    #[error("could not test whether '{}' exists: {source}", .path.display())]
    Inspect {
        path: PathBuf,
        source: io::Error,
    },
}

impl StoreError {
    /// Conflicts the user resolves with `--force` rather than real faults.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(self, StoreError::AlreadyInstalled { .. })
    }
}

enum Probe {
    Dir,
    Other,
    Missing,
}

fn probe(path: &Path) -> io::Result<Probe> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(Probe::Dir),
        Ok(_) => Ok(Probe::Other),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Probe::Missing),
        Err(err) => Err(err),
    }
}

/// Resolves `ident` to a writable manifest sink under `root`.
///
/// Every segment but the last becomes a directory, ensured idempotently so
/// a rerun after a partial failure converges; the last segment becomes the
/// `<name>.duckpkg.ini` target, created fresh (truncating) once the
/// already-installed gate passes.
pub fn resolve(
    root: &Path,
    ident: &PackageIdent,
    policy: ResolvePolicy,
) -> Result<ManifestSink, StoreError> {
    let mut current = root.to_path_buf();
    for segment in ident.parents() {
        current.push(segment);
        if !policy.no_check {
            match probe(&current) {
                Ok(Probe::Dir) => continue,
                Ok(Probe::Other) => return Err(StoreError::NotADirectory { path: current }),
                Ok(Probe::Missing) => {}
                Err(source) => return Err(StoreError::Inspect { path: current, source }),
            }
        }
        if let Err(source) = fs::create_dir(&current) {
            if policy.no_check {
                warn!(
                    path = %current.display(),
                    error = %source,
                    "could not create directory; continuing (--no-check)"
                );
            } else {
                return Err(StoreError::Create { path: current, source });
            }
        }
    }

    current.push(ident.manifest_file_name());
    if !policy.no_check {
        match probe(&current) {
            Ok(Probe::Missing) => {}
            Ok(_) if policy.force => {}
            Ok(_) => {
                return Err(StoreError::AlreadyInstalled {
                    ident: ident.to_string(),
                })
            }
            Err(source) => return Err(StoreError::Inspect { path: current, source }),
        }
    }
    let file = match File::create(&current) {
        Ok(file) => file,
        Err(source) => return Err(StoreError::Create { path: current, source }),
    };
    Ok(ManifestSink {
        file,
        path: current,
    })
}

/// Store root for `--global` installs, created on first use.
pub fn global_store_root() -> Result<PathBuf> {
    let root = config::global_config_dir()?.join(GLOBAL_STORE_DIR);
    if !root.exists() {
        info!(path = %root.display(), "creating the user-global package store");
        fs::create_dir_all(&root)
            .with_context(|| format!("could not create the global package store at {}", root.display()))?;
    }
    Ok(root)
}

/// Store root for project installs: `.duck/<packages.directory>` from the
/// project configuration. Missing configuration is a precondition failure
/// for the whole batch, surfaced as a user error.
pub fn project_store_root(project_root: &Path) -> Result<PathBuf> {
    let store = ConfigStore::open_project(project_root)?;
    let Some(dir) = store.get_str("packages", "directory") else {
        return Err(UserError::new(
            "project configuration has no 'directory' key in its 'packages' section",
            json!({
                "path": store.path().display().to_string(),
                "hint": "add `directory = \"packages\"` under [packages]",
            }),
        )
        .into());
    };
    Ok(project_root.join(config::PROJECT_DIR).join(dir))
}
