use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;
use toml_edit::{DocumentMut, Item};

use crate::outcome::UserError;

/// Project-scoped configuration lives under this directory.
pub const PROJECT_DIR: &str = ".duck";
/// File name of the configuration document in either scope.
pub const CONFIG_FILE: &str = "duck.toml";
/// Overrides the user-global configuration directory (tests, ops).
pub const CONFIG_DIR_ENV: &str = "DUCK_CONFIG_DIR";

pub const MISSING_PROJECT_MESSAGE: &str = "this directory is not a duck project";
pub const MISSING_PROJECT_HINT: &str =
    "run from a directory containing .duck/duck.toml, or pass --global";

/// A configuration document tied to the path it was loaded from.
///
/// Sections are TOML tables holding ordered `key = "value"` pairs;
/// `toml_edit` keeps their order across load/save, so anything that treats
/// a section as a priority list stays deterministic.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    doc: DocumentMut,
}

impl ConfigStore {
    /// Opens the document at `path`, treating a missing file as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc = match fs::read_to_string(&path) {
            Ok(contents) => contents
                .parse()
                .with_context(|| format!("could not parse {}", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => DocumentMut::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("could not read {}", path.display()))
            }
        };
        Ok(Self { path, doc })
    }

    /// Opens the project configuration, failing with a user error when the
    /// project has not been initialized.
    pub fn open_project(project_root: &Path) -> Result<Self> {
        let path = project_config_path(project_root);
        if !path.exists() {
            return Err(UserError::new(
                MISSING_PROJECT_MESSAGE,
                json!({
                    "path": path.display().to_string(),
                    "hint": MISSING_PROJECT_HINT,
                }),
            )
            .into());
        }
        Self::open(path)
    }

    /// Persists the whole document back to its path, creating parent
    /// directories on first save.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("could not create {}", parent.display()))?;
        }
        fs::write(&self.path, self.doc.to_string())
            .with_context(|| format!("could not write {}", self.path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn doc(&self) -> &DocumentMut {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut DocumentMut {
        &mut self.doc
    }

    /// String value of `key` inside `section`, if both exist.
    pub fn get_str(&self, section: &str, key: &str) -> Option<&str> {
        self.doc
            .get(section)
            .and_then(Item::as_table_like)
            .and_then(|table| table.get(key))
            .and_then(Item::as_str)
    }
}

/// The user-global configuration directory, honoring `DUCK_CONFIG_DIR`.
pub fn global_config_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let base = dirs_next::config_dir()
        .context("could not determine the user configuration directory")?;
    Ok(base.join("duck"))
}

pub fn global_config_path() -> Result<PathBuf> {
    Ok(global_config_dir()?.join(CONFIG_FILE))
}

pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR).join(CONFIG_FILE)
}
