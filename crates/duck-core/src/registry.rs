use std::path::Path;

use anyhow::Result;
use indexmap::IndexMap;
use serde_json::json;
use toml_edit::{value, Item, Table};
use tracing::info;

use duck_domain::{Repository, DEFAULT_REPO_NAME, DEFAULT_REPO_URL};

use crate::config::{self, ConfigStore};
use crate::outcome::{outcome_from_error, ExecutionOutcome};

const REPOS_SECTION: &str = "repos";

/// Which configuration document a command operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoScope {
    Project,
    Global,
}

/// The `repos` section of a configuration document: an ordered name → base
/// URL mapping that doubles as the fallback priority list.
#[derive(Debug)]
pub struct RepositoryRegistry {
    store: ConfigStore,
}

impl RepositoryRegistry {
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }

    /// Opens the registry backing the given scope. The global document may
    /// be absent (it loads empty); a project document must exist.
    pub fn open(scope: RepoScope, project_root: &Path) -> Result<Self> {
        let store = match scope {
            RepoScope::Project => ConfigStore::open_project(project_root)?,
            RepoScope::Global => ConfigStore::open(config::global_config_path()?)?,
        };
        Ok(Self::new(store))
    }

    /// Repositories in document order. An absent section is an empty
    /// registry, not an error; callers seed a default.
    pub fn list(&self) -> IndexMap<String, String> {
        let mut repos = IndexMap::new();
        if let Some(table) = self.store.doc().get(REPOS_SECTION).and_then(Item::as_table) {
            for (name, item) in table.iter() {
                if let Some(url) = item.as_str() {
                    repos.insert(name.to_string(), url.to_string());
                }
            }
        }
        repos
    }

    /// Inserts or overwrites `name = url` and persists the whole document.
    pub fn add(&mut self, name: &str, url: &str) -> Result<()> {
        let section = self
            .store
            .doc_mut()
            .entry(REPOS_SECTION)
            .or_insert(Item::Table(Table::new()));
        if let Some(table) = section.as_table_mut() {
            table.insert(name, value(url));
        }
        self.store.save()
    }

    /// Seeds the default repository when none is configured, persisting it
    /// before returning the (re-read) list.
    pub fn ensure_default(&mut self) -> Result<IndexMap<String, String>> {
        let repos = self.list();
        if !repos.is_empty() {
            return Ok(repos);
        }
        info!(
            name = DEFAULT_REPO_NAME,
            url = DEFAULT_REPO_URL,
            "no repository configured; installing default repository"
        );
        self.add(DEFAULT_REPO_NAME, DEFAULT_REPO_URL)?;
        Ok(self.list())
    }

    /// The ordered list as domain values.
    pub fn repositories(&self) -> Vec<Repository> {
        self.list()
            .iter()
            .map(|(name, url)| Repository::new(name, url))
            .collect()
    }
}

/// `duck repo list`.
pub fn repo_list(scope: RepoScope, project_root: &Path) -> Result<ExecutionOutcome> {
    let registry = match RepositoryRegistry::open(scope, project_root) {
        Ok(registry) => registry,
        Err(err) => return outcome_from_error(err),
    };
    let repos = registry.repositories();
    let message = if repos.is_empty() {
        "no repository configured".to_string()
    } else {
        format!(
            "{} repositor{} configured",
            repos.len(),
            if repos.len() == 1 { "y" } else { "ies" }
        )
    };
    Ok(ExecutionOutcome::success(
        message,
        json!({ "repos": repos }),
    ))
}

/// `duck repo add NAME URL`.
pub fn repo_add(scope: RepoScope, project_root: &Path, name: &str, url: &str) -> Result<ExecutionOutcome> {
    let mut registry = match RepositoryRegistry::open(scope, project_root) {
        Ok(registry) => registry,
        Err(err) => return outcome_from_error(err),
    };
    registry.add(name, url)?;
    Ok(ExecutionOutcome::success(
        format!("added repository '{name}'"),
        json!({ "name": name, "url": url }),
    ))
}
