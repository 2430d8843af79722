#![deny(clippy::all)]
#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod config;
mod fetch;
mod install;
mod outcome;
mod registry;
mod store;

pub use config::{
    global_config_dir, global_config_path, project_config_path, ConfigStore, CONFIG_DIR_ENV,
    CONFIG_FILE, MISSING_PROJECT_HINT, MISSING_PROJECT_MESSAGE, PROJECT_DIR,
};
pub use fetch::{fetch_manifest, http_client, ExhaustedError, FetchedManifest};
pub use install::{get_packages, get_packages_in, GetRequest};
pub use outcome::{
    outcome_from_error, to_json_response, CommandStatus, ExecutionOutcome, UserError,
};
pub use registry::{repo_add, repo_list, RepoScope, RepositoryRegistry};
pub use store::{
    global_store_root, project_store_root, resolve, ManifestSink, ResolvePolicy, StoreError,
};
