use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::{json, Value};
use tracing::info;

use duck_domain::{PackageIdent, Repository};

use crate::fetch;
use crate::outcome::{outcome_from_error, ExecutionOutcome};
use crate::registry::{RepoScope, RepositoryRegistry};
use crate::store::{self, ResolvePolicy};

/// One `duck get` invocation.
#[derive(Debug, Clone, Default)]
pub struct GetRequest {
    pub packages: Vec<String>,
    pub force: bool,
    pub no_check: bool,
    pub global: bool,
}

#[derive(Debug)]
enum PackageResult {
    Installed {
        repo: String,
        path: PathBuf,
        bytes: u64,
    },
    /// The user can fix this one (bad name, already installed).
    Rejected { reason: String },
    /// Path construction or repository exhaustion.
    Failed { reason: String },
}

#[derive(Debug)]
struct PackageReport {
    package: String,
    result: PackageResult,
}

/// `duck get` against the current working directory.
pub fn get_packages(request: &GetRequest) -> Result<ExecutionOutcome> {
    let cwd = env::current_dir()?;
    get_packages_in(&cwd, request)
}

/// Installs every requested package, continuing past per-package failures.
///
/// Only preconditions abort the whole batch: an unusable store root or an
/// unreadable registry. Everything after that is reported per package.
pub fn get_packages_in(project_root: &Path, request: &GetRequest) -> Result<ExecutionOutcome> {
    let scope = if request.global {
        RepoScope::Global
    } else {
        RepoScope::Project
    };

    let store_root = match store_root_for(scope, project_root) {
        Ok(root) => root,
        Err(err) => return outcome_from_error(err),
    };
    let mut registry = match RepositoryRegistry::open(scope, project_root) {
        Ok(registry) => registry,
        Err(err) => return outcome_from_error(err),
    };
    let repos: Vec<Repository> = registry
        .ensure_default()?
        .iter()
        .map(|(name, url)| Repository::new(name, url))
        .collect();
    let client = fetch::http_client()?;

    let policy = ResolvePolicy {
        force: request.force,
        no_check: request.no_check,
    };
    let reports: Vec<PackageReport> = request
        .packages
        .iter()
        .map(|raw| install_one(&client, &store_root, &repos, policy, raw))
        .collect();
    Ok(summarize(&reports))
}

fn store_root_for(scope: RepoScope, project_root: &Path) -> Result<PathBuf> {
    match scope {
        RepoScope::Global => store::global_store_root(),
        RepoScope::Project => store::project_store_root(project_root),
    }
}

fn install_one(
    client: &reqwest::blocking::Client,
    store_root: &Path,
    repos: &[Repository],
    policy: ResolvePolicy,
    raw: &str,
) -> PackageReport {
    let report = |result| PackageReport {
        package: raw.to_string(),
        result,
    };

    let ident = match PackageIdent::parse(raw) {
        Ok(ident) => ident,
        Err(err) => {
            return report(PackageResult::Rejected {
                reason: err.to_string(),
            })
        }
    };
    let sink = match store::resolve(store_root, &ident, policy) {
        Ok(sink) => sink,
        Err(err) if err.is_user_error() => {
            return report(PackageResult::Rejected {
                reason: err.to_string(),
            })
        }
        Err(err) => {
            return report(PackageResult::Failed {
                reason: err.to_string(),
            })
        }
    };
    let target = sink.path().to_path_buf();
    match fetch::fetch_manifest(client, &ident, repos, sink) {
        Ok(fetched) => {
            info!(
                package = %ident,
                repo = %fetched.repo,
                path = %target.display(),
                "installed package"
            );
            report(PackageResult::Installed {
                repo: fetched.repo,
                path: target,
                bytes: fetched.bytes,
            })
        }
        Err(err) => report(PackageResult::Failed {
            reason: err.to_string(),
        }),
    }
}

fn summarize(reports: &[PackageReport]) -> ExecutionOutcome {
    let installed = reports
        .iter()
        .filter(|r| matches!(r.result, PackageResult::Installed { .. }))
        .count();
    let failed = reports.len() - installed;
    let any_hard_failure = reports
        .iter()
        .any(|r| matches!(r.result, PackageResult::Failed { .. }));

    let packages: Vec<Value> = reports.iter().map(report_json).collect();
    let details = json!({ "packages": packages });
    let message = if failed == 0 {
        format!(
            "installed {installed} package{}",
            if installed == 1 { "" } else { "s" }
        )
    } else {
        format!("installed {installed} of {} packages", reports.len())
    };

    if failed == 0 {
        ExecutionOutcome::success(message, details)
    } else if any_hard_failure {
        ExecutionOutcome::failure(message, details)
    } else {
        ExecutionOutcome::user_error(message, details)
    }
}

fn report_json(report: &PackageReport) -> Value {
    match &report.result {
        PackageResult::Installed { repo, path, bytes } => json!({
            "package": report.package,
            "status": "installed",
            "repo": repo,
            "path": path.display().to_string(),
            "bytes": bytes,
        }),
        PackageResult::Rejected { reason } | PackageResult::Failed { reason } => json!({
            "package": report.package,
            "status": "failed",
            "error": reason,
        }),
    }
}
