use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use duck_domain::{PackageIdent, Repository};

use crate::store::ManifestSink;

const USER_AGENT: &str = concat!("duck-fetch/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Every configured repository was tried and none produced the manifest.
#[derive(Debug, thiserror::Error)]
#[error("could not install '{ident}': no configured repository provides it")]
pub struct ExhaustedError {
    pub ident: String,
}

#[derive(Debug)]
pub struct FetchedManifest {
    /// Name of the repository that served the manifest.
    pub repo: String,
    pub bytes: u64,
}

pub fn http_client() -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(HTTP_TIMEOUT)
        .build()
        .context("failed to build http client")
}

/// Tries each repository in order and streams the first successful response
/// body into `sink`.
///
/// Transport failures and non-success statuses are logged and the next
/// repository is tried; the first success returns immediately, so later
/// repositories are never contacted. The sink is consumed either way —
/// on failure the truncated file stays behind for a rerun to overwrite.
pub fn fetch_manifest(
    client: &reqwest::blocking::Client,
    ident: &PackageIdent,
    repos: &[Repository],
    mut sink: ManifestSink,
) -> Result<FetchedManifest> {
    for repo in repos {
        let url = repo.manifest_url(ident);
        debug!(repo = %repo.name, %url, "trying repository");
        let mut response = match client
            .get(&url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
        {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    repo = %repo.name,
                    %url,
                    error = %err,
                    "could not download manifest; trying next repository"
                );
                continue;
            }
        };
        let bytes = io::copy(&mut response, &mut sink)
            .with_context(|| format!("could not write manifest to {}", sink.path().display()))?;
        return Ok(FetchedManifest {
            repo: repo.name.clone(),
            bytes,
        });
    }
    Err(ExhaustedError {
        ident: ident.to_string(),
    }
    .into())
}
