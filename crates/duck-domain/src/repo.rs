use serde::Serialize;

use crate::ident::PackageIdent;

/// Seeded when no repository is configured at all.
pub const DEFAULT_REPO_NAME: &str = "core";
pub const DEFAULT_REPO_URL: &str = "http://raw.githubusercontent.com/snwfdhmp/duck-core/master/";

/// A named base URL used to resolve manifest download locations.
///
/// Base URLs are plain prefixes and are expected to end with `/`; the
/// manifest URL is the prefix followed by the package path, with no
/// normalization in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    pub name: String,
    pub url: String,
}

impl Repository {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Where this repository serves the manifest for `ident`.
    pub fn manifest_url(&self, ident: &PackageIdent) -> String {
        format!("{}{}", self.url, ident.manifest_rel())
    }
}
