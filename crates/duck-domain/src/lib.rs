#![deny(clippy::all)]
#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

pub mod ident;
pub mod repo;

pub use ident::{IdentError, PackageIdent, MANIFEST_SUFFIX};
pub use repo::{Repository, DEFAULT_REPO_NAME, DEFAULT_REPO_URL};
