//! Git checkout inspection.
//!
//! Only used to find the commit to associate with a release when none was
//! given on the command line.
use log::*;
use std::path::Path;

use crate::{
    error::Result,
    path_helpers::HostEnvironment,
    request::ReleaseRequest,
};

/// Full hash of the commit HEAD points at in the repository at `path`.
pub fn head_commit(path: &Path) -> Result<String> {
    let repo = git2::Repository::open(path)?;
    let head = repo.head()?;
    let commit = head.peel_to_commit()?;

    Ok(commit.id().to_string())
}

/// Commit to associate with the release.
///
/// An explicit commit is used verbatim. Without one, HEAD of the application
/// checkout is used when there is one, otherwise the release identifier
/// itself.
pub fn resolve_commit(
    request: &ReleaseRequest,
    host: &HostEnvironment,
) -> Result<String> {
    if let Some(commit) = &request.commit {
        return Ok(commit.clone());
    }

    if host.has_checkout() {
        let commit = head_commit(&host.app_root)?;
        debug!("using HEAD commit {commit}");
        return Ok(commit);
    }

    warn!(
        "no git checkout at {}: using release {} as commit",
        host.app_root.display(),
        request.release_id
    );

    Ok(request.release_id.clone())
}
