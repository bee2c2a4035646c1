//! Fixtures for unit tests: a fully populated Sentry service config and a
//! scratch git checkout with a single commit.
use secrecy::SecretString;
use std::{fs, path::Path};

use crate::config::ServiceConfig;

/// Creates a fully populated ServiceConfig with sentry support enabled.
///
/// # Example
/// ```ignore
/// let mut config = create_test_service_config();
/// config.project.clear();
/// ```
pub fn create_test_service_config() -> ServiceConfig {
    ServiceConfig {
        auth_token: SecretString::from("test-token".to_string()),
        organisation: "acme".to_string(),
        project: "web".to_string(),
        repo: "acme/web".to_string(),
        app_version: "2.0.0".to_string(),
        sentry_support: true,
    }
}

/// Initialises a git repository at `path` with a single commit and returns
/// the commit hash.
pub fn init_repo_with_commit(path: &Path) -> String {
    let repo = git2::Repository::init(path).unwrap();

    fs::write(path.join("README.md"), "release test\n").unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new("README.md")).unwrap();
    index.write().unwrap();

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let signature =
        git2::Signature::now("Test User", "test@example.com").unwrap();

    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        "initial commit",
        &tree,
        &[],
    )
    .unwrap()
    .to_string()
}
