use std::{
    env,
    path::{Path, PathBuf},
};

use crate::error::{Result, SentryReleaseError};

/// Marker file holding the last published release identifier.
pub const RELEASE_MARKER_FILE: &str = ".sentry-release";

/// Install location of sentry-cli relative to the home directory.
pub const INSTALL_SUBDIR: &str = ".local/bin";

/// Where things live on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnvironment {
    pub home_dir: PathBuf,
    /// Root of the application being released.
    pub app_root: PathBuf,
}

impl HostEnvironment {
    pub fn new(
        home_dir: impl Into<PathBuf>,
        app_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            home_dir: home_dir.into(),
            app_root: app_root.into(),
        }
    }

    /// Resolve from `HOME` and the given application root. A root of "."
    /// becomes the current directory.
    pub fn detect(app_root: &Path) -> Result<Self> {
        let home_dir = env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
            .ok_or(SentryReleaseError::HomeNotFound)?;

        let mut app_root = app_root.to_path_buf();

        if app_root == Path::new(".") || app_root == Path::new("./") {
            app_root = env::current_dir()?;
        }

        Ok(Self::new(home_dir, app_root))
    }

    pub fn install_dir(&self) -> PathBuf {
        self.home_dir.join(INSTALL_SUBDIR)
    }

    pub fn release_marker_path(&self) -> PathBuf {
        self.app_root.join(RELEASE_MARKER_FILE)
    }

    pub fn git_dir(&self) -> PathBuf {
        self.app_root.join(".git")
    }

    pub fn has_checkout(&self) -> bool {
        self.git_dir().is_dir()
    }
}
