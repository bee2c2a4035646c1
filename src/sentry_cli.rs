//! The sentry-cli binary: where it lives, how it gets installed and the
//! commands issued to it.
use log::*;
use secrecy::ExposeSecret;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::{AUTH_TOKEN_VAR, ORGANISATION_VAR, ServiceConfig},
    error::{Result, SentryReleaseError},
    executor::{CommandRunner, ExecutionStep},
};

pub const SENTRY_CLI: &str = "sentry-cli";
pub const SENTRY_CLI_URL: &str = "https://sentry.io/get-cli/";

pub const UPDATE_LABEL: &str = "Update sentry";
pub const CREATE_RELEASE_LABEL: &str = "Create a release";
pub const SET_COMMITS_LABEL: &str = "Associate commits with the release";
pub const CREATE_DEPLOY_LABEL: &str = "Create a deploy";
pub const DOWNLOAD_LABEL: &str = "Downloading sentry-cli";

/// A sentry-cli installation in `install_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentryCli {
    install_dir: PathBuf,
}

impl SentryCli {
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
        }
    }

    pub fn binary_path(&self) -> PathBuf {
        self.install_dir.join(SENTRY_CLI)
    }

    /// Download sentry-cli unless it is already present, returning the path
    /// to the binary.
    pub fn ensure_installed(&self, runner: &dyn CommandRunner) -> Result<PathBuf> {
        let binary = self.binary_path();

        if binary.exists() {
            debug!("found {} at {}", SENTRY_CLI, binary.display());
            return Ok(binary);
        }

        info!("installing {} into {}", SENTRY_CLI, self.install_dir.display());

        create_install_dir(&self.install_dir)?;
        runner.execute(&self.download_step())?;

        if !binary.exists() {
            return Err(SentryReleaseError::ToolMissing(binary));
        }

        Ok(binary)
    }

    /// Pipe the bootstrap script into bash. The pipeline is a fixed literal;
    /// the target directory travels in `INSTALL_DIR`.
    pub fn download_step(&self) -> ExecutionStep {
        ExecutionStep::new(DOWNLOAD_LABEL, "bash")
            .arg("-c")
            .arg(format!("curl -sL {SENTRY_CLI_URL} | bash"))
            .env("INSTALL_DIR", self.install_dir.as_os_str())
    }

    fn base_step(&self, label: &str, config: &ServiceConfig) -> ExecutionStep {
        ExecutionStep::new(label, self.binary_path())
            .env(AUTH_TOKEN_VAR, config.auth_token.expose_secret())
            .env(ORGANISATION_VAR, config.organisation.as_str())
    }

    pub fn update_step(&self, config: &ServiceConfig) -> ExecutionStep {
        self.base_step(UPDATE_LABEL, config).arg("update")
    }

    pub fn create_release_step(
        &self,
        config: &ServiceConfig,
        release: &str,
    ) -> ExecutionStep {
        self.base_step(CREATE_RELEASE_LABEL, config).args([
            "releases",
            "new",
            release,
            "--finalize",
            "--project",
            config.project.as_str(),
        ])
    }

    pub fn set_commits_step(
        &self,
        config: &ServiceConfig,
        release: &str,
        commit: &str,
    ) -> ExecutionStep {
        self.base_step(SET_COMMITS_LABEL, config)
            .args(["releases", "set-commits", release, "--commit"])
            .arg(format!("{}@{}", config.repo, commit))
    }

    /// Deploy record named after the application version.
    pub fn create_deploy_step(
        &self,
        config: &ServiceConfig,
        release: &str,
        environment: &str,
    ) -> ExecutionStep {
        self.base_step(CREATE_DEPLOY_LABEL, config).args([
            "releases",
            "deploys",
            release,
            "new",
            "--env",
            environment,
            "--name",
            config.app_version.as_str(),
        ])
    }
}

fn create_install_dir(dir: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;

        fs::DirBuilder::new().recursive(true).mode(0o777).create(dir)?;
    }

    #[cfg(not(unix))]
    fs::create_dir_all(dir)?;

    Ok(())
}
