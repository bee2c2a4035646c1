//! Service configuration loading from `sentry-release.toml` and the
//! environment.
//!
//! The configuration is read once at startup into a [`ServiceConfig`] and
//! passed by reference into the validator and orchestrator. Environment
//! variables take precedence over values from the file.
use secrecy::SecretString;
use serde::Deserialize;
use std::{env, fs, path::Path};

use crate::error::{Result, SentryReleaseError};

/// Default configuration filename, looked up in the application root.
pub const DEFAULT_CONFIG_FILE: &str = "sentry-release.toml";

pub const AUTH_TOKEN_VAR: &str = "SENTRY_AUTH_TOKEN";
pub const ORGANISATION_VAR: &str = "SENTRY_ORG";
pub const PROJECT_VAR: &str = "SENTRY_PROJECT";
pub const REPO_VAR: &str = "SENTRY_REPO";
pub const APP_VERSION_VAR: &str = "APP_VERSION";
pub const SENTRY_SUPPORT_VAR: &str = "SENTRY_SUPPORT";

/// Raw shape of `sentry-release.toml`. Every key is optional.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub auth_token: Option<String>,
    pub organisation: Option<String>,
    pub project: Option<String>,
    pub repo: Option<String>,
    pub app_version: Option<String>,
    pub sentry_support: Option<bool>,
}

impl FileConfig {
    /// Parse file content. An empty file yields all defaults.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Settings for talking to Sentry, fully resolved.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Auth token handed to sentry-cli as `SENTRY_AUTH_TOKEN`.
    pub auth_token: SecretString,
    /// Organisation slug handed to sentry-cli as `SENTRY_ORG`.
    pub organisation: String,
    pub project: String,
    /// Repository slug used in `<repo>@<commit>` when associating commits.
    pub repo: String,
    /// Name given to the deploy record.
    pub app_version: String,
    /// Global switch; when off the command does nothing.
    pub sentry_support: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            auth_token: SecretString::from(String::new()),
            organisation: String::new(),
            project: String::new(),
            repo: String::new(),
            app_version: String::new(),
            sentry_support: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration using the process environment.
    ///
    /// When `explicit_file` is given it must exist. Otherwise
    /// [`DEFAULT_CONFIG_FILE`] in `app_root` is used if present.
    pub fn load(app_root: &Path, explicit_file: Option<&Path>) -> Result<Self> {
        let file = load_file_config(app_root, explicit_file)?;
        Ok(Self::resolve(file, |key| env::var(key).ok()))
    }

    /// Merge file values with a key lookup. Non-empty lookup values win.
    pub fn resolve<F>(file: FileConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |key: &str, fallback: Option<String>| -> String {
            lookup(key)
                .filter(|v| !v.is_empty())
                .or(fallback)
                .unwrap_or_default()
        };

        let sentry_support = match lookup(SENTRY_SUPPORT_VAR) {
            Some(raw) if !raw.trim().is_empty() => parse_flag(&raw),
            _ => file.sentry_support.unwrap_or(false),
        };

        Self {
            auth_token: SecretString::from(pick(
                AUTH_TOKEN_VAR,
                file.auth_token,
            )),
            organisation: pick(ORGANISATION_VAR, file.organisation),
            project: pick(PROJECT_VAR, file.project),
            repo: pick(REPO_VAR, file.repo),
            app_version: pick(APP_VERSION_VAR, file.app_version),
            sentry_support,
        }
    }
}

fn load_file_config(
    app_root: &Path,
    explicit_file: Option<&Path>,
) -> Result<FileConfig> {
    if let Some(path) = explicit_file {
        if !path.is_file() {
            return Err(SentryReleaseError::invalid_config(format!(
                "config file does not exist: {}",
                path.display()
            )));
        }
        return FileConfig::parse(&fs::read_to_string(path)?);
    }

    let default_path = app_root.join(DEFAULT_CONFIG_FILE);

    if default_path.is_file() {
        log::debug!("loading config from {}", default_path.display());
        return FileConfig::parse(&fs::read_to_string(default_path)?);
    }

    Ok(FileConfig::default())
}

/// Interpret an environment flag the way dotenv-style settings are written.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "(true)" | "1" | "yes" | "on"
    )
}
