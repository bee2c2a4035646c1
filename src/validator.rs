//! Pre-flight check of everything the release steps need.
//!
//! Every missing item is reported, not just the first, so one run shows the
//! operator the whole list of things to fix.
use log::*;
use secrecy::ExposeSecret;
use std::fmt;

use crate::{
    config::{
        APP_VERSION_VAR, AUTH_TOKEN_VAR, DEFAULT_CONFIG_FILE, ORGANISATION_VAR,
        PROJECT_VAR, REPO_VAR, ServiceConfig,
    },
    request::ReleaseRequest,
};

/// A single missing setting or option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationError {
    MissingAuthToken,
    MissingOrganisation,
    MissingProject,
    MissingRepo,
    MissingRelease,
    MissingEnvironment,
    MissingAppVersion,
}

impl ConfigurationError {
    /// Environment variable that supplies the value, if any.
    pub fn env_var(&self) -> Option<&'static str> {
        match self {
            Self::MissingAuthToken => Some(AUTH_TOKEN_VAR),
            Self::MissingOrganisation => Some(ORGANISATION_VAR),
            Self::MissingProject => Some(PROJECT_VAR),
            Self::MissingRepo => Some(REPO_VAR),
            Self::MissingAppVersion => Some(APP_VERSION_VAR),
            Self::MissingRelease | Self::MissingEnvironment => None,
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAuthToken => {
                write!(f, "You must provide an auth_token ({AUTH_TOKEN_VAR})")
            }
            Self::MissingOrganisation => write!(
                f,
                "You must provide an organisation slug ({ORGANISATION_VAR})"
            ),
            Self::MissingProject => {
                write!(f, "You must set the project ({PROJECT_VAR})")
            }
            Self::MissingRepo => {
                write!(f, "You must set the repository ({REPO_VAR})")
            }
            Self::MissingRelease => write!(f, "No release given"),
            Self::MissingEnvironment => write!(f, "No environment given"),
            Self::MissingAppVersion => write!(
                f,
                "You must set the application version ({APP_VERSION_VAR})"
            ),
        }
    }
}

/// Outcome of [`validate`]: every error found, in check order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ConfigurationError>,
}

impl ValidationReport {
    pub fn is_ready(&self) -> bool {
        self.errors.is_empty()
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check the required values and log an error for each one missing.
pub fn validate(
    config: &ServiceConfig,
    request: &ReleaseRequest,
) -> ValidationReport {
    let checks = [
        (
            is_blank(config.auth_token.expose_secret()),
            ConfigurationError::MissingAuthToken,
        ),
        (
            is_blank(&config.organisation),
            ConfigurationError::MissingOrganisation,
        ),
        (is_blank(&config.project), ConfigurationError::MissingProject),
        (is_blank(&config.repo), ConfigurationError::MissingRepo),
        (
            is_blank(&request.release_id),
            ConfigurationError::MissingRelease,
        ),
        (
            is_blank(&request.environment),
            ConfigurationError::MissingEnvironment,
        ),
        (
            is_blank(&config.app_version),
            ConfigurationError::MissingAppVersion,
        ),
    ];

    let errors = checks
        .into_iter()
        .filter(|(missing, _)| *missing)
        .map(|(_, err)| {
            error!("{err}");
            if let Some(var) = err.env_var() {
                debug!("export {var} or set it in {DEFAULT_CONFIG_FILE}");
            }
            err
        })
        .collect();

    ValidationReport { errors }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::test_helpers::create_test_service_config;

    const ALL: [ConfigurationError; 7] = [
        ConfigurationError::MissingAuthToken,
        ConfigurationError::MissingOrganisation,
        ConfigurationError::MissingProject,
        ConfigurationError::MissingRepo,
        ConfigurationError::MissingRelease,
        ConfigurationError::MissingEnvironment,
        ConfigurationError::MissingAppVersion,
    ];

    /// Build a config/request pair with the items in `missing` blanked out.
    fn with_missing(
        missing: &[ConfigurationError],
    ) -> (ServiceConfig, ReleaseRequest) {
        let mut config = create_test_service_config();
        let mut request = ReleaseRequest::new("1.0.0", "production");

        for item in missing {
            match item {
                ConfigurationError::MissingAuthToken => {
                    config.auth_token = SecretString::from(String::new())
                }
                ConfigurationError::MissingOrganisation => {
                    config.organisation.clear()
                }
                ConfigurationError::MissingProject => config.project.clear(),
                ConfigurationError::MissingRepo => config.repo.clear(),
                ConfigurationError::MissingRelease => {
                    request.release_id.clear()
                }
                ConfigurationError::MissingEnvironment => {
                    request.environment.clear()
                }
                ConfigurationError::MissingAppVersion => {
                    config.app_version.clear()
                }
            }
        }

        (config, request)
    }

    #[test]
    fn complete_configuration_is_ready() {
        let (config, request) = with_missing(&[]);
        let report = validate(&config, &request);
        assert!(report.is_ready());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn reports_every_error_when_everything_is_missing() {
        let (config, request) = with_missing(&ALL);
        let report = validate(&config, &request);
        assert!(!report.is_ready());
        assert_eq!(report.errors, ALL.to_vec());
    }

    #[test]
    fn reports_exactly_one_error_per_missing_value() {
        // every subset of the required values
        for mask in 0u8..128 {
            let missing: Vec<ConfigurationError> = ALL
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, e)| *e)
                .collect();

            let (config, request) = with_missing(&missing);
            let report = validate(&config, &request);

            assert_eq!(report.errors, missing, "mask {mask:#08b}");
            assert_eq!(report.is_ready(), missing.is_empty());
        }
    }

    #[test]
    fn whitespace_only_values_count_as_missing() {
        let (mut config, mut request) = with_missing(&[]);
        config.project = "   ".into();
        request.environment = "\t".into();

        let report = validate(&config, &request);

        assert_eq!(
            report.errors,
            vec![
                ConfigurationError::MissingProject,
                ConfigurationError::MissingEnvironment
            ]
        );
    }

    #[test]
    fn feature_flag_is_not_validated() {
        let (mut config, request) = with_missing(&[]);
        config.sentry_support = false;

        assert!(validate(&config, &request).is_ready());
    }

    #[test]
    fn messages_name_the_environment_variable() {
        assert_eq!(
            ConfigurationError::MissingAuthToken.to_string(),
            "You must provide an auth_token (SENTRY_AUTH_TOKEN)"
        );
        assert_eq!(
            ConfigurationError::MissingOrganisation.to_string(),
            "You must provide an organisation slug (SENTRY_ORG)"
        );
        assert_eq!(
            ConfigurationError::MissingProject.to_string(),
            "You must set the project (SENTRY_PROJECT)"
        );
        assert_eq!(
            ConfigurationError::MissingRepo.to_string(),
            "You must set the repository (SENTRY_REPO)"
        );
        assert_eq!(
            ConfigurationError::MissingRelease.to_string(),
            "No release given"
        );
        assert_eq!(
            ConfigurationError::MissingEnvironment.to_string(),
            "No environment given"
        );
        assert_eq!(
            ConfigurationError::MissingAppVersion.to_string(),
            "You must set the application version (APP_VERSION)"
        );

        for err in ALL {
            if let Some(var) = err.env_var() {
                assert!(err.to_string().contains(var));
            }
        }
    }
}
