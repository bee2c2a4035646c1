//! Publishing a release to Sentry, start to finish.
//!
//! A run moves through fixed stages, each a precondition for the next:
//!
//! 1. gate: confirmation, the `sentry_support` switch and validation
//! 2. resolve the commit to associate
//! 3. make sure sentry-cli is installed
//! 4. update sentry-cli, create the release, associate commits, create a
//!    deploy
//! 5. optionally store the release identifier in the marker file
//!
//! A closed gate ends the run without side effects and without an error.
//! Any failure from stage 3 on aborts everything after it; steps that already
//! ran are not rolled back.
use derive_builder::Builder;
use log::*;
use std::{fs, rc::Rc};

use crate::{
    config::ServiceConfig,
    confirm::ConfirmationPolicy,
    error::{Result, SentryReleaseError},
    executor::{CommandRunner, ExecutionStep},
    path_helpers::{HostEnvironment, RELEASE_MARKER_FILE},
    repo,
    request::ReleaseRequest,
    sentry_cli::SentryCli,
    validator::{self, ValidationReport},
};

pub const CONFIRM_PROMPT: &str = "Do you really wish to run this command?";

/// How a run ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The operator did not confirm.
    Declined,
    /// Sentry support is switched off.
    Disabled,
    /// Required settings were missing; every one of them is listed.
    Invalid(ValidationReport),
    /// All four release steps succeeded.
    Published {
        release: String,
        commit: String,
        stored: bool,
    },
}

#[derive(Builder)]
#[builder(build_fn(private, name = "_build"))]
pub struct OrchestratorParams {
    pub config: Rc<ServiceConfig>,
    pub host: HostEnvironment,
    pub runner: Rc<dyn CommandRunner>,
    pub confirmation: Rc<dyn ConfirmationPolicy>,
}

impl OrchestratorParamsBuilder {
    pub fn build(&self) -> Result<Orchestrator> {
        let params = self._build().map_err(|e| {
            SentryReleaseError::invalid_config(format!(
                "Failed to build release orchestrator: {}",
                e
            ))
        })?;
        Ok(Orchestrator::new(params))
    }
}

pub struct Orchestrator {
    config: Rc<ServiceConfig>,
    host: HostEnvironment,
    runner: Rc<dyn CommandRunner>,
    confirmation: Rc<dyn ConfirmationPolicy>,
    sentry_cli: SentryCli,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorParamsBuilder {
        OrchestratorParamsBuilder::default()
    }

    pub fn new(params: OrchestratorParams) -> Self {
        let sentry_cli = SentryCli::new(params.host.install_dir());

        Self {
            config: params.config,
            host: params.host,
            runner: params.runner,
            confirmation: params.confirmation,
            sentry_cli,
        }
    }

    /// Publish `request` to Sentry.
    pub fn run(&self, request: &ReleaseRequest) -> Result<Outcome> {
        if let Some(outcome) = self.check_gate(request)? {
            return Ok(outcome);
        }

        let commit = repo::resolve_commit(request, &self.host)?;

        self.sentry_cli.ensure_installed(self.runner.as_ref())?;

        for step in self.release_steps(request, &commit) {
            self.runner.execute(&step)?;
        }

        if request.store_release {
            self.store_release(&request.release_id)?;
        }

        info!(
            "published release {} to sentry project {}",
            request.release_id, self.config.project
        );

        Ok(Outcome::Published {
            release: request.release_id.clone(),
            commit,
            stored: request.store_release,
        })
    }

    /// Returns the outcome that ends the run early, if any.
    fn check_gate(&self, request: &ReleaseRequest) -> Result<Option<Outcome>> {
        if !self.confirmation.confirm(CONFIRM_PROMPT)? {
            warn!("command cancelled");
            return Ok(Some(Outcome::Declined));
        }

        if !self.config.sentry_support {
            debug!("sentry support is disabled: nothing to do");
            return Ok(Some(Outcome::Disabled));
        }

        let report = validator::validate(&self.config, request);

        if !report.is_ready() {
            return Ok(Some(Outcome::Invalid(report)));
        }

        Ok(None)
    }

    /// The four dependent sentry-cli calls, in the order they must run.
    pub fn release_steps(
        &self,
        request: &ReleaseRequest,
        commit: &str,
    ) -> Vec<ExecutionStep> {
        let release = request.release_id.as_str();

        vec![
            self.sentry_cli.update_step(&self.config),
            self.sentry_cli.create_release_step(&self.config, release),
            self.sentry_cli.set_commits_step(&self.config, release, commit),
            self.sentry_cli.create_deploy_step(
                &self.config,
                release,
                &request.environment,
            ),
        ]
    }

    fn store_release(&self, release: &str) -> Result<()> {
        debug!("Store release in {} file", RELEASE_MARKER_FILE);
        fs::write(self.host.release_marker_path(), release)?;
        Ok(())
    }
}
