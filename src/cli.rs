//! CLI argument parsing and wiring of the release run.
use clap::Parser;
use log::*;
use std::{path::PathBuf, rc::Rc};

use crate::{
    Orchestrator, Outcome,
    config::ServiceConfig,
    confirm::{ConfirmationPolicy, ForceConfirmation, InteractiveConfirmation},
    error::Result,
    executor::SystemRunner,
    path_helpers::HostEnvironment,
    request::ReleaseRequest,
};

/// Create a release for sentry
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = "")]
    /// Release version for sentry.
    pub release: String,

    #[arg(long, default_value_t = false)]
    /// Store release version in .sentry-release file.
    pub store_release: bool,

    #[arg(long)]
    /// Commit associated with this release. Defaults to HEAD of the
    /// application checkout.
    pub commit: Option<String>,

    #[arg(long, default_value = "")]
    /// Sentry environment.
    pub environment: String,

    #[arg(long, default_value_t = false)]
    /// Skip the confirmation prompt.
    pub force: bool,

    #[arg(long, default_value = ".")]
    /// Application root holding the git checkout and the marker file.
    pub app_root: PathBuf,

    #[arg(long)]
    /// Config file. Defaults to sentry-release.toml in the application root.
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,
}

impl Args {
    pub fn to_request(&self) -> ReleaseRequest {
        ReleaseRequest {
            release_id: self.release.clone(),
            commit: self.commit.clone(),
            environment: self.environment.clone(),
            store_release: self.store_release,
        }
    }

    pub fn confirmation_policy(&self) -> Rc<dyn ConfirmationPolicy> {
        if self.force {
            return Rc::new(ForceConfirmation);
        }

        Rc::new(InteractiveConfirmation::stdio())
    }
}

/// Load configuration, build the orchestrator and run it.
pub fn execute(args: &Args) -> Result<Outcome> {
    let host = HostEnvironment::detect(&args.app_root)?;
    let config = ServiceConfig::load(&host.app_root, args.config.as_deref())?;

    debug!("application root: {}", host.app_root.display());

    let orchestrator = Orchestrator::builder()
        .config(Rc::new(config))
        .host(host)
        .runner(Rc::new(SystemRunner))
        .confirmation(args.confirmation_policy())
        .build()?;

    orchestrator.run(&args.to_request())
}
