//! Common test utilities for orchestrator tests.

use std::{fs, path::PathBuf, rc::Rc};

use mockall::Sequence;
use tempfile::TempDir;

use crate::{
    Orchestrator,
    config::ServiceConfig,
    confirm::{ConfirmationPolicy, ForceConfirmation},
    error::SentryReleaseError,
    executor::MockCommandRunner,
    path_helpers::HostEnvironment,
    sentry_cli::{
        CREATE_DEPLOY_LABEL, CREATE_RELEASE_LABEL, SENTRY_CLI,
        SET_COMMITS_LABEL, UPDATE_LABEL,
    },
};

pub use crate::test_helpers::{create_test_service_config, init_repo_with_commit};

pub const RELEASE_LABELS: [&str; 4] = [
    UPDATE_LABEL,
    CREATE_RELEASE_LABEL,
    SET_COMMITS_LABEL,
    CREATE_DEPLOY_LABEL,
];

/// Scratch home and application directories for one test.
pub struct TestHost {
    pub home: TempDir,
    pub app: TempDir,
}

impl TestHost {
    pub fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
            app: TempDir::new().unwrap(),
        }
    }

    /// A host where sentry-cli is already in place.
    pub fn with_installed_cli() -> Self {
        let host = Self::new();
        let install_dir = host.environment().install_dir();
        fs::create_dir_all(&install_dir).unwrap();
        fs::write(install_dir.join(SENTRY_CLI), "").unwrap();
        host
    }

    pub fn environment(&self) -> HostEnvironment {
        HostEnvironment::new(self.home.path(), self.app.path())
    }

    pub fn binary_path(&self) -> PathBuf {
        self.environment().install_dir().join(SENTRY_CLI)
    }

    pub fn marker_path(&self) -> PathBuf {
        self.environment().release_marker_path()
    }
}

/// Creates a test Orchestrator that never prompts.
pub fn create_test_orchestrator(
    host: &TestHost,
    config: ServiceConfig,
    runner: MockCommandRunner,
) -> Orchestrator {
    create_test_orchestrator_with_confirmation(
        host,
        config,
        runner,
        ForceConfirmation,
    )
}

pub fn create_test_orchestrator_with_confirmation(
    host: &TestHost,
    config: ServiceConfig,
    runner: MockCommandRunner,
    confirmation: impl ConfirmationPolicy + 'static,
) -> Orchestrator {
    Orchestrator::builder()
        .config(Rc::new(config))
        .host(host.environment())
        .runner(Rc::new(runner))
        .confirmation(Rc::new(confirmation))
        .build()
        .unwrap()
}

/// Expect the step with `label` to run once, in sequence, and succeed.
pub fn expect_success(
    runner: &mut MockCommandRunner,
    label: &'static str,
    seq: &mut Sequence,
) {
    runner
        .expect_execute()
        .withf(move |step| step.label == label)
        .times(1)
        .in_sequence(seq)
        .returning(|_| Ok(()));
}

/// Expect the step with `label` to run once, in sequence, and exit with
/// `code`.
pub fn expect_failure(
    runner: &mut MockCommandRunner,
    label: &'static str,
    code: i32,
    seq: &mut Sequence,
) {
    runner
        .expect_execute()
        .withf(move |step| step.label == label)
        .times(1)
        .in_sequence(seq)
        .returning(move |step| {
            Err(SentryReleaseError::execution(
                &step.label,
                step.command_line(),
                Some(code),
            ))
        });
}

/// Expect the step with `label` never to run.
pub fn expect_never(runner: &mut MockCommandRunner, label: &'static str) {
    runner
        .expect_execute()
        .withf(move |step| step.label == label)
        .never();
}

/// Expect all four release steps to run in order and succeed.
pub fn expect_release_steps(runner: &mut MockCommandRunner) {
    let mut seq = Sequence::new();
    for label in RELEASE_LABELS {
        expect_success(runner, label, &mut seq);
    }
}

/// A runner that must not be called at all.
pub fn untouched_runner() -> MockCommandRunner {
    let mut runner = MockCommandRunner::new();
    runner.expect_execute().never();
    runner
}
