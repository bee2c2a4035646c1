//! Running external commands.
//!
//! Commands are built as a program plus discrete argument tokens and never
//! pass through string concatenation, so release ids, commits and environment
//! names reach the child process exactly as given.
use log::*;
use std::{
    ffi::OsString,
    path::Path,
    process::{Command, Stdio},
};

use crate::error::{Result, SentryReleaseError};

/// One labelled external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionStep {
    /// Human-readable message logged before the command runs.
    pub label: String,
    pub program: OsString,
    pub args: Vec<OsString>,
    /// Extra environment variables for the child process.
    pub envs: Vec<(OsString, OsString)>,
}

impl ExecutionStep {
    pub fn new(label: impl Into<String>, program: impl Into<OsString>) -> Self {
        Self {
            label: label.into(),
            program: program.into(),
            args: vec![],
            envs: vec![],
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(
        mut self,
        key: impl Into<OsString>,
        value: impl Into<OsString>,
    ) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Program and arguments joined by spaces, for logs and error messages.
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| part.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn program_is(&self, path: &Path) -> bool {
        Path::new(&self.program) == path
    }

    pub fn env_value(&self, key: &str) -> Option<String> {
        self.envs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.to_string_lossy().into_owned())
    }
}

/// Runs labelled external commands, failing on a non-zero exit.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    fn execute(&self, step: &ExecutionStep) -> Result<()>;
}

/// [`CommandRunner`] that spawns real processes, streaming their output to
/// the console.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn execute(&self, step: &ExecutionStep) -> Result<()> {
        let command_line = step.command_line();

        debug!("{}", step.label);
        debug!("running: {command_line}");

        let status = Command::new(&step.program)
            .args(&step.args)
            .envs(step.envs.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| SentryReleaseError::Spawn {
                label: step.label.clone(),
                command_line: command_line.clone(),
                source,
            })?;

        if !status.success() {
            return Err(SentryReleaseError::execution(
                &step.label,
                command_line,
                status.code(),
            ));
        }

        Ok(())
    }
}
