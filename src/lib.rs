pub mod cli;
pub mod config;
pub mod confirm;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod path_helpers;
pub mod repo;
pub mod request;
pub mod sentry_cli;
pub mod validator;

pub use error::{Result, SentryReleaseError};
pub use orchestrator::{Orchestrator, Outcome};

#[cfg(test)]
pub mod test_helpers;
