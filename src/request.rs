//! The release being published, as requested on the command line.

/// What to publish and where.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    /// Release identifier passed to every sentry-cli call.
    pub release_id: String,
    /// Explicit commit to associate. Derived from the checkout when absent.
    pub commit: Option<String>,
    /// Sentry environment the deploy is recorded under.
    pub environment: String,
    /// Write the release identifier to the marker file after publishing.
    pub store_release: bool,
}

impl ReleaseRequest {
    pub fn new(
        release_id: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            release_id: release_id.into(),
            environment: environment.into(),
            ..Default::default()
        }
    }

    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }

    pub fn storing_release(mut self) -> Self {
        self.store_release = true;
        self
    }
}
