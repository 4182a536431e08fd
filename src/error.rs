use thiserror::Error;

/// Unified error type for pkg-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("The current version is not a SNAPSHOT version: {0}")]
    NotSnapshot(String),

    #[error(
        "A hotfix can only be created on the basis of a release. \
         The current Git state is not a checked out tag. Current version: {0}"
    )]
    NotARelease(String),

    #[error("No release can be created with branch '{0}'.")]
    IneligibleBranch(String),

    #[error("{}\nUncommitted changes:\n{}", .message, .files.join("\n"))]
    UncommittedChanges { message: String, files: Vec<String> },

    #[error("There is no release yet for which a hotfix can be created.")]
    NoPriorRelease,

    #[error("Build step failed: {0}")]
    BuildStep(String),

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Git operation failed: {0}")]
    Vcs(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Manifest parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in pkg-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create an invalid-version error with context
    pub fn invalid_version(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidVersion(msg.into())
    }

    /// Create a VCS error with context
    pub fn vcs(msg: impl Into<String>) -> Self {
        ReleaseError::Vcs(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        ReleaseError::Manifest(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a build-step error with context
    pub fn build_step(msg: impl Into<String>) -> Self {
        ReleaseError::BuildStep(msg.into())
    }

    /// Create a publish error with context
    pub fn publish(msg: impl Into<String>) -> Self {
        ReleaseError::Publish(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_uncommitted_changes_enumerates_files() {
        let err = ReleaseError::UncommittedChanges {
            message: "The release can only be created when all changes are committed.".to_string(),
            files: vec!["M a.txt".to_string(), "M b.txt".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("M a.txt"));
        assert!(msg.contains("M b.txt"));
        assert!(msg.contains("Uncommitted changes"));
    }

    #[test]
    fn test_not_snapshot_carries_version() {
        let err = ReleaseError::NotSnapshot("1.2.3".to_string());
        assert!(err.to_string().contains("1.2.3"));
        assert!(err.to_string().contains("not a SNAPSHOT"));
    }

    #[test]
    fn test_not_a_release_carries_version() {
        let err = ReleaseError::NotARelease("1.2.3-SNAPSHOT".to_string());
        assert!(err.to_string().contains("1.2.3-SNAPSHOT"));
    }

    #[test]
    fn test_ineligible_branch_names_branch() {
        let err = ReleaseError::IneligibleBranch("feature/foo".to_string());
        assert_eq!(
            err.to_string(),
            "No release can be created with branch 'feature/foo'."
        );
    }

    #[test]
    fn test_error_constructors() {
        assert!(ReleaseError::invalid_version("x")
            .to_string()
            .contains("Invalid version"));
        assert!(ReleaseError::vcs("x").to_string().contains("Git"));
        assert!(ReleaseError::build_step("x").to_string().contains("Build"));
        assert!(ReleaseError::publish("x").to_string().contains("Publish"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::invalid_version("x"), "Invalid version"),
            (ReleaseError::manifest("x"), "Manifest error"),
            (ReleaseError::NoPriorRelease, "There is no release yet"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
