//! Version-control abstraction layer.
//!
//! The workflows depend on the [Vcs] trait rather than a concrete
//! implementation, so the orchestration core is testable with in-memory
//! fakes and no process spawning:
//!
//! - [git_cli::GitCli]: real implementation driving the `git` binary
//! - [mock::MockVcs]: recording implementation for tests

pub mod git_cli;
pub mod mock;

pub use git_cli::GitCli;
pub use mock::MockVcs;

use crate::error::Result;

/// Version-control operations the release and hotfix workflows need.
///
/// Tag listings are release-version tags only (`X.Y.Z` names), sorted
/// ascending by semantic-version precedence; the caller treats them as
/// read-only history and never reorders them.
pub trait Vcs {
    /// Name of the currently checked-out branch.
    fn current_branch(&self) -> Result<String>;

    /// Whether the working tree has uncommitted changes to tracked files.
    fn has_uncommitted_changes(&self) -> Result<bool>;

    /// Status lines for changed tracked files, in porcelain order.
    fn changed_tracked_files(&self) -> Result<Vec<String>>;

    /// All release-version tags, ascending.
    fn release_tags(&self) -> Result<Vec<String>>;

    /// Release-version tags within one major line, ascending.
    fn release_tags_from_major(&self, major: u64) -> Result<Vec<String>>;

    /// Release-version tags within one major.minor line, ascending.
    fn release_tags_from_minor(&self, major: u64, minor: u64) -> Result<Vec<String>>;

    /// Create (or reset) a branch at the given start point and check it out.
    fn create_branch(&self, name: &str, start_point: &str) -> Result<()>;

    /// Create an annotated tag.
    fn create_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Stage one path and commit it with a conventional-commit message
    /// (`type: message`), optionally carrying a `[skip ci]` trailer.
    fn commit(&self, path: &str, commit_type: &str, message: &str, skip_ci: bool) -> Result<()>;

    /// Push the current branch together with its tags.
    fn push(&self) -> Result<()>;

    /// Push a newly created branch to origin.
    fn push_new_branch(&self, name: &str) -> Result<()>;
}
