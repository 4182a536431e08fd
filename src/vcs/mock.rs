use std::cell::RefCell;

use crate::error::{ReleaseError, Result};
use crate::vcs::Vcs;

/// A side effect recorded by [MockVcs].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    CreateBranch { name: String, start_point: String },
    CreateTag { name: String, message: String },
    Commit { path: String, message: String },
    Push,
    PushNewBranch { name: String },
}

/// Mock VCS for testing workflows without actual git operations.
///
/// State is configured up front; every mutating call is recorded in order so
/// tests can assert on the exact side-effect sequence.
pub struct MockVcs {
    branch: String,
    changed_files: Vec<String>,
    tags: Vec<String>,
    calls: RefCell<Vec<VcsCall>>,
}

impl MockVcs {
    /// Create a mock on the given branch with a clean tree and no tags.
    pub fn on_branch(branch: impl Into<String>) -> Self {
        MockVcs {
            branch: branch.into(),
            changed_files: Vec::new(),
            tags: Vec::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Mark the working tree dirty with the given status lines.
    pub fn with_changed_files(mut self, files: &[&str]) -> Self {
        self.changed_files = files.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Seed the tag history (must already be in ascending version order).
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// All recorded side effects in call order.
    pub fn calls(&self) -> Vec<VcsCall> {
        self.calls.borrow().clone()
    }

    /// Names of tags created during the test.
    pub fn created_tags(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                VcsCall::CreateTag { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Commit messages in the order they were made.
    pub fn commit_messages(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                VcsCall::Commit { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Number of pushes (current-branch pushes, not new-branch pushes).
    pub fn push_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, VcsCall::Push))
            .count()
    }

    fn record(&self, call: VcsCall) {
        self.calls.borrow_mut().push(call);
    }

    fn tags_matching(&self, prefix: &str) -> Vec<String> {
        self.tags
            .iter()
            .filter(|t| t.starts_with(prefix))
            .cloned()
            .collect()
    }
}

impl Vcs for MockVcs {
    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        Ok(!self.changed_files.is_empty())
    }

    fn changed_tracked_files(&self) -> Result<Vec<String>> {
        Ok(self.changed_files.clone())
    }

    fn release_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.clone())
    }

    fn release_tags_from_major(&self, major: u64) -> Result<Vec<String>> {
        Ok(self.tags_matching(&format!("{}.", major)))
    }

    fn release_tags_from_minor(&self, major: u64, minor: u64) -> Result<Vec<String>> {
        Ok(self.tags_matching(&format!("{}.{}.", major, minor)))
    }

    fn create_branch(&self, name: &str, start_point: &str) -> Result<()> {
        self.record(VcsCall::CreateBranch {
            name: name.to_string(),
            start_point: start_point.to_string(),
        });
        Ok(())
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        self.record(VcsCall::CreateTag {
            name: name.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn commit(&self, path: &str, commit_type: &str, message: &str, skip_ci: bool) -> Result<()> {
        let trailer = if skip_ci { " [skip ci]" } else { "" };
        self.record(VcsCall::Commit {
            path: path.to_string(),
            message: format!("{}: {}{}", commit_type, message, trailer),
        });
        Ok(())
    }

    fn push(&self) -> Result<()> {
        self.record(VcsCall::Push);
        Ok(())
    }

    fn push_new_branch(&self, name: &str) -> Result<()> {
        self.record(VcsCall::PushNewBranch {
            name: name.to_string(),
        });
        Ok(())
    }
}

/// A [Vcs] wrapper that fails every mutating call, for abort-path tests.
pub struct FailingVcs {
    inner: MockVcs,
}

impl FailingVcs {
    pub fn new(inner: MockVcs) -> Self {
        FailingVcs { inner }
    }
}

impl Vcs for FailingVcs {
    fn current_branch(&self) -> Result<String> {
        self.inner.current_branch()
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        self.inner.has_uncommitted_changes()
    }

    fn changed_tracked_files(&self) -> Result<Vec<String>> {
        self.inner.changed_tracked_files()
    }

    fn release_tags(&self) -> Result<Vec<String>> {
        self.inner.release_tags()
    }

    fn release_tags_from_major(&self, major: u64) -> Result<Vec<String>> {
        self.inner.release_tags_from_major(major)
    }

    fn release_tags_from_minor(&self, major: u64, minor: u64) -> Result<Vec<String>> {
        self.inner.release_tags_from_minor(major, minor)
    }

    fn create_branch(&self, _name: &str, _start_point: &str) -> Result<()> {
        Err(ReleaseError::vcs("createBranch refused"))
    }

    fn create_tag(&self, _name: &str, _message: &str) -> Result<()> {
        Err(ReleaseError::vcs("createTag refused"))
    }

    fn commit(&self, _path: &str, _type: &str, _message: &str, _skip_ci: bool) -> Result<()> {
        Err(ReleaseError::vcs("commit refused"))
    }

    fn push(&self) -> Result<()> {
        Err(ReleaseError::vcs("push refused"))
    }

    fn push_new_branch(&self, _name: &str) -> Result<()> {
        Err(ReleaseError::vcs("push refused"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_reports_configured_branch() {
        let vcs = MockVcs::on_branch("main");
        assert_eq!(vcs.current_branch().unwrap(), "main");
        assert!(!vcs.has_uncommitted_changes().unwrap());
    }

    #[test]
    fn test_mock_dirty_tree() {
        let vcs = MockVcs::on_branch("main").with_changed_files(&["M a.txt", "M b.txt"]);
        assert!(vcs.has_uncommitted_changes().unwrap());
        assert_eq!(vcs.changed_tracked_files().unwrap(), vec!["M a.txt", "M b.txt"]);
    }

    #[test]
    fn test_mock_tag_filtering() {
        let vcs = MockVcs::on_branch("main").with_tags(&["1.9.0", "2.0.0", "2.1.0", "2.1.1"]);
        assert_eq!(vcs.release_tags_from_major(2).unwrap().len(), 3);
        assert_eq!(
            vcs.release_tags_from_minor(2, 1).unwrap(),
            vec!["2.1.0", "2.1.1"]
        );
    }

    #[test]
    fn test_mock_records_calls_in_order() {
        let vcs = MockVcs::on_branch("main");
        vcs.commit("package.json", "ci(release)", "bump", true).unwrap();
        vcs.create_tag("1.0.0", "Release Version 1.0.0").unwrap();
        vcs.push().unwrap();

        let calls = vcs.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], VcsCall::Commit { .. }));
        assert!(matches!(calls[1], VcsCall::CreateTag { .. }));
        assert!(matches!(calls[2], VcsCall::Push));
        assert!(vcs.commit_messages()[0].ends_with("[skip ci]"));
    }
}
