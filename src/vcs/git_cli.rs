//! [Vcs] implementation driving the system `git` binary.
//!
//! Tag listing leans on `git tag --sort=v:refname` so ordering matches git's
//! own version sort; tags are fetched from origin first so decisions are made
//! against the full remote history.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{ReleaseError, Result};
use crate::vcs::Vcs;

#[derive(Debug)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    /// Create a git adapter for the given working directory, verifying that
    /// it actually is inside a git repository.
    pub fn open(workdir: impl Into<PathBuf>) -> Result<Self> {
        let git = GitCli {
            workdir: workdir.into(),
        };
        git.run(&["rev-parse", "--git-dir"])
            .map_err(|e| ReleaseError::vcs(format!("not a git repository: {}", e)))?;
        Ok(git)
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| ReleaseError::vcs(format!("failed to spawn git: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReleaseError::vcs(format!(
                "git {} exited with {}: {}",
                args.join(" "),
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn fetch_tags(&self) -> Result<()> {
        self.run(&["fetch", "--tags"]).map(|_| ())
    }

    fn sorted_tags(&self, pattern: &str) -> Result<Vec<String>> {
        self.fetch_tags()?;
        let out = self.run(&["tag", "-l", "--sort=v:refname", pattern])?;
        Ok(to_lines(&out))
    }
}

fn to_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

impl Vcs for GitCli {
    fn current_branch(&self) -> Result<String> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        let out = self.run(&["status", "--short", "--untracked-files=no"])?;
        Ok(!out.is_empty())
    }

    fn changed_tracked_files(&self) -> Result<Vec<String>> {
        let out = self.run(&["status", "--porcelain", "--untracked-files=no"])?;
        Ok(to_lines(&out))
    }

    fn release_tags(&self) -> Result<Vec<String>> {
        self.sorted_tags("[0-9]*.[0-9]*.[0-9]*")
    }

    fn release_tags_from_major(&self, major: u64) -> Result<Vec<String>> {
        self.sorted_tags(&format!("{}.[0-9]*.[0-9]*", major))
    }

    fn release_tags_from_minor(&self, major: u64, minor: u64) -> Result<Vec<String>> {
        self.sorted_tags(&format!("{}.{}.[0-9]*", major, minor))
    }

    fn create_branch(&self, name: &str, start_point: &str) -> Result<()> {
        self.run(&["checkout", "-B", name, start_point]).map(|_| ())
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        self.run(&["tag", "-a", name, "-m", message]).map(|_| ())
    }

    fn commit(&self, path: &str, commit_type: &str, message: &str, skip_ci: bool) -> Result<()> {
        self.run(&["add", path])?;
        let trailer = if skip_ci { " [skip ci]" } else { "" };
        let full_message = format!("{}: {}{}", commit_type, message, trailer);
        self.run(&["commit", "-m", &full_message]).map(|_| ())
    }

    fn push(&self) -> Result<()> {
        self.run(&["push"])?;
        self.run(&["push", "--tags"]).map(|_| ())
    }

    fn push_new_branch(&self, name: &str) -> Result<()> {
        self.run(&["push", "origin", name]).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_fails_outside_repository() {
        let dir = tempfile::tempdir().unwrap();
        let err = GitCli::open(dir.path()).unwrap_err();
        assert!(matches!(err, ReleaseError::Vcs(_)));
    }

    #[test]
    fn test_to_lines_splits_and_trims() {
        let lines = to_lines("1.0.0\n 1.1.0 \n\n1.2.0\n");
        assert_eq!(lines, vec!["1.0.0", "1.1.0", "1.2.0"]);
    }

    #[test]
    fn test_to_lines_empty_output() {
        assert!(to_lines("").is_empty());
        assert!(to_lines("\n\n").is_empty());
    }
}
