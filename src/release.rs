//! Release and hotfix workflow orchestration.
//!
//! A workflow owns the project state for one invocation and sequences the
//! side effects through injected collaborators. Preconditions all run before
//! the first mutation; once past them the sequence is fail-fast and
//! non-transactional: a delegate failure halts the workflow and leaves the
//! repository in the partial state reached so far (manual cleanup, no
//! compensating rollback).

use crate::build::BuildProvider;
use crate::error::{ReleaseError, Result};
use crate::project::Project;
use crate::publish::Publisher;
use crate::report::VerificationReport;
use crate::ui;
use crate::vcs::Vcs;
use crate::version;

const MANIFEST_PATH: &str = "package.json";
const COMMIT_TYPE: &str = "ci(release)";

pub struct ReleaseWorkflow<'a> {
    project: &'a mut Project,
    vcs: &'a dyn Vcs,
    build: &'a dyn BuildProvider,
    publisher: &'a dyn Publisher,
}

impl<'a> ReleaseWorkflow<'a> {
    pub fn new(
        project: &'a mut Project,
        vcs: &'a dyn Vcs,
        build: &'a dyn BuildProvider,
        publisher: &'a dyn Publisher,
    ) -> Self {
        ReleaseWorkflow {
            project,
            vcs,
            build,
            publisher,
        }
    }

    /// Generate a releasability report for the current project state.
    pub fn verify_release(&self) -> VerificationReport<'_> {
        VerificationReport::new(self.project)
    }

    /// Run the full release sequence and return the released version.
    ///
    /// Sequence: validate, bump to the release version, build (test, verify,
    /// package), commit + tag, publish, bump to the next snapshot version,
    /// commit + push.
    pub fn release(&mut self) -> Result<String> {
        if !self.project.is_snapshot() {
            return Err(ReleaseError::NotSnapshot(self.project.version().to_string()));
        }
        if !self.project.is_main_branch()
            && !self.project.is_support_branch()
            && !self.project.is_hotfix_branch()
        {
            return Err(ReleaseError::IneligibleBranch(
                self.project.branch().to_string(),
            ));
        }
        self.assert_no_uncommitted_changes(
            "The release can only be created when all changes are committed.",
        )?;

        let release_version = self.project.next_release_version();

        self.project.update_version(release_version.clone())?;
        self.build.format_manifest(self.project)?;

        ui::display_status("Building package");
        self.build.test(self.project)?;
        self.build.verify(self.project)?;
        self.build.package(self.project)?;

        self.commit_version(&release_version)?;
        self.vcs.create_tag(
            &release_version,
            &format!("Release Version {}", release_version),
        )?;

        self.publisher.publish(self.project, self.vcs)?;

        let next_snapshot = self.project.next_snapshot_version();
        self.project.update_version(next_snapshot.clone())?;
        self.commit_version(&next_snapshot)?;

        self.vcs.push()?;

        Ok(release_version)
    }

    /// Start a hotfix line for the release identified by `tag`
    /// (`major.minor`), and return the new hotfix snapshot version.
    pub fn start_hotfix(&mut self, tag: &str) -> Result<String> {
        if !self.project.is_release() {
            return Err(ReleaseError::NotARelease(self.project.version().to_string()));
        }

        let (major, minor) = parse_release_line(tag)?;

        let release_versions = self.vcs.release_tags_from_minor(major, minor)?;
        if release_versions.is_empty() {
            return Err(ReleaseError::NoPriorRelease);
        }

        // Tags arrive version-sorted ascending, so the base is the last one.
        let base_version = release_versions
            .last()
            .cloned()
            .unwrap_or_else(|| format!("{}.{}.0", minor, minor));

        let hotfix_snapshot = format!("{}-SNAPSHOT", version::increment_patch(&base_version));
        ui::display_status(&format!("hotfixSnapshotVersion: {}", hotfix_snapshot));

        let hotfix_branch = format!("hotfix/{}.{}.x", major, minor);
        self.vcs.create_branch(&hotfix_branch, &base_version)?;

        self.project.update_version(hotfix_snapshot.clone())?;
        self.build.format_manifest(self.project)?;

        self.commit_version(&hotfix_snapshot)?;
        self.vcs.push_new_branch(&hotfix_branch)?;

        Ok(hotfix_snapshot)
    }

    /// Fail with the changed-file list if the working tree is dirty.
    pub fn assert_no_uncommitted_changes(&self, message: &str) -> Result<()> {
        if self.vcs.has_uncommitted_changes()? {
            let files = self.vcs.changed_tracked_files()?;
            return Err(ReleaseError::UncommittedChanges {
                message: message.to_string(),
                files,
            });
        }
        Ok(())
    }

    fn commit_version(&self, new_version: &str) -> Result<()> {
        self.vcs.commit(
            MANIFEST_PATH,
            COMMIT_TYPE,
            &format!("updating package.json set version to {}", new_version),
            true,
        )
    }
}

/// Parse a `major.minor` release-line tag.
fn parse_release_line(tag: &str) -> Result<(u64, u64)> {
    let mut parts = tag.split('.');
    let major = parts.next().and_then(|p| p.parse::<u64>().ok());
    let minor = parts.next().and_then(|p| p.parse::<u64>().ok());

    match (major, minor) {
        (Some(major), Some(minor)) => Ok((major, minor)),
        _ => Err(ReleaseError::invalid_version(format!(
            "'{}' is not a release line, expected 'major.minor'",
            tag
        ))),
    }
}
