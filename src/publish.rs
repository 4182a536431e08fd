//! Publisher collaborator and distribution-tag policy.
//!
//! The dist-tag decides which consumer-visible channel an artifact lands on.
//! The "newest" comparison against the last released tag keeps a retroactive
//! release of an older line (patching 1.2.x after 1.3.0 exists) from stealing
//! the `latest`/`next` pointer.

use std::cell::RefCell;
use std::process::Command;

use chrono::Utc;

use crate::config::PackageManager;
use crate::error::{ReleaseError, Result};
use crate::project::Project;
use crate::ui;
use crate::vcs::Vcs;
use crate::version;

/// Distribution tag for a version about to be published.
///
/// Decision table, evaluated in order:
/// 1. snapshot version: `next` when at least as new as the last release,
///    `snapshot` otherwise
/// 2. hotfix branch: `hotfix`
/// 3. release: `latest` when at least as new, `release` otherwise
pub fn publish_tag(
    version: &str,
    last_release: &str,
    hotfix_branch: bool,
) -> Result<&'static str> {
    let newest = version::compare_gte(version, last_release)?;

    if version::is_snapshot(version) {
        return Ok(if newest { "next" } else { "snapshot" });
    }
    if hotfix_branch {
        return Ok("hotfix");
    }
    Ok(if newest { "latest" } else { "release" })
}

/// Publisher seam consumed by the release workflow.
///
/// Implementations decide registry and dist-tag themselves, and must restore
/// any version string they temporarily mutated whether or not publishing
/// succeeded.
pub trait Publisher {
    fn publish(&self, project: &mut Project, vcs: &dyn Vcs) -> Result<()>;
}

/// Publishes via `<pm> publish` against a configured registry.
pub struct NodePublisher {
    package_manager: PackageManager,
    release_registry: Option<String>,
    snapshot_registry: Option<String>,
}

impl NodePublisher {
    pub fn new(
        package_manager: PackageManager,
        release_registry: Option<String>,
        snapshot_registry: Option<String>,
    ) -> Self {
        NodePublisher {
            package_manager,
            release_registry,
            snapshot_registry,
        }
    }

    fn run_publish(&self, project: &Project, registry: Option<&str>, tag: &str) -> Result<()> {
        let mut cmd = Command::new(self.package_manager.command());
        cmd.arg("publish")
            .args(self.package_manager.publish_args())
            .current_dir(project.base_path());
        if let Some(registry) = registry {
            cmd.args(["--registry", registry]);
        }
        cmd.args(["--tag", tag]);

        let status = cmd.status().map_err(|e| {
            ReleaseError::publish(format!("failed to run {} publish: {}", self.package_manager, e))
        })?;

        if !status.success() {
            return Err(ReleaseError::publish(format!(
                "{} publish exited with {}",
                self.package_manager,
                status.code().unwrap_or(-1)
            )));
        }
        Ok(())
    }
}

impl Publisher for NodePublisher {
    fn publish(&self, project: &mut Project, vcs: &dyn Vcs) -> Result<()> {
        let registry = if project.is_release() {
            self.release_registry.clone()
        } else {
            self.snapshot_registry.clone()
        };

        let original_version = project.version().to_string();

        // Snapshot artifacts get a unique timestamp suffix so repeated
        // snapshot publishes of the same base version do not collide.
        if project.is_snapshot() {
            let build_date = Utc::now().format("%Y%m%d%H%M%S%3f");
            let stamped = format!("{}.{}", original_version, build_date);
            project.update_version(stamped.clone())?;
            ui::display_status(&format!("Updated snapshot version to {}", stamped));
        }

        let tags = vcs.release_tags()?;
        let last_release = tags.last().map(String::as_str).unwrap_or("0.0.0");
        ui::display_status(&format!(
            "Last release version: {} Current version: {}",
            last_release, original_version
        ));

        let tag = publish_tag(&original_version, last_release, project.is_hotfix_branch())?;
        ui::display_status(&format!("Use tag: {}", tag));

        let publish_result = self.run_publish(project, registry.as_deref(), tag);

        // Restore the pre-suffix version regardless of the publish outcome.
        let restore_result = if project.version() != original_version {
            project.update_version(original_version)
        } else {
            Ok(())
        };

        publish_result.and(restore_result)
    }
}

/// Mock publisher for workflow tests.
#[derive(Default)]
pub struct MockPublisher {
    published_versions: RefCell<Vec<String>>,
    fail: bool,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A publisher whose publish call always fails.
    pub fn failing() -> Self {
        MockPublisher {
            published_versions: RefCell::new(Vec::new()),
            fail: true,
        }
    }

    /// Versions seen by publish, in call order.
    pub fn published_versions(&self) -> Vec<String> {
        self.published_versions.borrow().clone()
    }

    pub fn publish_count(&self) -> usize {
        self.published_versions.borrow().len()
    }
}

impl Publisher for MockPublisher {
    fn publish(&self, project: &mut Project, _vcs: &dyn Vcs) -> Result<()> {
        self.published_versions
            .borrow_mut()
            .push(project.version().to_string());
        if self.fail {
            return Err(ReleaseError::publish("registry rejected the artifact"));
        }
        Ok(())
    }
}
