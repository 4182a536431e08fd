//! Project state aggregate.
//!
//! One [Project] is built per command invocation from the manifest and the
//! VCS adapter; the branch is captured once at construction and treated as
//! immutable for that invocation. Version mutations are persisted to the
//! manifest store before returning, so later workflow steps (tag, publish)
//! can rely on the value on disk.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::manifest::{
    DependencyClass, DependencyInfo, FsManifestStore, ManifestStore, PackageManifest,
};
use crate::vcs::Vcs;
use crate::version;

pub struct Project {
    manifest: PackageManifest,
    store: Box<dyn ManifestStore>,
    branch: String,
    base_path: PathBuf,
}

impl Project {
    pub fn new(
        manifest: PackageManifest,
        branch: impl Into<String>,
        store: Box<dyn ManifestStore>,
        base_path: impl Into<PathBuf>,
    ) -> Self {
        Project {
            manifest,
            store,
            branch: branch.into(),
            base_path: base_path.into(),
        }
    }

    /// Build a project for the package rooted at `dir`, reading its
    /// package.json and capturing the current branch from the VCS adapter.
    pub fn open(dir: impl AsRef<Path>, vcs: &dyn Vcs) -> Result<Self> {
        let store = FsManifestStore::new(dir.as_ref().join("package.json"));
        let manifest = store.read()?;
        let branch = vcs.current_branch()?;
        Ok(Project::new(manifest, branch, Box::new(store), dir.as_ref()))
    }

    pub fn name(&self) -> &str {
        self.manifest.name.as_deref().unwrap_or("unnamed-package")
    }

    pub fn version(&self) -> &str {
        self.manifest
            .version
            .as_deref()
            .unwrap_or("1.0.0-SNAPSHOT")
    }

    pub fn manifest(&self) -> &PackageManifest {
        &self.manifest
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// The build output directory (`<base>/build`).
    pub fn build_path(&self) -> PathBuf {
        self.base_path.join("build")
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Branch name with non-alphanumeric runs collapsed to `-` and leading or
    /// trailing `-` removed, suitable as a version suffix token.
    pub fn escaped_branch(&self) -> String {
        let collapsed = if let Ok(re) = regex::Regex::new(r"[^a-zA-Z0-9äöüÄÖÜß]+") {
            re.replace_all(&self.branch, "-").into_owned()
        } else {
            self.branch.clone()
        };
        collapsed.trim_matches('-').to_string()
    }

    /// Checks whether the current package is a SNAPSHOT version.
    pub fn is_snapshot(&self) -> bool {
        version::is_snapshot(self.version())
    }

    pub fn is_release(&self) -> bool {
        !self.is_snapshot()
    }

    pub fn is_main_branch(&self) -> bool {
        self.branch == "main"
    }

    pub fn is_support_branch(&self) -> bool {
        self.branch.starts_with("support/")
    }

    pub fn is_hotfix_branch(&self) -> bool {
        self.branch.starts_with("hotfix/")
    }

    /// The release version this snapshot will become (qualifier stripped).
    pub fn next_release_version(&self) -> String {
        version::release_version_of(self.version())
    }

    /// The snapshot version development continues on after a release.
    ///
    /// Hotfix lines advance by patch; every other eligible branch advances by
    /// minor.
    pub fn next_snapshot_version(&self) -> String {
        let next_release = self.next_release_version();
        if self.is_hotfix_branch() {
            format!("{}-SNAPSHOT", version::increment_patch(&next_release))
        } else {
            format!("{}-SNAPSHOT", version::increment_minor(&next_release))
        }
    }

    /// Set the version in memory and persist the manifest before returning.
    pub fn update_version(&mut self, new_version: impl Into<String>) -> Result<()> {
        self.manifest.version = Some(new_version.into());
        self.store.write(&self.manifest)
    }

    /// Dependencies of one class declared with a SNAPSHOT range, in
    /// declaration order.
    pub fn snapshot_dependencies(&self, class: DependencyClass) -> Vec<DependencyInfo> {
        self.manifest.snapshot_dependencies(class)
    }

    /// Indicates whether this package has a publishConfig with a registry.
    pub fn has_publish_config(&self) -> bool {
        self.manifest.has_publish_config()
    }

    /// Checks whether the package declares a script with the given name.
    pub fn has_script(&self, name: &str) -> bool {
        self.manifest.has_script(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::MemoryManifestStore;

    fn project_on(branch: &str, version: &str) -> Project {
        let mut manifest = PackageManifest::default();
        manifest.version = Some(version.to_string());
        Project::new(manifest, branch, Box::new(MemoryManifestStore::new()), ".")
    }

    #[test]
    fn test_snapshot_release_mutually_exclusive() {
        let snapshot = project_on("main", "1.0.0-SNAPSHOT");
        assert!(snapshot.is_snapshot());
        assert!(!snapshot.is_release());

        let release = project_on("main", "1.0.0");
        assert!(release.is_release());
        assert!(!release.is_snapshot());
    }

    #[test]
    fn test_branch_classification() {
        assert!(project_on("main", "1.0.0").is_main_branch());
        assert!(project_on("support/1.x", "1.0.0").is_support_branch());
        assert!(project_on("hotfix/2.1.x", "1.0.0").is_hotfix_branch());

        let other = project_on("feature/login", "1.0.0");
        assert!(!other.is_main_branch());
        assert!(!other.is_support_branch());
        assert!(!other.is_hotfix_branch());
    }

    #[test]
    fn test_next_release_version() {
        let p = project_on("main", "1.5.0-SNAPSHOT");
        assert_eq!(p.next_release_version(), "1.5.0");
    }

    #[test]
    fn test_next_snapshot_version_minor_on_main() {
        let p = project_on("main", "2.1.3-SNAPSHOT");
        assert_eq!(p.next_snapshot_version(), "2.2.0-SNAPSHOT");
    }

    #[test]
    fn test_next_snapshot_version_patch_on_hotfix_branch() {
        let p = project_on("hotfix/2.1.x", "2.1.3-SNAPSHOT");
        assert_eq!(p.next_snapshot_version(), "2.1.4-SNAPSHOT");
    }

    #[test]
    fn test_update_version_persists_immediately() {
        let store = std::rc::Rc::new(MemoryManifestStore::new());
        let mut manifest = PackageManifest::default();
        manifest.version = Some("1.0.0-SNAPSHOT".to_string());

        let mut p = Project::new(manifest, "main", Box::new(store.clone()), ".");
        p.update_version("1.0.0").unwrap();

        assert_eq!(p.version(), "1.0.0");
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.last_version().as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_version_defaults_when_missing() {
        let p = Project::new(
            PackageManifest::default(),
            "main",
            Box::new(MemoryManifestStore::new()),
            ".",
        );
        assert_eq!(p.version(), "1.0.0-SNAPSHOT");
        assert_eq!(p.name(), "unnamed-package");
        assert!(p.is_snapshot());
    }

    #[test]
    fn test_escaped_branch() {
        assert_eq!(
            project_on("feature/login-form", "1.0.0").escaped_branch(),
            "feature-login-form"
        );
        assert_eq!(project_on("/weird//name/", "1.0.0").escaped_branch(), "weird-name");
    }

    #[test]
    fn test_build_path() {
        let p = Project::new(
            PackageManifest::default(),
            "main",
            Box::new(MemoryManifestStore::new()),
            "/tmp/pkg",
        );
        assert_eq!(p.build_path(), PathBuf::from("/tmp/pkg/build"));
    }
}
