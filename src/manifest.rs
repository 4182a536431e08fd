//! package.json manifest model and persistence.
//!
//! The manifest is round-tripped: fields this tool does not model are kept in
//! a flattened map so a read-modify-write never drops them. Dependency maps
//! preserve declaration order (serde_json `preserve_order`).

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ReleaseError, Result};
use crate::version::SNAPSHOT_QUALIFIER;

/// The dependency classes a manifest can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyClass {
    Direct,
    Dev,
    Peer,
    Optional,
}

impl DependencyClass {
    /// The manifest key this class is declared under.
    pub fn manifest_key(&self) -> &'static str {
        match self {
            DependencyClass::Direct => "dependencies",
            DependencyClass::Dev => "devDependencies",
            DependencyClass::Peer => "peerDependencies",
            DependencyClass::Optional => "optionalDependencies",
        }
    }
}

/// A dependency entry: name plus its declared version range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyInfo {
    pub name: String,
    #[serde(rename = "versionRange")]
    pub version_range: String,
}

/// The `publishConfig` block of a manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// In-memory representation of a package.json file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageManifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub scripts: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub dependencies: Map<String, Value>,

    #[serde(
        default,
        rename = "devDependencies",
        skip_serializing_if = "Map::is_empty"
    )]
    pub dev_dependencies: Map<String, Value>,

    #[serde(
        default,
        rename = "peerDependencies",
        skip_serializing_if = "Map::is_empty"
    )]
    pub peer_dependencies: Map<String, Value>,

    #[serde(
        default,
        rename = "optionalDependencies",
        skip_serializing_if = "Map::is_empty"
    )]
    pub optional_dependencies: Map<String, Value>,

    #[serde(rename = "publishConfig", skip_serializing_if = "Option::is_none")]
    pub publish_config: Option<PublishConfig>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PackageManifest {
    /// Parse a manifest from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the manifest back to pretty-printed JSON with a trailing
    /// newline.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)? + "\n")
    }

    fn dependencies_of(&self, class: DependencyClass) -> &Map<String, Value> {
        match class {
            DependencyClass::Direct => &self.dependencies,
            DependencyClass::Dev => &self.dev_dependencies,
            DependencyClass::Peer => &self.peer_dependencies,
            DependencyClass::Optional => &self.optional_dependencies,
        }
    }

    /// Dependencies of one class whose declared range contains the SNAPSHOT
    /// marker, in declaration order.
    pub fn snapshot_dependencies(&self, class: DependencyClass) -> Vec<DependencyInfo> {
        self.dependencies_of(class)
            .iter()
            .filter_map(|(name, range)| {
                let range = range.as_str()?;
                if range.contains(SNAPSHOT_QUALIFIER) {
                    Some(DependencyInfo {
                        name: name.clone(),
                        version_range: range.to_string(),
                    })
                } else {
                    None
                }
            })
            .collect()
    }

    /// Whether the manifest declares a publishConfig with a registry.
    pub fn has_publish_config(&self) -> bool {
        self.publish_config
            .as_ref()
            .is_some_and(|cfg| cfg.registry.is_some())
    }

    /// Whether the manifest declares a script with the given name.
    pub fn has_script(&self, name: &str) -> bool {
        self.scripts.contains_key(name)
    }
}

/// Persistence seam for the manifest.
///
/// `write` must be synchronous and durable before returning: the release
/// workflow commits and tags immediately after a version bump and relies on
/// the persisted value.
pub trait ManifestStore {
    fn write(&self, manifest: &PackageManifest) -> Result<()>;
}

impl<S: ManifestStore + ?Sized> ManifestStore for std::rc::Rc<S> {
    fn write(&self, manifest: &PackageManifest) -> Result<()> {
        (**self).write(manifest)
    }
}

/// Filesystem-backed manifest store for a package.json path.
pub struct FsManifestStore {
    path: PathBuf,
}

impl FsManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FsManifestStore { path: path.into() }
    }

    /// Read and parse the manifest from disk.
    pub fn read(&self) -> Result<PackageManifest> {
        let data = fs::read_to_string(&self.path).map_err(|e| {
            ReleaseError::manifest(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        PackageManifest::from_json(&data)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ManifestStore for FsManifestStore {
    fn write(&self, manifest: &PackageManifest) -> Result<()> {
        fs::write(&self.path, manifest.to_json()?).map_err(|e| {
            ReleaseError::manifest(format!("cannot write {}: {}", self.path.display(), e))
        })
    }
}

/// In-memory manifest store for tests; records every persisted snapshot.
#[derive(Default)]
pub struct MemoryManifestStore {
    writes: RefCell<Vec<PackageManifest>>,
}

impl MemoryManifestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Versions in the order they were persisted.
    pub fn written_versions(&self) -> Vec<String> {
        self.writes
            .borrow()
            .iter()
            .filter_map(|m| m.version.clone())
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }

    /// The version of the most recently persisted manifest, if any.
    pub fn last_version(&self) -> Option<String> {
        self.writes.borrow().last().and_then(|m| m.version.clone())
    }
}

impl ManifestStore for MemoryManifestStore {
    fn write(&self, manifest: &PackageManifest) -> Result<()> {
        self.writes.borrow_mut().push(manifest.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "name": "demo-pkg",
        "version": "1.2.3-SNAPSHOT",
        "scripts": { "test": "vitest", "verify": "tsc --noEmit" },
        "dependencies": { "left-pad": "^1.0.0", "lib-a": "1.0.0-SNAPSHOT" },
        "devDependencies": { "lib-b": "2.0.0-SNAPSHOT.1" },
        "publishConfig": { "registry": "https://registry.example.com" },
        "license": "MIT"
    }"#;

    #[test]
    fn test_parse_manifest() {
        let m = PackageManifest::from_json(SAMPLE).unwrap();
        assert_eq!(m.name.as_deref(), Some("demo-pkg"));
        assert_eq!(m.version.as_deref(), Some("1.2.3-SNAPSHOT"));
        assert!(m.has_script("test"));
        assert!(!m.has_script("package"));
        assert!(m.has_publish_config());
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let m = PackageManifest::from_json(SAMPLE).unwrap();
        let out = m.to_json().unwrap();
        let reparsed = PackageManifest::from_json(&out).unwrap();
        assert_eq!(reparsed.extra.get("license"), m.extra.get("license"));
        assert!(out.contains("MIT"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_snapshot_dependencies_by_class() {
        let m = PackageManifest::from_json(SAMPLE).unwrap();

        let direct = m.snapshot_dependencies(DependencyClass::Direct);
        assert_eq!(direct.len(), 1);
        assert_eq!(direct[0].name, "lib-a");
        assert_eq!(direct[0].version_range, "1.0.0-SNAPSHOT");

        let dev = m.snapshot_dependencies(DependencyClass::Dev);
        assert_eq!(dev.len(), 1);
        assert_eq!(dev[0].name, "lib-b");

        assert!(m.snapshot_dependencies(DependencyClass::Peer).is_empty());
        assert!(m
            .snapshot_dependencies(DependencyClass::Optional)
            .is_empty());
    }

    #[test]
    fn test_snapshot_dependencies_preserve_declaration_order() {
        let m = PackageManifest::from_json(
            r#"{"dependencies": {"z": "1.0.0-SNAPSHOT", "a": "2.0.0-SNAPSHOT"}}"#,
        )
        .unwrap();
        let deps = m.snapshot_dependencies(DependencyClass::Direct);
        assert_eq!(deps[0].name, "z");
        assert_eq!(deps[1].name, "a");
    }

    #[test]
    fn test_publish_config_without_registry() {
        let m = PackageManifest::from_json(r#"{"publishConfig": {"access": "public"}}"#).unwrap();
        assert!(!m.has_publish_config());
    }

    #[test]
    fn test_fs_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let store = FsManifestStore::new(&path);
        let mut m = store.read().unwrap();
        m.version = Some("1.2.3".to_string());
        store.write(&m).unwrap();

        let reread = store.read().unwrap();
        assert_eq!(reread.version.as_deref(), Some("1.2.3"));
        assert_eq!(reread.extra.get("license"), m.extra.get("license"));
    }

    #[test]
    fn test_memory_store_records_writes() {
        let store = MemoryManifestStore::new();
        let mut m = PackageManifest::default();
        m.version = Some("1.0.0".to_string());
        store.write(&m).unwrap();
        m.version = Some("1.1.0-SNAPSHOT".to_string());
        store.write(&m).unwrap();

        assert_eq!(store.write_count(), 2);
        assert_eq!(store.written_versions(), vec!["1.0.0", "1.1.0-SNAPSHOT"]);
        assert_eq!(store.last_version().as_deref(), Some("1.1.0-SNAPSHOT"));
    }
}
