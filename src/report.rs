//! Releasability verification.
//!
//! A [VerificationReport] is a derived snapshot over the project state: it is
//! recomputed on demand and never cached, so it stays honest if the version
//! or dependency set changes between checks.

use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::manifest::{DependencyClass, DependencyInfo};
use crate::project::Project;

/// Snapshot dependencies found per dependency class.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyReport {
    pub dependencies: Vec<DependencyInfo>,
    #[serde(rename = "devDependencies")]
    pub dev_dependencies: Vec<DependencyInfo>,
    #[serde(rename = "peerDependencies")]
    pub peer_dependencies: Vec<DependencyInfo>,
}

impl DependencyReport {
    fn classes(&self) -> [(&'static str, &Vec<DependencyInfo>); 3] {
        [
            ("dependencies", &self.dependencies),
            ("devDependencies", &self.dev_dependencies),
            ("peerDependencies", &self.peer_dependencies),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.classes().iter().all(|(_, deps)| deps.is_empty())
    }
}

/// Computes whether a project may be released right now.
///
/// Releasable = a publishConfig registry is present AND no dependency class
/// pins a SNAPSHOT range.
pub struct VerificationReport<'a> {
    project: &'a Project,
}

impl<'a> VerificationReport<'a> {
    pub fn new(project: &'a Project) -> Self {
        VerificationReport { project }
    }

    /// Scan all three dependency classes for SNAPSHOT ranges.
    pub fn dependency_info(&self) -> DependencyReport {
        DependencyReport {
            dependencies: self.project.snapshot_dependencies(DependencyClass::Direct),
            dev_dependencies: self.project.snapshot_dependencies(DependencyClass::Dev),
            peer_dependencies: self.project.snapshot_dependencies(DependencyClass::Peer),
        }
    }

    pub fn has_snapshot_dependencies(&self) -> bool {
        !self.dependency_info().is_empty()
    }

    pub fn is_publishable(&self) -> bool {
        self.project.has_publish_config()
    }

    pub fn is_releaseable(&self) -> bool {
        self.is_publishable() && !self.has_snapshot_dependencies()
    }

    /// JSON rendering for machine consumers.
    pub fn to_json(&self) -> Result<String> {
        #[derive(Serialize)]
        struct JsonReport {
            #[serde(flatten)]
            dependencies: DependencyReport,
            #[serde(rename = "isPublishable")]
            is_publishable: bool,
            #[serde(rename = "isReleasable")]
            is_releasable: bool,
        }

        Ok(serde_json::to_string_pretty(&JsonReport {
            dependencies: self.dependency_info(),
            is_publishable: self.is_publishable(),
            is_releasable: self.is_releaseable(),
        })?)
    }
}

impl fmt::Display for VerificationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_publishable() {
            return write!(
                f,
                "Project is missing a publishConfig. Please define a registry."
            );
        }

        let info = self.dependency_info();
        if !info.is_empty() {
            writeln!(f, "Snapshot-Version detected:")?;
            for (class, deps) in info.classes() {
                if deps.is_empty() {
                    continue;
                }
                writeln!(f)?;
                writeln!(f, "{}:", class)?;
                for dep in deps {
                    writeln!(f, "\t{} - {}", dep.name, dep.version_range)?;
                }
            }
            return Ok(());
        }

        write!(f, "Project is releaseable.")
    }
}
