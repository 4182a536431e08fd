//! Build collaborator: runs package-manager scripts for the build phases.
//!
//! Scripts are looked up in the manifest; optional phases are silently
//! skipped when the package does not declare them, while a declared script
//! that exits non-zero always fails the workflow.

use std::cell::RefCell;
use std::process::Command;

use crate::config::PackageManager;
use crate::error::{ReleaseError, Result};
use crate::project::Project;
use crate::ui;

/// Script names for the build phases, as the package declares them.
pub const FORMAT_SCRIPT: &str = "format:package-json";
pub const TEST_SCRIPT: &str = "test";
pub const VERIFY_SCRIPT: &str = "verify";
pub const PACKAGE_SCRIPT: &str = "package";

/// The build phases the release workflow delegates to, in invocation order.
pub trait BuildProvider {
    /// Reformat the manifest after a version write (optional script).
    fn format_manifest(&self, project: &Project) -> Result<()>;

    fn test(&self, project: &Project) -> Result<()>;

    fn verify(&self, project: &Project) -> Result<()>;

    fn package(&self, project: &Project) -> Result<()>;
}

/// Runs `<pm> run <script>` in the project directory.
pub struct ScriptRunner {
    package_manager: PackageManager,
}

impl ScriptRunner {
    pub fn new(package_manager: PackageManager) -> Self {
        ScriptRunner { package_manager }
    }

    /// Run a script the package may or may not declare; undeclared scripts
    /// are skipped.
    fn run_optional_script(&self, project: &Project, name: &str) -> Result<()> {
        if !project.has_script(name) {
            ui::display_status(&format!("Skipping optional script \"{}\"", name));
            return Ok(());
        }
        self.run_required_script(project, name)
    }

    /// Run a script, failing with a build-step error on non-zero exit.
    fn run_required_script(&self, project: &Project, name: &str) -> Result<()> {
        let status = Command::new(self.package_manager.command())
            .arg("run")
            .arg(name)
            .current_dir(project.base_path())
            .status()
            .map_err(|e| {
                ReleaseError::build_step(format!(
                    "failed to run {} run {}: {}",
                    self.package_manager, name, e
                ))
            })?;

        if !status.success() {
            return Err(ReleaseError::build_step(format!(
                "script \"{}\" exited with {}",
                name,
                status.code().unwrap_or(-1)
            )));
        }
        Ok(())
    }
}

impl BuildProvider for ScriptRunner {
    fn format_manifest(&self, project: &Project) -> Result<()> {
        self.run_optional_script(project, FORMAT_SCRIPT)
    }

    fn test(&self, project: &Project) -> Result<()> {
        self.run_optional_script(project, TEST_SCRIPT)
    }

    fn verify(&self, project: &Project) -> Result<()> {
        self.run_optional_script(project, VERIFY_SCRIPT)
    }

    fn package(&self, project: &Project) -> Result<()> {
        self.run_optional_script(project, PACKAGE_SCRIPT)
    }
}

/// Mock build provider recording the phases it was asked to run.
#[derive(Default)]
pub struct MockBuild {
    phases: RefCell<Vec<String>>,
    fail_on: Option<String>,
}

impl MockBuild {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail when the given phase is invoked, simulating a broken script.
    pub fn failing_on(phase: impl Into<String>) -> Self {
        MockBuild {
            phases: RefCell::new(Vec::new()),
            fail_on: Some(phase.into()),
        }
    }

    /// Phase names in invocation order.
    pub fn invoked_phases(&self) -> Vec<String> {
        self.phases.borrow().clone()
    }

    fn run(&self, phase: &str) -> Result<()> {
        self.phases.borrow_mut().push(phase.to_string());
        if self.fail_on.as_deref() == Some(phase) {
            return Err(ReleaseError::build_step(format!(
                "script \"{}\" exited with 1",
                phase
            )));
        }
        Ok(())
    }
}

impl BuildProvider for MockBuild {
    fn format_manifest(&self, _project: &Project) -> Result<()> {
        self.run("format")
    }

    fn test(&self, _project: &Project) -> Result<()> {
        self.run("test")
    }

    fn verify(&self, _project: &Project) -> Result<()> {
        self.run("verify")
    }

    fn package(&self, _project: &Project) -> Result<()> {
        self.run("package")
    }
}
