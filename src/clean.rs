//! Build directory cleanup.

use std::fs;
use std::io::ErrorKind;

use crate::error::Result;
use crate::project::Project;
use crate::ui;

/// Remove the project build directory. A missing directory is not an error.
pub fn clean(project: &Project) -> Result<()> {
    let build_path = project.build_path();
    match fs::remove_dir_all(&build_path) {
        Ok(()) => {
            ui::display_success(&format!("Deleted: {}", build_path.display()));
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
