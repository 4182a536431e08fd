//! Semantic-version release and hotfix orchestration for npm-style packages.
//!
//! The core is a version-policy engine ([version]) and two workflows
//! ([release::ReleaseWorkflow]) that sequence the release side effects
//! through injected collaborators: a [vcs::Vcs] adapter, a
//! [build::BuildProvider] and a [publish::Publisher]. All policy decisions
//! (branch eligibility, snapshot vs release, distribution tag) live here;
//! the adapters only execute.

pub mod build;
pub mod clean;
pub mod config;
pub mod error;
pub mod manifest;
pub mod project;
pub mod publish;
pub mod release;
pub mod report;
pub mod ui;
pub mod vcs;
pub mod version;

pub use error::{ReleaseError, Result};
