//! Version policy - pure functions over semantic-version strings.
//!
//! The version grammar is `major.minor.patch[-SNAPSHOT[.suffix]]`. A version
//! is a snapshot iff its pre-release identifiers contain the exact token
//! `SNAPSHOT`; any other qualifier (alpha, beta, rc) counts as a release for
//! policy purposes.

use crate::error::{ReleaseError, Result};

/// The pre-release token that marks an in-progress version.
pub const SNAPSHOT_QUALIFIER: &str = "SNAPSHOT";

/// Checks whether a version string is a SNAPSHOT version.
///
/// Unparsable strings are not snapshots.
pub fn is_snapshot(version: &str) -> bool {
    match semver::Version::parse(version) {
        Ok(v) => v.pre.as_str().split('.').any(|id| id == SNAPSHOT_QUALIFIER),
        Err(_) => false,
    }
}

/// Creates a release version from a SNAPSHOT version:
/// `1.0.0-SNAPSHOT.0` -> `1.0.0`. Idempotent on bare release versions.
pub fn release_version_of(version: &str) -> String {
    match version.find("-SNAPSHOT") {
        Some(idx) => version[..idx].to_string(),
        None => version.to_string(),
    }
}

/// Cleans up a snapshot version, collapsing any trailing suffix:
/// `1.0.0-SNAPSHOT.0` -> `1.0.0-SNAPSHOT`. No-op if already bare.
pub fn normalize_snapshot(version: &str) -> String {
    if let Ok(re) = regex::Regex::new(r"-SNAPSHOT\..*$") {
        re.replace(version, "-SNAPSHOT").into_owned()
    } else {
        version.to_string()
    }
}

/// Increases the minor version: `1.5.3` -> `1.6.0`, discarding patch and
/// qualifier.
///
/// Unparsable input falls back to major `1` and minor `0`, yielding `1.1.0`.
/// The fallback is deliberate, not an error path.
pub fn increment_minor(version: &str) -> String {
    match semver::Version::parse(version) {
        Ok(v) => format!("{}.{}.0", v.major, v.minor + 1),
        Err(_) => "1.1.0".to_string(),
    }
}

/// Increases the patch version: `1.5.3` -> `1.5.4`, discarding the qualifier.
///
/// Same fallback policy as [increment_minor]: unparsable input yields `1.0.1`.
pub fn increment_patch(version: &str) -> String {
    match semver::Version::parse(version) {
        Ok(v) => format!("{}.{}.{}", v.major, v.minor, v.patch + 1),
        Err(_) => "1.0.1".to_string(),
    }
}

fn parse_for_compare(version: &str) -> Result<semver::Version> {
    semver::Version::parse(version).map_err(|_| {
        ReleaseError::invalid_version(format!(
            "'{}' is not a valid semver version",
            version
        ))
    })
}

/// Returns true iff `a >= b` by semantic-version precedence.
///
/// Unlike the increment functions, comparison never defaults: an unparsable
/// input is an [ReleaseError::InvalidVersion], since silently misordering
/// releases is worse than aborting.
pub fn compare_gte(a: &str, b: &str) -> Result<bool> {
    Ok(parse_for_compare(a)? >= parse_for_compare(b)?)
}

/// Returns true iff `a > b` by semantic-version precedence.
pub fn compare_gt(a: &str, b: &str) -> Result<bool> {
    Ok(parse_for_compare(a)? > parse_for_compare(b)?)
}
