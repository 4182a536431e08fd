//! Tool configuration.
//!
//! Configuration is resolved once into an explicit [Config] struct and passed
//! into the workflow constructors; nothing reads the process environment ad
//! hoc after startup. Resolution order per field: CLI flag, then environment
//! variable, then configuration file, then default.

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ReleaseError, Result};

/// Environment variables honored for compatibility with existing CI setups.
pub const ENV_PACKAGE_MANAGER: &str = "JS_PROJECT_PACKAGE_MANAGER";
pub const ENV_RELEASE_REGISTRY: &str = "JS_PROJECT_RELEASE_REGISTRY";
pub const ENV_SNAPSHOT_REGISTRY: &str = "JS_PROJECT_SNAPSHOT_REGISTRY";

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    /// The binary to invoke.
    pub fn command(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }

    /// Extra arguments for `<pm> publish`.
    ///
    /// Scripts are skipped because the workflow already ran them; pnpm's git
    /// check is disabled because publish runs from a tagged, clean checkout.
    pub fn publish_args(&self) -> &'static [&'static str] {
        match self {
            PackageManager::Npm | PackageManager::Yarn => {
                &["--ignore-scripts", "--non-interactive"]
            }
            PackageManager::Pnpm => &["--ignore-scripts", "--no-git-checks"],
        }
    }
}

impl FromStr for PackageManager {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "yarn" => Ok(PackageManager::Yarn),
            "pnpm" => Ok(PackageManager::Pnpm),
            other => Err(ReleaseError::config(format!(
                "unknown package manager '{}' (expected npm, yarn or pnpm)",
                other
            ))),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command())
    }
}

/// Resolved tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub package_manager: Option<PackageManager>,

    #[serde(default)]
    pub release_registry: Option<String>,

    #[serde(default)]
    pub snapshot_registry: Option<String>,
}

impl Config {
    /// Apply environment-variable overrides on top of file values.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(pm) = env::var(ENV_PACKAGE_MANAGER) {
            self.package_manager = Some(pm.parse()?);
        }
        if let Ok(registry) = env::var(ENV_RELEASE_REGISTRY) {
            self.release_registry = Some(registry);
        }
        if let Ok(registry) = env::var(ENV_SNAPSHOT_REGISTRY) {
            self.snapshot_registry = Some(registry);
        }
        Ok(self)
    }

    /// The package manager to use, with an explicit CLI choice winning.
    pub fn require_package_manager(
        &self,
        cli_choice: Option<PackageManager>,
    ) -> Result<PackageManager> {
        cli_choice.or(self.package_manager).ok_or_else(|| {
            ReleaseError::config(format!(
                "no package manager configured: pass --package-manager, set {}, \
                 or add package_manager to pkg-release.toml",
                ENV_PACKAGE_MANAGER
            ))
        })
    }
}

/// Loads configuration from file or returns defaults.
///
/// Lookup order:
/// 1. Custom path provided as parameter
/// 2. `pkg-release.toml` in the current directory
/// 3. `.pkg-release.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./pkg-release.toml").exists() {
        fs::read_to_string("./pkg-release.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".pkg-release.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str).map_err(|e| ReleaseError::config(e.to_string()))
}
