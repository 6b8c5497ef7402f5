//! Configuration management for relsweep
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (RELSWEEP_*)
//! 3. Config file (~/.config/relsweep/config.toml)
//! 4. Default values

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Project-board configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project (v2) number on the owner's profile
    pub number: Option<u64>,

    /// Organization login, when the project is organization-scoped
    pub organization: Option<String>,

    /// Name of the single-select status field
    pub status_field: String,

    /// Option name the swept issues are moved to
    pub target_status: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            number: None,
            organization: None,
            status_field: "Status".to_string(),
            target_status: "Done".to_string(),
        }
    }
}

/// Repository selection configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Repository in `owner/repo` form; detected from the git remote if unset
    pub slug: Option<String>,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Project-board settings
    pub project: ProjectConfig,
    /// Repository settings
    pub repository: RepositoryConfig,
}

/// CLI-level overrides applied on top of file and environment values
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub project_number: Option<u64>,
    pub organization: Option<String>,
    pub status_field: Option<String>,
    pub target_status: Option<String>,
    pub repository: Option<String>,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if the file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/relsweep/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("relsweep").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - RELSWEEP_PROJECT_NUMBER
    /// - RELSWEEP_ORGANIZATION
    /// - RELSWEEP_STATUS_FIELD
    /// - RELSWEEP_TARGET_STATUS
    /// - GITHUB_REPOSITORY (owner/repo, as set by GitHub Actions)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(number) = std::env::var("RELSWEEP_PROJECT_NUMBER") {
            if let Ok(number) = number.parse() {
                self.project.number = Some(number);
            }
        }

        if let Ok(organization) = std::env::var("RELSWEEP_ORGANIZATION") {
            self.project.organization = Some(organization);
        }

        if let Ok(field) = std::env::var("RELSWEEP_STATUS_FIELD") {
            self.project.status_field = field;
        }

        if let Ok(status) = std::env::var("RELSWEEP_TARGET_STATUS") {
            self.project.target_status = status;
        }

        if let Ok(slug) = std::env::var("GITHUB_REPOSITORY") {
            self.repository.slug = Some(slug);
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(number) = overrides.project_number {
            self.project.number = Some(number);
        }

        if let Some(organization) = overrides.organization {
            self.project.organization = Some(organization);
        }

        if let Some(field) = overrides.status_field {
            self.project.status_field = field;
        }

        if let Some(status) = overrides.target_status {
            self.project.target_status = status;
        }

        if let Some(slug) = overrides.repository {
            self.repository.slug = Some(slug);
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(overrides: Overrides) -> Result<Self> {
        Ok(Self::load()?.with_env_overrides().with_cli_overrides(overrides))
    }

    /// Project number, or a configuration error naming every way to set it
    pub fn require_project_number(&self) -> Result<u64> {
        self.project.number.ok_or_else(|| {
            Error::Config(
                "No project number configured. Pass --project, set \
                 RELSWEEP_PROJECT_NUMBER, or add [project] number to the config file"
                    .to_string(),
            )
        })
    }
}
