use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for coverage aggregation and reporting.
///
/// Controls which records are filtered out before aggregation, the defaults
/// substituted for absent fields, and how gap reports are laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Record statuses that exclude a record from every hierarchy.
    ///
    /// Matching is exact. Records without a status are never excluded.
    excluded_statuses: Vec<String>,

    /// Coverage types that exclude a record from every hierarchy.
    ///
    /// `tdp` marks a requirement whose coverage is satisfied transitively
    /// through a dependency, and must not be counted twice.
    excluded_coverage_types: Vec<String>,

    /// Actor recorded on a test case when the source record has none.
    pub default_actor: String,

    /// Width, in characters, at which requirement names are truncated in the
    /// gap report.
    pub gap_name_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excluded_statuses: default_excluded_statuses(),
            excluded_coverage_types: default_excluded_coverage_types(),
            default_actor: default_actor(),
            gap_name_width: default_gap_name_width(),
        }
    }
}

/// Errors that can occur when loading or saving a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the statuses that exclude a record.
    #[must_use]
    pub fn excluded_statuses(&self) -> &[String] {
        &self.excluded_statuses
    }

    /// Returns the coverage types that exclude a record.
    #[must_use]
    pub fn excluded_coverage_types(&self) -> &[String] {
        &self.excluded_coverage_types
    }

    /// Adds a status to the exclusion list.
    ///
    /// Returns `true` if the status was added, `false` if it was already
    /// excluded.
    pub fn exclude_status(&mut self, status: String) -> bool {
        if self.excluded_statuses.contains(&status) {
            false
        } else {
            self.excluded_statuses.push(status);
            true
        }
    }

    /// Removes a status from the exclusion list.
    ///
    /// Returns `true` if the status was removed, `false` if it wasn't
    /// excluded.
    pub fn include_status(&mut self, status: &str) -> bool {
        if let Some(pos) = self.excluded_statuses.iter().position(|s| s == status) {
            self.excluded_statuses.remove(pos);
            true
        } else {
            false
        }
    }
}

fn default_excluded_statuses() -> Vec<String> {
    vec!["Deprecated".to_string(), "Draft".to_string()]
}

fn default_excluded_coverage_types() -> Vec<String> {
    vec!["tdp".to_string()]
}

fn default_actor() -> String {
    "N/A".to_string()
}

const fn default_gap_name_width() -> usize {
    60
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_excluded_statuses")]
        excluded_statuses: Vec<String>,

        #[serde(default = "default_excluded_coverage_types")]
        excluded_coverage_types: Vec<String>,

        #[serde(default = "default_actor")]
        default_actor: String,

        /// Requirement names longer than this are truncated in gap reports.
        #[serde(default = "default_gap_name_width")]
        gap_name_width: usize,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                excluded_statuses,
                excluded_coverage_types,
                default_actor,
                gap_name_width,
            } => Self {
                excluded_statuses,
                excluded_coverage_types,
                default_actor,
                gap_name_width,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            excluded_statuses: config.excluded_statuses,
            excluded_coverage_types: config.excluded_coverage_types,
            default_actor: config.default_actor,
            gap_name_width: config.gap_name_width,
        }
    }
}
