//! Evolution configuration
//!
//! A JSON document with one section per engine. Every field has a default,
//! so an empty object (or a missing section) is a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crossover::RandomPoints;
use crate::error::{EvolveError, Result};
use crate::state::JsonFileHook;

/// Default directory for saved strategy states.
const DEFAULT_STATE_DIR: &str = "states";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolveConfig {
    pub crossover: CrossoverConfig,
    pub mutation: MutationConfig,
    pub persistence: PersistenceConfig,
}

/// Range cut points are drawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossoverConfig {
    pub min_point: f64,
    pub max_point: f64,
    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            min_point: -1.0,
            max_point: 1.0,
            seed: None,
        }
    }
}

impl CrossoverConfig {
    pub fn point_selector(&self) -> Result<RandomPoints> {
        RandomPoints::from_config(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Smallest output width a resize may produce
    pub min_width: usize,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self { min_width: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub state_dir: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
        }
    }
}

impl PersistenceConfig {
    pub fn save_hook(&self) -> JsonFileHook {
        JsonFileHook::new(self.state_dir.clone())
    }
}

impl EvolveConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| EvolveError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: EvolveConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| EvolveError::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| EvolveError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let CrossoverConfig {
            min_point, max_point, ..
        } = self.crossover;
        for point in [min_point, max_point] {
            if !(-1.0..=1.0).contains(&point) {
                return Err(EvolveError::InvalidConfig {
                    reason: format!("cut point bound {} is outside [-1, 1]", point),
                });
            }
        }
        if min_point > max_point {
            return Err(EvolveError::InvalidConfig {
                reason: format!("min_point {} exceeds max_point {}", min_point, max_point),
            });
        }
        if self.mutation.min_width == 0 {
            return Err(EvolveError::InvalidConfig {
                reason: "min_width must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = EvolveConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EvolveConfig::default());
        assert_eq!(config.crossover.min_point, -1.0);
        assert_eq!(config.mutation.min_width, 1);
        assert_eq!(config.persistence.state_dir, PathBuf::from("states"));
    }

    #[test]
    fn test_partial_section() {
        let config = EvolveConfig::from_json_str(r#"{"crossover": {"seed": 42}}"#).unwrap();
        assert_eq!(config.crossover.seed, Some(42));
        assert_eq!(config.crossover.max_point, 1.0);
    }

    #[test]
    fn test_invalid_bounds() {
        let err = EvolveConfig::from_json_str(r#"{"crossover": {"min_point": 0.5, "max_point": 0.0}}"#)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");

        let err = EvolveConfig::from_json_str(r#"{"mutation": {"min_width": 0}}"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conf").join("evolve.json");

        let mut config = EvolveConfig::default();
        config.crossover.seed = Some(3);
        config.persistence.state_dir = temp_dir.path().join("saved");
        config.save(&path).unwrap();

        let loaded = EvolveConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.persistence.save_hook().dir(), temp_dir.path().join("saved"));
        assert!(loaded.crossover.point_selector().is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = EvolveConfig::load(&temp_dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_READ_ERROR");
    }
}
