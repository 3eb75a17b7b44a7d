//! Pipeline configuration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "cogniskill.toml";

/// Tolerance when checking that class weights sum to 1.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// A class/section and its sampling weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassWeight {
    /// Section name, starting with the grade number (e.g. "10A").
    pub name: String,
    pub weight: f64,
}

impl ClassWeight {
    fn new(name: &str, weight: f64) -> Self {
        Self {
            name: name.to_string(),
            weight,
        }
    }

    /// Grade number parsed from the leading digits of the name.
    pub fn grade(&self) -> Option<u32> {
        let digits: String = self.name.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }
}

/// Top-level cogniskill configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of student records to generate.
    #[serde(default = "default_students")]
    pub students: usize,
    /// Seed shared by every stage.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Fraction of records held out for regression evaluation.
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    /// Directory the artifacts are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Class sections and their sampling weights.
    #[serde(default = "default_classes")]
    pub classes: Vec<ClassWeight>,
}

fn default_students() -> usize {
    200
}
fn default_seed() -> u64 {
    42
}
fn default_test_fraction() -> f64 {
    0.2
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_classes() -> Vec<ClassWeight> {
    vec![
        ClassWeight::new("9A", 0.1),
        ClassWeight::new("9B", 0.1),
        ClassWeight::new("10A", 0.15),
        ClassWeight::new("10B", 0.15),
        ClassWeight::new("10C", 0.15),
        ClassWeight::new("11A", 0.1),
        ClassWeight::new("11B", 0.1),
        ClassWeight::new("11C", 0.1),
        ClassWeight::new("12A", 0.025),
        ClassWeight::new("12B", 0.025),
    ]
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            students: default_students(),
            seed: default_seed(),
            test_fraction: default_test_fraction(),
            output_dir: default_output_dir(),
            classes: default_classes(),
        }
    }
}

impl PipelineConfig {
    /// Reject configurations that would make the run meaningless.
    ///
    /// Runs before any sampling happens.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.students == 0 {
            return Err(PipelineError::InvalidRecordCount(self.students));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        validate_class_weights(&self.classes)
    }
}

/// Check a class weight vector: non-empty, unique names with a grade prefix,
/// finite non-negative weights summing to 1.
pub fn validate_class_weights(classes: &[ClassWeight]) -> Result<(), PipelineError> {
    if classes.is_empty() {
        return Err(PipelineError::InvalidWeights("no classes configured".into()));
    }

    let mut seen = HashSet::new();
    for class in classes {
        if !seen.insert(class.name.as_str()) {
            return Err(PipelineError::InvalidWeights(format!(
                "duplicate class name: {}",
                class.name
            )));
        }
        if class.grade().is_none() {
            return Err(PipelineError::InvalidConfig(format!(
                "class name '{}' must start with its grade number",
                class.name
            )));
        }
        if !class.weight.is_finite() || class.weight < 0.0 {
            return Err(PipelineError::InvalidWeights(format!(
                "weight for {} must be a non-negative number, got {}",
                class.name, class.weight
            )));
        }
    }

    let total: f64 = classes.iter().map(|c| c.weight).sum();
    if (total - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(PipelineError::InvalidWeights(format!(
            "weights must sum to 1, got {total}"
        )));
    }
    Ok(())
}

/// Load config from an explicit path, or search the default location.
///
/// An explicit path must exist. The result is not validated here so that
/// command-line overrides can be applied first.
pub fn load_config_from(path: Option<&Path>) -> Result<PipelineConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        local.exists().then_some(local)
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => PipelineConfig::default(),
    };

    Ok(config)
}

/// Parse a TOML string into a `PipelineConfig`.
pub fn parse_config_str(content: &str) -> Result<PipelineConfig> {
    Ok(toml::from_str::<PipelineConfig>(content)?)
}
