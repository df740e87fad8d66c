//! Engine configuration
//!
//! Stored as TOML, e.g.:
//!
//! ```toml
//! [permutation]
//! max_symbols = 10
//! direction = "anticlockwise"
//!
//! [synth]
//! max_generator = 9
//! ```
//!
//! Every field has a default, so a partial file (or no file) is fine.

use crate::error::{PatternError, PatternResult};
use crate::permutation::Direction;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Bounds and defaults for the permutation engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermutationSettings {
    /// Largest multiset accepted, checked before anything is computed
    pub max_symbols: usize,
    /// Largest distinct-permutation table that will be enumerated
    pub max_permutations: u64,
    /// Rotation direction used by circular / anticircular
    pub direction: Direction,
}

impl Default for PermutationSettings {
    fn default() -> Self {
        Self {
            max_symbols: 12,
            max_permutations: 1_000_000,
            direction: Direction::Clockwise,
        }
    }
}

/// Bounds for the interference synthesizer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthSettings {
    /// Upper clamp for the grouped and compound generator pair
    pub max_generator: i64,
    /// Longest resultant the two/three generator families will build
    pub max_span: usize,
}

impl Default for SynthSettings {
    fn default() -> Self {
        Self {
            max_generator: 9,
            max_span: 65_536,
        }
    }
}

/// CLI output preferences
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Emit JSON instead of text
    pub json: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub permutation: PermutationSettings,
    pub synth: SynthSettings,
    pub output: OutputSettings,
}

impl EngineConfig {
    /// Default config file location (`<config dir>/schillinger/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("schillinger").join("config.toml"))
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> PatternResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load from the default location, falling back to defaults when absent
    pub fn load_default() -> PatternResult<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parse TOML content
    pub fn parse(content: &str) -> PatternResult<Self> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| PatternError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save as TOML
    pub fn save(&self, path: &Path) -> PatternResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> PatternResult<String> {
        toml::to_string_pretty(self).map_err(|e| PatternError::Config(e.to_string()))
    }

    fn validate(&self) -> PatternResult<()> {
        if self.synth.max_generator < 1 {
            return Err(PatternError::Config(
                "synth.max_generator must be at least 1".to_string(),
            ));
        }
        if self.permutation.max_permutations == 0 {
            return Err(PatternError::Config(
                "permutation.max_permutations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
