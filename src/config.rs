use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Share of occupied cells at which a host is expected to grow the board.
pub const NEARLY_FILLED_THRESHOLD: f64 = 0.7;

const DEFAULT_ATTACK_BIAS: f64 = 1.1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternWeight {
  /// `x` marks an own stone, `_` an empty cell.
  pub template: String,
  pub weight: u32,
}

impl PatternWeight {
  pub fn new(template: &str, weight: u32) -> Self {
    Self {
      template: template.to_string(),
      weight,
    }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeuristicConfig {
  #[serde(default = "default_patterns")]
  pub patterns: Vec<PatternWeight>,
  #[serde(default = "default_attack_bias")]
  pub attack_bias: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub seed: Option<u64>,
}

impl Default for HeuristicConfig {
  fn default() -> Self {
    Self {
      patterns: default_patterns(),
      attack_bias: default_attack_bias(),
      seed: None,
    }
  }
}

impl HeuristicConfig {
  pub fn with_seed(mut self, seed: u64) -> Self {
    self.seed = Some(seed);
    self
  }

  pub fn load(path: &Path) -> Result<Self, EngineError> {
    let data = fs::read_to_string(path)?;
    let config = serde_json::from_str::<HeuristicConfig>(&data)?;
    config.validate()?;
    Ok(config)
  }

  pub fn load_or_default(path: &Path) -> Self {
    match Self::load(path) {
      Ok(config) => config,
      Err(err) => {
        log::warn!("falling back to default heuristics ({}): {}", path.display(), err);
        Self::default()
      }
    }
  }

  pub fn save(&self, path: &Path) -> Result<(), EngineError> {
    let data = serde_json::to_string_pretty(self)?;
    fs::write(path, data)?;
    Ok(())
  }

  /// Template text itself is checked by the pattern compiler.
  pub fn validate(&self) -> Result<(), EngineError> {
    if !self.attack_bias.is_finite() || self.attack_bias <= 0.0 {
      return Err(EngineError::Configuration(format!(
        "attack bias must be a positive number, got {}",
        self.attack_bias
      )));
    }
    Ok(())
  }
}

fn default_attack_bias() -> f64 {
  DEFAULT_ATTACK_BIAS
}

fn default_patterns() -> Vec<PatternWeight> {
  vec![
    PatternWeight::new("xxxxx", 99999),
    PatternWeight::new("_xxxx_", 7000),
    PatternWeight::new("_xxxx", 4000),
    PatternWeight::new("xxxx_", 4000),
    PatternWeight::new("_x_xxx", 2000),
    PatternWeight::new("_xx_xx", 2000),
    PatternWeight::new("_xxx_x", 2000),
    PatternWeight::new("xxx_x_", 2000),
    PatternWeight::new("xx_xx_", 2000),
    PatternWeight::new("x_xxx_", 2000),
    PatternWeight::new("_xxx_", 3000),
    PatternWeight::new("_xxx", 1500),
    PatternWeight::new("xxx_", 1500),
    PatternWeight::new("_xx_x", 800),
    PatternWeight::new("_x_xx", 800),
    PatternWeight::new("xx_x_", 800),
    PatternWeight::new("x_xx_", 800),
    PatternWeight::new("_xx_", 200),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_catalogue_keeps_canonical_order() {
    let config = HeuristicConfig::default();
    assert_eq!(config.patterns.len(), 18);
    assert_eq!(config.patterns[0], PatternWeight::new("xxxxx", 99999));
    assert_eq!(config.patterns[17], PatternWeight::new("_xx_", 200));
    assert_eq!(config.attack_bias, 1.1);
    assert!(config.seed.is_none());
  }

  #[test]
  fn missing_fields_take_defaults() {
    let config: HeuristicConfig = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.patterns, HeuristicConfig::default().patterns);
  }

  #[test]
  fn rejects_non_positive_bias() {
    let config = HeuristicConfig {
      attack_bias: 0.0,
      ..HeuristicConfig::default()
    };
    assert!(matches!(config.validate(), Err(EngineError::Configuration(_))));
  }

  #[test]
  fn save_then_load_from_disk() {
    let path = std::env::temp_dir().join(format!("gomoku_ai_config_{}.json", std::process::id()));
    let config = HeuristicConfig {
      patterns: vec![PatternWeight::new("_xx_", 10)],
      attack_bias: 1.5,
      seed: Some(3),
    };
    config.save(&path).unwrap();
    let loaded = HeuristicConfig::load(&path).unwrap();
    let _ = fs::remove_file(&path);
    assert_eq!(loaded, config);
  }

  #[test]
  fn unreadable_file_falls_back_to_default() {
    let path = Path::new("/nonexistent/gomoku_ai/heuristics.json");
    assert_eq!(HeuristicConfig::load_or_default(path), HeuristicConfig::default());
  }
}
