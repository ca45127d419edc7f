//! Analyzer configuration
//!
//! Every weight and threshold is a fixed domain constant. The defaults
//! here are the shipped values; a JSON file may override any subset.
//!
//! Example JSON:
//! ```json
//! {
//!   "bloodline": { "sire": 0.7, "grandsire": 0.3 },
//!   "burden": { "optimal_ratio": 11.0 },
//!   "combo": { "grade_cutoffs": { "s": 80, "a": 65, "b": 50, "c": 35 } }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{validate_ratio, AnalysisError};

/// Sire vs. maternal grandsire influence on aptitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BloodlineWeights {
    pub sire: f64,
    pub grandsire: f64,
}

/// Shipped bloodline weights (paternal line dominates)
pub const BLOODLINE_WEIGHTS: BloodlineWeights = BloodlineWeights {
    sire: 0.7,
    grandsire: 0.3,
};

impl Default for BloodlineWeights {
    fn default() -> Self {
        BLOODLINE_WEIGHTS
    }
}

/// Burden ratio constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BurdenConfig {
    /// Target burden as percent of body weight
    pub optimal_ratio: f64,
    /// Horses younger than this carry a reduced target
    pub young_age_threshold: u8,
    /// Ratio points removed from the target for young horses
    pub young_ratio_reduction: f64,
}

impl Default for BurdenConfig {
    fn default() -> Self {
        Self {
            optimal_ratio: 11.0,
            young_age_threshold: 3,
            young_ratio_reduction: 0.5,
        }
    }
}

/// Minimum synergy score for each grade (D is everything below `c`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GradeCutoffs {
    pub s: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Default for GradeCutoffs {
    fn default() -> Self {
        Self {
            s: 80.0,
            a: 65.0,
            b: 50.0,
            c: 35.0,
        }
    }
}

/// Jockey-trainer combo constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComboConfig {
    pub grade_cutoffs: GradeCutoffs,
    /// Fewer starts than this and the prediction score stays neutral
    pub min_starts_for_prediction: u32,
    /// Relative uplift (%) needed to count as positive synergy
    pub positive_synergy_margin: f64,
    /// Grade-only bonus for strong recent form
    pub recent_form_boost: f64,
    /// Synergy points per percent of uplift
    pub uplift_scale: f64,
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self {
            grade_cutoffs: GradeCutoffs::default(),
            min_starts_for_prediction: 5,
            positive_synergy_margin: 10.0,
            recent_form_boost: 5.0,
            uplift_scale: 0.5,
        }
    }
}

/// Full analyzer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    pub bloodline: BloodlineWeights,
    pub burden: BurdenConfig,
    pub combo: ComboConfig,
}

impl AnalyzerConfig {
    /// Load and validate a config file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: AnalyzerConfig = serde_json::from_str(&content)?;
        validate_config(&config).map_err(AnalysisError::InvalidConfig)?;
        info!("Loaded analyzer config from {}", path.display());
        Ok(config)
    }
}

/// Validate configuration, returning every error at once
pub fn validate_config(config: &AnalyzerConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let weights = &config.bloodline;
    if weights.sire < 0.0 || weights.grandsire < 0.0 {
        errors.push("bloodline: weights must be non-negative".to_string());
    }
    if (weights.sire + weights.grandsire - 1.0).abs() > 1e-9 {
        errors.push(format!(
            "bloodline: sire + grandsire must equal 1, got {}",
            weights.sire + weights.grandsire
        ));
    }

    if let Err(e) = validate_ratio("burden.optimal_ratio", config.burden.optimal_ratio) {
        errors.push(e.to_string());
    }
    let reduction = config.burden.young_ratio_reduction;
    if reduction < 0.0 || reduction >= config.burden.optimal_ratio {
        errors.push(format!(
            "burden.young_ratio_reduction: must be in [0, optimal_ratio), got {}",
            reduction
        ));
    }

    let cutoffs = &config.combo.grade_cutoffs;
    if !(cutoffs.s > cutoffs.a && cutoffs.a > cutoffs.b && cutoffs.b > cutoffs.c) {
        errors.push("combo.grade_cutoffs: must be strictly descending S > A > B > C".to_string());
    }
    if cutoffs.c < 0.0 || cutoffs.s > 100.0 {
        errors.push("combo.grade_cutoffs: must lie within 0-100".to_string());
    }
    if config.combo.positive_synergy_margin < 0.0 {
        errors.push("combo.positive_synergy_margin: must be non-negative".to_string());
    }
    if config.combo.recent_form_boost < 0.0 {
        errors.push("combo.recent_form_boost: must be non-negative".to_string());
    }
    if let Err(e) = validate_ratio("combo.uplift_scale", config.combo.uplift_scale) {
        errors.push(e.to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
