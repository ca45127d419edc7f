//! Prediction adapter
//!
//! Reduces each analysis to the small record or single 0-100 score that
//! the downstream race predictor consumes. Anything richer stays on the
//! `*Analysis` types for display.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalyzerConfig;
use crate::core::bloodline::BloodlineAnalyzer;
use crate::core::burden::BurdenAnalyzer;
use crate::core::combo::ComboAnalyzer;
use crate::data::sire_db::{sire_database, SireDatabase};
use crate::models::Surface;

/// Neutral score for "not enough signal"
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Bloodline summary for the predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodlinePrediction {
    pub sire: Option<String>,
    pub distance_aptitude: u8,
    pub dirt_aptitude: u8,
}

/// Everything the predictor knows about one runner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunnerInput {
    pub horse_name: String,
    #[serde(default)]
    pub sire: Option<String>,
    #[serde(default)]
    pub dam: Option<String>,
    #[serde(default)]
    pub grandsire: Option<String>,
    pub burden: f64,
    #[serde(default)]
    pub horse_weight: f64,
    #[serde(default)]
    pub combo_win_rate: Option<f64>,
    #[serde(default)]
    pub combo_starts: u32,
    #[serde(default)]
    pub jockey_avg_win_rate: f64,
    #[serde(default)]
    pub trainer_avg_win_rate: f64,
    #[serde(default)]
    pub race_distance: Option<u32>,
    #[serde(default)]
    pub surface: Option<Surface>,
}

/// Adapter outputs for one runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerSignals {
    pub horse_name: String,
    pub bloodline: BloodlinePrediction,
    /// Present when both race distance and surface are known
    pub bloodline_fit: Option<f64>,
    pub burden_score: f64,
    pub combo_score: f64,
}

/// The three analyzers behind the adapter functions
#[derive(Debug, Clone)]
pub struct SignalAdapter<'a> {
    bloodline: BloodlineAnalyzer<'a>,
    burden: BurdenAnalyzer,
    combo: ComboAnalyzer,
}

impl<'a> SignalAdapter<'a> {
    pub fn new(db: &'a SireDatabase, config: &AnalyzerConfig) -> Self {
        Self {
            bloodline: BloodlineAnalyzer::new(db, config.bloodline),
            burden: BurdenAnalyzer::new(config.burden.clone()),
            combo: ComboAnalyzer::new(config.combo.clone()),
        }
    }

    pub fn bloodline_for_prediction(
        &self,
        sire: Option<&str>,
        dam: Option<&str>,
        grandsire: Option<&str>,
    ) -> BloodlinePrediction {
        if sire.is_none() && dam.is_none() && grandsire.is_none() {
            return BloodlinePrediction {
                sire: None,
                distance_aptitude: 3,
                dirt_aptitude: 3,
            };
        }

        let analysis = self.bloodline.analyze("", sire, dam, grandsire);
        BloodlinePrediction {
            sire: analysis.sire,
            distance_aptitude: analysis.distance_aptitude,
            dirt_aptitude: analysis.dirt_aptitude,
        }
    }

    pub fn burden_score_for_prediction(&self, burden: f64, horse_weight: f64) -> f64 {
        if horse_weight <= 0.0 {
            debug!("Horse weight unknown, neutral burden score");
            return NEUTRAL_SCORE;
        }
        self.burden.analyze("", burden, horse_weight).fit_score
    }

    pub fn combo_score_for_prediction(
        &self,
        combo_win_rate: Option<f64>,
        jockey_avg: f64,
        trainer_avg: f64,
        starts: u32,
    ) -> f64 {
        self.combo
            .score_for_prediction(combo_win_rate, jockey_avg, trainer_avg, starts)
    }

    pub fn runner_signals(&self, input: &RunnerInput) -> RunnerSignals {
        let sire = input.sire.as_deref();
        let dam = input.dam.as_deref();
        let grandsire = input.grandsire.as_deref();

        let bloodline_fit = match (input.race_distance, input.surface) {
            (Some(distance), Some(surface)) => Some(
                self.bloodline
                    .analyze(&input.horse_name, sire, dam, grandsire)
                    .race_fit(distance, surface)
                    .overall,
            ),
            _ => None,
        };

        RunnerSignals {
            horse_name: input.horse_name.clone(),
            bloodline: self.bloodline_for_prediction(sire, dam, grandsire),
            bloodline_fit,
            burden_score: self.burden_score_for_prediction(input.burden, input.horse_weight),
            combo_score: self.combo_score_for_prediction(
                input.combo_win_rate,
                input.jockey_avg_win_rate,
                input.trainer_avg_win_rate,
                input.combo_starts,
            ),
        }
    }
}

impl Default for SignalAdapter<'static> {
    fn default() -> Self {
        Self::new(sire_database(), &AnalyzerConfig::default())
    }
}

/// Bloodline aptitudes for the predictor; 3 / 3 when nothing is known
pub fn get_bloodline_for_prediction(
    sire: Option<&str>,
    dam: Option<&str>,
    grandsire: Option<&str>,
) -> BloodlinePrediction {
    SignalAdapter::default().bloodline_for_prediction(sire, dam, grandsire)
}

/// Burden fit score; neutral 50 when body weight is unknown (0)
pub fn get_burden_score_for_prediction(burden: f64, horse_weight: f64) -> f64 {
    SignalAdapter::default().burden_score_for_prediction(burden, horse_weight)
}

/// Combo synergy score; neutral 50 without a combo rate or enough starts
pub fn get_combo_score_for_prediction(
    combo_win_rate: Option<f64>,
    jockey_avg: f64,
    trainer_avg: f64,
    starts: u32,
) -> f64 {
    SignalAdapter::default().combo_score_for_prediction(combo_win_rate, jockey_avg, trainer_avg, starts)
}
