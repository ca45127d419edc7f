//! Burden Weight Analysis
//!
//! Fit of an assigned burden (weight carried) relative to body weight.
//!
//! ```text
//!     burden_ratio = burden / horse_weight * 100
//!     deviation    = burden_ratio - optimal_ratio   (ratio points)
//!     impact       = deviation * horse_weight / 100  (kg, 1 kg ≈ 1 length)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::scoring::{classify, correlation, fit_score, Bound, CategoryRange, FIT_TOLERANCE};
use crate::config::BurdenConfig;
use crate::models::BurdenHistoryEntry;

/// Lengths gained or lost per kg of burden
const LENGTHS_PER_KG: f64 = 1.0;

/// Finishing positions counted as a winning performance
const TOP_FINISH_BAND: u32 = 3;

/// Advantage score points per kg lighter than the field average
const ADVANTAGE_POINTS_PER_KG: f64 = 5.0;

/// Qualitative burden assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurdenAssessment {
    /// Accepted on input; the classifier reports every light deviation as `Light`
    VeryLight,
    Light,
    Optimal,
    SlightlyHeavy,
    Heavy,
    VeryHeavy,
}

impl BurdenAssessment {
    pub fn as_str(self) -> &'static str {
        match self {
            BurdenAssessment::VeryLight => "very_light",
            BurdenAssessment::Light => "light",
            BurdenAssessment::Optimal => "optimal",
            BurdenAssessment::SlightlyHeavy => "slightly_heavy",
            BurdenAssessment::Heavy => "heavy",
            BurdenAssessment::VeryHeavy => "very_heavy",
        }
    }
}

impl fmt::Display for BurdenAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shares its optimal band with [`fit_score`] so that
/// `Optimal` <=> fit score of 100
const ASSESSMENT_RANGES: [CategoryRange<BurdenAssessment>; 5] = [
    CategoryRange::new(BurdenAssessment::Light, Bound::Unbounded, Bound::Exclusive(-FIT_TOLERANCE)),
    CategoryRange::new(
        BurdenAssessment::Optimal,
        Bound::Inclusive(-FIT_TOLERANCE),
        Bound::Inclusive(FIT_TOLERANCE),
    ),
    CategoryRange::new(
        BurdenAssessment::SlightlyHeavy,
        Bound::Exclusive(FIT_TOLERANCE),
        Bound::Inclusive(1.0),
    ),
    CategoryRange::new(BurdenAssessment::Heavy, Bound::Exclusive(1.0), Bound::Inclusive(2.0)),
    CategoryRange::new(BurdenAssessment::VeryHeavy, Bound::Exclusive(2.0), Bound::Unbounded),
];

/// Classify a ratio-point deviation from the optimal ratio
///
/// NaN matches no range and is labeled `very_heavy`, in line with its
/// fit score of 0.
pub fn get_assessment(deviation: f64) -> BurdenAssessment {
    classify(deviation, &ASSESSMENT_RANGES).unwrap_or(BurdenAssessment::VeryHeavy)
}

/// Position effect in lengths of a ratio deviation (sign preserved)
///
/// # Examples
/// ```
/// use horserace::core::burden::calculate_impact;
/// assert_eq!(calculate_impact(1.0, 500.0), 5.0);
/// assert_eq!(calculate_impact(-1.0, 500.0), -5.0);
/// ```
pub fn calculate_impact(deviation: f64, horse_weight: f64) -> f64 {
    deviation * horse_weight / 100.0 * LENGTHS_PER_KG
}

fn burden_ratio(burden: f64, horse_weight: f64) -> f64 {
    if horse_weight > 0.0 {
        burden * 100.0 / horse_weight
    } else {
        0.0
    }
}

/// Burden fit for one horse in one race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurdenAnalysis {
    pub horse_name: String,
    pub burden_weight: f64,
    pub horse_weight: f64,
    pub burden_ratio: f64,
    pub optimal_ratio: f64,
    pub deviation: f64,
    pub assessment: BurdenAssessment,
    pub fit_score: f64,
    /// Lengths; positive = disadvantage
    pub expected_impact: f64,
}

/// What to do about an assigned burden
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BurdenRecommendation {
    NoChange,
    ExceedsOptimal { excess_kg: f64 },
    Advantageous { margin_kg: f64 },
}

impl fmt::Display for BurdenRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BurdenRecommendation::NoChange => write!(f, "Burden is at the optimal weight"),
            BurdenRecommendation::ExceedsOptimal { excess_kg } => write!(
                f,
                "Burden exceeds optimal by {:.1}kg (about {:.1} lengths lost)",
                excess_kg,
                excess_kg * LENGTHS_PER_KG
            ),
            BurdenRecommendation::Advantageous { margin_kg } => write!(
                f,
                "Burden is {:.1}kg under optimal, an advantageous weight",
                margin_kg
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurdenOptimization {
    pub optimal_burden: f64,
    /// burden - optimal burden (kg)
    pub difference: f64,
    /// Lengths; positive = lengths lost
    pub expected_position_change: f64,
    pub recommendation: BurdenRecommendation,
}

/// Burden ratio range (percent)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioRange {
    pub min: f64,
    pub max: f64,
}

/// Burden/performance summary over a horse's past races
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalBurdenAnalysis {
    pub races: usize,
    pub avg_burden: f64,
    pub avg_ratio: f64,
    pub best_performance_burden: f64,
    pub winning_ratio_range: RatioRange,
    /// Burden vs. finishing position; positive = heavier runs finish worse
    pub correlation: f64,
}

/// Burden analyzer over a fixed set of ratio constants
#[derive(Debug, Clone, Default)]
pub struct BurdenAnalyzer {
    config: BurdenConfig,
}

impl BurdenAnalyzer {
    pub fn new(config: BurdenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BurdenConfig {
        &self.config
    }

    /// Target ratio, reduced for horses under the young-age threshold
    pub fn optimal_ratio(&self, base_ratio: Option<f64>, age: Option<u8>) -> f64 {
        let ratio = base_ratio.unwrap_or(self.config.optimal_ratio);
        match age {
            Some(age) if age < self.config.young_age_threshold => {
                ratio - self.config.young_ratio_reduction
            }
            _ => ratio,
        }
    }

    pub fn analyze(&self, horse_name: &str, burden: f64, horse_weight: f64) -> BurdenAnalysis {
        self.analyze_with_age(horse_name, burden, horse_weight, None)
    }

    pub fn analyze_with_age(
        &self,
        horse_name: &str,
        burden: f64,
        horse_weight: f64,
        age: Option<u8>,
    ) -> BurdenAnalysis {
        let optimal_ratio = self.optimal_ratio(None, age);
        let ratio = burden_ratio(burden, horse_weight);
        let deviation = ratio - optimal_ratio;

        let expected_impact = if horse_weight > 0.0 {
            calculate_impact(deviation, horse_weight)
        } else {
            debug!("No body weight for {}, burden ratio unavailable", horse_name);
            0.0
        };

        BurdenAnalysis {
            horse_name: horse_name.to_string(),
            burden_weight: burden,
            horse_weight,
            burden_ratio: ratio,
            optimal_ratio,
            deviation,
            assessment: get_assessment(deviation),
            fit_score: fit_score(deviation),
            expected_impact,
        }
    }

    /// Optimal burden in whole kg for a body weight
    ///
    /// # Examples
    /// ```
    /// use horserace::core::burden::BurdenAnalyzer;
    /// assert_eq!(BurdenAnalyzer::default().find_optimal_burden(480.0), 53.0);
    /// ```
    pub fn find_optimal_burden(&self, horse_weight: f64) -> f64 {
        (horse_weight * self.config.optimal_ratio / 100.0).round()
    }

    /// Compare an assigned burden with the optimal one
    ///
    /// # Arguments
    /// * `burden` - Assigned burden (kg)
    /// * `horse_weight` - Body weight (kg)
    ///
    /// # Returns
    /// Optimal burden, signed difference (positive = heavier than optimal),
    /// expected position change in lengths and a recommendation
    pub fn optimize_burden(&self, burden: f64, horse_weight: f64) -> BurdenOptimization {
        let optimal_burden = self.find_optimal_burden(horse_weight);
        let difference = burden - optimal_burden;

        let recommendation = if difference.abs() < 1e-9 {
            BurdenRecommendation::NoChange
        } else if difference > 0.0 {
            BurdenRecommendation::ExceedsOptimal {
                excess_kg: difference,
            }
        } else {
            BurdenRecommendation::Advantageous {
                margin_kg: -difference,
            }
        };

        BurdenOptimization {
            optimal_burden,
            difference,
            expected_position_change: difference * LENGTHS_PER_KG,
            recommendation,
        }
    }
}

/// Optimal ratio for an optional base ratio and age
pub fn get_optimal_ratio(ratio: Option<f64>, age: Option<u8>) -> f64 {
    BurdenAnalyzer::default().optimal_ratio(ratio, age)
}

/// Analyze a burden with the default optimal ratio
///
/// # Examples
/// ```
/// use horserace::core::burden::{analyze_burden, BurdenAssessment};
/// let analysis = analyze_burden("H", 55.0, 500.0);
/// assert_eq!(analysis.burden_ratio, 11.0);
/// assert_eq!(analysis.assessment, BurdenAssessment::Optimal);
/// ```
pub fn analyze_burden(horse_name: &str, burden: f64, horse_weight: f64) -> BurdenAnalysis {
    BurdenAnalyzer::default().analyze(horse_name, burden, horse_weight)
}

/// Optimal burden with the default 11% ratio, rounded to whole kg
pub fn find_optimal_burden(horse_weight: f64) -> f64 {
    BurdenAnalyzer::default().find_optimal_burden(horse_weight)
}

/// `BurdenAnalyzer::optimize_burden` with the default ratio
pub fn optimize_burden(burden: f64, horse_weight: f64) -> BurdenOptimization {
    BurdenAnalyzer::default().optimize_burden(burden, horse_weight)
}

/// Summarize burden against results over past races
///
/// Non-finishers (position 0) count toward the averages only.
pub fn analyze_historical_burden(history: &[BurdenHistoryEntry]) -> HistoricalBurdenAnalysis {
    if history.is_empty() {
        return HistoricalBurdenAnalysis::default();
    }

    let races = history.len();
    let avg_burden = history.iter().map(|e| e.burden).sum::<f64>() / races as f64;

    let ratios: Vec<f64> = history
        .iter()
        .filter(|e| e.horse_weight > 0.0)
        .map(|e| burden_ratio(e.burden, e.horse_weight))
        .collect();
    let avg_ratio = if ratios.is_empty() {
        0.0
    } else {
        ratios.iter().sum::<f64>() / ratios.len() as f64
    };

    let finished: Vec<&BurdenHistoryEntry> = history.iter().filter(|e| e.position > 0).collect();

    // First occurrence wins ties
    let best = finished
        .iter()
        .copied()
        .reduce(|best, e| if e.position < best.position { e } else { best });
    let best_performance_burden = best.map(|e| e.burden).unwrap_or(0.0);

    let winning_ratio_range = match best {
        Some(best) => {
            let band = best.position.max(TOP_FINISH_BAND);
            let winning: Vec<f64> = finished
                .iter()
                .filter(|e| e.position <= band && e.horse_weight > 0.0)
                .map(|e| burden_ratio(e.burden, e.horse_weight))
                .collect();

            if winning.is_empty() {
                RatioRange::default()
            } else {
                RatioRange {
                    min: winning.iter().copied().fold(f64::INFINITY, f64::min),
                    max: winning.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                }
            }
        }
        None => RatioRange::default(),
    };

    let burdens: Vec<f64> = finished.iter().map(|e| e.burden).collect();
    let positions: Vec<f64> = finished.iter().map(|e| e.position as f64).collect();

    HistoricalBurdenAnalysis {
        races,
        avg_burden,
        avg_ratio,
        best_performance_burden,
        winning_ratio_range,
        correlation: correlation(&burdens, &positions),
    }
}

/// Score (0-100) of a burden against the field average
///
/// Lighter than the field scores above 50, heavier below; an empty
/// field is neutral.
pub fn compare_burden_advantage(burden: f64, opponent_burdens: &[f64]) -> f64 {
    if opponent_burdens.is_empty() {
        return 50.0;
    }

    let field_avg = opponent_burdens.iter().sum::<f64>() / opponent_burdens.len() as f64;
    (50.0 + (field_avg - burden) * ADVANTAGE_POINTS_PER_KG).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(day: u32, burden: f64, horse_weight: f64, position: u32) -> BurdenHistoryEntry {
        BurdenHistoryEntry {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            burden,
            horse_weight,
            position,
            distance: 1400,
        }
    }

    #[test]
    fn test_analyze_optimal_burden() {
        let analysis = analyze_burden("H", 55.0, 500.0);
        assert_eq!(analysis.burden_ratio, 11.0);
        assert_eq!(analysis.assessment, BurdenAssessment::Optimal);
        assert_eq!(analysis.fit_score, 100.0);
        assert_eq!(analysis.expected_impact, 0.0);
    }

    #[test]
    fn test_analyze_heavy_burden() {
        let analysis = analyze_burden("H", 60.0, 500.0);
        assert_eq!(analysis.burden_ratio, 12.0);
        assert!(analysis.expected_impact > 0.0);
        assert_eq!(analysis.assessment, BurdenAssessment::SlightlyHeavy);
        assert!(analysis.fit_score < 100.0);
    }

    #[test]
    fn test_analyze_zero_horse_weight() {
        let analysis = analyze_burden("H", 55.0, 0.0);
        assert_eq!(analysis.burden_ratio, 0.0);
        assert_eq!(analysis.fit_score, 0.0);
        assert_eq!(analysis.expected_impact, 0.0);
        assert!(!analysis.fit_score.is_nan());
    }

    #[test]
    fn test_assessment_bands() {
        assert_eq!(get_assessment(-3.0), BurdenAssessment::Light);
        assert_eq!(get_assessment(-0.6), BurdenAssessment::Light);
        assert_eq!(get_assessment(-0.5), BurdenAssessment::Optimal);
        assert_eq!(get_assessment(0.5), BurdenAssessment::Optimal);
        assert_eq!(get_assessment(0.8), BurdenAssessment::SlightlyHeavy);
        assert_eq!(get_assessment(1.0), BurdenAssessment::SlightlyHeavy);
        assert_eq!(get_assessment(1.5), BurdenAssessment::Heavy);
        assert_eq!(get_assessment(2.0), BurdenAssessment::Heavy);
        assert_eq!(get_assessment(2.1), BurdenAssessment::VeryHeavy);
    }

    #[test]
    fn test_assessment_consistent_with_fit_score() {
        for step in -60..=60 {
            let deviation = step as f64 * 0.05;
            let optimal = get_assessment(deviation) == BurdenAssessment::Optimal;
            assert_eq!(optimal, fit_score(deviation) == 100.0, "deviation {}", deviation);
        }
    }

    #[test]
    fn test_analyze_nan_burden() {
        let analysis = analyze_burden("H", f64::NAN, 500.0);
        assert_eq!(analysis.assessment, BurdenAssessment::VeryHeavy);
        assert_eq!(analysis.fit_score, 0.0);
        assert_eq!(get_assessment(f64::NAN), BurdenAssessment::VeryHeavy);
    }

    #[test]
    fn test_find_optimal_burden() {
        assert_eq!(find_optimal_burden(500.0), 55.0);
        assert_eq!(find_optimal_burden(480.0), 53.0);
    }

    #[test]
    fn test_calculate_impact() {
        assert_eq!(calculate_impact(1.0, 500.0), 5.0);
        assert_eq!(calculate_impact(-1.0, 500.0), -5.0);
        assert_eq!(calculate_impact(2.0, 500.0), 10.0);
    }

    #[test]
    fn test_optimal_ratio_for_young_horse() {
        assert_eq!(get_optimal_ratio(None, None), 11.0);
        assert_eq!(get_optimal_ratio(None, Some(4)), 11.0);
        assert_eq!(get_optimal_ratio(None, Some(2)), 10.5);
        assert_eq!(get_optimal_ratio(Some(12.0), Some(2)), 11.5);
    }

    #[test]
    fn test_analyze_with_age() {
        let analyzer = BurdenAnalyzer::default();
        let adult = analyzer.analyze_with_age("H", 55.0, 500.0, Some(4));
        let young = analyzer.analyze_with_age("H", 55.0, 500.0, Some(2));
        assert_eq!(adult.assessment, BurdenAssessment::Optimal);
        assert_eq!(young.optimal_ratio, 10.5);
        assert!(young.deviation > adult.deviation);
    }

    #[test]
    fn test_optimize_burden_cases() {
        let at_optimal = optimize_burden(55.0, 500.0);
        assert_eq!(at_optimal.difference, 0.0);
        assert_eq!(at_optimal.recommendation, BurdenRecommendation::NoChange);

        let heavy = optimize_burden(58.0, 500.0);
        assert_eq!(heavy.difference, 3.0);
        assert_eq!(heavy.expected_position_change, 3.0);
        assert!(matches!(heavy.recommendation, BurdenRecommendation::ExceedsOptimal { .. }));
        assert!(heavy.recommendation.to_string().contains("exceeds"));

        let light = optimize_burden(52.0, 500.0);
        assert_eq!(light.difference, -3.0);
        assert!(matches!(light.recommendation, BurdenRecommendation::Advantageous { .. }));
        assert!(light.recommendation.to_string().contains("advantageous"));
    }

    #[test]
    fn test_historical_empty() {
        let summary = analyze_historical_burden(&[]);
        assert_eq!(summary, HistoricalBurdenAnalysis::default());
        assert_eq!(summary.correlation, 0.0);
    }

    #[test]
    fn test_historical_summary() {
        let history = vec![
            entry(1, 53.0, 500.0, 1),
            entry(8, 55.0, 500.0, 3),
            entry(15, 57.0, 500.0, 6),
            entry(22, 59.0, 500.0, 9),
        ];
        let summary = analyze_historical_burden(&history);

        assert_eq!(summary.races, 4);
        assert!((summary.avg_burden - 56.0).abs() < 1e-9);
        assert!((summary.avg_ratio - 11.2).abs() < 1e-9);
        assert_eq!(summary.best_performance_burden, 53.0);
        assert!((summary.winning_ratio_range.min - 10.6).abs() < 1e-9);
        assert!((summary.winning_ratio_range.max - 11.0).abs() < 1e-9);
        assert!(summary.correlation > 0.9);
    }

    #[test]
    fn test_historical_band_widens_to_best_position() {
        // Best finish is 5th; only that run is a "winning" performance
        let history = vec![entry(1, 54.0, 450.0, 5), entry(8, 56.0, 500.0, 7)];
        let summary = analyze_historical_burden(&history);
        assert_eq!(summary.best_performance_burden, 54.0);
        assert!((summary.winning_ratio_range.min - 12.0).abs() < 1e-9);
        assert_eq!(summary.winning_ratio_range.min, summary.winning_ratio_range.max);
    }

    #[test]
    fn test_historical_ignores_non_finishers_for_best() {
        let history = vec![entry(1, 52.0, 500.0, 0), entry(8, 56.0, 500.0, 2)];
        let summary = analyze_historical_burden(&history);
        assert_eq!(summary.best_performance_burden, 56.0);
        assert!((summary.avg_burden - 54.0).abs() < 1e-9);
    }

    #[test]
    fn test_compare_burden_advantage() {
        assert!(compare_burden_advantage(52.0, &[60.0, 62.0, 65.0]) > 50.0);
        assert!(compare_burden_advantage(58.0, &[55.0, 56.0, 57.0]) < 50.0);
        assert_eq!(compare_burden_advantage(55.0, &[]), 50.0);
        assert_eq!(compare_burden_advantage(55.0, &[55.0, 55.0]), 50.0);
    }

    #[test]
    fn test_compare_burden_advantage_clamped() {
        assert_eq!(compare_burden_advantage(0.0, &[1_000.0]), 100.0);
        assert_eq!(compare_burden_advantage(1_000.0, &[0.0]), 0.0);
    }

    #[test]
    fn test_analysis_idempotent() {
        assert_eq!(analyze_burden("H", 57.5, 472.0), analyze_burden("H", 57.5, 472.0));
    }
}
