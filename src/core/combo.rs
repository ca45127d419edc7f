//! Jockey-Trainer Combo Synergy
//!
//! Scores a pairing's record against what each party achieves on their own.
//!
//! ```text
//!     expected = (jockey_avg_win_rate + trainer_avg_win_rate) / 2
//!     uplift   = (win_rate - expected) / expected * 100
//!     synergy  = clamp(50 + uplift * uplift_scale, 0, 100)
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use super::scoring::{classify, Bound, CategoryRange};
use crate::config::{ComboConfig, GradeCutoffs};
use crate::models::{ComboExtras, ComboStats, JockeyTrainerCombo, Reliability};

/// Starts needed for a high / medium reliability label
const HIGH_RELIABILITY_STARTS: u32 = 30;
const MEDIUM_RELIABILITY_STARTS: u32 = 10;

/// Recent-form window (most recent races) and qualifying threshold
const RECENT_FORM_WINDOW: usize = 5;
const RECENT_FORM_MIN_RACES: usize = 3;
const STRONG_FORM_AVG_POSITION: f64 = 3.0;

/// Number of combos reported as top performers
const TOP_PERFORMER_COUNT: usize = 5;

pub const DEFAULT_MEET: &str = "1";
pub const DEFAULT_MEET_NAME: &str = "서울";

/// KRA meet code to name mapping
pub fn meet_name(code: &str) -> &'static str {
    match code.trim() {
        "1" => "서울",
        "2" => "제주",
        "3" => "부산경남",
        _ => "미상",
    }
}

/// Synergy grade, ordered weakest to strongest (D < C < B < A < S)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SynergyGrade {
    D,
    C,
    B,
    A,
    S,
}

impl SynergyGrade {
    pub const ALL: [SynergyGrade; 5] = [
        SynergyGrade::S,
        SynergyGrade::A,
        SynergyGrade::B,
        SynergyGrade::C,
        SynergyGrade::D,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Some(SynergyGrade::S),
            "A" => Some(SynergyGrade::A),
            "B" => Some(SynergyGrade::B),
            "C" => Some(SynergyGrade::C),
            "D" => Some(SynergyGrade::D),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SynergyGrade::S => "S",
            SynergyGrade::A => "A",
            SynergyGrade::B => "B",
            SynergyGrade::C => "C",
            SynergyGrade::D => "D",
        }
    }
}

impl fmt::Display for SynergyGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed `"<jockeyId>-<trainerId>"` combo id
///
/// Splits on the first `-`; an id without one is all jockey id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComboKey {
    pub jockey_id: String,
    pub trainer_id: String,
}

impl ComboKey {
    pub fn parse(id: &str) -> Self {
        match id.split_once('-') {
            Some((jockey, trainer)) => Self {
                jockey_id: jockey.trim().to_string(),
                trainer_id: trainer.trim().to_string(),
            },
            None => Self {
                jockey_id: id.trim().to_string(),
                trainer_id: String::new(),
            },
        }
    }
}

impl fmt::Display for ComboKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.jockey_id, self.trainer_id)
    }
}

/// Synergy analysis of one jockey-trainer pairing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboAnalysis {
    pub jockey_id: String,
    pub trainer_id: String,
    pub name: String,
    pub starts: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub place_rate: f64,
    pub synergy_score: f64,
    pub uplift_percent: f64,
    pub synergy_grade: SynergyGrade,
    pub reliability: Reliability,
}

/// Predicates for [`filter_synergistic_combos`]; all supplied ones must hold
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComboFilter {
    pub min_starts: Option<u32>,
    pub min_win_rate: Option<f64>,
    /// At least this grade
    pub synergy_grade: Option<SynergyGrade>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboSortKey {
    SynergyScore,
    WinRate,
    Starts,
    Uplift,
}

impl ComboSortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "synergy" | "synergy_score" | "synergyScore" => Some(ComboSortKey::SynergyScore),
            "win_rate" | "winRate" => Some(ComboSortKey::WinRate),
            "starts" => Some(ComboSortKey::Starts),
            "uplift" => Some(ComboSortKey::Uplift),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Population summary over many combos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboSummary {
    pub total_combos: usize,
    pub avg_win_rate: f64,
    pub grade_distribution: BTreeMap<SynergyGrade, usize>,
    pub top_performers: Vec<ComboAnalysis>,
}

/// Percentage of starts, capped at 100 when counts exceed starts
fn rate(count: u64, starts: u32) -> f64 {
    if starts > 0 {
        (count as f64 * 100.0 / starts as f64).min(100.0)
    } else {
        0.0
    }
}

fn uplift_percent(win_rate: f64, jockey_avg: f64, trainer_avg: f64) -> f64 {
    let expected = (jockey_avg + trainer_avg) / 2.0;
    if expected > 0.0 {
        (win_rate - expected) / expected * 100.0
    } else {
        0.0
    }
}

/// True when recent finishes average inside the top places
///
/// `recent_form` is oldest first; only the latest races count.
fn has_strong_recent_form(recent_form: &[u32]) -> bool {
    let finished: Vec<u32> = recent_form
        .iter()
        .rev()
        .take(RECENT_FORM_WINDOW)
        .copied()
        .filter(|&p| p > 0)
        .collect();

    if finished.len() < RECENT_FORM_MIN_RACES {
        return false;
    }

    let avg = finished.iter().map(|&p| u64::from(p)).sum::<u64>() as f64 / finished.len() as f64;
    avg <= STRONG_FORM_AVG_POSITION
}

/// Reliability label from the number of starts together
pub fn get_combo_reliability(starts: u32) -> Reliability {
    if starts >= HIGH_RELIABILITY_STARTS {
        Reliability::High
    } else if starts >= MEDIUM_RELIABILITY_STARTS {
        Reliability::Medium
    } else {
        Reliability::Low
    }
}

/// Combo analyzer over a fixed set of grade constants
#[derive(Debug, Clone)]
pub struct ComboAnalyzer {
    config: ComboConfig,
    grade_ranges: [CategoryRange<SynergyGrade>; 5],
}

impl ComboAnalyzer {
    pub fn new(config: ComboConfig) -> Self {
        let grade_ranges = Self::build_grade_ranges(&config.grade_cutoffs);
        Self {
            config,
            grade_ranges,
        }
    }

    fn build_grade_ranges(cutoffs: &GradeCutoffs) -> [CategoryRange<SynergyGrade>; 5] {
        [
            CategoryRange::new(SynergyGrade::S, Bound::Inclusive(cutoffs.s), Bound::Unbounded),
            CategoryRange::new(
                SynergyGrade::A,
                Bound::Inclusive(cutoffs.a),
                Bound::Exclusive(cutoffs.s),
            ),
            CategoryRange::new(
                SynergyGrade::B,
                Bound::Inclusive(cutoffs.b),
                Bound::Exclusive(cutoffs.a),
            ),
            CategoryRange::new(
                SynergyGrade::C,
                Bound::Inclusive(cutoffs.c),
                Bound::Exclusive(cutoffs.b),
            ),
            CategoryRange::new(SynergyGrade::D, Bound::Unbounded, Bound::Exclusive(cutoffs.c)),
        ]
    }

    pub fn config(&self) -> &ComboConfig {
        &self.config
    }

    /// Synergy score (0-100) for a relative uplift; 0% maps to 50
    pub fn synergy_score(&self, uplift: f64) -> f64 {
        (50.0 + uplift * self.config.uplift_scale).clamp(0.0, 100.0)
    }

    /// Grade for a synergy score; total over every input
    pub fn grade(&self, score: f64) -> SynergyGrade {
        classify(score, &self.grade_ranges).unwrap_or(SynergyGrade::D)
    }

    /// Rates, uplift, synergy score and grade for one combo
    ///
    /// # Arguments
    /// * `stats` - Combo record; `id` is `<jockeyId>-<trainerId>`
    /// * `jockey_avg_win_rate` - Jockey's overall win rate (%)
    /// * `trainer_avg_win_rate` - Trainer's overall win rate (%)
    /// * `extras` - Optional place counts and recent form
    ///
    /// # Returns
    /// Analysis with rates capped at 100; the recent-form boost affects the grade only
    pub fn analyze(
        &self,
        stats: &ComboStats,
        jockey_avg_win_rate: f64,
        trainer_avg_win_rate: f64,
        extras: &ComboExtras,
    ) -> ComboAnalysis {
        let key = ComboKey::parse(&stats.id);
        let win_rate = rate(u64::from(stats.wins), stats.starts);

        let place_rate = match (extras.seconds, extras.thirds) {
            (None, None) => win_rate,
            (seconds, thirds) => {
                let placed = u64::from(stats.wins)
                    + u64::from(seconds.unwrap_or(0))
                    + u64::from(thirds.unwrap_or(0));
                rate(placed, stats.starts)
            }
        };

        let uplift = uplift_percent(win_rate, jockey_avg_win_rate, trainer_avg_win_rate);
        let synergy_score = self.synergy_score(uplift);

        let graded_score = if has_strong_recent_form(&extras.recent_form) {
            debug!("Recent form boost applied to combo {}", key);
            (synergy_score + self.config.recent_form_boost).min(100.0)
        } else {
            synergy_score
        };

        ComboAnalysis {
            jockey_id: key.jockey_id,
            trainer_id: key.trainer_id,
            name: stats.name.clone(),
            starts: stats.starts,
            wins: stats.wins,
            win_rate,
            place_rate,
            synergy_score,
            uplift_percent: uplift,
            synergy_grade: self.grade(graded_score),
            reliability: get_combo_reliability(stats.starts),
        }
    }

    /// Combo win rate beats the expected average by more than the margin
    pub fn is_positive_synergy(&self, combo_win_rate: f64, jockey_avg: f64, trainer_avg: f64) -> bool {
        let expected = (jockey_avg + trainer_avg) / 2.0;
        combo_win_rate > expected * (1.0 + self.config.positive_synergy_margin / 100.0)
    }

    /// Synergy score, or neutral 50 when the sample is too thin to trust
    pub fn score_for_prediction(
        &self,
        combo_win_rate: Option<f64>,
        jockey_avg: f64,
        trainer_avg: f64,
        starts: u32,
    ) -> f64 {
        let Some(win_rate) = combo_win_rate else {
            return 50.0;
        };
        if starts < self.config.min_starts_for_prediction {
            debug!(
                "Combo sample too small ({} < {} starts), neutral score",
                starts, self.config.min_starts_for_prediction
            );
            return 50.0;
        }

        self.synergy_score(uplift_percent(win_rate, jockey_avg, trainer_avg))
    }
}

impl Default for ComboAnalyzer {
    fn default() -> Self {
        Self::new(ComboConfig::default())
    }
}

/// Analyze a combo with the default grade constants
///
/// # Examples
/// ```
/// use horserace::core::combo::analyze_combo;
/// use horserace::models::{ComboExtras, ComboStats};
///
/// let stats = ComboStats {
///     id: "J01-T07".to_string(),
///     name: "Kim / Park".to_string(),
///     starts: 30,
///     wins: 6,
///     rate: 20.0,
/// };
/// let analysis = analyze_combo(&stats, 15.0, 10.0, &ComboExtras::default());
/// assert_eq!(analysis.win_rate, 20.0);
/// assert_eq!(analysis.trainer_id, "T07");
/// ```
pub fn analyze_combo(
    stats: &ComboStats,
    jockey_avg_win_rate: f64,
    trainer_avg_win_rate: f64,
    extras: &ComboExtras,
) -> ComboAnalysis {
    ComboAnalyzer::default().analyze(stats, jockey_avg_win_rate, trainer_avg_win_rate, extras)
}

/// Positive-synergy test with the default 10% margin
pub fn is_positive_synergy(combo_win_rate: f64, jockey_avg: f64, trainer_avg: f64) -> bool {
    ComboAnalyzer::default().is_positive_synergy(combo_win_rate, jockey_avg, trainer_avg)
}

/// Combos satisfying every supplied predicate
pub fn filter_synergistic_combos(combos: &[ComboAnalysis], filter: &ComboFilter) -> Vec<ComboAnalysis> {
    combos
        .iter()
        .filter(|c| filter.min_starts.map_or(true, |min| c.starts >= min))
        .filter(|c| filter.min_win_rate.map_or(true, |min| c.win_rate >= min))
        .filter(|c| filter.synergy_grade.map_or(true, |min| c.synergy_grade >= min))
        .cloned()
        .collect()
}

/// Stable sort into a new vector
pub fn rank_combos(combos: &[ComboAnalysis], sort_by: ComboSortKey, order: SortOrder) -> Vec<ComboAnalysis> {
    let key = |c: &ComboAnalysis| match sort_by {
        ComboSortKey::SynergyScore => c.synergy_score,
        ComboSortKey::WinRate => c.win_rate,
        ComboSortKey::Starts => c.starts as f64,
        ComboSortKey::Uplift => c.uplift_percent,
    };

    let mut ranked = combos.to_vec();
    ranked.sort_by(|a, b| match order {
        SortOrder::Asc => key(a).total_cmp(&key(b)),
        SortOrder::Desc => key(b).total_cmp(&key(a)),
    });
    ranked
}

/// Count, average win rate, grade distribution and top performers
///
/// Every grade appears in the distribution, zero counts included.
pub fn summarize_combo_stats(combos: &[ComboAnalysis]) -> ComboSummary {
    let mut grade_distribution: BTreeMap<SynergyGrade, usize> =
        SynergyGrade::ALL.iter().map(|&g| (g, 0)).collect();

    if combos.is_empty() {
        return ComboSummary {
            total_combos: 0,
            avg_win_rate: 0.0,
            grade_distribution,
            top_performers: Vec::new(),
        };
    }

    for combo in combos {
        *grade_distribution.entry(combo.synergy_grade).or_insert(0) += 1;
    }

    let avg_win_rate = combos.iter().map(|c| c.win_rate).sum::<f64>() / combos.len() as f64;
    let mut top_performers = rank_combos(combos, ComboSortKey::SynergyScore, SortOrder::Desc);
    top_performers.truncate(TOP_PERFORMER_COUNT);

    ComboSummary {
        total_combos: combos.len(),
        avg_win_rate,
        grade_distribution,
        top_performers,
    }
}

/// Reshape an analysis for display; meet defaults to Seoul
pub fn to_jockey_trainer_combo(
    analysis: &ComboAnalysis,
    meet: Option<&str>,
    meet_label: Option<&str>,
) -> JockeyTrainerCombo {
    let meet = meet.unwrap_or(DEFAULT_MEET);
    let meet_label = match meet_label {
        Some(label) => label.to_string(),
        None if meet == DEFAULT_MEET => DEFAULT_MEET_NAME.to_string(),
        None => meet_name(meet).to_string(),
    };

    JockeyTrainerCombo {
        meet: meet.to_string(),
        meet_name: meet_label,
        jockey_id: analysis.jockey_id.clone(),
        trainer_id: analysis.trainer_id.clone(),
        starts: analysis.starts,
        wins: analysis.wins,
        win_rate: analysis.win_rate,
        place_rate: analysis.place_rate,
        synergy_score: analysis.synergy_score,
        synergy_grade: analysis.synergy_grade.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(id: &str, starts: u32, wins: u32) -> ComboStats {
        ComboStats {
            id: id.to_string(),
            name: format!("combo {}", id),
            starts,
            wins,
            rate: rate(u64::from(wins), starts),
        }
    }

    fn analyzed(id: &str, starts: u32, wins: u32) -> ComboAnalysis {
        analyze_combo(&stats(id, starts, wins), 15.0, 10.0, &ComboExtras::default())
    }

    #[test]
    fn test_analyze_combo_rates() {
        let analysis = analyzed("J1-T1", 30, 6);
        assert_eq!(analysis.jockey_id, "J1");
        assert_eq!(analysis.trainer_id, "T1");
        assert_eq!(analysis.win_rate, 20.0);
        assert_eq!(analysis.place_rate, 20.0);
        // expected 12.5 -> uplift 60%
        assert!((analysis.uplift_percent - 60.0).abs() < 1e-9);
        assert!((analysis.synergy_score - 80.0).abs() < 1e-9);
        assert_eq!(analysis.reliability, Reliability::High);
    }

    #[test]
    fn test_place_rate_with_extras() {
        let extras = ComboExtras {
            seconds: Some(5),
            thirds: Some(4),
            recent_form: Vec::new(),
        };
        let analysis = analyze_combo(&stats("J1-T1", 30, 6), 15.0, 10.0, &extras);
        assert_eq!(analysis.win_rate, 20.0);
        assert_eq!(analysis.place_rate, 50.0);
    }

    #[test]
    fn test_place_rate_with_partial_extras() {
        let extras = ComboExtras {
            seconds: Some(5),
            thirds: None,
            recent_form: Vec::new(),
        };
        let analysis = analyze_combo(&stats("J1-T1", 30, 6), 15.0, 10.0, &extras);
        // (6 + 5) / 30
        assert!((analysis.place_rate - 110.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_place_counts_do_not_overflow() {
        let extras = ComboExtras {
            seconds: Some(u32::MAX),
            thirds: Some(u32::MAX),
            recent_form: Vec::new(),
        };
        let analysis = analyze_combo(&stats("J1-T1", 10, 2), 10.0, 10.0, &extras);
        assert_eq!(analysis.win_rate, 20.0);
        assert_eq!(analysis.place_rate, 100.0);
    }

    #[test]
    fn test_rates_capped_when_counts_exceed_starts() {
        let extras = ComboExtras {
            seconds: Some(9),
            thirds: Some(9),
            recent_form: Vec::new(),
        };
        let analysis = analyze_combo(&stats("J1-T1", 10, 2), 10.0, 10.0, &extras);
        assert_eq!(analysis.place_rate, 100.0);

        let impossible = analyzed("J1-T1", 10, 12);
        assert_eq!(impossible.win_rate, 100.0);
        assert_eq!(impossible.place_rate, 100.0);
    }

    #[test]
    fn test_recent_form_large_positions() {
        assert!(!has_strong_recent_form(&[u32::MAX; 5]));
    }

    #[test]
    fn test_zero_starts() {
        let analysis = analyzed("J1-T1", 0, 0);
        assert_eq!(analysis.win_rate, 0.0);
        assert_eq!(analysis.place_rate, 0.0);
        assert!(!analysis.synergy_score.is_nan());
    }

    #[test]
    fn test_zero_expected_rate() {
        let analysis = analyze_combo(&stats("J1-T1", 10, 2), 0.0, 0.0, &ComboExtras::default());
        assert_eq!(analysis.uplift_percent, 0.0);
        assert_eq!(analysis.synergy_score, 50.0);
    }

    #[test]
    fn test_combo_key_parse() {
        assert_eq!(
            ComboKey::parse("080123-070045"),
            ComboKey {
                jockey_id: "080123".to_string(),
                trainer_id: "070045".to_string()
            }
        );
        let key = ComboKey::parse("J9");
        assert_eq!(key.jockey_id, "J9");
        assert!(key.trainer_id.is_empty());
        assert_eq!(ComboKey::parse("J1-T1-X").trainer_id, "T1-X");
    }

    #[test]
    fn test_synergy_score_bounds() {
        let analyzer = ComboAnalyzer::default();
        assert_eq!(analyzer.synergy_score(0.0), 50.0);
        assert_eq!(analyzer.synergy_score(500.0), 100.0);
        assert_eq!(analyzer.synergy_score(-100.0), 0.0);
        assert!(analyzer.synergy_score(40.0) > analyzer.synergy_score(20.0));
    }

    #[test]
    fn test_grade_thresholds() {
        let analyzer = ComboAnalyzer::default();
        assert_eq!(analyzer.grade(100.0), SynergyGrade::S);
        assert_eq!(analyzer.grade(80.0), SynergyGrade::S);
        assert_eq!(analyzer.grade(79.9), SynergyGrade::A);
        assert_eq!(analyzer.grade(65.0), SynergyGrade::A);
        assert_eq!(analyzer.grade(50.0), SynergyGrade::B);
        assert_eq!(analyzer.grade(35.0), SynergyGrade::C);
        assert_eq!(analyzer.grade(34.9), SynergyGrade::D);
        assert_eq!(analyzer.grade(0.0), SynergyGrade::D);
        assert_eq!(analyzer.grade(f64::NAN), SynergyGrade::D);
    }

    #[test]
    fn test_recent_form_lifts_borderline_grade() {
        // win rate 16% vs expected 12.5% -> uplift 28% -> score 64 (B)
        let base = analyze_combo(&stats("J1-T1", 25, 4), 15.0, 10.0, &ComboExtras::default());
        assert_eq!(base.synergy_grade, SynergyGrade::B);

        let extras = ComboExtras {
            seconds: None,
            thirds: None,
            recent_form: vec![9, 8, 2, 1, 3, 2, 1],
        };
        let boosted = analyze_combo(&stats("J1-T1", 25, 4), 15.0, 10.0, &extras);
        assert_eq!(boosted.synergy_grade, SynergyGrade::A);
        assert_eq!(boosted.synergy_score, base.synergy_score);
    }

    #[test]
    fn test_recent_form_uses_latest_races() {
        // Strong early form, poor latest five
        assert!(!has_strong_recent_form(&[1, 1, 1, 8, 9, 7, 6, 10]));
        assert!(has_strong_recent_form(&[10, 12, 1, 2, 3, 1, 2]));
        assert!(!has_strong_recent_form(&[1, 1]));
    }

    #[test]
    fn test_grade_order() {
        assert!(SynergyGrade::S > SynergyGrade::A);
        assert!(SynergyGrade::A > SynergyGrade::B);
        assert!(SynergyGrade::C > SynergyGrade::D);
        assert_eq!(SynergyGrade::parse("a"), Some(SynergyGrade::A));
    }

    #[test]
    fn test_reliability() {
        assert_eq!(get_combo_reliability(30), Reliability::High);
        assert_eq!(get_combo_reliability(29), Reliability::Medium);
        assert_eq!(get_combo_reliability(10), Reliability::Medium);
        assert_eq!(get_combo_reliability(9), Reliability::Low);
        assert_eq!(get_combo_reliability(0), Reliability::Low);
    }

    #[test]
    fn test_is_positive_synergy() {
        // expected 12.5, margin 10% -> threshold 13.75
        assert!(is_positive_synergy(14.0, 15.0, 10.0));
        assert!(!is_positive_synergy(13.0, 15.0, 10.0));
        assert!(!is_positive_synergy(12.5, 15.0, 10.0));
    }

    #[test]
    fn test_score_for_prediction() {
        let analyzer = ComboAnalyzer::default();
        assert_eq!(analyzer.score_for_prediction(None, 15.0, 10.0, 50), 50.0);
        assert_eq!(analyzer.score_for_prediction(Some(40.0), 15.0, 10.0, 3), 50.0);
        assert!((analyzer.score_for_prediction(Some(20.0), 15.0, 10.0, 30) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_filter_combos() {
        let combos = vec![
            analyzed("J1-T1", 30, 9), // 30% -> S
            analyzed("J2-T2", 8, 1),  // 12.5% -> B
            analyzed("J3-T3", 40, 2), // 5% -> D
        ];

        let all = filter_synergistic_combos(&combos, &ComboFilter::default());
        assert_eq!(all.len(), 3);

        let experienced = filter_synergistic_combos(
            &combos,
            &ComboFilter {
                min_starts: Some(10),
                ..Default::default()
            },
        );
        assert_eq!(experienced.len(), 2);

        let good = filter_synergistic_combos(
            &combos,
            &ComboFilter {
                synergy_grade: Some(SynergyGrade::B),
                ..Default::default()
            },
        );
        assert_eq!(good.len(), 2);
        assert!(good.iter().all(|c| c.synergy_grade >= SynergyGrade::B));

        let strict = filter_synergistic_combos(
            &combos,
            &ComboFilter {
                min_starts: Some(10),
                min_win_rate: Some(10.0),
                synergy_grade: Some(SynergyGrade::A),
            },
        );
        assert_eq!(strict.len(), 1);
        assert_eq!(strict[0].jockey_id, "J1");
    }

    #[test]
    fn test_rank_combos() {
        let combos = vec![
            analyzed("J1-T1", 20, 2),
            analyzed("J2-T2", 30, 9),
            analyzed("J3-T3", 10, 3),
        ];

        let by_starts = rank_combos(&combos, ComboSortKey::Starts, SortOrder::Asc);
        let starts: Vec<u32> = by_starts.iter().map(|c| c.starts).collect();
        assert_eq!(starts, vec![10, 20, 30]);

        let by_win_rate = rank_combos(&combos, ComboSortKey::WinRate, SortOrder::Desc);
        assert_eq!(by_win_rate[0].jockey_id, "J2");
        assert_eq!(by_win_rate[2].jockey_id, "J1");

        // input untouched
        assert_eq!(combos[0].jockey_id, "J1");
    }

    #[test]
    fn test_rank_combos_by_synergy_and_uplift() {
        // win rates 10 / 20 / 30 against an expected 12.5
        let combos = vec![
            analyzed("J2-T2", 30, 6),
            analyzed("J1-T1", 20, 2),
            analyzed("J3-T3", 10, 3),
        ];

        let ids = |ranked: Vec<ComboAnalysis>| -> Vec<String> {
            ranked.into_iter().map(|c| c.jockey_id).collect()
        };

        assert_eq!(
            ids(rank_combos(&combos, ComboSortKey::SynergyScore, SortOrder::Desc)),
            vec!["J3", "J2", "J1"]
        );
        assert_eq!(
            ids(rank_combos(&combos, ComboSortKey::SynergyScore, SortOrder::Asc)),
            vec!["J1", "J2", "J3"]
        );
        assert_eq!(
            ids(rank_combos(&combos, ComboSortKey::Uplift, SortOrder::Desc)),
            vec!["J3", "J2", "J1"]
        );
        assert_eq!(
            ids(rank_combos(&combos, ComboSortKey::Uplift, SortOrder::Asc)),
            vec!["J1", "J2", "J3"]
        );
    }

    #[test]
    fn test_rank_combos_stable() {
        let combos = vec![
            analyzed("J1-T1", 10, 2),
            analyzed("J2-T2", 20, 4),
            analyzed("J3-T3", 30, 6),
        ];
        let ranked = rank_combos(&combos, ComboSortKey::WinRate, SortOrder::Desc);
        let ids: Vec<&str> = ranked.iter().map(|c| c.jockey_id.as_str()).collect();
        assert_eq!(ids, vec!["J1", "J2", "J3"]);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize_combo_stats(&[]);
        assert_eq!(summary.total_combos, 0);
        assert_eq!(summary.avg_win_rate, 0.0);
        assert!(summary.top_performers.is_empty());
        assert_eq!(summary.grade_distribution.values().sum::<usize>(), 0);
    }

    #[test]
    fn test_summarize_combos() {
        let combos: Vec<ComboAnalysis> = (1..=7)
            .map(|i| analyzed(&format!("J{}-T{}", i, i), 100, i))
            .collect();
        let summary = summarize_combo_stats(&combos);

        assert_eq!(summary.total_combos, 7);
        assert_eq!(summary.grade_distribution.values().sum::<usize>(), 7);
        assert_eq!(summary.grade_distribution.len(), 5);
        assert_eq!(summary.top_performers.len(), 5);
        assert_eq!(summary.top_performers[0].wins, 7);
        // wins 1..=7 of 100 -> mean 4%
        assert!((summary.avg_win_rate - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_small_population() {
        let combos = vec![analyzed("J1-T1", 10, 1), analyzed("J2-T2", 10, 2)];
        let summary = summarize_combo_stats(&combos);
        assert_eq!(summary.top_performers.len(), 2);
    }

    #[test]
    fn test_to_jockey_trainer_combo() {
        let analysis = analyzed("J1-T1", 30, 6);

        let default = to_jockey_trainer_combo(&analysis, None, None);
        assert_eq!(default.meet, "1");
        assert_eq!(default.meet_name, "서울");
        assert_eq!(default.synergy_grade, "S");

        let busan = to_jockey_trainer_combo(&analysis, Some("3"), None);
        assert_eq!(busan.meet_name, "부산경남");

        let named = to_jockey_trainer_combo(&analysis, Some("2"), Some("Jeju"));
        assert_eq!(named.meet_name, "Jeju");
    }

    #[test]
    fn test_analysis_idempotent() {
        assert_eq!(analyzed("J1-T1", 17, 4), analyzed("J1-T1", 17, 4));
    }
}
