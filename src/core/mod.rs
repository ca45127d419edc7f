//! Core business logic modules

pub mod bloodline;
pub mod burden;
pub mod combo;
pub mod scoring;

// Re-export commonly used types
pub use bloodline::{
    analyze_bloodline, calculate_distance_fit_score, calculate_surface_fit_score,
    get_distance_category, BloodlineAnalysis, BloodlineAnalyzer, DistanceCategory, RaceFit,
};
pub use burden::{
    analyze_burden, analyze_historical_burden, calculate_impact, compare_burden_advantage,
    find_optimal_burden, get_assessment, get_optimal_ratio, optimize_burden, BurdenAnalysis,
    BurdenAnalyzer, BurdenAssessment, BurdenOptimization, BurdenRecommendation,
    HistoricalBurdenAnalysis, RatioRange,
};
pub use combo::{
    analyze_combo, filter_synergistic_combos, get_combo_reliability, is_positive_synergy,
    rank_combos, summarize_combo_stats, to_jockey_trainer_combo, ComboAnalysis, ComboAnalyzer,
    ComboFilter, ComboKey, ComboSortKey, ComboSummary, SortOrder, SynergyGrade,
};
pub use scoring::{blend, classify, correlation, fit_score, Bound, CategoryRange};
