//! Horserace - Horse racing signal analysis
//!
//! This library provides:
//! - Bloodline aptitude analysis (distance / surface) from a sire knowledge base
//! - Burden weight fit, impact estimation and burden history analysis
//! - Jockey-trainer combo synergy scoring, grading and population summaries
//! - Narrow adapter functions producing 0-100 scores for a race predictor
//!
//! All analyzers are pure: unknown or missing inputs resolve to defaults
//! and low-confidence results are labeled rather than reported as errors.
//!
//! # Example
//!
//! ```
//! use horserace::core::burden::analyze_burden;
//! use horserace::predictor::{get_bloodline_for_prediction, get_burden_score_for_prediction};
//!
//! let analysis = analyze_burden("Thunder", 55.0, 500.0);
//! assert_eq!(analysis.fit_score, 100.0);
//!
//! let bloodline = get_bloodline_for_prediction(Some("메니피"), None, None);
//! println!("Distance aptitude: {}", bloodline.distance_aptitude);
//!
//! assert_eq!(get_burden_score_for_prediction(55.0, 0.0), 50.0);
//! ```

pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod predictor;

// Re-export commonly used types
pub use config::{AnalyzerConfig, BloodlineWeights, BurdenConfig, ComboConfig, BLOODLINE_WEIGHTS};
pub use data::{get_sire_stats, SireDatabase, SireProfile};
pub use error::AnalysisError;
pub use models::{
    BurdenHistoryEntry, ComboExtras, ComboStats, JockeyTrainerCombo, Reliability, Surface,
};
pub use predictor::{
    get_bloodline_for_prediction, get_burden_score_for_prediction, get_combo_score_for_prediction,
    BloodlinePrediction, RunnerInput, RunnerSignals, SignalAdapter,
};
