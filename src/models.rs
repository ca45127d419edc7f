use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Track surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Dirt,
    Turf,
}

impl Surface {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dirt" | "d" => Some(Surface::Dirt),
            "turf" | "t" => Some(Surface::Turf),
            _ => None,
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Dirt => write!(f, "dirt"),
            Surface::Turf => write!(f, "turf"),
        }
    }
}

/// How much real data backed a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reliability {
    High,
    Medium,
    Low,
}

impl fmt::Display for Reliability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reliability::High => write!(f, "high"),
            Reliability::Medium => write!(f, "medium"),
            Reliability::Low => write!(f, "low"),
        }
    }
}

/// Jockey-trainer pairing record from the ingestion layer
///
/// `id` is encoded as `"<jockeyId>-<trainerId>"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboStats {
    pub id: String,
    pub name: String,
    pub starts: u32,
    pub wins: u32,
    #[serde(default)]
    pub rate: f64,
}

/// Optional extra context for a combo analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComboExtras {
    /// Second-place finishes (absent: place rate falls back to wins only)
    #[serde(default)]
    pub seconds: Option<u32>,
    /// Third-place finishes
    #[serde(default)]
    pub thirds: Option<u32>,
    /// Recent finishing positions, oldest first (most recent last)
    #[serde(default)]
    pub recent_form: Vec<u32>,
}

/// Past race for one horse, used for burden/performance history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurdenHistoryEntry {
    pub date: NaiveDate,
    pub burden: f64,
    pub horse_weight: f64,
    pub position: u32,
    pub distance: u32,
}

/// Combo record in the shape the display layer consumes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JockeyTrainerCombo {
    pub meet: String,
    pub meet_name: String,
    pub jockey_id: String,
    pub trainer_id: String,
    pub starts: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub place_rate: f64,
    pub synergy_score: f64,
    pub synergy_grade: String,
}
