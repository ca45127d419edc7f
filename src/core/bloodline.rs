//! Bloodline Aptitude Analysis
//!
//! Maps sire / dam / grandsire names to a distance and surface aptitude
//! profile using the sire knowledge base.
//!
//! Aptitudes are on a 1-5 scale:
//!     distance: 1 = sprinter, 3 = middle distance, 5 = stayer
//!     dirt:     1 = turf specialist, 5 = dirt specialist
//!     turf:     6 - dirt (surfaces share a single axis)

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::scoring::{blend, classify, Bound, CategoryRange};
use crate::config::{BloodlineWeights, BLOODLINE_WEIGHTS};
use crate::data::sire_db::{sire_database, SireDatabase, SireProfile};
use crate::models::{Reliability, Surface};

/// Distance fit points lost per category step away from the natural one
const DISTANCE_PENALTY_PER_CATEGORY: f64 = 30.0;

/// Distance vs. surface weight when folding aptitude into a single race fit
const RACE_FIT_DISTANCE_WEIGHT: f64 = 0.6;
const RACE_FIT_SURFACE_WEIGHT: f64 = 0.4;

/// Race distance category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceCategory {
    Sprint,
    Mile,
    Middle,
    Long,
}

impl DistanceCategory {
    /// Position on the sprint -> long axis
    fn index(self) -> f64 {
        match self {
            DistanceCategory::Sprint => 0.0,
            DistanceCategory::Mile => 1.0,
            DistanceCategory::Middle => 2.0,
            DistanceCategory::Long => 3.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DistanceCategory::Sprint => "sprint",
            DistanceCategory::Mile => "mile",
            DistanceCategory::Middle => "middle",
            DistanceCategory::Long => "long",
        }
    }
}

/// sprint <= 1200 < mile <= 1600 < middle <= 2000 < long
const DISTANCE_RANGES: [CategoryRange<DistanceCategory>; 4] = [
    CategoryRange::new(DistanceCategory::Sprint, Bound::Unbounded, Bound::Inclusive(1200.0)),
    CategoryRange::new(DistanceCategory::Mile, Bound::Exclusive(1200.0), Bound::Inclusive(1600.0)),
    CategoryRange::new(DistanceCategory::Middle, Bound::Exclusive(1600.0), Bound::Inclusive(2000.0)),
    CategoryRange::new(DistanceCategory::Long, Bound::Exclusive(2000.0), Bound::Unbounded),
];

/// Classify a race distance in meters
pub fn get_distance_category(distance: u32) -> DistanceCategory {
    classify(distance as f64, &DISTANCE_RANGES).unwrap_or(DistanceCategory::Long)
}

/// Where an aptitude sits on the category axis
///
/// 1 -> sprint, 3 -> middle, 5 -> long; 2 and 4 sit between neighbors.
fn natural_category_position(aptitude: u8) -> f64 {
    match aptitude.clamp(1, 5) {
        1 => 0.0,
        2 => 1.0,
        3 => 2.0,
        4 => 2.5,
        _ => 3.0,
    }
}

/// Distance fit (0-100) of a distance aptitude for a race distance
///
/// # Examples
/// ```
/// use horserace::core::bloodline::calculate_distance_fit_score;
/// assert_eq!(calculate_distance_fit_score(1, 1000), 100.0);
/// assert!(calculate_distance_fit_score(1, 2400) < 20.0);
/// ```
pub fn calculate_distance_fit_score(aptitude: u8, race_distance: u32) -> f64 {
    let category = get_distance_category(race_distance);
    let gap = (natural_category_position(aptitude) - category.index()).abs();
    (100.0 - gap * DISTANCE_PENALTY_PER_CATEGORY).clamp(0.0, 100.0)
}

/// Surface fit (0-100) of a dirt aptitude on a surface
///
/// Linear between the anchors: perfect match 100, neutral 50,
/// perfect mismatch 0.
pub fn calculate_surface_fit_score(dirt_aptitude: u8, surface: Surface) -> f64 {
    let dirt = dirt_aptitude.clamp(1, 5) as f64;
    match surface {
        Surface::Dirt => (dirt - 1.0) / 4.0 * 100.0,
        Surface::Turf => (5.0 - dirt) / 4.0 * 100.0,
    }
}

/// Aptitude profile derived from a horse's lineage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodlineAnalysis {
    pub horse_name: String,
    pub sire: Option<String>,
    pub dam: Option<String>,
    pub grandsire: Option<String>,
    pub sire_stats: SireProfile,
    pub distance_aptitude: u8,
    pub dirt_aptitude: u8,
    pub turf_aptitude: u8,
    pub optimal_distance: u32,
    pub reliability: Reliability,
    pub reasoning: Vec<String>,
}

/// Bloodline suitability for a specific race
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaceFit {
    pub distance_fit: f64,
    pub surface_fit: f64,
    pub overall: f64,
}

impl BloodlineAnalysis {
    /// Fit for a specific race
    ///
    /// # Arguments
    /// * `race_distance` - Race distance in meters
    /// * `surface` - Track surface
    ///
    /// # Returns
    /// Distance and surface fit scores (0-100) and their 0.6 / 0.4 blend
    pub fn race_fit(&self, race_distance: u32, surface: Surface) -> RaceFit {
        let distance_fit = calculate_distance_fit_score(self.distance_aptitude, race_distance);
        let surface_fit = calculate_surface_fit_score(self.dirt_aptitude, surface);

        RaceFit {
            distance_fit,
            surface_fit,
            overall: blend(
                distance_fit,
                RACE_FIT_DISTANCE_WEIGHT,
                surface_fit,
                RACE_FIT_SURFACE_WEIGHT,
            ),
        }
    }

    /// Category of the optimal distance
    pub fn distance_category(&self) -> DistanceCategory {
        get_distance_category(self.optimal_distance)
    }
}

fn present(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|n| !n.is_empty())
}

fn blend_aptitude(sire: u8, grandsire: u8, weights: &BloodlineWeights) -> u8 {
    blend(sire as f64, weights.sire, grandsire as f64, weights.grandsire)
        .round()
        .clamp(1.0, 5.0) as u8
}

/// Bloodline analyzer bound to a knowledge base
#[derive(Debug, Clone)]
pub struct BloodlineAnalyzer<'a> {
    db: &'a SireDatabase,
    weights: BloodlineWeights,
}

impl<'a> BloodlineAnalyzer<'a> {
    pub fn new(db: &'a SireDatabase, weights: BloodlineWeights) -> Self {
        Self { db, weights }
    }

    pub fn weights(&self) -> BloodlineWeights {
        self.weights
    }

    pub fn analyze(
        &self,
        horse_name: &str,
        sire: Option<&str>,
        dam: Option<&str>,
        grandsire: Option<&str>,
    ) -> BloodlineAnalysis {
        let sire = present(sire);
        let dam = present(dam);
        let grandsire = present(grandsire);
        let mut reasoning = Vec::new();

        let known_sire = sire.and_then(|name| self.db.get(name));
        let sire_stats = known_sire.copied().unwrap_or_default();

        match (sire, known_sire) {
            (Some(name), Some(profile)) => reasoning.push(format!(
                "Sire {} is a known line: distance aptitude {}, dirt aptitude {}, best at {}m",
                name, profile.distance_aptitude, profile.dirt_aptitude, profile.optimal_distance
            )),
            (Some(name), None) => {
                debug!("Sire {} not in knowledge base, using default profile", name);
                reasoning.push(format!(
                    "Sire {} is not in the knowledge base; default balanced profile applied",
                    name
                ));
            }
            (None, _) => {
                reasoning.push("No sire data supplied; default balanced profile applied".to_string())
            }
        }

        let mut distance_aptitude = sire_stats.distance_aptitude;
        let mut dirt_aptitude = sire_stats.dirt_aptitude;

        if let Some(name) = grandsire {
            match self.db.get(name) {
                Some(profile) => {
                    distance_aptitude = blend_aptitude(
                        sire_stats.distance_aptitude,
                        profile.distance_aptitude,
                        &self.weights,
                    );
                    dirt_aptitude =
                        blend_aptitude(sire_stats.dirt_aptitude, profile.dirt_aptitude, &self.weights);
                    reasoning.push(format!(
                        "Blended with grandsire {} (sire {:.0}% / grandsire {:.0}%): distance {}, dirt {}",
                        name,
                        self.weights.sire * 100.0,
                        self.weights.grandsire * 100.0,
                        distance_aptitude,
                        dirt_aptitude
                    ));
                }
                None => reasoning.push(format!(
                    "Grandsire {} is not in the knowledge base; sire profile used alone",
                    name
                )),
            }
        }

        if let Some(name) = dam {
            reasoning.push(format!(
                "Dam {} recorded; maternal influence is taken through the grandsire",
                name
            ));
        }

        let reliability = if known_sire.is_some() {
            Reliability::High
        } else {
            Reliability::Low
        };

        BloodlineAnalysis {
            horse_name: horse_name.to_string(),
            sire: sire.map(str::to_string),
            dam: dam.map(str::to_string),
            grandsire: grandsire.map(str::to_string),
            sire_stats,
            distance_aptitude,
            dirt_aptitude,
            turf_aptitude: 6 - dirt_aptitude,
            optimal_distance: sire_stats.optimal_distance,
            reliability,
            reasoning,
        }
    }
}

impl Default for BloodlineAnalyzer<'static> {
    fn default() -> Self {
        Self::new(sire_database(), BLOODLINE_WEIGHTS)
    }
}

/// Analyze a lineage against the shared knowledge base
pub fn analyze_bloodline(
    horse_name: &str,
    sire: Option<&str>,
    dam: Option<&str>,
    grandsire: Option<&str>,
) -> BloodlineAnalysis {
    BloodlineAnalyzer::default().analyze(horse_name, sire, dam, grandsire)
}
