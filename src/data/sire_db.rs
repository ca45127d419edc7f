//! Sire knowledge base
//!
//! Distance and surface aptitude per sire. The table ships embedded in
//! the binary and is built once on first use; a replacement table may be
//! installed from a JSON file before that.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::error::{validate_aptitude, AnalysisError};

const EMBEDDED_PROFILES: &str = include_str!("sire_profiles.json");

/// Process-wide knowledge base, read-only after initialization
static SIRE_DATABASE: OnceLock<SireDatabase> = OnceLock::new();

/// Aptitude profile of a sire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SireProfile {
    /// 1 = pure sprinter, 3 = middle distance, 5 = pure stayer
    pub distance_aptitude: u8,
    /// 1 = turf specialist, 5 = dirt specialist
    pub dirt_aptitude: u8,
    /// Meters
    pub optimal_distance: u32,
}

impl Default for SireProfile {
    fn default() -> Self {
        Self {
            distance_aptitude: 3,
            dirt_aptitude: 3,
            optimal_distance: 1600,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SireProfileFile {
    #[serde(default)]
    version: String,
    profiles: BTreeMap<String, SireProfile>,
}

/// Sire name -> aptitude profile
#[derive(Debug, Clone, Default)]
pub struct SireDatabase {
    version: String,
    profiles: BTreeMap<String, SireProfile>,
}

impl SireDatabase {
    /// Build from the embedded table, falling back to an empty table
    pub fn builtin() -> Self {
        match Self::from_json_str(EMBEDDED_PROFILES) {
            Ok(db) => db,
            Err(e) => {
                warn!("Embedded sire table rejected: {}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, AnalysisError> {
        let file: SireProfileFile = serde_json::from_str(content)?;

        let mut profiles = BTreeMap::new();
        for (name, profile) in file.profiles {
            validate_aptitude(&format!("{}.distance_aptitude", name), profile.distance_aptitude)?;
            validate_aptitude(&format!("{}.dirt_aptitude", name), profile.dirt_aptitude)?;
            profiles.insert(name.trim().to_string(), profile);
        }

        Ok(Self {
            version: file.version,
            profiles,
        })
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let db = Self::from_json_str(&content)?;
        info!("Loaded {} sire profiles from {}", db.len(), path.display());
        Ok(db)
    }

    /// Look up a sire by name (surrounding whitespace ignored)
    pub fn get(&self, name: &str) -> Option<&SireProfile> {
        self.profiles.get(name.trim())
    }

    /// Look up a sire, falling back to the default profile
    pub fn get_or_default(&self, name: &str) -> SireProfile {
        self.get(name).copied().unwrap_or_default()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profiles ordered by sire name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SireProfile)> {
        self.profiles.iter().map(|(name, profile)| (name.as_str(), profile))
    }
}

/// Shared knowledge base (embedded table unless one was installed)
pub fn sire_database() -> &'static SireDatabase {
    SIRE_DATABASE.get_or_init(SireDatabase::builtin)
}

/// Replace the embedded table; only possible before first use
pub fn install_sire_database(db: SireDatabase) -> Result<(), AnalysisError> {
    let count = db.len();
    SIRE_DATABASE
        .set(db)
        .map_err(|_| AnalysisError::KnowledgeBaseInstalled)?;
    info!("Installed sire knowledge base with {} profiles", count);
    Ok(())
}

/// Direct knowledge-base lookup with default fallback
pub fn get_sire_stats(name: &str) -> SireProfile {
    sire_database().get_or_default(name)
}
