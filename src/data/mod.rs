//! Static reference data

pub mod sire_db;

// Re-export commonly used types
pub use sire_db::{
    get_sire_stats, install_sire_database, sire_database, SireDatabase, SireProfile,
};
