use thiserror::Error;

/// Errors from loading configuration and knowledge-base files
///
/// The analyzers themselves never fail; unknown or missing inputs
/// resolve to defaults instead.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    #[error("Sire knowledge base is already initialized")]
    KnowledgeBaseInstalled,
}

/// Validation functions
pub fn validate_aptitude(field: &str, value: u8) -> Result<(), AnalysisError> {
    if !(1..=5).contains(&value) {
        return Err(AnalysisError::Validation(format!(
            "{} must be between 1 and 5, got {}",
            field, value
        )));
    }
    Ok(())
}

pub fn validate_weight_pair(burden: f64, horse_weight: f64) -> Result<(), AnalysisError> {
    if !burden.is_finite() || burden < 0.0 {
        return Err(AnalysisError::Validation(format!(
            "Burden weight must be non-negative, got {}",
            burden
        )));
    }
    if !horse_weight.is_finite() || horse_weight < 0.0 {
        return Err(AnalysisError::Validation(format!(
            "Horse weight must be non-negative, got {}",
            horse_weight
        )));
    }
    Ok(())
}

pub fn validate_ratio(field: &str, value: f64) -> Result<(), AnalysisError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AnalysisError::Validation(format!(
            "{} must be positive, got {}",
            field, value
        )));
    }
    Ok(())
}
