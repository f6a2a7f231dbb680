use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub is_available: bool,
    /// Minutes. Used as the per-patient service time for wait estimates.
    pub average_consultation_time: u32,
}

impl Doctor {
    pub fn new(id: &str, name: &str, specialty: &str, average_consultation_time: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            specialty: specialty.to_string(),
            is_available: true,
            average_consultation_time,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAvailabilityRequest {
    pub is_available: bool,
}

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Doctor not found: {0}")]
    NotFound(String),

    #[error("Invalid doctor seed: {0}")]
    InvalidSeed(String),

    #[error("Failed to read doctor seed file {path}: {source}")]
    SeedFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<DoctorError> for AppError {
    fn from(e: DoctorError) -> Self {
        match e {
            DoctorError::NotFound(_) => AppError::NotFound("Doctor not found".to_string()),
            other => {
                tracing::error!("Doctor directory failure: {}", other);
                AppError::Internal("Internal server error".to_string())
            }
        }
    }
}
