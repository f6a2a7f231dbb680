use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;
use tracing::{debug, info};

use shared_config::AppConfig;

use crate::models::{Doctor, DoctorError};

/// Static doctor roster held for the process lifetime.
#[derive(Debug)]
pub struct DoctorDirectory {
    doctors: RwLock<HashMap<String, Doctor>>,
}

impl DoctorDirectory {
    pub fn new(doctors: Vec<Doctor>) -> Result<Self, DoctorError> {
        validate_seed(&doctors)?;

        let doctors = doctors
            .into_iter()
            .map(|doctor| (doctor.id.clone(), doctor))
            .collect();

        Ok(Self {
            doctors: RwLock::new(doctors),
        })
    }

    /// The roster used when no seed file is configured.
    pub fn seeded() -> Self {
        let doctors = default_doctors()
            .into_iter()
            .map(|doctor| (doctor.id.clone(), doctor))
            .collect();

        Self {
            doctors: RwLock::new(doctors),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, DoctorError> {
        match &config.doctors_seed_file {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| DoctorError::SeedFile {
                    path: path.clone(),
                    source,
                })?;
                let doctors: Vec<Doctor> = serde_json::from_str(&raw)?;
                info!("Loaded {} doctors from {}", doctors.len(), path);
                Self::new(doctors)
            }
            None => {
                info!("No doctor seed file configured, using built-in roster");
                Ok(Self::seeded())
            }
        }
    }

    pub async fn get(&self, id: &str) -> Option<Doctor> {
        let doctors = self.doctors.read().await;
        doctors.get(id).cloned()
    }

    /// All doctors, ordered by id.
    pub async fn list_all(&self) -> Vec<Doctor> {
        let doctors = self.doctors.read().await;
        let mut all: Vec<Doctor> = doctors.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub async fn set_availability(&self, id: &str, is_available: bool) -> bool {
        let mut doctors = self.doctors.write().await;
        match doctors.get_mut(id) {
            Some(doctor) => {
                doctor.is_available = is_available;
                debug!("Doctor {} availability set to {}", id, is_available);
                true
            }
            None => false,
        }
    }
}

pub fn default_doctors() -> Vec<Doctor> {
    vec![
        Doctor::new("doc1", "Dr. Smith", "General Medicine", 15),
        Doctor::new("doc2", "Dr. Johnson", "Pediatrics", 20),
    ]
}

fn validate_seed(doctors: &[Doctor]) -> Result<(), DoctorError> {
    let mut seen = HashSet::new();

    for doctor in doctors {
        if doctor.id.trim().is_empty() {
            return Err(DoctorError::InvalidSeed("doctor id must not be empty".to_string()));
        }
        if doctor.average_consultation_time == 0 {
            return Err(DoctorError::InvalidSeed(format!(
                "doctor {} has zero average consultation time",
                doctor.id
            )));
        }
        if !seen.insert(doctor.id.as_str()) {
            return Err(DoctorError::InvalidSeed(format!("duplicate doctor id {}", doctor.id)));
        }
    }

    Ok(())
}
