// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient_name: String,
    pub doctor_id: String,
    pub scheduled_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    /// Store insertion order. Breaks ties between identical `created_at` values.
    #[serde(skip)]
    pub sequence: u64,
    pub position: Option<u32>,
    /// Minutes until this patient is expected to be seen.
    pub estimated_wait_time: Option<u32>,
}

impl Appointment {
    /// Sort key of the FIFO queue.
    pub fn queue_key(&self) -> (DateTime<Utc>, u64) {
        (self.created_at, self.sequence)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Scheduled,
    Waiting,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 5] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Waiting,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    /// Members of a doctor's active queue.
    pub fn is_active(&self) -> bool {
        matches!(self, AppointmentStatus::Waiting | AppointmentStatus::InProgress)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Waiting => "waiting",
            AppointmentStatus::InProgress => "in-progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppointmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppointmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppointmentError::InvalidStatus(s.to_string()))
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub doctor_id: String,
}

impl CreateAppointmentRequest {
    /// Trimmed copy, or a validation error when a required field is blank.
    pub fn validated(&self) -> Result<Self, AppointmentError> {
        let patient_name = self.patient_name.trim();
        if patient_name.is_empty() {
            return Err(AppointmentError::Validation("patientName must not be empty".to_string()));
        }

        let doctor_id = self.doctor_id.trim();
        if doctor_id.is_empty() {
            return Err(AppointmentError::Validation("doctorId must not be empty".to_string()));
        }

        Ok(Self {
            patient_name: patient_name.to_string(),
            doctor_id: doctor_id.to_string(),
        })
    }
}

/// Raw status body. Parsed with `AppointmentStatus::from_str` so unknown
/// values surface as `InvalidStatus` rather than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum AppointmentError {
    #[error("Appointment not found: {0}")]
    NotFound(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Validation error: {0}")]
    Validation(String),
}
