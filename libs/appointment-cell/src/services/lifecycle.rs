// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use crate::models::{AppointmentError, AppointmentStatus};

/// Status transition policy.
///
/// In permissive mode every known status is accepted and illegal moves are
/// only logged; strict mode rejects them.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppointmentLifecycleService {
    strict: bool,
}

impl AppointmentLifecycleService {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        &self,
        current_status: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        if self.is_legal(current_status, new_status) {
            debug!("Status transition validated: {} -> {}", current_status, new_status);
            return Ok(());
        }

        if self.strict {
            warn!("Rejected status transition: {} -> {}", current_status, new_status);
            return Err(AppointmentError::InvalidStatusTransition {
                from: current_status,
                to: new_status,
            });
        }

        warn!("Allowing out-of-order status transition: {} -> {}", current_status, new_status);
        Ok(())
    }

    pub fn is_legal(&self, current_status: AppointmentStatus, new_status: AppointmentStatus) -> bool {
        self.get_valid_transitions(current_status).contains(&new_status)
    }

    /// Get all valid next statuses for a given current status
    pub fn get_valid_transitions(&self, current_status: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Scheduled => vec![
                AppointmentStatus::Waiting,
                AppointmentStatus::Cancelled,
            ],
            AppointmentStatus::Waiting => vec![
                AppointmentStatus::InProgress,
                AppointmentStatus::Cancelled,
            ],
            AppointmentStatus::InProgress => vec![
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
            ],
            // Terminal states
            AppointmentStatus::Completed => vec![],
            AppointmentStatus::Cancelled => vec![],
        }
    }
}
