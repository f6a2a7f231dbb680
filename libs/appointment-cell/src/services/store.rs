use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Appointment, AppointmentStatus};

/// Volatile appointment repository keyed by appointment id.
#[derive(Debug, Default)]
pub struct AppointmentStore {
    appointments: RwLock<HashMap<Uuid, Appointment>>,
    next_sequence: AtomicU64,
}

impl AppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh `waiting` appointment with no derived queue fields.
    pub async fn create(&self, patient_name: &str, doctor_id: &str) -> Appointment {
        let mut appointments = self.appointments.write().await;

        // Taken under the write lock so sequence order matches insertion order.
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_name: patient_name.to_string(),
            doctor_id: doctor_id.to_string(),
            scheduled_time: now,
            status: AppointmentStatus::Waiting,
            created_at: now,
            sequence,
            position: None,
            estimated_wait_time: None,
        };

        appointments.insert(appointment.id, appointment.clone());
        debug!("Stored appointment {} (sequence {}) for doctor {}", appointment.id, sequence, doctor_id);

        appointment
    }

    pub async fn get(&self, id: Uuid) -> Option<Appointment> {
        let appointments = self.appointments.read().await;
        appointments.get(&id).cloned()
    }

    /// Every appointment, in no particular order.
    pub async fn list(&self) -> Vec<Appointment> {
        let appointments = self.appointments.read().await;
        appointments.values().cloned().collect()
    }

    pub async fn list_by_doctor(&self, doctor_id: &str) -> Vec<Appointment> {
        let appointments = self.appointments.read().await;
        appointments
            .values()
            .filter(|appointment| appointment.doctor_id == doctor_id)
            .cloned()
            .collect()
    }

    /// Overwrite the status. Returns false when the id is unknown.
    ///
    /// Transition legality is not checked here.
    pub async fn set_status(&self, id: Uuid, status: AppointmentStatus) -> bool {
        let mut appointments = self.appointments.write().await;
        match appointments.get_mut(&id) {
            Some(appointment) => {
                debug!("Appointment {} status {} -> {}", id, appointment.status, status);
                appointment.status = status;
                true
            }
            None => false,
        }
    }

    /// The appointment plus all records of its doctor, read under one lock.
    pub async fn doctor_snapshot(&self, appointment_id: Uuid) -> Option<(Appointment, Vec<Appointment>)> {
        let appointments = self.appointments.read().await;
        let appointment = appointments.get(&appointment_id)?.clone();
        let siblings = appointments
            .values()
            .filter(|other| other.doctor_id == appointment.doctor_id)
            .cloned()
            .collect();

        Some((appointment, siblings))
    }

    /// Run `f` over mutable references to one doctor's records while holding
    /// the write lock, so the whole update lands atomically.
    pub async fn update_doctor_records<F, R>(&self, doctor_id: &str, f: F) -> R
    where
        F: FnOnce(&mut Vec<&mut Appointment>) -> R,
    {
        let mut appointments = self.appointments.write().await;
        let mut records: Vec<&mut Appointment> = appointments
            .values_mut()
            .filter(|appointment| appointment.doctor_id == doctor_id)
            .collect();

        f(&mut records)
    }

    pub async fn len(&self) -> usize {
        self.appointments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.appointments.read().await.is_empty()
    }
}
