use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use appointment_cell::{AppointmentStatus, AppointmentStore};

#[tokio::test]
async fn test_create_assigns_waiting_status_and_no_queue_fields() {
    let store = AppointmentStore::new();

    let appointment = store.create("Alice", "doc1").await;

    assert_eq!(appointment.patient_name, "Alice");
    assert_eq!(appointment.doctor_id, "doc1");
    assert_eq!(appointment.status, AppointmentStatus::Waiting);
    assert_eq!(appointment.scheduled_time, appointment.created_at);
    assert!(appointment.position.is_none());
    assert!(appointment.estimated_wait_time.is_none());
    assert_eq!(store.get(appointment.id).await, Some(appointment));
}

#[tokio::test]
async fn test_create_assigns_unique_ids_and_increasing_sequence() {
    let store = AppointmentStore::new();

    let first = store.create("Alice", "doc1").await;
    let second = store.create("Bob", "doc1").await;
    let third = store.create("Carol", "doc2").await;

    let ids: HashSet<Uuid> = [first.id, second.id, third.id].into_iter().collect();
    assert_eq!(ids.len(), 3);
    assert!(first.sequence < second.sequence);
    assert!(second.sequence < third.sequence);
    assert!(first.queue_key() < second.queue_key());
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_sequences() {
    let store = Arc::new(AppointmentStore::new());

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.create(&format!("Patient {}", i), "doc1").await })
        })
        .collect();

    let mut sequences = HashSet::new();
    for handle in handles {
        sequences.insert(handle.await.unwrap().sequence);
    }

    assert_eq!(sequences.len(), 20);
    assert_eq!(store.len().await, 20);
}

#[tokio::test]
async fn test_get_unknown_is_absent() {
    let store = AppointmentStore::new();

    assert!(store.get(Uuid::new_v4()).await.is_none());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_set_status_unknown_id_is_noop() {
    let store = AppointmentStore::new();
    store.create("Alice", "doc1").await;

    assert!(!store.set_status(Uuid::new_v4(), AppointmentStatus::Completed).await);
    assert!(store.list().await.iter().all(|a| a.status == AppointmentStatus::Waiting));
}

#[tokio::test]
async fn test_set_status_does_not_validate_transitions() {
    let store = AppointmentStore::new();
    let appointment = store.create("Alice", "doc1").await;

    assert!(store.set_status(appointment.id, AppointmentStatus::Completed).await);
    assert!(store.set_status(appointment.id, AppointmentStatus::Waiting).await);

    assert_eq!(store.get(appointment.id).await.unwrap().status, AppointmentStatus::Waiting);
}

#[tokio::test]
async fn test_list_and_list_by_doctor() {
    let store = AppointmentStore::new();
    store.create("Alice", "doc1").await;
    store.create("Bob", "doc2").await;
    store.create("Carol", "doc1").await;

    assert_eq!(store.list().await.len(), 3);

    let mut names: Vec<String> = store
        .list_by_doctor("doc1")
        .await
        .into_iter()
        .map(|a| a.patient_name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["Alice", "Carol"]);

    assert!(store.list_by_doctor("doc3").await.is_empty());
}

#[tokio::test]
async fn test_doctor_snapshot_returns_siblings() {
    let store = AppointmentStore::new();
    let alice = store.create("Alice", "doc1").await;
    store.create("Bob", "doc2").await;
    store.create("Carol", "doc1").await;

    let (appointment, siblings) = store.doctor_snapshot(alice.id).await.unwrap();

    assert_eq!(appointment.id, alice.id);
    assert_eq!(siblings.len(), 2);
    assert!(siblings.iter().all(|a| a.doctor_id == "doc1"));
    assert!(store.doctor_snapshot(Uuid::new_v4()).await.is_none());
}

#[tokio::test]
async fn test_update_doctor_records_only_touches_that_doctor() {
    let store = AppointmentStore::new();
    let alice = store.create("Alice", "doc1").await;
    let bob = store.create("Bob", "doc2").await;

    let touched = store
        .update_doctor_records("doc1", |records| {
            for record in records.iter_mut() {
                record.position = Some(7);
            }
            records.len()
        })
        .await;

    assert_eq!(touched, 1);
    assert_eq!(store.get(alice.id).await.unwrap().position, Some(7));
    assert_eq!(store.get(bob.id).await.unwrap().position, None);
}

#[tokio::test]
async fn test_appointment_serializes_in_camel_case_without_sequence() {
    let store = AppointmentStore::new();
    let appointment = store.create("Alice", "doc1").await;

    let json = serde_json::to_value(&appointment).unwrap();

    assert_eq!(json["patientName"], "Alice");
    assert_eq!(json["doctorId"], "doc1");
    assert_eq!(json["status"], "waiting");
    assert!(json["estimatedWaitTime"].is_null());
    assert!(json.get("sequence").is_none());
}
