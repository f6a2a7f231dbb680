use std::io::Write;

use assert_matches::assert_matches;
use serde_json::json;
use tempfile::NamedTempFile;

use doctor_cell::{Doctor, DoctorDirectory, DoctorError};
use shared_utils::test_utils::TestConfig;

fn write_seed(value: serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", value).unwrap();
    file
}

#[tokio::test]
async fn test_seeded_directory_has_builtin_doctors() {
    let directory = DoctorDirectory::seeded();

    let doctors = directory.list_all().await;
    assert_eq!(doctors.len(), 2);
    assert_eq!(doctors[0].id, "doc1");
    assert_eq!(doctors[0].average_consultation_time, 15);
    assert_eq!(doctors[1].id, "doc2");
    assert_eq!(doctors[1].average_consultation_time, 20);
    assert!(doctors.iter().all(|d| d.is_available));
}

#[tokio::test]
async fn test_get_unknown_doctor_is_absent() {
    let directory = DoctorDirectory::seeded();

    assert!(directory.get("doc1").await.is_some());
    assert!(directory.get("nobody").await.is_none());
}

#[tokio::test]
async fn test_set_availability() {
    let directory = DoctorDirectory::seeded();

    assert!(directory.set_availability("doc2", false).await);
    assert!(!directory.get("doc2").await.unwrap().is_available);

    assert!(directory.set_availability("doc2", true).await);
    assert!(directory.get("doc2").await.unwrap().is_available);

    assert!(!directory.set_availability("missing", false).await);
}

#[tokio::test]
async fn test_list_all_is_ordered_by_id() {
    let directory = DoctorDirectory::new(vec![
        Doctor::new("z-doc", "Dr. Zed", "Dermatology", 10),
        Doctor::new("a-doc", "Dr. Abe", "Cardiology", 30),
        Doctor::new("m-doc", "Dr. Mo", "Neurology", 25),
    ])
    .unwrap();

    let ids: Vec<String> = directory.list_all().await.into_iter().map(|d| d.id).collect();
    assert_eq!(ids, vec!["a-doc", "m-doc", "z-doc"]);
}

#[test]
fn test_accepts_valid_roster() {
    let result = DoctorDirectory::new(vec![
        Doctor::new("doc1", "Dr. One", "General Medicine", 15),
        Doctor::new("doc2", "Dr. Two", "Pediatrics", 20),
    ]);

    assert_matches!(result, Ok(_));
    assert!(format!("{:?}", DoctorDirectory::seeded()).contains("Dr. Smith"));
}

#[test]
fn test_rejects_duplicate_ids() {
    let result = DoctorDirectory::new(vec![
        Doctor::new("doc1", "Dr. One", "General Medicine", 15),
        Doctor::new("doc1", "Dr. Also One", "General Medicine", 15),
    ]);

    assert_matches!(result, Err(DoctorError::InvalidSeed(_)));
}

#[test]
fn test_rejects_zero_consultation_time() {
    let result = DoctorDirectory::new(vec![Doctor::new("doc1", "Dr. Fast", "General Medicine", 0)]);

    assert_matches!(result, Err(DoctorError::InvalidSeed(_)));
}

#[test]
fn test_rejects_empty_id() {
    let result = DoctorDirectory::new(vec![Doctor::new("  ", "Dr. Nobody", "General Medicine", 10)]);

    assert_matches!(result, Err(DoctorError::InvalidSeed(_)));
}

#[tokio::test]
async fn test_from_config_reads_seed_file() {
    let file = write_seed(json!([
        {
            "id": "gp-1",
            "name": "Dr. Okafor",
            "specialty": "General Practice",
            "isAvailable": false,
            "averageConsultationTime": 12
        }
    ]));
    let config = TestConfig::with_seed_file(file.path().to_str().unwrap()).to_app_config();

    let directory = DoctorDirectory::from_config(&config).unwrap();

    let doctor = directory.get("gp-1").await.unwrap();
    assert_eq!(doctor.name, "Dr. Okafor");
    assert_eq!(doctor.average_consultation_time, 12);
    assert!(!doctor.is_available);
    assert!(directory.get("doc1").await.is_none());
}

#[tokio::test]
async fn test_from_config_without_seed_uses_builtin() {
    let config = TestConfig::default().to_app_config();

    let directory = DoctorDirectory::from_config(&config).unwrap();

    assert_eq!(directory.list_all().await.len(), 2);
}

#[test]
fn test_from_config_missing_file() {
    let config = TestConfig::with_seed_file("/definitely/not/here/doctors.json").to_app_config();

    assert_matches!(DoctorDirectory::from_config(&config), Err(DoctorError::SeedFile { .. }));
}

#[test]
fn test_from_config_malformed_file() {
    let file = write_seed(json!({ "not": "a list" }));
    let config = TestConfig::with_seed_file(file.path().to_str().unwrap()).to_app_config();

    assert_matches!(
        DoctorDirectory::from_config(&config),
        Err(DoctorError::SerializationError(_))
    );
}
