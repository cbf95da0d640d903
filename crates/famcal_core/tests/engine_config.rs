use famcal_core::{ConfigError, ConflictService, EngineConfig, Event, ResolutionType};
use std::io::Write;

#[test]
fn loads_config_file_and_applies_travel_buffer() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, r#"{{"travel_buffer_minutes": 5}}"#).expect("write config");

    let config = EngineConfig::load(file.path()).expect("config should load");
    assert_eq!(config.travel_buffer_minutes, 5);

    let service = ConflictService::new(config).expect("service should build");
    let candidate =
        Event::new("new", "Gym", "ade", "2025-09-04", "18:00", 60).with_location("Gym A");
    let existing =
        [Event::new("old", "Judo", "ade", "2025-09-04", "17:10", 40).with_location("Gym B")];
    let conflicts = service
        .detect_conflicts(&candidate, &existing, &[])
        .expect("detection should succeed");
    assert!(conflicts.is_empty());
}

#[test]
fn custom_family_sentinel_drives_family_classifier() {
    let config = EngineConfig::from_json_str(r#"{"family_sentinel": "everyone"}"#)
        .expect("config should parse");
    let service = ConflictService::new(config).expect("service should build");

    let candidate = Event::new("new", "Picnic", "everyone", "2025-09-06", "10:00", 120);
    let existing = [Event::new("old", "Swim", "amari", "2025-09-06", "10:30", 30)];
    let conflicts = service
        .detect_conflicts(&candidate, &existing, &[])
        .expect("detection should succeed");
    assert_eq!(conflicts.len(), 1);
    assert!(conflicts[0].affected_people.contains("everyone"));
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = EngineConfig::load(&dir.path().join("absent.json")).expect_err("missing file");
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn invalid_config_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, r#"{{"day_start": "25:00"}}"#).expect("write config");
    let err = EngineConfig::load(file.path()).expect_err("invalid window must fail");
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn day_window_bounds_reschedule_suggestions() {
    let config = EngineConfig::from_json_str(r#"{"day_end": "15:30"}"#).expect("config");
    let service = ConflictService::new(config).expect("service should build");

    let candidate = Event::new("new", "Swim", "amari", "2025-09-04", "14:00", 60);
    let existing = [Event::new("old", "Piano", "amari", "2025-09-04", "14:30", 30)];
    let conflicts = service
        .detect_conflicts(&candidate, &existing, &[])
        .expect("detection should succeed");
    let reschedule = conflicts[0]
        .resolutions
        .iter()
        .find(|resolution| resolution.kind == ResolutionType::Reschedule)
        .expect("reschedule is always offered");
    assert_eq!(reschedule.suggested_start, None);
    assert!(reschedule.description.contains("free time slot"));
}

#[test]
fn oversized_slot_step_never_reaches_the_service() {
    let err = EngineConfig::from_json_str(r#"{"slot_step_minutes": 9223372036854775807}"#)
        .expect_err("step must be bounded");
    assert!(matches!(err, ConfigError::Invalid(_)));

    let config = EngineConfig {
        slot_step_minutes: i64::MAX,
        ..EngineConfig::default()
    };
    assert!(ConflictService::new(config).is_err());
}
