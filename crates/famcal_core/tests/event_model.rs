use famcal_core::{Event, EventPriority, EventStatus, Recurrence};

#[test]
fn event_deserializes_with_defaults_for_optional_fields() {
    let value = serde_json::json!({
        "id": "evt-1",
        "title": "Swim practice",
        "person_id": "amari",
        "date": "2025-09-04",
        "time": "14:00",
        "duration_minutes": 60
    });

    let event: Event = serde_json::from_value(value).expect("event should deserialize");
    assert_eq!(event.location, None);
    assert_eq!(event.cost, 0.0);
    assert_eq!(event.recurrence, Recurrence::None);
    assert_eq!(event.priority, EventPriority::Medium);
    assert_eq!(event.status, EventStatus::Confirmed);
    assert!(event.validate().is_ok());
}

#[test]
fn event_serialization_uses_snake_case_wire_values() {
    let mut event = Event::new("evt-2", "Recital", "askia", "2025-09-05", "18:30", 90)
        .with_location("Town Hall")
        .with_category("music")
        .with_cost(25.0)
        .with_status(EventStatus::Tentative);
    event.recurrence = Recurrence::Weekly;
    event.priority = EventPriority::High;

    let json = serde_json::to_value(&event).expect("event should serialize");
    assert_eq!(json["status"], "tentative");
    assert_eq!(json["recurrence"], "weekly");
    assert_eq!(json["priority"], "high");
    assert_eq!(json["location"], "Town Hall");

    let decoded: Event = serde_json::from_value(json).expect("event should deserialize");
    assert_eq!(decoded, event);
}

#[test]
fn deserialized_event_with_bad_duration_fails_validation() {
    let value = serde_json::json!({
        "id": "evt-3",
        "title": "Broken",
        "person_id": "ade",
        "date": "2025-09-04",
        "time": "09:00",
        "duration_minutes": -15
    });
    let event: Event = serde_json::from_value(value).expect("shape is valid");
    let err = event.validate().expect_err("negative duration must fail");
    assert!(err.to_string().contains("positive"));
}
