//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `famcal_core` linkage without a host application.
//! - Run one fixed detection scenario and print it as JSON.
//! - Optional first argument: absolute log directory for rolling file logs.

use famcal_core::{default_log_level, init_logging, ConflictService, Event, Person};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("famcal_core version={}", famcal_core::core_version());

    if let Some(log_dir) = std::env::args().nth(1) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("failed to initialize logging: {err}");
            return ExitCode::FAILURE;
        }
    }

    let service = ConflictService::default();
    let people = [
        Person::new("amari", "Amari", "#f97316"),
        Person::new("askia", "Askia", "#22c55e"),
    ];
    let candidate = Event::new("probe-new", "Swim practice", "amari", "2025-09-04", "14:00", 60);
    let existing = [Event::new("probe-old", "Piano", "amari", "2025-09-04", "14:30", 30)];

    let conflicts = match service.detect_conflicts(&candidate, &existing, &people) {
        Ok(conflicts) => conflicts,
        Err(err) => {
            eprintln!("{}: {err}", err.user_message());
            return ExitCode::FAILURE;
        }
    };
    match serde_json::to_string_pretty(&conflicts) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("failed to render conflicts: {err}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
