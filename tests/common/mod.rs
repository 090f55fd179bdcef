//! Shared test infrastructure: temp-file SQLite stores and scenario builders.

#![allow(dead_code)]

use rusqlite::Connection;
use tempfile::TempDir;

use emsbridge::db::{self, MIGRATIONS};
use emsbridge::models::scenario::{
    CertLevel, Choice, Difficulty, ScenarioStep, TrainingScenario, VitalsChange,
};
use emsbridge::storage::SqliteStore;

// ============================================================================
// DATABASE SETUP
// ============================================================================

/// SQLite store on a temporary database with migrations applied.
///
/// Returns a tuple of (TempDir, SqliteStore); the TempDir must be kept alive
/// for the store to remain valid.
pub fn setup_sqlite_store() -> (TempDir, SqliteStore) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");

    {
        let conn = Connection::open(&db_path).expect("Failed to open test DB");
        conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA journal_mode=WAL;")
            .expect("Failed to set pragmas");
        conn.execute_batch(MIGRATIONS)
            .expect("Failed to run migrations");
    }

    let pool = db::init_pool(db_path.to_str().expect("db path utf-8"));
    (dir, SqliteStore::new(pool))
}

// ============================================================================
// SCENARIO BUILDERS
// ============================================================================

pub fn choice(text: &str, is_correct: bool) -> Choice {
    Choice {
        text: text.to_string(),
        is_correct,
        feedback: format!("feedback for {text}"),
    }
}

pub fn evaluated_step(action: &str) -> ScenarioStep {
    ScenarioStep {
        action: action.to_string(),
        choices: vec![choice("right", true), choice("wrong", false)],
        time_limit_seconds: None,
        beyond_scope: vec![],
        consequence: None,
        contraindications: vec![],
    }
}

pub fn informational_step(action: &str) -> ScenarioStep {
    ScenarioStep {
        action: action.to_string(),
        choices: vec![],
        time_limit_seconds: None,
        beyond_scope: vec![],
        consequence: None,
        contraindications: vec![],
    }
}

pub fn scenario_with_steps(id: &str, steps: Vec<ScenarioStep>) -> TrainingScenario {
    TrainingScenario {
        id: id.to_string(),
        title: format!("Scenario {id}"),
        description: "test scenario".to_string(),
        initial_vitals: "HR 80, BP 120/80".to_string(),
        vitals_changes: vec![],
        certification_level: CertLevel::Emt,
        difficulty: Difficulty::Easy,
        steps,
    }
}

/// Three-step scenario exercising every step kind: a timed evaluated step,
/// an informational step, and an above-EMT-scope evaluated step.
pub fn sample_scenario() -> TrainingScenario {
    let mut timed = evaluated_step("timed question");
    timed.time_limit_seconds = Some(30);
    timed.consequence = Some("The patient deteriorated while you hesitated".to_string());

    let mut gated = evaluated_step("advanced intervention");
    gated.beyond_scope = vec![CertLevel::Emt];

    let mut scenario = scenario_with_steps(
        "sample",
        vec![timed, informational_step("apply monitor"), gated],
    );
    scenario.vitals_changes = vec![
        VitalsChange {
            after_step: 0,
            new_vitals: "HR 96, BP 110/70".to_string(),
        },
        VitalsChange {
            after_step: 2,
            new_vitals: "HR 120, BP 90/60".to_string(),
        },
    ];
    scenario
}
