//! Scenario player state machine tests: start/advance/complete lifecycle,
//! time-limit enforcement, vitals transitions, scope gating policies, and
//! finalize scoring.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};

use common::*;
use emsbridge::errors::AppError;
use emsbridge::models::scenario::{CertLevel, ScenarioSet, VitalsChange};
use emsbridge::player::{PlayerSession, ScopePolicy, SessionManager, vitals_after};

#[test]
fn test_start_rejects_empty_scenario() {
    let scenario = scenario_with_steps("empty", vec![]);
    let result = PlayerSession::start(&scenario, CertLevel::Emt, Utc::now());
    assert!(matches!(result, Err(AppError::InvalidScenario(_))));
}

#[test]
fn test_completes_after_exactly_steps_len_submissions() {
    let scenario = scenario_with_steps(
        "s",
        vec![
            evaluated_step("q1"),
            informational_step("info"),
            evaluated_step("q2"),
        ],
    );
    let now = Utc::now();
    let mut session = PlayerSession::start(&scenario, CertLevel::Emt, now).expect("start");

    assert!(!session.is_complete(&scenario));
    session
        .submit_at(&scenario, ScopePolicy::Warn, Some(0), now)
        .expect("step 0");
    assert!(!session.is_complete(&scenario));
    session
        .submit_at(&scenario, ScopePolicy::Warn, None, now)
        .expect("step 1");
    assert!(!session.is_complete(&scenario));
    let last = session
        .submit_at(&scenario, ScopePolicy::Warn, Some(1), now)
        .expect("step 2");

    assert!(last.completed);
    assert!(session.is_complete(&scenario));

    let result = session.submit_at(&scenario, ScopePolicy::Warn, Some(0), now);
    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}

#[test]
fn test_correct_and_incorrect_choices() {
    let scenario = scenario_with_steps("s", vec![evaluated_step("q1"), evaluated_step("q2")]);
    let now = Utc::now();
    let mut session = PlayerSession::start(&scenario, CertLevel::Emt, now).expect("start");

    let first = session
        .submit_at(&scenario, ScopePolicy::Warn, Some(0), now)
        .expect("submit");
    assert_eq!(first.correct, Some(true));
    assert!(first.feedback.expect("feedback").contains("right"));

    let second = session
        .submit_at(&scenario, ScopePolicy::Warn, Some(1), now)
        .expect("submit");
    assert_eq!(second.correct, Some(false));
}

#[test]
fn test_time_limit_forces_failure_even_on_correct_choice() {
    let scenario = ScenarioSet::new(vec![sample_scenario()]);
    let scenario = scenario.get("sample").expect("scenario");
    let start = Utc::now();
    let mut session = PlayerSession::start(scenario, CertLevel::Paramedic, start).expect("start");

    // Choice 0 is the correct answer, submitted 31s into a 30s limit.
    let late = start + Duration::seconds(31);
    let result = session
        .submit_at(scenario, ScopePolicy::Warn, Some(0), late)
        .expect("submit");

    assert!(result.timed_out);
    assert_eq!(result.correct, Some(false));
    assert_eq!(
        result.feedback.as_deref(),
        Some("The patient deteriorated while you hesitated")
    );
}

#[test]
fn test_submission_within_limit_is_evaluated_normally() {
    let scenario = ScenarioSet::new(vec![sample_scenario()]);
    let scenario = scenario.get("sample").expect("scenario");
    let start = Utc::now();
    let mut session = PlayerSession::start(scenario, CertLevel::Paramedic, start).expect("start");

    let on_time = start + Duration::seconds(30);
    let result = session
        .submit_at(scenario, ScopePolicy::Warn, Some(0), on_time)
        .expect("submit");

    assert!(!result.timed_out);
    assert_eq!(result.correct, Some(true));
}

#[test]
fn test_choice_index_out_of_range() {
    let scenario = scenario_with_steps("s", vec![evaluated_step("q")]);
    let now = Utc::now();
    let mut session = PlayerSession::start(&scenario, CertLevel::Emt, now).expect("start");

    let result = session.submit_at(&scenario, ScopePolicy::Warn, Some(5), now);
    assert!(matches!(
        result,
        Err(AppError::StepIndexOutOfRange { index: 5, len: 2 })
    ));
}

#[test]
fn test_informational_step_rejects_choice_and_auto_advances() {
    let scenario = scenario_with_steps("s", vec![informational_step("look")]);
    let now = Utc::now();
    let mut session = PlayerSession::start(&scenario, CertLevel::Emt, now).expect("start");

    let bad = session.submit_at(&scenario, ScopePolicy::Warn, Some(0), now);
    assert!(matches!(
        bad,
        Err(AppError::StepIndexOutOfRange { index: 0, len: 0 })
    ));

    let result = session
        .submit_at(&scenario, ScopePolicy::Warn, None, now)
        .expect("advance");
    assert_eq!(result.correct, None);
    assert!(result.completed);
}

#[test]
fn test_missing_choice_on_evaluated_step() {
    let scenario = scenario_with_steps("s", vec![evaluated_step("q")]);
    let now = Utc::now();
    let mut session = PlayerSession::start(&scenario, CertLevel::Emt, now).expect("start");

    let result = session.submit_at(&scenario, ScopePolicy::Warn, None, now);
    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}

// ----------------------------------------------------------------------------
// Vitals
// ----------------------------------------------------------------------------

#[test]
fn test_vitals_follow_completed_steps() {
    let scenario = ScenarioSet::new(vec![sample_scenario()]);
    let scenario = scenario.get("sample").expect("scenario");
    let now = Utc::now();
    let mut session = PlayerSession::start(scenario, CertLevel::Paramedic, now).expect("start");

    assert_eq!(session.current_vitals, "HR 80, BP 120/80");

    session
        .submit_at(scenario, ScopePolicy::Warn, Some(0), now)
        .expect("step 0");
    assert_eq!(session.current_vitals, "HR 96, BP 110/70");

    session
        .submit_at(scenario, ScopePolicy::Warn, None, now)
        .expect("step 1");
    // No change scheduled after step 1; latest applicable entry still wins.
    assert_eq!(session.current_vitals, "HR 96, BP 110/70");

    session
        .submit_at(scenario, ScopePolicy::Warn, Some(0), now)
        .expect("step 2");
    assert_eq!(session.current_vitals, "HR 120, BP 90/60");
}

#[test]
fn test_vitals_last_listed_change_wins() {
    let mut scenario = scenario_with_steps("s", vec![evaluated_step("q")]);
    scenario.vitals_changes = vec![
        VitalsChange {
            after_step: 0,
            new_vitals: "first".to_string(),
        },
        VitalsChange {
            after_step: 0,
            new_vitals: "second".to_string(),
        },
    ];

    assert_eq!(vitals_after(&scenario, 0), "HR 80, BP 120/80");
    assert_eq!(vitals_after(&scenario, 1), "second");
}

// ----------------------------------------------------------------------------
// Scope gating
// ----------------------------------------------------------------------------

#[test]
fn test_warn_policy_flags_but_does_not_alter_choices() {
    let scenario = ScenarioSet::new(vec![sample_scenario()]);
    let scenario = scenario.get("sample").expect("scenario");
    let now = Utc::now();
    let mut session = PlayerSession::start(scenario, CertLevel::Emt, now).expect("start");

    // Advance to the gated step (index 2).
    session
        .submit_at(scenario, ScopePolicy::Warn, Some(0), now)
        .expect("step 0");
    session
        .submit_at(scenario, ScopePolicy::Warn, None, now)
        .expect("step 1");

    let view = session
        .step_view(scenario, ScopePolicy::Warn)
        .expect("view");
    assert!(view.beyond_scope);
    assert_eq!(view.choices.len(), 2);

    // Gating is advisory under warn: the choice still evaluates.
    let result = session
        .submit_at(scenario, ScopePolicy::Warn, Some(0), now)
        .expect("submit");
    assert_eq!(result.correct, Some(true));
}

#[test]
fn test_block_policy_withholds_choices_and_rejects_submission() {
    let scenario = ScenarioSet::new(vec![sample_scenario()]);
    let scenario = scenario.get("sample").expect("scenario");
    let now = Utc::now();
    let mut session = PlayerSession::start(scenario, CertLevel::Emt, now).expect("start");

    session
        .submit_at(scenario, ScopePolicy::Block, Some(0), now)
        .expect("step 0");
    session
        .submit_at(scenario, ScopePolicy::Block, None, now)
        .expect("step 1");

    let view = session
        .step_view(scenario, ScopePolicy::Block)
        .expect("view");
    assert!(view.beyond_scope);
    assert!(view.choices.is_empty());

    let rejected = session.submit_at(scenario, ScopePolicy::Block, Some(0), now);
    assert!(matches!(rejected, Err(AppError::ScopeViolation(_))));

    // The gated step auto-advances unevaluated and stays out of the score.
    let result = session
        .submit_at(scenario, ScopePolicy::Block, None, now)
        .expect("advance");
    assert_eq!(result.correct, None);

    let assessment = session.finalize();
    assert_eq!(assessment.evaluated_steps, 1);
}

#[test]
fn test_paramedic_not_flagged_on_emt_gated_step() {
    let scenario = ScenarioSet::new(vec![sample_scenario()]);
    let scenario = scenario.get("sample").expect("scenario");
    let now = Utc::now();
    let mut session = PlayerSession::start(scenario, CertLevel::Paramedic, now).expect("start");

    session
        .submit_at(scenario, ScopePolicy::Block, Some(0), now)
        .expect("step 0");
    session
        .submit_at(scenario, ScopePolicy::Block, None, now)
        .expect("step 1");

    let view = session
        .step_view(scenario, ScopePolicy::Block)
        .expect("view");
    assert!(!view.beyond_scope);
    assert_eq!(view.choices.len(), 2);
}

#[test]
fn test_cert_level_ordering() {
    assert!(CertLevel::Emt < CertLevel::Aemt);
    assert!(CertLevel::Aemt < CertLevel::Paramedic);
}

// ----------------------------------------------------------------------------
// Finalize
// ----------------------------------------------------------------------------

#[test]
fn test_finalize_scores_evaluated_steps_only() {
    let scenario = scenario_with_steps(
        "s",
        vec![
            evaluated_step("q1"),
            informational_step("info"),
            evaluated_step("q2"),
        ],
    );
    let now = Utc::now();
    let mut session = PlayerSession::start(&scenario, CertLevel::Emt, now).expect("start");

    session
        .submit_at(&scenario, ScopePolicy::Warn, Some(0), now)
        .expect("correct");
    session
        .submit_at(&scenario, ScopePolicy::Warn, None, now)
        .expect("info");
    session
        .submit_at(&scenario, ScopePolicy::Warn, Some(1), now)
        .expect("incorrect");

    let assessment = session.finalize();
    assert_eq!(assessment.evaluated_steps, 2);
    assert_eq!(assessment.correct_steps, 1);
    assert_eq!(assessment.score, 50.0);
    assert_eq!(assessment.responses.len(), 3);
}

#[test]
fn test_finalize_is_idempotent() {
    let scenario = scenario_with_steps("s", vec![evaluated_step("q")]);
    let now = Utc::now();
    let mut session = PlayerSession::start(&scenario, CertLevel::Emt, now).expect("start");
    session
        .submit_at(&scenario, ScopePolicy::Warn, Some(0), now)
        .expect("submit");

    let first = session.finalize();
    let second = session.finalize();
    assert_eq!(first, second);
}

#[test]
fn test_all_informational_scenario_scores_100() {
    let scenario = scenario_with_steps(
        "s",
        vec![informational_step("a"), informational_step("b")],
    );
    let now = Utc::now();
    let mut session = PlayerSession::start(&scenario, CertLevel::Emt, now).expect("start");
    session
        .submit_at(&scenario, ScopePolicy::Warn, None, now)
        .expect("a");
    session
        .submit_at(&scenario, ScopePolicy::Warn, None, now)
        .expect("b");

    let assessment = session.finalize();
    assert_eq!(assessment.score, 100.0);
    assert_eq!(assessment.evaluated_steps, 0);
}

// ----------------------------------------------------------------------------
// SessionManager
// ----------------------------------------------------------------------------

#[test]
fn test_manager_session_lifecycle() {
    let set = Arc::new(ScenarioSet::new(vec![sample_scenario()]));
    let manager = SessionManager::new(set, ScopePolicy::Warn);

    let session = manager.start("sample", CertLevel::Paramedic).expect("start");
    assert!(session.id > 0);
    assert_eq!(session.current_step, 0);

    let view = manager.step_view(session.id).expect("view").expect("step");
    assert_eq!(view.step_index, 0);
    assert_eq!(view.total_steps, 3);

    manager.submit(session.id, Some(0)).expect("submit");
    let fetched = manager.get(session.id).expect("get");
    assert_eq!(fetched.current_step, 1);
    assert_eq!(
        manager.current_vitals(session.id).expect("vitals"),
        "HR 96, BP 110/70"
    );

    manager.submit(session.id, None).expect("info");
    manager.submit(session.id, Some(0)).expect("final step");
    assert!(manager.is_complete(session.id).expect("complete"));
    assert!(manager.step_view(session.id).expect("view").is_none());

    let (assessment, progress) = manager.finalize(session.id).expect("finalize");
    assert_eq!(assessment.evaluated_steps, 2);
    assert!(progress.completed);

    manager.abandon(session.id).expect("abandon");
    assert!(matches!(
        manager.get(session.id),
        Err(AppError::SessionNotFound(_))
    ));
}

#[test]
fn test_manager_unknown_scenario_and_session() {
    let set = Arc::new(ScenarioSet::new(vec![sample_scenario()]));
    let manager = SessionManager::new(set, ScopePolicy::Warn);

    assert!(matches!(
        manager.start("missing", CertLevel::Emt),
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        manager.submit(42, Some(0)),
        Err(AppError::SessionNotFound(42))
    ));
}
