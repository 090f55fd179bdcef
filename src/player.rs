//! Training scenario player: drives a learner through an authored scenario
//! one step at a time, evaluating choices, enforcing time limits lazily at
//! submission, and tracking vitals transitions.
//!
//! All session mutation goes through `SessionManager`, which holds sessions
//! behind one mutex. A double-submitted choice therefore cannot skip or
//! duplicate a step advance; the second submission simply lands on the next
//! step.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::progress::{NewAssessment, NewUserProgress, StepResponse};
use crate::models::scenario::{CertLevel, ScenarioSet, TrainingScenario};

/// How scope-of-practice gating behaves for a step whose `beyond_scope` set
/// names the learner's certification level.
///
/// `Warn` surfaces an indicator but leaves every choice selectable. `Block`
/// withholds the choices entirely: the step becomes informational for that
/// learner, auto-advances, and stays out of the score denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopePolicy {
    #[default]
    Warn,
    Block,
}

impl ScopePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "warn" => Some(ScopePolicy::Warn),
            "block" => Some(ScopePolicy::Block),
            _ => None,
        }
    }
}

/// What the learner sees for the current step.
#[derive(Debug, Clone, Serialize)]
pub struct StepView {
    pub step_index: usize,
    pub total_steps: usize,
    pub action: String,
    /// Choice texts only; the answer key stays server-side.
    pub choices: Vec<String>,
    pub time_limit_seconds: Option<u64>,
    /// True when the step's action exceeds the learner's scope of practice.
    pub beyond_scope: bool,
    pub vitals: String,
}

/// Outcome of one submission or auto-advance.
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub step_index: usize,
    /// None for steps that were not evaluated (no selectable choices).
    pub correct: Option<bool>,
    pub feedback: Option<String>,
    pub timed_out: bool,
    pub vitals: String,
    pub completed: bool,
}

/// Runtime state for one learner working through one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSession {
    pub id: i64,
    pub scenario_id: String,
    pub cert_level: CertLevel,
    pub current_step: usize,
    #[serde(skip)]
    pub step_started_at: DateTime<Utc>,
    pub responses: Vec<StepResponse>,
    pub current_vitals: String,
}

/// Vitals after `completed_steps` steps have been completed: the latest
/// listed change whose `after_step` has been reached, else the initial
/// vitals. List order is precedence order.
pub fn vitals_after(scenario: &TrainingScenario, completed_steps: usize) -> &str {
    let mut vitals = scenario.initial_vitals.as_str();
    for vc in &scenario.vitals_changes {
        if completed_steps > 0 && vc.after_step <= completed_steps - 1 {
            vitals = &vc.new_vitals;
        }
    }
    vitals
}

impl PlayerSession {
    /// Begin a session at step 0. Fails on a scenario with no steps, which
    /// is an authoring bug the catalog loader should already have rejected.
    pub fn start(
        scenario: &TrainingScenario,
        cert_level: CertLevel,
        now: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        if scenario.steps.is_empty() {
            return Err(AppError::InvalidScenario(format!(
                "scenario '{}' has no steps",
                scenario.id
            )));
        }
        Ok(PlayerSession {
            id: 0,
            scenario_id: scenario.id.clone(),
            cert_level,
            current_step: 0,
            step_started_at: now,
            responses: Vec::new(),
            current_vitals: scenario.initial_vitals.clone(),
        })
    }

    pub fn is_complete(&self, scenario: &TrainingScenario) -> bool {
        self.current_step >= scenario.steps.len()
    }

    /// Whether the current step's action exceeds this learner's scope.
    fn beyond_scope_here(&self, scenario: &TrainingScenario) -> bool {
        scenario.steps[self.current_step]
            .beyond_scope
            .contains(&self.cert_level)
    }

    /// The current step as the learner sees it, or None once the scenario is
    /// complete. Under `Warn` the gate is advisory: choices are returned
    /// unaltered alongside the `beyond_scope` flag.
    pub fn step_view(&self, scenario: &TrainingScenario, policy: ScopePolicy) -> Option<StepView> {
        if self.is_complete(scenario) {
            return None;
        }
        let step = &scenario.steps[self.current_step];
        let beyond_scope = self.beyond_scope_here(scenario);
        let gated = policy == ScopePolicy::Block && beyond_scope;

        let choices = if gated {
            Vec::new()
        } else {
            step.choices.iter().map(|c| c.text.clone()).collect()
        };

        Some(StepView {
            step_index: self.current_step,
            total_steps: scenario.steps.len(),
            action: step.action.clone(),
            choices,
            time_limit_seconds: step.time_limit_seconds,
            beyond_scope,
            vitals: self.current_vitals.clone(),
        })
    }

    /// Submit a choice for the current step (or None to advance an
    /// informational step) using `now` as the submission instant.
    ///
    /// An exceeded time limit forces the failure outcome regardless of which
    /// choice was picked.
    pub fn submit_at(
        &mut self,
        scenario: &TrainingScenario,
        policy: ScopePolicy,
        choice_index: Option<usize>,
        now: DateTime<Utc>,
    ) -> Result<StepResult, AppError> {
        if self.is_complete(scenario) {
            return Err(AppError::InvalidInput(
                "session is already complete".to_string(),
            ));
        }

        let step_index = self.current_step;
        let step = &scenario.steps[step_index];
        let beyond_scope = self.beyond_scope_here(scenario);
        let gated = policy == ScopePolicy::Block && beyond_scope;
        let elapsed_seconds = (now - self.step_started_at).num_seconds().max(0);

        let (correct, feedback, timed_out) = if gated {
            if choice_index.is_some() {
                return Err(AppError::ScopeViolation(format!(
                    "step {} exceeds scope of practice for {}",
                    step_index, self.cert_level
                )));
            }
            (None, None, false)
        } else if step.choices.is_empty() {
            // Informational step: nothing to evaluate.
            if let Some(index) = choice_index {
                return Err(AppError::StepIndexOutOfRange { index, len: 0 });
            }
            (None, None, false)
        } else {
            let index = choice_index.ok_or_else(|| {
                AppError::InvalidInput("a choice is required for this step".to_string())
            })?;
            let choice = step
                .choices
                .get(index)
                .ok_or(AppError::StepIndexOutOfRange {
                    index,
                    len: step.choices.len(),
                })?;

            let expired = step
                .time_limit_seconds
                .is_some_and(|limit| elapsed_seconds > limit as i64);
            if expired {
                let feedback = step
                    .consequence
                    .clone()
                    .unwrap_or_else(|| "Time limit exceeded".to_string());
                (Some(false), Some(feedback), true)
            } else {
                (Some(choice.is_correct), Some(choice.feedback.clone()), false)
            }
        };

        self.responses.push(StepResponse {
            step_index,
            choice_index,
            correct,
            elapsed_seconds,
            timed_out,
        });
        self.current_step += 1;
        self.step_started_at = now;
        self.current_vitals = vitals_after(scenario, self.current_step).to_string();

        Ok(StepResult {
            step_index,
            correct,
            feedback,
            timed_out,
            vitals: self.current_vitals.clone(),
            completed: self.is_complete(scenario),
        })
    }

    /// Aggregate score over evaluated steps only. An all-informational run
    /// scores 100.0 with `evaluated_steps` left at 0 so callers can tell the
    /// two cases apart. Pure over the response list, hence idempotent.
    pub fn finalize(&self) -> NewAssessment {
        let evaluated = self
            .responses
            .iter()
            .filter(|r| r.correct.is_some())
            .count();
        let correct = self
            .responses
            .iter()
            .filter(|r| r.correct == Some(true))
            .count();
        let score = if evaluated == 0 {
            100.0
        } else {
            correct as f64 * 100.0 / evaluated as f64
        };
        NewAssessment {
            scenario_id: self.scenario_id.clone(),
            cert_level: self.cert_level,
            score,
            evaluated_steps: evaluated as i64,
            correct_steps: correct as i64,
            responses: self.responses.clone(),
        }
    }

    /// Progress record for the external tracker.
    pub fn progress_record(&self, scenario: &TrainingScenario) -> NewUserProgress {
        NewUserProgress {
            scenario_id: self.scenario_id.clone(),
            cert_level: self.cert_level,
            completed: self.is_complete(scenario),
            score: Some(self.finalize().score),
        }
    }
}

struct ManagerInner {
    next_id: i64,
    sessions: HashMap<i64, PlayerSession>,
}

/// Owns all live sessions. Every operation locks the session map for its
/// full duration, which serializes concurrent requests against the same
/// session id.
pub struct SessionManager {
    scenarios: Arc<ScenarioSet>,
    policy: ScopePolicy,
    inner: Mutex<ManagerInner>,
}

impl SessionManager {
    pub fn new(scenarios: Arc<ScenarioSet>, policy: ScopePolicy) -> Self {
        SessionManager {
            scenarios,
            policy,
            inner: Mutex::new(ManagerInner {
                next_id: 0,
                sessions: HashMap::new(),
            }),
        }
    }

    pub fn policy(&self) -> ScopePolicy {
        self.policy
    }

    fn scenario(&self, id: &str) -> Result<&TrainingScenario, AppError> {
        self.scenarios.get(id).ok_or(AppError::NotFound)
    }

    pub fn start(&self, scenario_id: &str, cert_level: CertLevel) -> Result<PlayerSession, AppError> {
        let scenario = self.scenario(scenario_id)?;
        let mut session = PlayerSession::start(scenario, cert_level, Utc::now())?;

        let mut inner = self.inner.lock().expect("session mutex poisoned");
        inner.next_id += 1;
        session.id = inner.next_id;
        inner.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    pub fn get(&self, id: i64) -> Result<PlayerSession, AppError> {
        let inner = self.inner.lock().expect("session mutex poisoned");
        inner
            .sessions
            .get(&id)
            .cloned()
            .ok_or(AppError::SessionNotFound(id))
    }

    /// Current step view, or None when the session has completed every step.
    pub fn step_view(&self, id: i64) -> Result<Option<StepView>, AppError> {
        let inner = self.inner.lock().expect("session mutex poisoned");
        let session = inner
            .sessions
            .get(&id)
            .ok_or(AppError::SessionNotFound(id))?;
        let scenario = self.scenario(&session.scenario_id)?;
        Ok(session.step_view(scenario, self.policy))
    }

    pub fn submit(&self, id: i64, choice_index: Option<usize>) -> Result<StepResult, AppError> {
        let mut inner = self.inner.lock().expect("session mutex poisoned");
        let session = inner
            .sessions
            .get_mut(&id)
            .ok_or(AppError::SessionNotFound(id))?;
        let scenario = self
            .scenarios
            .get(&session.scenario_id)
            .ok_or(AppError::NotFound)?;
        session.submit_at(scenario, self.policy, choice_index, Utc::now())
    }

    pub fn current_vitals(&self, id: i64) -> Result<String, AppError> {
        Ok(self.get(id)?.current_vitals)
    }

    pub fn is_complete(&self, id: i64) -> Result<bool, AppError> {
        let session = self.get(id)?;
        let scenario = self.scenario(&session.scenario_id)?;
        Ok(session.is_complete(scenario))
    }

    /// Score the session without destroying it; finalize stays idempotent.
    /// Returns the assessment together with the matching progress record.
    pub fn finalize(&self, id: i64) -> Result<(NewAssessment, NewUserProgress), AppError> {
        let session = self.get(id)?;
        let scenario = self.scenario(&session.scenario_id)?;
        Ok((session.finalize(), session.progress_record(scenario)))
    }

    /// Drop the session. Returns its final state so the caller can persist
    /// an abandonment record.
    pub fn abandon(&self, id: i64) -> Result<PlayerSession, AppError> {
        let mut inner = self.inner.lock().expect("session mutex poisoned");
        inner
            .sessions
            .remove(&id)
            .ok_or(AppError::SessionNotFound(id))
    }
}
