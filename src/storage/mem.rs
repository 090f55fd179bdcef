use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};

use crate::errors::AppError;
use crate::models::progress::{Assessment, NewAssessment, NewUserProgress, UserProgress};
use crate::models::protocol::types::{Category, Protocol, ProtocolDraft};

use super::Store;

#[derive(Default)]
struct Inner {
    next_id: i64,
    protocols: HashMap<i64, Protocol>,
    progress: Vec<UserProgress>,
    assessments: Vec<Assessment>,
}

impl Inner {
    fn next(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory store used by tests and available for ephemeral deployments.
/// A single mutex is enough at this scale; no operation holds it across I/O.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn protocol_from_draft(id: i64, draft: &ProtocolDraft) -> Protocol {
    Protocol {
        id,
        name: draft.name.clone(),
        category: draft.category,
        severity: draft.severity,
        description: draft.description.clone(),
        steps: draft.steps.clone(),
        medications: draft.medications.clone(),
        guidelines: draft.guidelines.clone(),
        last_updated: now_stamp(),
    }
}

impl Store for MemStore {
    fn create_protocol(&self, draft: &ProtocolDraft) -> Result<Protocol, AppError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let id = inner.next();
        let protocol = protocol_from_draft(id, draft);
        inner.protocols.insert(id, protocol.clone());
        Ok(protocol)
    }

    fn list_protocols(&self, category: Option<Category>) -> Result<Vec<Protocol>, AppError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        let mut protocols: Vec<Protocol> = inner
            .protocols
            .values()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .cloned()
            .collect();
        protocols.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(protocols)
    }

    fn get_protocol(&self, id: i64) -> Result<Option<Protocol>, AppError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.protocols.get(&id).cloned())
    }

    fn update_protocol(
        &self,
        id: i64,
        draft: &ProtocolDraft,
    ) -> Result<Option<Protocol>, AppError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        if !inner.protocols.contains_key(&id) {
            return Ok(None);
        }
        let protocol = protocol_from_draft(id, draft);
        inner.protocols.insert(id, protocol.clone());
        Ok(Some(protocol))
    }

    fn delete_protocol(&self, id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.protocols.remove(&id).is_some())
    }

    fn count_protocols(&self) -> Result<i64, AppError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.protocols.len() as i64)
    }

    fn create_progress(&self, new: &NewUserProgress) -> Result<UserProgress, AppError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let id = inner.next();
        let record = UserProgress {
            id,
            scenario_id: new.scenario_id.clone(),
            cert_level: new.cert_level,
            completed: new.completed,
            score: new.score,
            created_at: now_stamp(),
        };
        inner.progress.push(record.clone());
        Ok(record)
    }

    fn list_progress(&self) -> Result<Vec<UserProgress>, AppError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        let mut rows = inner.progress.clone();
        rows.reverse();
        Ok(rows)
    }

    fn create_assessment(&self, new: &NewAssessment) -> Result<Assessment, AppError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let id = inner.next();
        let record = Assessment {
            id,
            scenario_id: new.scenario_id.clone(),
            cert_level: new.cert_level,
            score: new.score,
            evaluated_steps: new.evaluated_steps,
            correct_steps: new.correct_steps,
            responses: new.responses.clone(),
            created_at: now_stamp(),
        };
        inner.assessments.push(record.clone());
        Ok(record)
    }

    fn list_assessments(&self) -> Result<Vec<Assessment>, AppError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        let mut rows = inner.assessments.clone();
        rows.reverse();
        Ok(rows)
    }
}
