use rusqlite::{Connection, params};

use super::types::{Assessment, NewAssessment, NewUserProgress, StepResponse, UserProgress};
use crate::models::scenario::CertLevel;

fn row_to_progress(row: &rusqlite::Row) -> rusqlite::Result<UserProgress> {
    let cert: String = row.get("cert_level")?;
    Ok(UserProgress {
        id: row.get("id")?,
        scenario_id: row.get("scenario_id")?,
        cert_level: CertLevel::parse(&cert).unwrap_or(CertLevel::Emt),
        completed: row.get::<_, i64>("completed")? != 0,
        score: row.get("score")?,
        created_at: row.get("created_at")?,
    })
}

pub fn create_progress(conn: &Connection, new: &NewUserProgress) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO user_progress (scenario_id, cert_level, completed, score) \
         VALUES (?1, ?2, ?3, ?4)",
        params![
            new.scenario_id,
            new.cert_level.as_str(),
            new.completed as i64,
            new.score,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_progress_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<UserProgress>> {
    use rusqlite::OptionalExtension;
    conn.query_row(
        "SELECT id, scenario_id, cert_level, completed, score, created_at \
         FROM user_progress WHERE id = ?1",
        params![id],
        row_to_progress,
    )
    .optional()
}

/// List progress rows, newest first.
pub fn find_all_progress(conn: &Connection) -> rusqlite::Result<Vec<UserProgress>> {
    let mut stmt = conn.prepare(
        "SELECT id, scenario_id, cert_level, completed, score, created_at \
         FROM user_progress ORDER BY id DESC",
    )?;
    stmt.query_map([], row_to_progress)?.collect()
}

fn row_to_assessment(row: &rusqlite::Row) -> rusqlite::Result<Assessment> {
    let cert: String = row.get("cert_level")?;
    let responses_json: String = row.get("responses")?;
    let responses: Vec<StepResponse> = serde_json::from_str(&responses_json).unwrap_or_default();
    Ok(Assessment {
        id: row.get("id")?,
        scenario_id: row.get("scenario_id")?,
        cert_level: CertLevel::parse(&cert).unwrap_or(CertLevel::Emt),
        score: row.get("score")?,
        evaluated_steps: row.get("evaluated_steps")?,
        correct_steps: row.get("correct_steps")?,
        responses,
        created_at: row.get("created_at")?,
    })
}

pub fn create_assessment(conn: &Connection, new: &NewAssessment) -> rusqlite::Result<i64> {
    let responses_json =
        serde_json::to_string(&new.responses).unwrap_or_else(|_| "[]".to_string());
    conn.execute(
        "INSERT INTO assessments (scenario_id, cert_level, score, evaluated_steps, correct_steps, responses) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            new.scenario_id,
            new.cert_level.as_str(),
            new.score,
            new.evaluated_steps,
            new.correct_steps,
            responses_json,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_assessment_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Assessment>> {
    use rusqlite::OptionalExtension;
    conn.query_row(
        "SELECT id, scenario_id, cert_level, score, evaluated_steps, correct_steps, responses, created_at \
         FROM assessments WHERE id = ?1",
        params![id],
        row_to_assessment,
    )
    .optional()
}

/// List assessments, newest first.
pub fn find_all_assessments(conn: &Connection) -> rusqlite::Result<Vec<Assessment>> {
    let mut stmt = conn.prepare(
        "SELECT id, scenario_id, cert_level, score, evaluated_steps, correct_steps, responses, created_at \
         FROM assessments ORDER BY id DESC",
    )?;
    stmt.query_map([], row_to_assessment)?.collect()
}
