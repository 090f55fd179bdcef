use rusqlite::{Connection, OptionalExtension, params};

use super::types::{Category, ExtractedStep, Protocol, ProtocolDraft, Severity};

const SELECT_PROTOCOL: &str = "\
    SELECT id, name, category, severity, description, steps, medications, \
           guidelines, last_updated \
    FROM protocols";

fn row_to_protocol(row: &rusqlite::Row) -> rusqlite::Result<Protocol> {
    let category: String = row.get("category")?;
    let severity: String = row.get("severity")?;
    let steps_json: String = row.get("steps")?;
    let meds_json: String = row.get("medications")?;

    let steps: Vec<ExtractedStep> = serde_json::from_str(&steps_json).unwrap_or_default();
    let medications: Vec<String> = serde_json::from_str(&meds_json).unwrap_or_default();

    Ok(Protocol {
        id: row.get("id")?,
        name: row.get("name")?,
        category: Category::parse(&category).unwrap_or(Category::General),
        severity: Severity::parse(&severity).unwrap_or(Severity::Routine),
        description: row.get("description")?,
        steps,
        medications,
        guidelines: row.get("guidelines")?,
        last_updated: row.get("last_updated")?,
    })
}

/// List protocols, optionally filtered by category, ordered by name.
pub fn find_all(conn: &Connection, category: Option<Category>) -> rusqlite::Result<Vec<Protocol>> {
    match category {
        Some(cat) => {
            let sql = format!("{SELECT_PROTOCOL} WHERE category = ?1 ORDER BY name");
            let mut stmt = conn.prepare(&sql)?;
            stmt.query_map(params![cat.as_str()], row_to_protocol)?
                .collect()
        }
        None => {
            let sql = format!("{SELECT_PROTOCOL} ORDER BY name");
            let mut stmt = conn.prepare(&sql)?;
            stmt.query_map([], row_to_protocol)?.collect()
        }
    }
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Protocol>> {
    let sql = format!("{SELECT_PROTOCOL} WHERE id = ?1");
    conn.query_row(&sql, params![id], row_to_protocol).optional()
}

pub fn count(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM protocols", [], |row| row.get(0))
}

/// Insert a draft and return the new row id. Steps and medications are
/// serialized to JSON text columns.
pub fn create(conn: &Connection, draft: &ProtocolDraft) -> rusqlite::Result<i64> {
    let steps_json = serde_json::to_string(&draft.steps).unwrap_or_else(|_| "[]".to_string());
    let meds_json =
        serde_json::to_string(&draft.medications).unwrap_or_else(|_| "[]".to_string());

    conn.execute(
        "INSERT INTO protocols (name, category, severity, description, steps, medications, guidelines) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            draft.name,
            draft.category.as_str(),
            draft.severity.as_str(),
            draft.description,
            steps_json,
            meds_json,
            draft.guidelines,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Replace a protocol's fields from a draft. Returns false when no row has
/// the given id.
pub fn update(conn: &Connection, id: i64, draft: &ProtocolDraft) -> rusqlite::Result<bool> {
    let steps_json = serde_json::to_string(&draft.steps).unwrap_or_else(|_| "[]".to_string());
    let meds_json =
        serde_json::to_string(&draft.medications).unwrap_or_else(|_| "[]".to_string());

    let changed = conn.execute(
        "UPDATE protocols \
         SET name = ?1, category = ?2, severity = ?3, description = ?4, \
             steps = ?5, medications = ?6, guidelines = ?7, \
             last_updated = strftime('%Y-%m-%dT%H:%M:%SZ','now') \
         WHERE id = ?8",
        params![
            draft.name,
            draft.category.as_str(),
            draft.severity.as_str(),
            draft.description,
            steps_json,
            meds_json,
            draft.guidelines,
            id,
        ],
    )?;
    Ok(changed > 0)
}

pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let changed = conn.execute("DELETE FROM protocols WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}
