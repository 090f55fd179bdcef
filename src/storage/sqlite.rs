use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::progress::{
    Assessment, NewAssessment, NewUserProgress, UserProgress, queries as progress,
};
use crate::models::protocol::queries as protocol;
use crate::models::protocol::types::{Category, Protocol, ProtocolDraft};

use super::Store;

/// Production store backed by the r2d2 SQLite pool. Thin shim over the
/// model-layer query functions.
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        SqliteStore { pool }
    }
}

impl Store for SqliteStore {
    fn create_protocol(&self, draft: &ProtocolDraft) -> Result<Protocol, AppError> {
        let conn = self.pool.get()?;
        let id = protocol::create(&conn, draft)?;
        protocol::find_by_id(&conn, id)?.ok_or(AppError::NotFound)
    }

    fn list_protocols(&self, category: Option<Category>) -> Result<Vec<Protocol>, AppError> {
        let conn = self.pool.get()?;
        Ok(protocol::find_all(&conn, category)?)
    }

    fn get_protocol(&self, id: i64) -> Result<Option<Protocol>, AppError> {
        let conn = self.pool.get()?;
        Ok(protocol::find_by_id(&conn, id)?)
    }

    fn update_protocol(
        &self,
        id: i64,
        draft: &ProtocolDraft,
    ) -> Result<Option<Protocol>, AppError> {
        let conn = self.pool.get()?;
        if !protocol::update(&conn, id, draft)? {
            return Ok(None);
        }
        Ok(protocol::find_by_id(&conn, id)?)
    }

    fn delete_protocol(&self, id: i64) -> Result<bool, AppError> {
        let conn = self.pool.get()?;
        Ok(protocol::delete(&conn, id)?)
    }

    fn count_protocols(&self) -> Result<i64, AppError> {
        let conn = self.pool.get()?;
        Ok(protocol::count(&conn)?)
    }

    fn create_progress(&self, new: &NewUserProgress) -> Result<UserProgress, AppError> {
        let conn = self.pool.get()?;
        let id = progress::create_progress(&conn, new)?;
        progress::find_progress_by_id(&conn, id)?.ok_or(AppError::NotFound)
    }

    fn list_progress(&self) -> Result<Vec<UserProgress>, AppError> {
        let conn = self.pool.get()?;
        Ok(progress::find_all_progress(&conn)?)
    }

    fn create_assessment(&self, new: &NewAssessment) -> Result<Assessment, AppError> {
        let conn = self.pool.get()?;
        let id = progress::create_assessment(&conn, new)?;
        progress::find_assessment_by_id(&conn, id)?.ok_or(AppError::NotFound)
    }

    fn list_assessments(&self) -> Result<Vec<Assessment>, AppError> {
        let conn = self.pool.get()?;
        Ok(progress::find_all_assessments(&conn)?)
    }
}
