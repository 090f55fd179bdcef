//! Storage abstraction for everything the API persists. Handlers receive a
//! `dyn Store` trait object injected at startup (no process-wide state), so
//! the SQLite adapter and the in-memory map are interchangeable.

pub mod mem;
pub mod sqlite;

pub use mem::MemStore;
pub use sqlite::SqliteStore;

use crate::errors::AppError;
use crate::models::progress::{Assessment, NewAssessment, NewUserProgress, UserProgress};
use crate::models::protocol::types::{Category, Protocol, ProtocolDraft};

pub trait Store: Send + Sync {
    fn create_protocol(&self, draft: &ProtocolDraft) -> Result<Protocol, AppError>;
    fn list_protocols(&self, category: Option<Category>) -> Result<Vec<Protocol>, AppError>;
    fn get_protocol(&self, id: i64) -> Result<Option<Protocol>, AppError>;
    fn update_protocol(&self, id: i64, draft: &ProtocolDraft)
    -> Result<Option<Protocol>, AppError>;
    fn delete_protocol(&self, id: i64) -> Result<bool, AppError>;
    fn count_protocols(&self) -> Result<i64, AppError>;

    fn create_progress(&self, new: &NewUserProgress) -> Result<UserProgress, AppError>;
    fn list_progress(&self) -> Result<Vec<UserProgress>, AppError>;

    fn create_assessment(&self, new: &NewAssessment) -> Result<Assessment, AppError>;
    fn list_assessments(&self) -> Result<Vec<Assessment>, AppError>;
}
