pub mod db;
pub mod errors;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod player;
pub mod reference;
pub mod storage;
