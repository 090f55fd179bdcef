use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::models::protocol::types::ProtocolDraft;
use crate::storage::Store;

pub type DbPool = Pool<SqliteConnectionManager>;

pub const MIGRATIONS: &str = include_str!("schema.sql");

const PROTOCOL_SEED: &str = include_str!("../data/seed/protocols.json");

pub fn init_pool(database_url: &str) -> DbPool {
    let manager = SqliteConnectionManager::file(database_url).with_init(|conn| {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Ok(())
    });
    Pool::builder()
        .max_size(8)
        .build(manager)
        .expect("Failed to create DB pool")
}

pub fn run_migrations(pool: &DbPool) {
    let conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");
    log::info!("Database migrations complete");
}

/// Seed the protocol catalog from the bundled reference set if it is empty.
/// Idempotent: a database that already holds protocols is left untouched.
pub fn seed_protocols(store: &dyn Store) {
    let count = match store.count_protocols() {
        Ok(n) => n,
        Err(e) => {
            log::error!("Seed check failed: {e}");
            return;
        }
    };
    if count > 0 {
        log::info!("Protocol catalog already seeded ({count} protocols), skipping");
        return;
    }

    let drafts: Vec<ProtocolDraft> = serde_json::from_str(PROTOCOL_SEED)
        .unwrap_or_else(|e| panic!("Bad protocol seed JSON: {e}"));

    let mut created = 0usize;
    for draft in &drafts {
        match store.create_protocol(draft) {
            Ok(_) => created += 1,
            Err(e) => log::warn!("Seed protocol '{}' failed: {e}", draft.name),
        }
    }
    log::info!("Protocol seed complete: created={created}");
}
