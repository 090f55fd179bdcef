use std::sync::Arc;

use actix_web::{App, HttpServer, middleware, web};

use emsbridge::models::scenario::ScenarioSet;
use emsbridge::player::{ScopePolicy, SessionManager};
use emsbridge::reference::ReferenceData;
use emsbridge::storage::{SqliteStore, Store};
use emsbridge::{db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    // Ensure data directory exists
    std::fs::create_dir_all("data").expect("Failed to create data directory");

    let database_path =
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| "data/emsbridge.db".to_string());
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    // Scope gating policy: "warn" flags above-scope steps, "block" withholds them
    let scope_policy = match std::env::var("SCOPE_POLICY") {
        Ok(val) => ScopePolicy::parse(&val).unwrap_or_else(|| {
            log::warn!("Unknown SCOPE_POLICY '{val}', using warn");
            ScopePolicy::Warn
        }),
        Err(_) => ScopePolicy::Warn,
    };

    // Initialize database
    let pool = db::init_pool(&database_path);
    db::run_migrations(&pool);

    // Injectable storage backend; handlers only see the trait object
    let store: Arc<dyn Store> = Arc::new(SqliteStore::new(pool));
    db::seed_protocols(store.as_ref());

    // Static content: authored scenarios and clinical reference tables
    let scenarios = Arc::new(ScenarioSet::load_builtin());
    let reference = ReferenceData::load_builtin();
    let sessions = SessionManager::new(scenarios.clone(), scope_policy);

    let store_data = web::Data::from(store);
    let scenario_data = web::Data::from(scenarios);
    let reference_data = web::Data::new(reference);
    let session_data = web::Data::new(sessions);

    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(store_data.clone())
            .app_data(scenario_data.clone())
            .app_data(reference_data.clone())
            .app_data(session_data.clone())
            .service(web::scope("/api/v1").configure(handlers::configure))
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound()
                    .json(serde_json::json!({ "error": "Not found" }))
            }))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
