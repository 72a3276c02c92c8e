use actix_cors::Cors;
use actix_files::Files;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;

use storefront::config::Settings;
use storefront::db::connection::{init_pool, run_migrations, seed_demo_if_empty};
use storefront::db::{ContentStore, MemoryStore, PgStore};
use storefront::{configure, mock_data, AppState};

fn postgres_store(settings: &Settings) -> anyhow::Result<Arc<dyn ContentStore>> {
    let pool = init_pool(&settings.database).context("Failed to create pool")?;
    let conn = &mut pool.get().context("Failed to get connection from pool")?;

    let applied = run_migrations(conn).map_err(|e| anyhow::anyhow!("Migrations failed: {}", e))?;
    log::info!("Database ready ({} migrations applied)", applied);

    if settings.database.seed_demo && seed_demo_if_empty(conn).context("Failed to seed demo data")? {
        log::info!("Seeded demo storefront content");
    }

    Ok(Arc::new(PgStore::new(pool)))
}

fn memory_store() -> anyhow::Result<Arc<dyn ContentStore>> {
    let mut store = MemoryStore::new();
    mock_data::load_demo(&mut store).context("Failed to load demo data")?;
    log::info!("Serving demo content from memory");
    Ok(Arc::new(store))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::load().context("Failed to load configuration")?;

    let store = if std::env::args().any(|arg| arg == "--in-memory") {
        memory_store()?
    } else {
        postgres_store(&settings)?
    };

    let app_state = web::Data::new(AppState::new(store, settings.media.url.clone()));
    let media = settings.media.clone();
    let (host, port) = settings.bind_address();

    log::info!("Starting HTTP server on http://{}:{}", host, port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_header("content-type")
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .service(Files::new(media.url.trim_end_matches('/'), &media.root))
            .configure(configure)
    })
    .bind((host, port))?
    .run()
    .await?;

    Ok(())
}
