use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;

use crate::config::DatabaseSettings;
use crate::db::repository::{count_categories, PgWriter};
use crate::db::store::{StoreError, StoreResult};
use crate::mock_data;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub fn init_pool(settings: &DatabaseSettings) -> Result<PgPool, r2d2::Error> {
    let manager = ConnectionManager::<PgConnection>::new(settings.url.as_str());
    Pool::builder()
        .max_size(settings.pool_size)
        .connection_timeout(Duration::from_secs(settings.timeout_seconds))
        .build(manager)
}

pub fn run_migrations(
    conn: &mut PgConnection,
) -> Result<usize, Box<dyn std::error::Error + Send + Sync + 'static>> {
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for version in &applied {
        log::info!("Applied migration {}", version);
    }
    Ok(applied.len())
}

/// Loads the demo storefront when the catalog has no categories yet.
/// Returns whether anything was inserted.
pub fn seed_demo_if_empty(conn: &mut PgConnection) -> StoreResult<bool> {
    if count_categories(conn)? > 0 {
        return Ok(false);
    }
    conn.transaction::<_, StoreError, _>(|conn| {
        let mut writer = PgWriter::new(conn);
        mock_data::load_demo(&mut writer)
    })?;
    Ok(true)
}
