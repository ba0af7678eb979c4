//! Database layer for tasknote.
//!
//! Entities, migrations and repositories for the notes schema, plus the
//! deletion-policy table and the ownership scoping helpers shared by every
//! repository.

pub mod deletion;
pub mod entities;
pub mod migrations;
pub mod pagination;
pub mod repositories;
pub mod scope;
pub mod test_utils;

mod errors;

pub use errors::map_db_err;
pub use pagination::Page;
pub use scope::Caller;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tasknote_common::{AppError, Config};
use tracing::log::LevelFilter;

/// Initialize database connection.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(&config.database.url);

    opt.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}
