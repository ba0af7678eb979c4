//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250301_000001_create_user_tables;
mod m20250301_000002_create_note_tables;
mod m20250301_000003_create_notification_tables;
mod m20250301_000004_create_review_table;
mod m20250301_000005_create_insight_tables;
mod m20250301_000006_create_activity_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_user_tables::Migration),
            Box::new(m20250301_000002_create_note_tables::Migration),
            Box::new(m20250301_000003_create_notification_tables::Migration),
            Box::new(m20250301_000004_create_review_table::Migration),
            Box::new(m20250301_000005_create_insight_tables::Migration),
            Box::new(m20250301_000006_create_activity_tables::Migration),
        ]
    }
}
