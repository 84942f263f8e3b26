//! Migrator for the guest list schema.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_guest;
mod m20240601_000002_add_guest_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_guest::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000002_add_guest_indexes::Migration),
        ]
    }
}
