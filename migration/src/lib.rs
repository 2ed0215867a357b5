pub use sea_orm_migration::prelude::*;

mod m20250401_000001_create_schema_and_base_db_setup;
mod m20250401_000002_create_core_tables;
mod m20250402_000001_add_initial_admin_user;
mod m20250815_000000_add_review_sorting_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250401_000001_create_schema_and_base_db_setup::Migration),
            Box::new(m20250401_000002_create_core_tables::Migration),
            Box::new(m20250402_000001_add_initial_admin_user::Migration),
            Box::new(m20250815_000000_add_review_sorting_indexes::Migration),
        ]
    }
}
