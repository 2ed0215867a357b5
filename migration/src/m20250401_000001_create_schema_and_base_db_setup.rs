use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create the platform's schema
        manager
            .get_connection()
            .execute_unprepared("CREATE SCHEMA IF NOT EXISTS cinecritic;")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("SET search_path TO cinecritic, public;")
            .await?;

        // Grant the base DB user that executes all platform queries
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    GRANT ALL PRIVILEGES ON DATABASE cinecritic TO cinecritic;
                    GRANT ALL ON SCHEMA cinecritic TO cinecritic;

                    ALTER DEFAULT PRIVILEGES IN SCHEMA cinecritic GRANT ALL ON TABLES TO cinecritic;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA cinecritic GRANT ALL ON SEQUENCES TO cinecritic;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA cinecritic GRANT ALL ON FUNCTIONS TO cinecritic;
                END $$;
            "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    ALTER DEFAULT PRIVILEGES IN SCHEMA cinecritic REVOKE ALL ON FUNCTIONS FROM cinecritic;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA cinecritic REVOKE ALL ON SEQUENCES FROM cinecritic;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA cinecritic REVOKE ALL ON TABLES FROM cinecritic;
                    REVOKE ALL ON SCHEMA cinecritic FROM cinecritic;
                    REVOKE ALL PRIVILEGES ON DATABASE cinecritic FROM cinecritic;
                END $$;
            "#,
            )
            .await?;

        // Drop the schema (CASCADE will remove all objects in it)
        manager
            .get_connection()
            .execute_unprepared("DROP SCHEMA IF EXISTS cinecritic CASCADE;")
            .await?;

        Ok(())
    }
}
