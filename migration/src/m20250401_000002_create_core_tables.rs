use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create role enum
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE cinecritic.role AS ENUM (
                    'user',
                    'admin'
                )",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TYPE cinecritic.role OWNER TO cinecritic")
            .await?;

        // Create sentiment enum for classified reviews
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE cinecritic.sentiment AS ENUM (
                    'positive',
                    'neutral',
                    'negative'
                )",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TYPE cinecritic.sentiment OWNER TO cinecritic")
            .await?;

        // Create users table
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE IF NOT EXISTS cinecritic.users (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    name VARCHAR(255) NOT NULL,
                    email VARCHAR(255) NOT NULL UNIQUE,
                    password VARCHAR(255) NOT NULL,
                    role cinecritic.role NOT NULL DEFAULT 'user',
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
            "#,
            )
            .await?;

        // Create movies table
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE IF NOT EXISTS cinecritic.movies (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    title VARCHAR(100) NOT NULL,
                    year VARCHAR(10) NOT NULL,
                    genre VARCHAR(100) NOT NULL,
                    image_url TEXT,
                    description TEXT,
                    runtime INTEGER,
                    tmdb_id BIGINT,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    CONSTRAINT movies_tmdb_id_key UNIQUE (tmdb_id)
                )
            "#,
            )
            .await?;

        // Index backing title search
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS movies_title ON cinecritic.movies (title)",
            )
            .await?;

        // Create reviews table. Derived classification fields are NOT NULL: a
        // review row never exists without a classifier verdict.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE IF NOT EXISTS cinecritic.reviews (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    movie_id UUID NOT NULL
                        REFERENCES cinecritic.movies(id) ON DELETE CASCADE,
                    movie_title VARCHAR(100) NOT NULL,
                    review_text TEXT NOT NULL,
                    rating SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5),
                    sentiment cinecritic.sentiment NOT NULL,
                    sentiment_score DOUBLE PRECISION NOT NULL
                        CHECK (sentiment_score BETWEEN 0 AND 100),
                    user_id UUID NOT NULL
                        REFERENCES cinecritic.users(id) ON DELETE CASCADE,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
            "#,
            )
            .await?;

        // One review per (user, movie). The review pipeline pre-checks for
        // duplicates but its check-then-create is not atomic; this constraint
        // is what actually closes the race between two concurrent creates.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS reviews_user_id_movie_id_key
                 ON cinecritic.reviews (user_id, movie_id)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS cinecritic.reviews")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS cinecritic.movies")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS cinecritic.users")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS cinecritic.sentiment")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS cinecritic.role")
            .await?;

        Ok(())
    }
}
