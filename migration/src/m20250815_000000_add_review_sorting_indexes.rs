use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Indexes backing the review list sort orders (newest/oldest and
        // highest/lowest rating) scoped to a movie.
        manager
            .create_index(
                Index::create()
                    .name("reviews_movie_id_created_at")
                    .table((Alias::new("cinecritic"), Alias::new("reviews")))
                    .col(Alias::new("movie_id"))
                    .col(Alias::new("created_at"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("reviews_movie_id_rating")
                    .table((Alias::new("cinecritic"), Alias::new("reviews")))
                    .col(Alias::new("movie_id"))
                    .col(Alias::new("rating"))
                    .to_owned(),
            )
            .await?;

        // "My reviews" listings sort by recency per user
        manager
            .create_index(
                Index::create()
                    .name("reviews_user_id_created_at")
                    .table((Alias::new("cinecritic"), Alias::new("reviews")))
                    .col(Alias::new("user_id"))
                    .col(Alias::new("created_at"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("reviews_movie_id_created_at")
                    .table((Alias::new("cinecritic"), Alias::new("reviews")))
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("reviews_movie_id_rating")
                    .table((Alias::new("cinecritic"), Alias::new("reviews")))
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("reviews_user_id_created_at")
                    .table((Alias::new("cinecritic"), Alias::new("reviews")))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
