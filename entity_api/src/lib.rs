use chrono::Utc;
use password_auth::generate_hash;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

pub use entity::{movies, reviews, role, sentiment, users, Id};

pub mod error;
pub mod movie;
pub mod review;
pub mod user;

/// Seed a development database with a couple of accounts, a small movie
/// catalog and one pre-classified review. Never run against production data.
pub async fn seed_database(db: &DatabaseConnection) {
    let now = Utc::now();

    let _admin_user: users::ActiveModel = users::ActiveModel {
        name: Set("Admin User".to_owned()),
        email: Set("admin@cinecritic.local".to_owned()),
        password: Set(generate_hash("password")),
        role: Set(role::Role::Admin),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    let demo_user = users::ActiveModel {
        name: Set("Demo Reviewer".to_owned()),
        email: Set("demo@cinecritic.local".to_owned()),
        password: Set(generate_hash("password")),
        role: Set(role::Role::User),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    let inception = movies::ActiveModel {
        title: Set("Inception".to_owned()),
        year: Set("2010".to_owned()),
        genre: Set("Science Fiction".to_owned()),
        image_url: Set(None),
        description: Set(Some(
            "A thief who steals corporate secrets through dream-sharing technology.".to_owned(),
        )),
        runtime: Set(Some(148)),
        tmdb_id: Set(Some(27205)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    movies::ActiveModel {
        title: Set("The Dark Knight".to_owned()),
        year: Set("2008".to_owned()),
        genre: Set("Action".to_owned()),
        image_url: Set(None),
        description: Set(Some(
            "Batman faces the Joker, a criminal mastermind bent on chaos.".to_owned(),
        )),
        runtime: Set(Some(152)),
        tmdb_id: Set(Some(155)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    movies::ActiveModel {
        title: Set("Paddington 2".to_owned()),
        year: Set("2017".to_owned()),
        genre: Set("Family".to_owned()),
        image_url: Set(None),
        description: Set(Some(
            "Paddington picks up a series of odd jobs to buy the perfect present.".to_owned(),
        )),
        runtime: Set(Some(103)),
        tmdb_id: Set(Some(346648)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    // One review carrying values in the shape the classifier would produce
    reviews::ActiveModel {
        movie_id: Set(inception.id.clone().unwrap()),
        movie_title: Set("Inception".to_owned()),
        review_text: Set(
            "A dazzling heist story that rewards every rewatch with new details.".to_owned(),
        ),
        rating: Set(5),
        sentiment: Set(sentiment::Sentiment::Positive),
        sentiment_score: Set(96.0),
        user_id: Set(demo_user.id.clone().unwrap()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();
}

