//! Persistence operations for user accounts.

use super::error::{EntityApiErrorKind, Error};
use entity::users::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, DatabaseConnection, PaginatorTrait, QueryFilter,
    TryIntoModel,
};

use log::*;

/// Insert a new user row. The `password` field on the incoming model must
/// already be hashed; hashing is the domain layer's responsibility. A taken
/// email surfaces as `RecordAlreadyExists` via the unique constraint.
pub async fn create(db: &DatabaseConnection, user_model: Model) -> Result<Model, Error> {
    debug!("New User Model to be inserted: {:?}", user_model);

    let now = chrono::Utc::now();

    let user_active_model: ActiveModel = ActiveModel {
        name: Set(user_model.name),
        email: Set(user_model.email),
        password: Set(user_model.password),
        role: Set(user_model.role),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(user_active_model.save(db).await?.try_into_model()?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await?)
}

pub async fn count_all(db: &DatabaseConnection) -> Result<u64, Error> {
    Ok(Entity::find().count(db).await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity::role::Role;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn create_returns_a_new_user_model() -> Result<(), Error> {
        let now = chrono::Utc::now();

        let user_model = Model {
            id: Id::new_v4(),
            name: "Dana Reviewer".to_owned(),
            email: "dana@example.com".to_owned(),
            password: "$argon2id$already-hashed".to_owned(),
            role: Role::User,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user_model.clone()]])
            .into_connection();

        let user = create(&db, user_model.clone()).await?;

        assert_eq!(user.email, user_model.email);

        Ok(())
    }

    #[tokio::test]
    async fn find_by_email_returns_none_for_unknown_email() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let user = find_by_email(&db, "nobody@example.com").await?;

        assert!(user.is_none());

        Ok(())
    }
}
