//! SeaORM Entity for the reviews table.
//!
//! A review carries both the user-authored text and the fields derived from it
//! by the sentiment classification service (`rating`, `sentiment`,
//! `sentiment_score`). Derived fields are never accepted from clients.

use crate::sentiment::Sentiment;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::reviews::Model)]
#[sea_orm(schema_name = "cinecritic", table_name = "reviews")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    #[schema(value_type = Uuid)]
    pub movie_id: Id,

    /// Denormalized display copy of the movie title
    pub movie_title: String,

    #[sea_orm(column_type = "Text")]
    pub review_text: String,

    /// Star rating 1-5, derived by the classification service
    pub rating: i16,

    pub sentiment: Sentiment,

    /// Classification confidence/intensity, 0-100
    pub sentiment_score: f64,

    #[schema(value_type = Uuid)]
    pub user_id: Id,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movies::Entity",
        from = "Column::MovieId",
        to = "super::movies::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Movies,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::movies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movies.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
