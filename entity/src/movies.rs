//! SeaORM Entity for the movies table.
//!
//! Movie metadata is consumed by the review pipeline by reference only; CRUD
//! on this table is an admin/catalog-import concern.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::movies::Model)]
#[sea_orm(schema_name = "cinecritic", table_name = "movies")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    pub title: String,

    pub year: String,

    pub genre: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub image_url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Runtime in minutes
    pub runtime: Option<i32>,

    /// External catalog id (TMDB), unique when present
    #[sea_orm(unique, nullable)]
    pub tmdb_id: Option<i64>,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
