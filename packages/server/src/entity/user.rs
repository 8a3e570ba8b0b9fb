use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Local mirror of an account owned by the external identity provider.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    /// Identifier assigned by the identity provider.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(has_many)]
    pub instructors: HasMany<super::instructor::Entity>,

    #[sea_orm(has_many)]
    pub learners: HasMany<super::learner::Entity>,

    #[sea_orm(has_many, via = "enrollment")]
    pub courses: HasMany<super::course::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
