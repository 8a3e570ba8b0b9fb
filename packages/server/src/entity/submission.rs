use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One grading attempt: the choices an enrollment selected.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub enrollment_id: i32,
    #[sea_orm(belongs_to, from = "enrollment_id", to = "id")]
    pub enrollment: HasOne<super::enrollment::Entity>,

    #[sea_orm(has_many, via = "submission_choice")]
    pub choices: HasMany<super::choice::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
