use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission_choice")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub submission_id: i32,
    #[sea_orm(primary_key)]
    pub choice_id: i32,
    #[sea_orm(belongs_to, from = "submission_id", to = "id")]
    pub submission: HasOne<super::submission::Entity>,
    #[sea_orm(belongs_to, from = "choice_id", to = "id")]
    pub choice: HasOne<super::choice::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
