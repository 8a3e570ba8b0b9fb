use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NAME: &str = "online course";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "String(StringLen::N(30))")]
    pub name: String,
    /// Object key in the external blob store (e.g. `course_images/intro.png`).
    pub image: String,
    #[sea_orm(column_type = "String(StringLen::N(1000))")]
    pub description: String,
    pub pub_date: Option<Date>,

    #[sea_orm(default_value = 0)]
    pub total_enrollment: i32,

    #[sea_orm(has_many, via = "course_instructor")]
    pub instructors: HasMany<super::instructor::Entity>,

    #[sea_orm(has_many, via = "enrollment")]
    pub users: HasMany<super::user::Entity>,

    #[sea_orm(has_many)]
    pub lessons: HasMany<super::lesson::Entity>,

    #[sea_orm(has_many)]
    pub questions: HasMany<super::question::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name: {},Description: {}", self.name, self.description)
    }
}

impl ActiveModelBehavior for ActiveModel {}
