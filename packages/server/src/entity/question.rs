use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::choice;

pub const DEFAULT_GRADE: i32 = 50;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "question")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub course_id: i32,
    #[sea_orm(belongs_to, from = "course_id", to = "id")]
    pub course: HasOne<super::course::Entity>,

    #[sea_orm(column_type = "String(StringLen::N(200))")]
    pub content: String,
    /// Points awarded when the question is answered correctly.
    #[sea_orm(default_value = 50)]
    pub grade: i32,

    #[sea_orm(has_many)]
    pub choices: HasMany<super::choice::Entity>,
}

impl Model {
    /// Whether the selected choices earn full credit on this question.
    ///
    /// Counts this question's correct choices, then how many of them appear in
    /// `selected_ids`, and compares the two. Selected choices that are incorrect
    /// or belong to another question do not affect the outcome.
    pub async fn is_get_score<C: ConnectionTrait>(
        &self,
        db: &C,
        selected_ids: &[i32],
    ) -> Result<bool, DbErr> {
        let correct = choice::Entity::find()
            .filter(choice::Column::QuestionId.eq(self.id))
            .filter(choice::Column::IsCorrect.eq(true));

        let all_answers = correct.clone().count(db).await?;
        let selected_correct = correct
            .filter(choice::Column::Id.is_in(selected_ids.iter().copied()))
            .count(db)
            .await?;

        Ok(all_answers == selected_correct)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Question: {}", self.content)
    }
}

impl ActiveModelBehavior for ActiveModel {}
