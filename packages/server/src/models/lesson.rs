use serde::{Deserialize, Serialize};

use super::shared::validate_length;
use crate::entity::lesson;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateLessonRequest {
    /// Defaults to `title`.
    #[schema(example = "Borrowing")]
    pub title: Option<String>,
    /// Display order hint. Defaults to 0.
    #[schema(example = 1)]
    pub order: Option<i32>,
    pub content: String,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateLessonRequest {
    pub title: Option<String>,
    pub order: Option<i32>,
    pub content: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LessonResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub course_id: i32,
    #[schema(example = "Borrowing")]
    pub title: String,
    #[schema(example = 1)]
    pub order: i32,
    pub content: String,
}

impl From<lesson::Model> for LessonResponse {
    fn from(m: lesson::Model) -> Self {
        Self {
            id: m.id,
            course_id: m.course_id,
            title: m.title,
            order: m.order,
            content: m.content,
        }
    }
}

pub fn validate_create_lesson(req: &CreateLessonRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_length("Title", title, 1, 200)?;
    }
    if req.content.trim().is_empty() {
        return Err(AppError::Validation("Content must not be empty".into()));
    }
    Ok(())
}

pub fn validate_update_lesson(req: &UpdateLessonRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_length("Title", title, 1, 200)?;
    }
    if let Some(ref content) = req.content
        && content.trim().is_empty()
    {
        return Err(AppError::Validation("Content must not be empty".into()));
    }
    Ok(())
}
