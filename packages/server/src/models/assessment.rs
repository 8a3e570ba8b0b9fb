use serde::{Deserialize, Serialize};

use super::shared::{validate_id_list, validate_length, validate_non_negative};
use crate::entity::{choice, question};
use crate::error::AppError;

/// Upper bound on choices created inline with a question, and on selections scored at once.
pub const MAX_CHOICES: usize = 100;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateChoiceRequest {
    #[schema(example = "4")]
    pub content: String,
    /// Defaults to `false`.
    pub is_correct: Option<bool>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateChoiceRequest {
    pub content: Option<String>,
    pub is_correct: Option<bool>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateQuestionRequest {
    #[schema(example = "2+2=?")]
    pub content: String,
    /// Points awarded for a correct answer. Defaults to 50.
    #[schema(example = 50)]
    pub grade: Option<i32>,
    /// Choices created together with the question.
    #[serde(default)]
    pub choices: Vec<CreateChoiceRequest>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateQuestionRequest {
    pub content: Option<String>,
    pub grade: Option<i32>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ScoreRequest {
    /// Choices the learner selected for this question.
    pub choice_ids: Vec<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ScoreResponse {
    #[schema(example = 1)]
    pub question_id: i32,
    /// True when every correct choice was selected.
    pub is_get_score: bool,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ChoiceResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub question_id: i32,
    #[schema(example = "4")]
    pub content: String,
    pub is_correct: bool,
}

impl From<choice::Model> for ChoiceResponse {
    fn from(m: choice::Model) -> Self {
        Self {
            id: m.id,
            question_id: m.question_id,
            content: m.content,
            is_correct: m.is_correct,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct QuestionResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub course_id: i32,
    #[schema(example = "2+2=?")]
    pub content: String,
    #[schema(example = 50)]
    pub grade: i32,
    /// Display string: `Question: <content>`.
    #[schema(example = "Question: 2+2=?")]
    pub display: String,
    pub choices: Vec<ChoiceResponse>,
}

impl QuestionResponse {
    pub fn new(m: question::Model, choices: Vec<choice::Model>) -> Self {
        Self {
            display: m.to_string(),
            id: m.id,
            course_id: m.course_id,
            content: m.content,
            grade: m.grade,
            choices: choices.into_iter().map(ChoiceResponse::from).collect(),
        }
    }
}

fn validate_choice_content(content: &str) -> Result<(), AppError> {
    validate_length("Choice content", content, 1, 200)
}

pub fn validate_create_choice(req: &CreateChoiceRequest) -> Result<(), AppError> {
    validate_choice_content(&req.content)
}

pub fn validate_update_choice(req: &UpdateChoiceRequest) -> Result<(), AppError> {
    if let Some(ref content) = req.content {
        validate_choice_content(content)?;
    }
    Ok(())
}

pub fn validate_create_question(req: &CreateQuestionRequest) -> Result<(), AppError> {
    validate_length("Content", &req.content, 1, 200)?;
    validate_non_negative("grade", req.grade)?;
    if req.choices.len() > MAX_CHOICES {
        return Err(AppError::Validation(format!(
            "Too many choices: max {MAX_CHOICES}"
        )));
    }
    req.choices.iter().try_for_each(validate_create_choice)
}

pub fn validate_update_question(req: &UpdateQuestionRequest) -> Result<(), AppError> {
    if let Some(ref content) = req.content {
        validate_length("Content", content, 1, 200)?;
    }
    validate_non_negative("grade", req.grade)
}

pub fn validate_score(req: &ScoreRequest) -> Result<(), AppError> {
    validate_id_list(&req.choice_ids, "choice", MAX_CHOICES)
}
