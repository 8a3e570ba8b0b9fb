use common::Occupation;
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, validate_non_negative, validate_url};
use crate::entity::{instructor, learner};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateInstructorRequest {
    /// Identity the instructor record belongs to.
    #[schema(example = 1)]
    pub user_id: i32,
    /// Defaults to `true`.
    pub full_time: Option<bool>,
    #[schema(example = 120)]
    pub total_learners: i32,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateInstructorRequest {
    pub full_time: Option<bool>,
    pub total_learners: Option<i32>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct InstructorListQuery {
    #[param(example = 1)]
    pub page: Option<u64>,
    #[param(example = 20)]
    pub per_page: Option<u64>,
    /// Filter by employment type.
    pub full_time: Option<bool>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct InstructorResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(example = "alice")]
    pub username: String,
    pub full_time: bool,
    #[schema(example = 120)]
    pub total_learners: i32,
    /// Display string (the username).
    #[schema(example = "alice")]
    pub display: String,
}

impl InstructorResponse {
    pub fn new(m: instructor::Model, username: String) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            display: username.clone(),
            username,
            full_time: m.full_time,
            total_learners: m.total_learners,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct InstructorListResponse {
    pub data: Vec<InstructorResponse>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateLearnerRequest {
    #[schema(example = 2)]
    pub user_id: i32,
    /// Defaults to `student`.
    pub occupation: Option<Occupation>,
    #[schema(example = "https://github.com/bob")]
    pub social_link: String,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateLearnerRequest {
    pub occupation: Option<Occupation>,
    pub social_link: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct LearnerListQuery {
    #[param(example = 1)]
    pub page: Option<u64>,
    #[param(example = 20)]
    pub per_page: Option<u64>,
    /// Filter by occupation: `student`, `developer`, `data_scientist`, `dba`.
    #[param(example = "developer")]
    pub occupation: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LearnerResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 2)]
    pub user_id: i32,
    #[schema(example = "bob")]
    pub username: String,
    pub occupation: Occupation,
    #[schema(example = "https://github.com/bob")]
    pub social_link: String,
    /// Display string: `username,occupation`.
    #[schema(example = "bob,developer")]
    pub display: String,
}

impl LearnerResponse {
    pub fn new(m: learner::Model, username: String) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            display: format!("{},{}", username, m.occupation),
            username,
            occupation: m.occupation,
            social_link: m.social_link,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LearnerListResponse {
    pub data: Vec<LearnerResponse>,
    pub pagination: Pagination,
}

pub fn validate_create_instructor(req: &CreateInstructorRequest) -> Result<(), AppError> {
    validate_non_negative("total_learners", Some(req.total_learners))
}

pub fn validate_update_instructor(req: &UpdateInstructorRequest) -> Result<(), AppError> {
    validate_non_negative("total_learners", req.total_learners)
}

pub fn validate_create_learner(req: &CreateLearnerRequest) -> Result<(), AppError> {
    validate_url("social_link", &req.social_link)
}

pub fn validate_update_learner(req: &UpdateLearnerRequest) -> Result<(), AppError> {
    if let Some(ref link) = req.social_link {
        validate_url("social_link", link)?;
    }
    Ok(())
}
