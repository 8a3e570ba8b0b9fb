use chrono::NaiveDate;
use common::EnrollmentMode;
use serde::{Deserialize, Serialize};

use super::shared::Pagination;
use crate::entity::enrollment;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateEnrollmentRequest {
    #[schema(example = 1)]
    pub user_id: i32,
    /// Defaults to `audit`.
    pub mode: Option<EnrollmentMode>,
    /// Defaults to 5.0.
    #[schema(example = 5.0)]
    pub rating: Option<f64>,
    /// Defaults to today (UTC).
    pub date_enrolled: Option<NaiveDate>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateEnrollmentRequest {
    pub mode: Option<EnrollmentMode>,
    pub rating: Option<f64>,
    pub date_enrolled: Option<NaiveDate>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct EnrollmentListQuery {
    #[param(example = 1)]
    pub page: Option<u64>,
    #[param(example = 20)]
    pub per_page: Option<u64>,
    /// Filter by identity.
    pub user_id: Option<i32>,
    /// Filter by mode: `audit`, `honor`, `BETA`.
    #[param(example = "honor")]
    pub mode: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EnrollmentResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = 1)]
    pub course_id: i32,
    pub date_enrolled: NaiveDate,
    pub mode: EnrollmentMode,
    #[schema(example = 5.0)]
    pub rating: f64,
}

impl EnrollmentResponse {
    pub fn new(m: enrollment::Model, username: String) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            username,
            course_id: m.course_id,
            date_enrolled: m.date_enrolled,
            mode: m.mode,
            rating: m.rating,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EnrollmentListResponse {
    pub data: Vec<EnrollmentResponse>,
    pub pagination: Pagination,
}

fn validate_rating(rating: Option<f64>) -> Result<(), AppError> {
    if let Some(rating) = rating
        && !(0.0..=5.0).contains(&rating)
    {
        return Err(AppError::Validation("Rating must be between 0 and 5".into()));
    }
    Ok(())
}

pub fn validate_create_enrollment(req: &CreateEnrollmentRequest) -> Result<(), AppError> {
    validate_rating(req.rating)
}

pub fn validate_update_enrollment(req: &UpdateEnrollmentRequest) -> Result<(), AppError> {
    validate_rating(req.rating)
}
