use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, double_option, validate_id_list, validate_length};
use crate::entity::course;
use crate::error::AppError;

/// Upper bound on instructors attached in one request.
pub const MAX_INSTRUCTORS: usize = 100;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCourseRequest {
    /// Defaults to `online course`.
    #[schema(example = "Intro to Rust")]
    pub name: Option<String>,
    /// Object key of the course image in the blob store.
    #[schema(example = "course_images/rust.png")]
    pub image: String,
    #[schema(example = "Ownership, borrowing and lifetimes.")]
    pub description: String,
    pub pub_date: Option<NaiveDate>,
    /// Instructors to attach on creation.
    #[serde(default)]
    pub instructor_ids: Vec<i32>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    /// `null` clears the publication date.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub pub_date: Option<Option<NaiveDate>>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct CourseListQuery {
    #[param(example = 1)]
    pub page: Option<u64>,
    #[param(example = 20)]
    pub per_page: Option<u64>,
    /// Case-insensitive match against name and description.
    #[param(example = "rust")]
    pub search: Option<String>,
    /// Exact publication date.
    pub pub_date: Option<NaiveDate>,
    /// Published on or after this date.
    pub published_after: Option<NaiveDate>,
    /// Published on or before this date.
    pub published_before: Option<NaiveDate>,
    /// Sort field: `created_at` (default), `name`, `pub_date`, `total_enrollment`.
    #[param(example = "created_at")]
    pub sort_by: Option<String>,
    /// Sort direction: `asc` or `desc` (default).
    #[param(example = "desc")]
    pub sort_order: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct CourseDetailQuery {
    /// Identity to compute `is_enrolled` for.
    #[param(example = 1)]
    pub user_id: Option<i32>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SetCourseInstructorsRequest {
    /// Complete instructor set; replaces the current one.
    pub instructor_ids: Vec<i32>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AddCourseInstructorRequest {
    #[schema(example = 1)]
    pub instructor_id: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CourseResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Intro to Rust")]
    pub name: String,
    #[schema(example = "course_images/rust.png")]
    pub image: String,
    pub description: String,
    pub pub_date: Option<NaiveDate>,
    #[schema(example = 0)]
    pub total_enrollment: i32,
    /// Whether the identity given as `user_id` is enrolled. Never stored.
    pub is_enrolled: bool,
    /// Display string: `Name: <name>,Description: <description>`.
    pub display: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<course::Model> for CourseResponse {
    fn from(m: course::Model) -> Self {
        Self {
            display: m.to_string(),
            id: m.id,
            name: m.name,
            image: m.image,
            description: m.description,
            pub_date: m.pub_date,
            total_enrollment: m.total_enrollment,
            is_enrolled: false,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Course summary for list views (the admin list columns plus counters).
#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct CourseListItem {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Intro to Rust")]
    pub name: String,
    pub pub_date: Option<NaiveDate>,
    #[schema(example = 12)]
    pub total_enrollment: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CourseListResponse {
    pub data: Vec<CourseListItem>,
    pub pagination: Pagination,
}

fn validate_image(image: &str) -> Result<(), AppError> {
    validate_length("Image", image, 1, 100)?;
    let image = image.trim();
    if image.starts_with('/') || image.split('/').any(|part| part == "..") {
        return Err(AppError::Validation(
            "Image must be a relative object key".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_course(req: &CreateCourseRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_length("Name", name, 1, 30)?;
    }
    validate_image(&req.image)?;
    validate_length("Description", &req.description, 1, 1000)?;
    validate_id_list(&req.instructor_ids, "instructor", MAX_INSTRUCTORS)
}

pub fn validate_update_course(req: &UpdateCourseRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_length("Name", name, 1, 30)?;
    }
    if let Some(ref image) = req.image {
        validate_image(image)?;
    }
    if let Some(ref description) = req.description {
        validate_length("Description", description, 1, 1000)?;
    }
    Ok(())
}

pub fn validate_set_course_instructors(req: &SetCourseInstructorsRequest) -> Result<(), AppError> {
    validate_id_list(&req.instructor_ids, "instructor", MAX_INSTRUCTORS)
}
