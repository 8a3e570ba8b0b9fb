use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::EnrollmentMode;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{course, enrollment, enrollment::DEFAULT_RATING};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::enrollment::*;
use crate::models::shared::Pagination;
use crate::state::AppState;
use crate::utils::cascade;
use crate::utils::lookup::{find_course, find_enrollment, find_user, usernames};

#[utoipa::path(
    post,
    path = "/{id}/enrollments",
    tag = "Enrollments",
    operation_id = "createEnrollment",
    summary = "Enroll an identity in a course",
    description = "Creates an enrollment and increments the course's `total_enrollment`. `mode` defaults to `audit`, `rating` to 5.0 and `date_enrolled` to today (UTC). Repeated enrollments of the same identity are allowed.",
    params(("id" = i32, Path, description = "Course ID")),
    request_body = CreateEnrollmentRequest,
    responses(
        (status = 201, description = "Enrollment created", body = EnrollmentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Course or identity not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(course_id, user_id = payload.user_id))]
pub async fn create_enrollment(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    AppJson(payload): AppJson<CreateEnrollmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_enrollment(&payload)?;

    let txn = state.db.begin().await?;
    let course_model = find_course(&txn, course_id).await?;
    let user = find_user(&txn, payload.user_id).await?;

    let new_enrollment = enrollment::ActiveModel {
        user_id: Set(payload.user_id),
        course_id: Set(course_id),
        date_enrolled: Set(payload
            .date_enrolled
            .unwrap_or_else(|| chrono::Utc::now().date_naive())),
        mode: Set(payload.mode.unwrap_or_default()),
        rating: Set(payload.rating.unwrap_or(DEFAULT_RATING)),
        ..Default::default()
    };
    let model = new_enrollment.insert(&txn).await?;

    let total = course_model.total_enrollment + 1;
    let mut active: course::ActiveModel = course_model.into();
    active.total_enrollment = Set(total);
    active.update(&txn).await?;

    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(EnrollmentResponse::new(model, user.username)),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}/enrollments",
    tag = "Enrollments",
    operation_id = "listCourseEnrollments",
    summary = "List enrollments of a course",
    description = "Returns a paginated list of the course's enrollments ordered by ID, optionally filtered by identity and mode.",
    params(("id" = i32, Path, description = "Course ID"), EnrollmentListQuery),
    responses(
        (status = 200, description = "List of enrollments", body = EnrollmentListResponse),
        (status = 400, description = "Unknown mode (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(course_id))]
pub async fn list_course_enrollments(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    Query(query): Query<EnrollmentListQuery>,
) -> Result<Json<EnrollmentListResponse>, AppError> {
    let _course = find_course(&state.db, course_id).await?;
    let (page, per_page) = Pagination::bounds(query.page, query.per_page);

    let mut select = enrollment::Entity::find().filter(enrollment::Column::CourseId.eq(course_id));
    if let Some(user_id) = query.user_id {
        select = select.filter(enrollment::Column::UserId.eq(user_id));
    }
    if let Some(ref mode) = query.mode {
        let mode = EnrollmentMode::from_str(mode.trim())?;
        select = select.filter(enrollment::Column::Mode.eq(mode));
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let models = select
        .order_by_asc(enrollment::Column::Id)
        .offset(Some(Pagination::offset(page, per_page)))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let names = usernames(&state.db, models.iter().map(|m| m.user_id)).await?;
    let data = models
        .into_iter()
        .map(|m| {
            let username = names.get(&m.user_id).cloned().unwrap_or_default();
            EnrollmentResponse::new(m, username)
        })
        .collect();

    Ok(Json(EnrollmentListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Enrollments",
    operation_id = "getEnrollment",
    summary = "Get an enrollment by ID",
    params(("id" = i32, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment", body = EnrollmentResponse),
        (status = 404, description = "Enrollment not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_enrollment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EnrollmentResponse>, AppError> {
    let model = find_enrollment(&state.db, id).await?;
    let user = find_user(&state.db, model.user_id).await?;
    Ok(Json(EnrollmentResponse::new(model, user.username)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Enrollments",
    operation_id = "updateEnrollment",
    summary = "Update an enrollment",
    description = "Partially updates mode, rating or enrollment date. An empty payload returns the current resource unchanged.",
    params(("id" = i32, Path, description = "Enrollment ID")),
    request_body = UpdateEnrollmentRequest,
    responses(
        (status = 200, description = "Enrollment updated", body = EnrollmentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Enrollment not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_enrollment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateEnrollmentRequest>,
) -> Result<Json<EnrollmentResponse>, AppError> {
    validate_update_enrollment(&payload)?;

    let existing = find_enrollment(&state.db, id).await?;
    let user = find_user(&state.db, existing.user_id).await?;
    if payload == UpdateEnrollmentRequest::default() {
        return Ok(Json(EnrollmentResponse::new(existing, user.username)));
    }

    let mut active: enrollment::ActiveModel = existing.into();
    if let Some(mode) = payload.mode {
        active.mode = Set(mode);
    }
    if let Some(rating) = payload.rating {
        active.rating = Set(rating);
    }
    if let Some(date_enrolled) = payload.date_enrolled {
        active.date_enrolled = Set(date_enrolled);
    }
    let model = active.update(&state.db).await?;

    Ok(Json(EnrollmentResponse::new(model, user.username)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Enrollments",
    operation_id = "deleteEnrollment",
    summary = "Delete an enrollment",
    description = "Deletes the enrollment with its submissions and decrements the course's `total_enrollment` (never below zero).",
    params(("id" = i32, Path, description = "Enrollment ID")),
    responses(
        (status = 204, description = "Enrollment deleted"),
        (status = 404, description = "Enrollment not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_enrollment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let existing = find_enrollment(&txn, id).await?;
    cascade::delete_enrollments(&txn, vec![id]).await?;
    cascade::decrement_total_enrollment(&txn, existing.course_id, 1).await?;
    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
