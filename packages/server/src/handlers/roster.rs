use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::Occupation;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{instructor, learner};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::roster::*;
use crate::models::shared::Pagination;
use crate::state::AppState;
use crate::utils::cascade;
use crate::utils::lookup::{find_instructor, find_learner, find_user, usernames};

#[utoipa::path(
    post,
    path = "/",
    tag = "Instructors",
    operation_id = "createInstructor",
    summary = "Create an instructor record",
    description = "Creates an instructor record for an existing identity. `full_time` defaults to `true`.",
    request_body = CreateInstructorRequest,
    responses(
        (status = 201, description = "Instructor created", body = InstructorResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Identity not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(user_id = payload.user_id))]
pub async fn create_instructor(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateInstructorRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_instructor(&payload)?;
    let user = find_user(&state.db, payload.user_id).await?;

    let new_instructor = instructor::ActiveModel {
        user_id: Set(payload.user_id),
        full_time: Set(payload.full_time.unwrap_or(true)),
        total_learners: Set(payload.total_learners),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_instructor.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(InstructorResponse::new(model, user.username)),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Instructors",
    operation_id = "listInstructors",
    summary = "List instructors",
    description = "Returns a paginated list of instructors ordered by ID, optionally filtered by `full_time`.",
    params(InstructorListQuery),
    responses(
        (status = 200, description = "List of instructors", body = InstructorListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_instructors(
    State(state): State<AppState>,
    Query(query): Query<InstructorListQuery>,
) -> Result<Json<InstructorListResponse>, AppError> {
    let (page, per_page) = Pagination::bounds(query.page, query.per_page);

    let mut select = instructor::Entity::find();
    if let Some(full_time) = query.full_time {
        select = select.filter(instructor::Column::FullTime.eq(full_time));
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let models = select
        .order_by_asc(instructor::Column::Id)
        .offset(Some(Pagination::offset(page, per_page)))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let names = usernames(&state.db, models.iter().map(|m| m.user_id)).await?;
    let data = models
        .into_iter()
        .map(|m| {
            let username = names.get(&m.user_id).cloned().unwrap_or_default();
            InstructorResponse::new(m, username)
        })
        .collect();

    Ok(Json(InstructorListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Instructors",
    operation_id = "getInstructor",
    summary = "Get an instructor by ID",
    params(("id" = i32, Path, description = "Instructor ID")),
    responses(
        (status = 200, description = "Instructor details", body = InstructorResponse),
        (status = 404, description = "Instructor not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_instructor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<InstructorResponse>, AppError> {
    let model = find_instructor(&state.db, id).await?;
    let user = find_user(&state.db, model.user_id).await?;
    Ok(Json(InstructorResponse::new(model, user.username)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Instructors",
    operation_id = "updateInstructor",
    summary = "Update an instructor",
    description = "Partially updates an instructor using PATCH semantics. An empty payload returns the current resource unchanged.",
    params(("id" = i32, Path, description = "Instructor ID")),
    request_body = UpdateInstructorRequest,
    responses(
        (status = 200, description = "Instructor updated", body = InstructorResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Instructor not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_instructor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateInstructorRequest>,
) -> Result<Json<InstructorResponse>, AppError> {
    validate_update_instructor(&payload)?;

    let existing = find_instructor(&state.db, id).await?;
    let user = find_user(&state.db, existing.user_id).await?;
    if payload == UpdateInstructorRequest::default() {
        return Ok(Json(InstructorResponse::new(existing, user.username)));
    }

    let mut active: instructor::ActiveModel = existing.into();
    if let Some(full_time) = payload.full_time {
        active.full_time = Set(full_time);
    }
    if let Some(total_learners) = payload.total_learners {
        active.total_learners = Set(total_learners);
    }
    let model = active.update(&state.db).await?;

    Ok(Json(InstructorResponse::new(model, user.username)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Instructors",
    operation_id = "deleteInstructor",
    summary = "Delete an instructor",
    description = "Deletes the instructor record and detaches it from every course. The identity is kept.",
    params(("id" = i32, Path, description = "Instructor ID")),
    responses(
        (status = 204, description = "Instructor deleted"),
        (status = 404, description = "Instructor not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_instructor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let _instructor = find_instructor(&txn, id).await?;
    cascade::delete_instructors(&txn, vec![id]).await?;
    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Learners",
    operation_id = "createLearner",
    summary = "Create a learner record",
    description = "Creates a learner record for an existing identity. `occupation` defaults to `student`; `social_link` must be an http(s) URL of at most 200 characters.",
    request_body = CreateLearnerRequest,
    responses(
        (status = 201, description = "Learner created", body = LearnerResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Identity not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(user_id = payload.user_id))]
pub async fn create_learner(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateLearnerRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_learner(&payload)?;
    let user = find_user(&state.db, payload.user_id).await?;

    let new_learner = learner::ActiveModel {
        user_id: Set(payload.user_id),
        occupation: Set(payload.occupation.unwrap_or_default()),
        social_link: Set(payload.social_link.trim().to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_learner.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(LearnerResponse::new(model, user.username)),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Learners",
    operation_id = "listLearners",
    summary = "List learners",
    description = "Returns a paginated list of learners ordered by ID, optionally filtered by occupation.",
    params(LearnerListQuery),
    responses(
        (status = 200, description = "List of learners", body = LearnerListResponse),
        (status = 400, description = "Unknown occupation (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_learners(
    State(state): State<AppState>,
    Query(query): Query<LearnerListQuery>,
) -> Result<Json<LearnerListResponse>, AppError> {
    let (page, per_page) = Pagination::bounds(query.page, query.per_page);

    let mut select = learner::Entity::find();
    if let Some(ref occupation) = query.occupation {
        let occupation = Occupation::from_str(occupation.trim())?;
        select = select.filter(learner::Column::Occupation.eq(occupation));
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let models = select
        .order_by_asc(learner::Column::Id)
        .offset(Some(Pagination::offset(page, per_page)))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let names = usernames(&state.db, models.iter().map(|m| m.user_id)).await?;
    let data = models
        .into_iter()
        .map(|m| {
            let username = names.get(&m.user_id).cloned().unwrap_or_default();
            LearnerResponse::new(m, username)
        })
        .collect();

    Ok(Json(LearnerListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Learners",
    operation_id = "getLearner",
    summary = "Get a learner by ID",
    params(("id" = i32, Path, description = "Learner ID")),
    responses(
        (status = 200, description = "Learner details", body = LearnerResponse),
        (status = 404, description = "Learner not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_learner(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<LearnerResponse>, AppError> {
    let model = find_learner(&state.db, id).await?;
    let user = find_user(&state.db, model.user_id).await?;
    Ok(Json(LearnerResponse::new(model, user.username)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Learners",
    operation_id = "updateLearner",
    summary = "Update a learner",
    description = "Partially updates a learner using PATCH semantics. An empty payload returns the current resource unchanged.",
    params(("id" = i32, Path, description = "Learner ID")),
    request_body = UpdateLearnerRequest,
    responses(
        (status = 200, description = "Learner updated", body = LearnerResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Learner not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_learner(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateLearnerRequest>,
) -> Result<Json<LearnerResponse>, AppError> {
    validate_update_learner(&payload)?;

    let existing = find_learner(&state.db, id).await?;
    let user = find_user(&state.db, existing.user_id).await?;
    if payload == UpdateLearnerRequest::default() {
        return Ok(Json(LearnerResponse::new(existing, user.username)));
    }

    let mut active: learner::ActiveModel = existing.into();
    if let Some(occupation) = payload.occupation {
        active.occupation = Set(occupation);
    }
    if let Some(ref social_link) = payload.social_link {
        active.social_link = Set(social_link.trim().to_string());
    }
    let model = active.update(&state.db).await?;

    Ok(Json(LearnerResponse::new(model, user.username)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Learners",
    operation_id = "deleteLearner",
    summary = "Delete a learner",
    description = "Deletes the learner record. The identity and its enrollments are kept.",
    params(("id" = i32, Path, description = "Learner ID")),
    responses(
        (status = 204, description = "Learner deleted"),
        (status = 404, description = "Learner not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_learner(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _learner = find_learner(&state.db, id).await?;
    learner::Entity::delete_by_id(id).exec(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}
