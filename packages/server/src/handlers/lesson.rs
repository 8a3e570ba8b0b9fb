use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{lesson, lesson::DEFAULT_TITLE};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::lesson::*;
use crate::state::AppState;
use crate::utils::lookup::{find_course, find_lesson_in_course};

#[utoipa::path(
    post,
    path = "/{id}/lessons",
    tag = "Lessons",
    operation_id = "createLesson",
    summary = "Add a lesson to a course",
    description = "`title` defaults to `title` and `order` to 0. Orders need not be unique.",
    params(("id" = i32, Path, description = "Course ID")),
    request_body = CreateLessonRequest,
    responses(
        (status = 201, description = "Lesson created", body = LessonResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(course_id))]
pub async fn create_lesson(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    AppJson(payload): AppJson<CreateLessonRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_lesson(&payload)?;
    let _course = find_course(&state.db, course_id).await?;

    let new_lesson = lesson::ActiveModel {
        title: Set(payload
            .title
            .as_deref()
            .map(str::trim)
            .unwrap_or(DEFAULT_TITLE)
            .to_string()),
        order: Set(payload.order.unwrap_or(0)),
        course_id: Set(course_id),
        content: Set(payload.content),
        ..Default::default()
    };
    let model = new_lesson.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(LessonResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/{id}/lessons",
    tag = "Lessons",
    operation_id = "listLessons",
    summary = "List lessons of a course",
    description = "Returns every lesson of the course ordered by `order`, then ID.",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Lessons", body = Vec<LessonResponse>),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(course_id))]
pub async fn list_lessons(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
) -> Result<Json<Vec<LessonResponse>>, AppError> {
    let _course = find_course(&state.db, course_id).await?;

    let lessons = lesson::Entity::find()
        .filter(lesson::Column::CourseId.eq(course_id))
        .order_by_asc(lesson::Column::Order)
        .order_by_asc(lesson::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(lessons.into_iter().map(LessonResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}/lessons/{lesson_id}",
    tag = "Lessons",
    operation_id = "getLesson",
    summary = "Get a lesson",
    params(
        ("id" = i32, Path, description = "Course ID"),
        ("lesson_id" = i32, Path, description = "Lesson ID"),
    ),
    responses(
        (status = 200, description = "Lesson", body = LessonResponse),
        (status = 404, description = "Lesson not found in this course (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(course_id, lesson_id))]
pub async fn get_lesson(
    State(state): State<AppState>,
    Path((course_id, lesson_id)): Path<(i32, i32)>,
) -> Result<Json<LessonResponse>, AppError> {
    let model = find_lesson_in_course(&state.db, course_id, lesson_id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}/lessons/{lesson_id}",
    tag = "Lessons",
    operation_id = "updateLesson",
    summary = "Update a lesson",
    description = "Partially updates a lesson using PATCH semantics. An empty payload returns the current resource unchanged.",
    params(
        ("id" = i32, Path, description = "Course ID"),
        ("lesson_id" = i32, Path, description = "Lesson ID"),
    ),
    request_body = UpdateLessonRequest,
    responses(
        (status = 200, description = "Lesson updated", body = LessonResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Lesson not found in this course (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(course_id, lesson_id))]
pub async fn update_lesson(
    State(state): State<AppState>,
    Path((course_id, lesson_id)): Path<(i32, i32)>,
    AppJson(payload): AppJson<UpdateLessonRequest>,
) -> Result<Json<LessonResponse>, AppError> {
    validate_update_lesson(&payload)?;

    let existing = find_lesson_in_course(&state.db, course_id, lesson_id).await?;
    if payload == UpdateLessonRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: lesson::ActiveModel = existing.into();
    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(order) = payload.order {
        active.order = Set(order);
    }
    if let Some(content) = payload.content {
        active.content = Set(content);
    }
    let model = active.update(&state.db).await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}/lessons/{lesson_id}",
    tag = "Lessons",
    operation_id = "deleteLesson",
    summary = "Delete a lesson",
    params(
        ("id" = i32, Path, description = "Course ID"),
        ("lesson_id" = i32, Path, description = "Lesson ID"),
    ),
    responses(
        (status = 204, description = "Lesson deleted"),
        (status = 404, description = "Lesson not found in this course (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(course_id, lesson_id))]
pub async fn delete_lesson(
    State(state): State<AppState>,
    Path((course_id, lesson_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let _lesson = find_lesson_in_course(&state.db, course_id, lesson_id).await?;
    lesson::Entity::delete_by_id(lesson_id)
        .exec(&state.db)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
