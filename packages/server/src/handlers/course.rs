use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::admin::COURSE_SEARCH_FIELDS;
use crate::entity::{course, course::DEFAULT_NAME, course_instructor, enrollment, instructor};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::course::*;
use crate::models::roster::InstructorResponse;
use crate::models::shared::{Pagination, escape_like};
use crate::state::AppState;
use crate::utils::cascade;
use crate::utils::lookup::{ensure_instructors_exist, find_course, find_instructor, usernames};

#[utoipa::path(
    post,
    path = "/",
    tag = "Courses",
    operation_id = "createCourse",
    summary = "Create a new course",
    description = "Creates a course and attaches the given instructors. `name` defaults to `online course`. `image` is an object key in the external blob store.",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Instructor not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = ?payload.name))]
pub async fn create_course(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_course(&payload)?;

    let txn = state.db.begin().await?;
    ensure_instructors_exist(&txn, &payload.instructor_ids).await?;

    let now = chrono::Utc::now();
    let new_course = course::ActiveModel {
        name: Set(payload
            .name
            .as_deref()
            .map(str::trim)
            .unwrap_or(DEFAULT_NAME)
            .to_string()),
        image: Set(payload.image.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        pub_date: Set(payload.pub_date),
        total_enrollment: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let model = new_course.insert(&txn).await?;

    attach_instructors(&txn, model.id, &payload.instructor_ids).await?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(CourseResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Courses",
    operation_id = "listCourses",
    summary = "List courses with pagination, search and date filters",
    description = "Returns a paginated list of courses. `search` matches name and description case-insensitively. `pub_date` filters on an exact publication date; `published_after` / `published_before` bound it inclusively. Supports sorting by `created_at`, `name`, `pub_date`, or `total_enrollment`.",
    params(CourseListQuery),
    responses(
        (status = 200, description = "List of courses", body = CourseListResponse),
        (status = 400, description = "Invalid sort field (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseListQuery>,
) -> Result<Json<CourseListResponse>, AppError> {
    let (page, per_page) = Pagination::bounds(query.page, query.per_page);

    let mut select = course::Entity::find();

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            let pattern = format!("%{}%", term.to_lowercase());
            let mut any = Condition::any();
            for column in COURSE_SEARCH_FIELDS {
                any = any.add(
                    Expr::expr(Func::lower(Expr::col(column)))
                        .like(LikeExpr::new(pattern.clone()).escape('\\')),
                );
            }
            select = select.filter(any);
        }
    }

    if let Some(pub_date) = query.pub_date {
        select = select.filter(course::Column::PubDate.eq(pub_date));
    }
    if let Some(after) = query.published_after {
        select = select.filter(course::Column::PubDate.gte(after));
    }
    if let Some(before) = query.published_before {
        select = select.filter(course::Column::PubDate.lte(before));
    }

    let sort_order = if query.sort_order.as_deref() == Some("asc") {
        Order::Asc
    } else {
        Order::Desc
    };
    let sort_column = match query.sort_by.as_deref().unwrap_or("created_at") {
        "created_at" => course::Column::CreatedAt,
        "name" => course::Column::Name,
        "pub_date" => course::Column::PubDate,
        "total_enrollment" => course::Column::TotalEnrollment,
        _ => {
            return Err(AppError::Validation(
                "sort_by must be one of: created_at, name, pub_date, total_enrollment".into(),
            ));
        }
    };

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let data = select
        .order_by(sort_column, sort_order)
        .order_by_asc(course::Column::Id)
        .select_only()
        .column(course::Column::Id)
        .column(course::Column::Name)
        .column(course::Column::PubDate)
        .column(course::Column::TotalEnrollment)
        .column(course::Column::CreatedAt)
        .offset(Some(Pagination::offset(page, per_page)))
        .limit(Some(per_page))
        .into_model::<CourseListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(CourseListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Courses",
    operation_id = "getCourse",
    summary = "Get a course by ID",
    description = "Returns the full details of a course. When `user_id` is given, `is_enrolled` reports whether that identity holds an enrollment in the course.",
    params(("id" = i32, Path, description = "Course ID"), CourseDetailQuery),
    responses(
        (status = 200, description = "Course details", body = CourseResponse),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(id))]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<CourseDetailQuery>,
) -> Result<Json<CourseResponse>, AppError> {
    let model = find_course(&state.db, id).await?;

    let is_enrolled = match query.user_id {
        Some(user_id) => {
            enrollment::Entity::find()
                .filter(enrollment::Column::CourseId.eq(id))
                .filter(enrollment::Column::UserId.eq(user_id))
                .count(&state.db)
                .await?
                > 0
        }
        None => false,
    };

    let mut response = CourseResponse::from(model);
    response.is_enrolled = is_enrolled;
    Ok(Json(response))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Courses",
    operation_id = "updateCourse",
    summary = "Update an existing course",
    description = "Partially updates a course using PATCH semantics. An empty payload returns the current resource unchanged. `pub_date: null` clears the publication date.",
    params(("id" = i32, Path, description = "Course ID")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, AppError> {
    validate_update_course(&payload)?;

    if payload == UpdateCourseRequest::default() {
        let existing = find_course(&state.db, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_course(&txn, id).await?;
    let mut active: course::ActiveModel = existing.into();

    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(ref image) = payload.image {
        active.image = Set(image.trim().to_string());
    }
    if let Some(ref description) = payload.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(pub_date) = payload.pub_date {
        active.pub_date = Set(pub_date);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Courses",
    operation_id = "deleteCourse",
    summary = "Delete a course by ID",
    description = "Permanently deletes a course and cascade-deletes its lessons, questions (with choices), enrollments (with submissions) and instructor assignments.",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let _course = find_course(&txn, id).await?;
    cascade::delete_course(&txn, id).await?;
    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{id}/instructors",
    tag = "Course Instructors",
    operation_id = "listCourseInstructors",
    summary = "List instructors of a course",
    description = "Returns every instructor assigned to the course, ordered by instructor ID.",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course instructors", body = Vec<InstructorResponse>),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(course_id))]
pub async fn list_course_instructors(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
) -> Result<Json<Vec<InstructorResponse>>, AppError> {
    let _course = find_course(&state.db, course_id).await?;
    Ok(Json(course_instructors(&state.db, course_id).await?))
}

#[utoipa::path(
    put,
    path = "/{id}/instructors",
    tag = "Course Instructors",
    operation_id = "setCourseInstructors",
    summary = "Replace the instructors of a course",
    description = "Replaces the course's instructor set with exactly the given IDs. An empty list detaches every instructor.",
    params(("id" = i32, Path, description = "Course ID")),
    request_body = SetCourseInstructorsRequest,
    responses(
        (status = 200, description = "New instructor set", body = Vec<InstructorResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Course or instructor not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(course_id, count = payload.instructor_ids.len()))]
pub async fn set_course_instructors(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    AppJson(payload): AppJson<SetCourseInstructorsRequest>,
) -> Result<Json<Vec<InstructorResponse>>, AppError> {
    validate_set_course_instructors(&payload)?;

    let txn = state.db.begin().await?;
    let _course = find_course(&txn, course_id).await?;
    ensure_instructors_exist(&txn, &payload.instructor_ids).await?;

    course_instructor::Entity::delete_many()
        .filter(course_instructor::Column::CourseId.eq(course_id))
        .exec(&txn)
        .await?;
    attach_instructors(&txn, course_id, &payload.instructor_ids).await?;

    let data = course_instructors(&txn, course_id).await?;
    txn.commit().await?;

    Ok(Json(data))
}

#[utoipa::path(
    post,
    path = "/{id}/instructors",
    tag = "Course Instructors",
    operation_id = "addCourseInstructor",
    summary = "Assign an instructor to a course",
    params(("id" = i32, Path, description = "Course ID")),
    request_body = AddCourseInstructorRequest,
    responses(
        (status = 201, description = "Instructor assigned", body = InstructorResponse),
        (status = 404, description = "Course or instructor not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Instructor already assigned (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(course_id, instructor_id = payload.instructor_id))]
pub async fn add_course_instructor(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    AppJson(payload): AppJson<AddCourseInstructorRequest>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let _course = find_course(&txn, course_id).await?;
    let instructor_model = find_instructor(&txn, payload.instructor_id).await?;

    if course_instructor::Entity::find_by_id((course_id, payload.instructor_id))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Instructor is already assigned to this course".into(),
        ));
    }

    attach_instructors(&txn, course_id, &[payload.instructor_id]).await?;
    let username = usernames(&txn, [instructor_model.user_id])
        .await?
        .remove(&instructor_model.user_id)
        .unwrap_or_default();
    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(InstructorResponse::new(instructor_model, username)),
    ))
}

#[utoipa::path(
    delete,
    path = "/{id}/instructors/{instructor_id}",
    tag = "Course Instructors",
    operation_id = "removeCourseInstructor",
    summary = "Detach an instructor from a course",
    params(
        ("id" = i32, Path, description = "Course ID"),
        ("instructor_id" = i32, Path, description = "Instructor ID"),
    ),
    responses(
        (status = 204, description = "Instructor detached"),
        (status = 404, description = "Instructor not assigned to this course (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(course_id, instructor_id))]
pub async fn remove_course_instructor(
    State(state): State<AppState>,
    Path((course_id, instructor_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let result = course_instructor::Entity::delete_by_id((course_id, instructor_id))
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(
            "Instructor is not assigned to this course".into(),
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn attach_instructors<C: ConnectionTrait>(
    db: &C,
    course_id: i32,
    instructor_ids: &[i32],
) -> Result<(), AppError> {
    for &instructor_id in instructor_ids {
        let link = course_instructor::ActiveModel {
            course_id: Set(course_id),
            instructor_id: Set(instructor_id),
            ..Default::default()
        };
        course_instructor::Entity::insert(link)
            .exec_without_returning(db)
            .await?;
    }
    Ok(())
}

async fn course_instructors<C: ConnectionTrait>(
    db: &C,
    course_id: i32,
) -> Result<Vec<InstructorResponse>, AppError> {
    let ids: Vec<i32> = course_instructor::Entity::find()
        .filter(course_instructor::Column::CourseId.eq(course_id))
        .select_only()
        .column(course_instructor::Column::InstructorId)
        .into_tuple()
        .all(db)
        .await?;
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let models = instructor::Entity::find()
        .filter(instructor::Column::Id.is_in(ids))
        .order_by_asc(instructor::Column::Id)
        .all(db)
        .await?;
    let names = usernames(db, models.iter().map(|m| m.user_id)).await?;

    Ok(models
        .into_iter()
        .map(|m| {
            let username = names.get(&m.user_id).cloned().unwrap_or_default();
            InstructorResponse::new(m, username)
        })
        .collect())
}
