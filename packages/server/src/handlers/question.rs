use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{choice, question, question::DEFAULT_GRADE};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::assessment::*;
use crate::state::AppState;
use crate::utils::cascade;
use crate::utils::lookup::{find_choice_in_question, find_course, find_question};

#[utoipa::path(
    post,
    path = "/{id}/questions",
    tag = "Questions",
    operation_id = "createQuestion",
    summary = "Add a question to a course",
    description = "Creates a question together with its choices. `grade` defaults to 50 and each choice's `is_correct` to `false`.",
    params(("id" = i32, Path, description = "Course ID")),
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Question created", body = QuestionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(course_id, choices = payload.choices.len()))]
pub async fn create_question(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    AppJson(payload): AppJson<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_question(&payload)?;

    let txn = state.db.begin().await?;
    let _course = find_course(&txn, course_id).await?;

    let new_question = question::ActiveModel {
        course_id: Set(course_id),
        content: Set(payload.content.trim().to_string()),
        grade: Set(payload.grade.unwrap_or(DEFAULT_GRADE)),
        ..Default::default()
    };
    let model = new_question.insert(&txn).await?;

    let mut choices = Vec::with_capacity(payload.choices.len());
    for req in payload.choices {
        choices.push(insert_choice(&txn, model.id, req).await?);
    }
    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(QuestionResponse::new(model, choices)),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}/questions",
    tag = "Questions",
    operation_id = "listCourseQuestions",
    summary = "List questions of a course",
    description = "Returns every question of the course with its choices, ordered by ID.",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Questions", body = Vec<QuestionResponse>),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(course_id))]
pub async fn list_course_questions(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
) -> Result<Json<Vec<QuestionResponse>>, AppError> {
    let _course = find_course(&state.db, course_id).await?;

    let questions = question::Entity::find()
        .filter(question::Column::CourseId.eq(course_id))
        .order_by_asc(question::Column::Id)
        .all(&state.db)
        .await?;
    if questions.is_empty() {
        return Ok(Json(vec![]));
    }

    let choices = choice::Entity::find()
        .filter(choice::Column::QuestionId.is_in(questions.iter().map(|q| q.id)))
        .order_by_asc(choice::Column::Id)
        .all(&state.db)
        .await?;
    let mut by_question: HashMap<i32, Vec<choice::Model>> = HashMap::new();
    for c in choices {
        by_question.entry(c.question_id).or_default().push(c);
    }

    Ok(Json(
        questions
            .into_iter()
            .map(|q| {
                let choices = by_question.remove(&q.id).unwrap_or_default();
                QuestionResponse::new(q, choices)
            })
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Questions",
    operation_id = "getQuestion",
    summary = "Get a question with its choices",
    params(("id" = i32, Path, description = "Question ID")),
    responses(
        (status = 200, description = "Question", body = QuestionResponse),
        (status = 404, description = "Question not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<QuestionResponse>, AppError> {
    let model = find_question(&state.db, id).await?;
    let choices = question_choices(&state.db, id).await?;
    Ok(Json(QuestionResponse::new(model, choices)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Questions",
    operation_id = "updateQuestion",
    summary = "Update a question",
    description = "Partially updates a question using PATCH semantics. An empty payload returns the current resource unchanged.",
    params(("id" = i32, Path, description = "Question ID")),
    request_body = UpdateQuestionRequest,
    responses(
        (status = 200, description = "Question updated", body = QuestionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Question not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateQuestionRequest>,
) -> Result<Json<QuestionResponse>, AppError> {
    validate_update_question(&payload)?;

    let existing = find_question(&state.db, id).await?;
    let model = if payload == UpdateQuestionRequest::default() {
        existing
    } else {
        let mut active: question::ActiveModel = existing.into();
        if let Some(ref content) = payload.content {
            active.content = Set(content.trim().to_string());
        }
        if let Some(grade) = payload.grade {
            active.grade = Set(grade);
        }
        active.update(&state.db).await?
    };

    let choices = question_choices(&state.db, id).await?;
    Ok(Json(QuestionResponse::new(model, choices)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Questions",
    operation_id = "deleteQuestion",
    summary = "Delete a question",
    description = "Deletes the question and its choices. Submissions that selected those choices lose the selections.",
    params(("id" = i32, Path, description = "Question ID")),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 404, description = "Question not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let _question = find_question(&txn, id).await?;
    cascade::delete_questions(&txn, vec![id]).await?;
    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/choices",
    tag = "Choices",
    operation_id = "createChoice",
    summary = "Add a choice to a question",
    params(("id" = i32, Path, description = "Question ID")),
    request_body = CreateChoiceRequest,
    responses(
        (status = 201, description = "Choice created", body = ChoiceResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Question not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(question_id))]
pub async fn create_choice(
    State(state): State<AppState>,
    Path(question_id): Path<i32>,
    AppJson(payload): AppJson<CreateChoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_choice(&payload)?;
    let _question = find_question(&state.db, question_id).await?;
    let model = insert_choice(&state.db, question_id, payload).await?;
    Ok((StatusCode::CREATED, Json(ChoiceResponse::from(model))))
}

#[utoipa::path(
    patch,
    path = "/{id}/choices/{choice_id}",
    tag = "Choices",
    operation_id = "updateChoice",
    summary = "Update a choice",
    description = "Partially updates a choice using PATCH semantics. An empty payload returns the current resource unchanged.",
    params(
        ("id" = i32, Path, description = "Question ID"),
        ("choice_id" = i32, Path, description = "Choice ID"),
    ),
    request_body = UpdateChoiceRequest,
    responses(
        (status = 200, description = "Choice updated", body = ChoiceResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Choice not found in this question (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(question_id, choice_id))]
pub async fn update_choice(
    State(state): State<AppState>,
    Path((question_id, choice_id)): Path<(i32, i32)>,
    AppJson(payload): AppJson<UpdateChoiceRequest>,
) -> Result<Json<ChoiceResponse>, AppError> {
    validate_update_choice(&payload)?;

    let existing = find_choice_in_question(&state.db, question_id, choice_id).await?;
    if payload == UpdateChoiceRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: choice::ActiveModel = existing.into();
    if let Some(ref content) = payload.content {
        active.content = Set(content.trim().to_string());
    }
    if let Some(is_correct) = payload.is_correct {
        active.is_correct = Set(is_correct);
    }
    let model = active.update(&state.db).await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}/choices/{choice_id}",
    tag = "Choices",
    operation_id = "deleteChoice",
    summary = "Delete a choice",
    params(
        ("id" = i32, Path, description = "Question ID"),
        ("choice_id" = i32, Path, description = "Choice ID"),
    ),
    responses(
        (status = 204, description = "Choice deleted"),
        (status = 404, description = "Choice not found in this question (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(question_id, choice_id))]
pub async fn delete_choice(
    State(state): State<AppState>,
    Path((question_id, choice_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let _choice = find_choice_in_question(&txn, question_id, choice_id).await?;
    cascade::delete_choices(&txn, vec![choice_id]).await?;
    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/score",
    tag = "Questions",
    operation_id = "scoreQuestion",
    summary = "Check whether a selection earns full credit",
    description = "Returns `is_get_score = true` when every correct choice of the question is among `choice_ids`. Incorrect extra selections are not penalized, and a question without correct choices is scored by any selection. IDs of choices outside the question are ignored.",
    params(("id" = i32, Path, description = "Question ID")),
    request_body = ScoreRequest,
    responses(
        (status = 200, description = "Scoring outcome", body = ScoreResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Question not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(question_id, selected = payload.choice_ids.len()))]
pub async fn score_question(
    State(state): State<AppState>,
    Path(question_id): Path<i32>,
    AppJson(payload): AppJson<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    validate_score(&payload)?;
    let model = find_question(&state.db, question_id).await?;
    let is_get_score = model.is_get_score(&state.db, &payload.choice_ids).await?;
    Ok(Json(ScoreResponse {
        question_id,
        is_get_score,
    }))
}

async fn insert_choice<C: ConnectionTrait>(
    db: &C,
    question_id: i32,
    req: CreateChoiceRequest,
) -> Result<choice::Model, AppError> {
    let new_choice = choice::ActiveModel {
        question_id: Set(question_id),
        content: Set(req.content.trim().to_string()),
        is_correct: Set(req.is_correct.unwrap_or(false)),
        ..Default::default()
    };
    Ok(new_choice.insert(db).await?)
}

async fn question_choices<C: ConnectionTrait>(
    db: &C,
    question_id: i32,
) -> Result<Vec<choice::Model>, AppError> {
    Ok(choice::Entity::find()
        .filter(choice::Column::QuestionId.eq(question_id))
        .order_by_asc(choice::Column::Id)
        .all(db)
        .await?)
}
