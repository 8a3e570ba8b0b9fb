use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{submission, submission_choice};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::submission::*;
use crate::state::AppState;
use crate::utils::cascade;
use crate::utils::exam::{ensure_choices_in_course, grade_course_selection, selected_choice_ids};
use crate::utils::lookup::{find_enrollment, find_submission};

#[utoipa::path(
    post,
    path = "/{id}/submissions",
    tag = "Submissions",
    operation_id = "createSubmission",
    summary = "Record an exam attempt",
    description = "Stores the choices an enrollment selected. Every choice must belong to a question of the enrollment's course. The selection may be empty.",
    params(("id" = i32, Path, description = "Enrollment ID")),
    request_body = CreateSubmissionRequest,
    responses(
        (status = 201, description = "Submission recorded", body = SubmissionResponse),
        (status = 400, description = "Duplicate or foreign choice (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Enrollment not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(enrollment_id, choices = payload.choice_ids.len()))]
pub async fn create_submission(
    State(state): State<AppState>,
    Path(enrollment_id): Path<i32>,
    AppJson(payload): AppJson<CreateSubmissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_submission(&payload)?;

    let txn = state.db.begin().await?;
    let enrollment = find_enrollment(&txn, enrollment_id).await?;
    ensure_choices_in_course(&txn, enrollment.course_id, &payload.choice_ids).await?;

    let new_submission = submission::ActiveModel {
        enrollment_id: Set(enrollment_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_submission.insert(&txn).await?;

    for &choice_id in &payload.choice_ids {
        let link = submission_choice::ActiveModel {
            submission_id: Set(model.id),
            choice_id: Set(choice_id),
            ..Default::default()
        };
        submission_choice::Entity::insert(link)
            .exec_without_returning(&txn)
            .await?;
    }
    txn.commit().await?;

    info!(submission_id = model.id, "Submission recorded");
    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse::new(model, payload.choice_ids)),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}/submissions",
    tag = "Submissions",
    operation_id = "listEnrollmentSubmissions",
    summary = "List submissions of an enrollment",
    description = "Returns every submission of the enrollment, oldest first, with its selected choice IDs.",
    params(("id" = i32, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Submissions", body = Vec<SubmissionResponse>),
        (status = 404, description = "Enrollment not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(enrollment_id))]
pub async fn list_enrollment_submissions(
    State(state): State<AppState>,
    Path(enrollment_id): Path<i32>,
) -> Result<Json<Vec<SubmissionResponse>>, AppError> {
    let _enrollment = find_enrollment(&state.db, enrollment_id).await?;

    let submissions = submission::Entity::find()
        .filter(submission::Column::EnrollmentId.eq(enrollment_id))
        .order_by_asc(submission::Column::Id)
        .all(&state.db)
        .await?;
    if submissions.is_empty() {
        return Ok(Json(vec![]));
    }

    let links: Vec<(i32, i32)> = submission_choice::Entity::find()
        .filter(submission_choice::Column::SubmissionId.is_in(submissions.iter().map(|s| s.id)))
        .select_only()
        .column(submission_choice::Column::SubmissionId)
        .column(submission_choice::Column::ChoiceId)
        .into_tuple()
        .all(&state.db)
        .await?;
    let mut by_submission: HashMap<i32, Vec<i32>> = HashMap::new();
    for (submission_id, choice_id) in links {
        by_submission.entry(submission_id).or_default().push(choice_id);
    }

    Ok(Json(
        submissions
            .into_iter()
            .map(|s| {
                let choice_ids = by_submission.remove(&s.id).unwrap_or_default();
                SubmissionResponse::new(s, choice_ids)
            })
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Submissions",
    operation_id = "getSubmission",
    summary = "Get a submission by ID",
    params(("id" = i32, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Submission", body = SubmissionResponse),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let model = find_submission(&state.db, id).await?;
    let choice_ids = selected_choice_ids(&state.db, id).await?;
    Ok(Json(SubmissionResponse::new(model, choice_ids)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Submissions",
    operation_id = "deleteSubmission",
    summary = "Delete a submission",
    params(("id" = i32, Path, description = "Submission ID")),
    responses(
        (status = 204, description = "Submission deleted"),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_submission(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let _submission = find_submission(&txn, id).await?;
    cascade::delete_submissions(&txn, vec![id]).await?;
    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{id}/result",
    tag = "Submissions",
    operation_id = "getSubmissionResult",
    summary = "Grade a submission",
    description = "Grades the submission against every question of the enrollment's course. A question contributes its grade to `score` when all of its correct choices were selected; `possible` is the sum of all grades.",
    params(("id" = i32, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Exam result", body = ExamResultResponse),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_submission_result(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ExamResultResponse>, AppError> {
    let model = find_submission(&state.db, id).await?;
    let enrollment = find_enrollment(&state.db, model.enrollment_id).await?;
    let selected = selected_choice_ids(&state.db, id).await?;

    let result = grade_course_selection(&state.db, enrollment.course_id, &selected).await?;
    Ok(Json(ExamResultResponse::new(
        id,
        enrollment.course_id,
        result,
    )))
}
