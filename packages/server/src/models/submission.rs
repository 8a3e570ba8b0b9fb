use chrono::{DateTime, Utc};
use common::{ExamResult, QuestionOutcome};
use serde::{Deserialize, Serialize};

use super::shared::validate_id_list;
use crate::entity::submission;
use crate::error::AppError;

/// Upper bound on choices recorded in one submission.
pub const MAX_SUBMISSION_CHOICES: usize = 1000;

/// Request body for recording an exam attempt.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateSubmissionRequest {
    /// Selected choices, across any questions of the enrolled course.
    pub choice_ids: Vec<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub enrollment_id: i32,
    pub choice_ids: Vec<i32>,
    pub created_at: DateTime<Utc>,
}

impl SubmissionResponse {
    pub fn new(m: submission::Model, mut choice_ids: Vec<i32>) -> Self {
        choice_ids.sort_unstable();
        Self {
            id: m.id,
            enrollment_id: m.enrollment_id,
            choice_ids,
            created_at: m.created_at,
        }
    }
}

/// Graded exam for one submission.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ExamResultResponse {
    #[schema(example = 1)]
    pub submission_id: i32,
    #[schema(example = 1)]
    pub course_id: i32,
    /// Sum of grades of fully scored questions.
    #[schema(example = 50)]
    pub score: i64,
    /// Sum of grades of all questions in the course.
    #[schema(example = 100)]
    pub possible: i64,
    pub questions: Vec<QuestionOutcome>,
}

impl ExamResultResponse {
    pub fn new(submission_id: i32, course_id: i32, result: ExamResult) -> Self {
        Self {
            submission_id,
            course_id,
            score: result.score,
            possible: result.possible,
            questions: result.questions,
        }
    }
}

pub fn validate_create_submission(req: &CreateSubmissionRequest) -> Result<(), AppError> {
    validate_id_list(&req.choice_ids, "choice", MAX_SUBMISSION_CHOICES)
}
