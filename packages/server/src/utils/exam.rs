use std::collections::{HashMap, HashSet};

use common::{ExamResult, QuestionOutcome, is_get_score};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::entity::{choice, question, submission_choice};
use crate::error::AppError;

/// Choice IDs recorded for a submission.
pub async fn selected_choice_ids<C: ConnectionTrait>(
    db: &C,
    submission_id: i32,
) -> Result<Vec<i32>, AppError> {
    Ok(submission_choice::Entity::find()
        .filter(submission_choice::Column::SubmissionId.eq(submission_id))
        .select_only()
        .column(submission_choice::Column::ChoiceId)
        .into_tuple::<i32>()
        .all(db)
        .await?)
}

/// Grade a set of selected choices against every question of a course.
///
/// Selections are split per question by choice ownership; each question is then
/// scored on its own and contributes its grade when fully scored.
pub async fn grade_course_selection<C: ConnectionTrait>(
    db: &C,
    course_id: i32,
    selected: &[i32],
) -> Result<ExamResult, AppError> {
    let questions = question::Entity::find()
        .filter(question::Column::CourseId.eq(course_id))
        .order_by_asc(question::Column::Id)
        .all(db)
        .await?;
    if questions.is_empty() {
        return Ok(ExamResult::default());
    }

    let choices = choice::Entity::find()
        .filter(choice::Column::QuestionId.is_in(questions.iter().map(|q| q.id)))
        .order_by_asc(choice::Column::Id)
        .all(db)
        .await?;

    let mut by_question: HashMap<i32, Vec<(i32, bool)>> = HashMap::new();
    for c in choices {
        by_question
            .entry(c.question_id)
            .or_default()
            .push((c.id, c.is_correct));
    }

    let selected: HashSet<i32> = selected.iter().copied().collect();
    let outcomes = questions
        .into_iter()
        .map(|q| {
            let choices = by_question.remove(&q.id).unwrap_or_default();
            let selected_choice_ids: Vec<i32> = choices
                .iter()
                .map(|&(id, _)| id)
                .filter(|id| selected.contains(id))
                .collect();
            QuestionOutcome {
                question_id: q.id,
                grade: q.grade,
                is_get_score: is_get_score(choices, &selected_choice_ids),
                selected_choice_ids,
            }
        })
        .collect();

    Ok(ExamResult::from_outcomes(outcomes))
}

/// Return 400 if any choice is missing or belongs to a question outside the course.
pub async fn ensure_choices_in_course<C: ConnectionTrait>(
    db: &C,
    course_id: i32,
    choice_ids: &[i32],
) -> Result<(), AppError> {
    if choice_ids.is_empty() {
        return Ok(());
    }
    let rows: Vec<(i32, i32)> = choice::Entity::find()
        .filter(choice::Column::Id.is_in(choice_ids.iter().copied()))
        .select_only()
        .column(choice::Column::Id)
        .column(choice::Column::QuestionId)
        .into_tuple()
        .all(db)
        .await?;

    let course_questions: HashSet<i32> = question::Entity::find()
        .filter(question::Column::CourseId.eq(course_id))
        .select_only()
        .column(question::Column::Id)
        .into_tuple::<i32>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let valid: HashSet<i32> = rows
        .into_iter()
        .filter(|(_, question_id)| course_questions.contains(question_id))
        .map(|(id, _)| id)
        .collect();

    match choice_ids.iter().find(|id| !valid.contains(id)) {
        Some(id) => Err(AppError::Validation(format!(
            "Choice {id} does not belong to this course"
        ))),
        None => Ok(()),
    }
}
