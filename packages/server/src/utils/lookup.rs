use std::collections::{HashMap, HashSet};

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};

use crate::entity::{choice, course, enrollment, instructor, learner, lesson, question, submission, user};
use crate::error::AppError;

/// Look up an identity mirror by ID, returning 404 if not found.
pub async fn find_user<C: ConnectionTrait>(db: &C, id: i32) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Identity not found".into()))
}

pub async fn find_instructor<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<instructor::Model, AppError> {
    instructor::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Instructor not found".into()))
}

pub async fn find_learner<C: ConnectionTrait>(db: &C, id: i32) -> Result<learner::Model, AppError> {
    learner::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Learner not found".into()))
}

pub async fn find_course<C: ConnectionTrait>(db: &C, id: i32) -> Result<course::Model, AppError> {
    course::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".into()))
}

/// Look up a lesson, returning 404 if it does not belong to the course.
pub async fn find_lesson_in_course<C: ConnectionTrait>(
    db: &C,
    course_id: i32,
    lesson_id: i32,
) -> Result<lesson::Model, AppError> {
    lesson::Entity::find_by_id(lesson_id)
        .filter(lesson::Column::CourseId.eq(course_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson not found".into()))
}

pub async fn find_question<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<question::Model, AppError> {
    question::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Question not found".into()))
}

/// Look up a choice, returning 404 if it does not belong to the question.
pub async fn find_choice_in_question<C: ConnectionTrait>(
    db: &C,
    question_id: i32,
    choice_id: i32,
) -> Result<choice::Model, AppError> {
    choice::Entity::find_by_id(choice_id)
        .filter(choice::Column::QuestionId.eq(question_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Choice not found".into()))
}

pub async fn find_enrollment<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<enrollment::Model, AppError> {
    enrollment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Enrollment not found".into()))
}

pub async fn find_submission<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<submission::Model, AppError> {
    submission::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Submission not found".into()))
}

/// Batch-load usernames for display strings.
pub async fn usernames<C: ConnectionTrait>(
    db: &C,
    user_ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, String>, AppError> {
    let ids: HashSet<i32> = user_ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(i32, String)> = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .select_only()
        .column(user::Column::Id)
        .column(user::Column::Username)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows.into_iter().collect())
}

/// Return 404 naming the first instructor ID that does not exist.
pub async fn ensure_instructors_exist<C: ConnectionTrait>(
    db: &C,
    ids: &[i32],
) -> Result<(), AppError> {
    if ids.is_empty() {
        return Ok(());
    }
    let found: HashSet<i32> = instructor::Entity::find()
        .filter(instructor::Column::Id.is_in(ids.iter().copied()))
        .select_only()
        .column(instructor::Column::Id)
        .into_tuple::<i32>()
        .all(db)
        .await?
        .into_iter()
        .collect();
    match ids.iter().find(|id| !found.contains(id)) {
        Some(missing) => Err(AppError::NotFound(format!(
            "Instructor {missing} not found"
        ))),
        None => Ok(()),
    }
}
