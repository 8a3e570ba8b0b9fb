//! Ownership-ordered deletes.
//!
//! Every owner removes what it owns before removing itself, so the same calls work
//! whether or not the backend enforces foreign keys. Callers run these inside a
//! transaction.

use sea_orm::*;

use crate::entity::{
    choice, course, course_instructor, enrollment, instructor, learner, lesson, question,
    submission, submission_choice, user,
};

fn ids_of<M>(models: Vec<M>, id: impl Fn(&M) -> i32) -> Vec<i32> {
    models.iter().map(id).collect()
}

/// Delete submissions and their choice links.
pub async fn delete_submissions<C: ConnectionTrait>(db: &C, ids: Vec<i32>) -> Result<(), DbErr> {
    if ids.is_empty() {
        return Ok(());
    }
    submission_choice::Entity::delete_many()
        .filter(submission_choice::Column::SubmissionId.is_in(ids.clone()))
        .exec(db)
        .await?;
    submission::Entity::delete_many()
        .filter(submission::Column::Id.is_in(ids))
        .exec(db)
        .await?;
    Ok(())
}

/// Delete enrollments with their submissions. Course counters are left untouched.
pub async fn delete_enrollments<C: ConnectionTrait>(db: &C, ids: Vec<i32>) -> Result<(), DbErr> {
    if ids.is_empty() {
        return Ok(());
    }
    let submissions = submission::Entity::find()
        .filter(submission::Column::EnrollmentId.is_in(ids.clone()))
        .all(db)
        .await?;
    delete_submissions(db, ids_of(submissions, |s| s.id)).await?;
    enrollment::Entity::delete_many()
        .filter(enrollment::Column::Id.is_in(ids))
        .exec(db)
        .await?;
    Ok(())
}

/// Delete choices, unlinking them from any submission that selected them.
pub async fn delete_choices<C: ConnectionTrait>(db: &C, ids: Vec<i32>) -> Result<(), DbErr> {
    if ids.is_empty() {
        return Ok(());
    }
    submission_choice::Entity::delete_many()
        .filter(submission_choice::Column::ChoiceId.is_in(ids.clone()))
        .exec(db)
        .await?;
    choice::Entity::delete_many()
        .filter(choice::Column::Id.is_in(ids))
        .exec(db)
        .await?;
    Ok(())
}

/// Delete questions with their choices.
pub async fn delete_questions<C: ConnectionTrait>(db: &C, ids: Vec<i32>) -> Result<(), DbErr> {
    if ids.is_empty() {
        return Ok(());
    }
    let choices = choice::Entity::find()
        .filter(choice::Column::QuestionId.is_in(ids.clone()))
        .all(db)
        .await?;
    delete_choices(db, ids_of(choices, |c| c.id)).await?;
    question::Entity::delete_many()
        .filter(question::Column::Id.is_in(ids))
        .exec(db)
        .await?;
    Ok(())
}

/// Delete a course with its lessons, questions, enrollments and instructor links.
pub async fn delete_course<C: ConnectionTrait>(db: &C, course_id: i32) -> Result<(), DbErr> {
    lesson::Entity::delete_many()
        .filter(lesson::Column::CourseId.eq(course_id))
        .exec(db)
        .await?;

    let questions = question::Entity::find()
        .filter(question::Column::CourseId.eq(course_id))
        .all(db)
        .await?;
    delete_questions(db, ids_of(questions, |q| q.id)).await?;

    let enrollments = enrollment::Entity::find()
        .filter(enrollment::Column::CourseId.eq(course_id))
        .all(db)
        .await?;
    delete_enrollments(db, ids_of(enrollments, |e| e.id)).await?;

    course_instructor::Entity::delete_many()
        .filter(course_instructor::Column::CourseId.eq(course_id))
        .exec(db)
        .await?;
    course::Entity::delete_by_id(course_id).exec(db).await?;
    Ok(())
}

/// Delete instructors and detach them from their courses.
pub async fn delete_instructors<C: ConnectionTrait>(db: &C, ids: Vec<i32>) -> Result<(), DbErr> {
    if ids.is_empty() {
        return Ok(());
    }
    course_instructor::Entity::delete_many()
        .filter(course_instructor::Column::InstructorId.is_in(ids.clone()))
        .exec(db)
        .await?;
    instructor::Entity::delete_many()
        .filter(instructor::Column::Id.is_in(ids))
        .exec(db)
        .await?;
    Ok(())
}

/// Decrease a course's enrollment counter, stopping at zero.
pub async fn decrement_total_enrollment<C: ConnectionTrait>(
    db: &C,
    course_id: i32,
    by: i32,
) -> Result<(), DbErr> {
    let Some(model) = course::Entity::find_by_id(course_id).one(db).await? else {
        return Ok(());
    };
    let total = Ord::max(model.total_enrollment - by, 0);
    let mut active: course::ActiveModel = model.into();
    active.total_enrollment = Set(total);
    active.update(db).await?;
    Ok(())
}

/// Delete an identity mirror and everything attached to it: instructor and learner
/// records, and enrollments (with their submissions).
pub async fn delete_identity<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<(), DbErr> {
    let instructors = instructor::Entity::find()
        .filter(instructor::Column::UserId.eq(user_id))
        .all(db)
        .await?;
    delete_instructors(db, ids_of(instructors, |i| i.id)).await?;

    learner::Entity::delete_many()
        .filter(learner::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    let enrollments = enrollment::Entity::find()
        .filter(enrollment::Column::UserId.eq(user_id))
        .all(db)
        .await?;
    let mut per_course: std::collections::BTreeMap<i32, i32> = Default::default();
    for e in &enrollments {
        *per_course.entry(e.course_id).or_default() += 1;
    }
    delete_enrollments(db, ids_of(enrollments, |e| e.id)).await?;
    for (course_id, count) in per_course {
        decrement_total_enrollment(db, course_id, count).await?;
    }

    user::Entity::delete_by_id(user_id).exec(db).await?;
    Ok(())
}
