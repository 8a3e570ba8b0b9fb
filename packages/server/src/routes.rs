use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::{admin, course, enrollment, identity, lesson, question, roster, submission};
use crate::state::AppState;

/// Every resource router; mounted at `/api/v1`.
pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/identities", identity_routes())
        .nest("/instructors", instructor_routes())
        .nest("/learners", learner_routes())
        .nest("/courses", course_routes())
        .nest("/questions", question_routes())
        .nest("/enrollments", enrollment_routes())
        .nest("/submissions", submission_routes())
        .nest("/admin", admin_routes())
}

fn identity_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        identity::get_identity,
        identity::upsert_identity,
        identity::delete_identity
    ))
}

fn instructor_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(roster::list_instructors, roster::create_instructor))
        .routes(routes!(
            roster::get_instructor,
            roster::update_instructor,
            roster::delete_instructor
        ))
}

fn learner_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(roster::list_learners, roster::create_learner))
        .routes(routes!(
            roster::get_learner,
            roster::update_learner,
            roster::delete_learner
        ))
}

fn course_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(course::list_courses, course::create_course))
        .routes(routes!(
            course::get_course,
            course::update_course,
            course::delete_course
        ))
        .routes(routes!(
            course::list_course_instructors,
            course::set_course_instructors,
            course::add_course_instructor
        ))
        .routes(routes!(course::remove_course_instructor))
        .routes(routes!(lesson::list_lessons, lesson::create_lesson))
        .routes(routes!(
            lesson::get_lesson,
            lesson::update_lesson,
            lesson::delete_lesson
        ))
        .routes(routes!(
            question::list_course_questions,
            question::create_question
        ))
        .routes(routes!(
            enrollment::list_course_enrollments,
            enrollment::create_enrollment
        ))
}

fn question_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            question::get_question,
            question::update_question,
            question::delete_question
        ))
        .routes(routes!(question::create_choice))
        .routes(routes!(question::update_choice, question::delete_choice))
        .routes(routes!(question::score_question))
}

fn enrollment_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            enrollment::get_enrollment,
            enrollment::update_enrollment,
            enrollment::delete_enrollment
        ))
        .routes(routes!(
            submission::list_enrollment_submissions,
            submission::create_submission
        ))
}

fn submission_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            submission::get_submission,
            submission::delete_submission
        ))
        .routes(routes!(submission::get_submission_result))
}

fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(admin::get_site))
}
