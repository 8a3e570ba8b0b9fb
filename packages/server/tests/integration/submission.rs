use crate::common::{SeededQuestion, TestApp, routes};
use serde_json::json;

struct Exam {
    enrollment_id: i32,
    add: SeededQuestion,
    primes: SeededQuestion,
}

/// A course with two questions (50 and 30 points) and one enrolled learner.
async fn seed_exam(app: &TestApp) -> (i32, Exam) {
    let user_id = app.create_identity(1, "alice").await;
    let course_id = app.create_course("Math").await;
    let add = app
        .create_question(course_id, "2+2=?", 50, &[("3", false), ("4", true), ("5", false)])
        .await;
    let primes = app
        .create_question(course_id, "Primes?", 30, &[("2", true), ("3", true), ("4", false)])
        .await;
    let enrollment_id = app.enroll(course_id, user_id).await;
    (
        course_id,
        Exam {
            enrollment_id,
            add,
            primes,
        },
    )
}

mod submissions {
    use super::*;

    #[tokio::test]
    async fn records_selected_choices() {
        let app = TestApp::spawn().await;
        let (_, exam) = seed_exam(&app).await;
        let picks = vec![exam.primes.choice_ids[1], exam.add.choice_ids[1]];

        let res = app
            .post(
                &routes::enrollment_submissions(exam.enrollment_id),
                &json!({ "choice_ids": picks }),
            )
            .await;
        assert_eq!(res.status, 201);
        assert_eq!(res.body["enrollment_id"], exam.enrollment_id);
        let id = res.id();

        let mut expected = picks.clone();
        expected.sort_unstable();
        let res = app.get(&routes::submission(id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["choice_ids"], json!(expected));

        use course_server::entity::submission_choice;
        use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
        let links = submission_choice::Entity::find()
            .filter(submission_choice::Column::SubmissionId.eq(id))
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(links, 2);
    }

    #[tokio::test]
    async fn rejects_choices_from_other_courses() {
        let app = TestApp::spawn().await;
        let (_, exam) = seed_exam(&app).await;
        let other_course = app.create_course("Art").await;
        let foreign = app
            .create_question(other_course, "Colour?", 5, &[("red", true)])
            .await;

        let res = app
            .post(
                &routes::enrollment_submissions(exam.enrollment_id),
                &json!({ "choice_ids": [exam.add.choice_ids[1], foreign.choice_ids[0]] }),
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let res = app
            .post(
                &routes::enrollment_submissions(exam.enrollment_id),
                &json!({ "choice_ids": [9999] }),
            )
            .await;
        assert_eq!(res.status, 400);

        let res = app
            .get(&routes::enrollment_submissions(exam.enrollment_id))
            .await;
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn rejects_duplicate_choices() {
        let app = TestApp::spawn().await;
        let (_, exam) = seed_exam(&app).await;
        let four = exam.add.choice_ids[1];

        let res = app
            .post(
                &routes::enrollment_submissions(exam.enrollment_id),
                &json!({ "choice_ids": [four, four] }),
            )
            .await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn unknown_enrollment_is_404() {
        let app = TestApp::spawn().await;
        let res = app
            .post(&routes::enrollment_submissions(5), &json!({ "choice_ids": [] }))
            .await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn list_is_oldest_first() {
        let app = TestApp::spawn().await;
        let (_, exam) = seed_exam(&app).await;
        let first = app.submit(exam.enrollment_id, &[]).await;
        let second = app
            .submit(exam.enrollment_id, &[exam.add.choice_ids[0]])
            .await;

        let res = app
            .get(&routes::enrollment_submissions(exam.enrollment_id))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body[0]["id"], first);
        assert_eq!(res.body[0]["choice_ids"], json!([]));
        assert_eq!(res.body[1]["id"], second);
        assert_eq!(res.body[1]["choice_ids"], json!([exam.add.choice_ids[0]]));
    }

    #[tokio::test]
    async fn deleting_enrollment_removes_submissions() {
        let app = TestApp::spawn().await;
        let (_, exam) = seed_exam(&app).await;
        let id = app
            .submit(exam.enrollment_id, &[exam.add.choice_ids[1]])
            .await;

        assert_eq!(app.delete(&routes::enrollment(exam.enrollment_id)).await.status, 204);
        assert_eq!(app.get(&routes::submission(id)).await.status, 404);

        use course_server::entity::submission_choice;
        use sea_orm::{EntityTrait, PaginatorTrait};
        let links = submission_choice::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(links, 0);
    }

    #[tokio::test]
    async fn deleting_choice_drops_selection() {
        let app = TestApp::spawn().await;
        let (_, exam) = seed_exam(&app).await;
        let [wrong, right] = [exam.add.choice_ids[0], exam.add.choice_ids[1]];
        let id = app.submit(exam.enrollment_id, &[wrong, right]).await;

        let res = app.delete(&routes::choice(exam.add.id, wrong)).await;
        assert_eq!(res.status, 204);

        let res = app.get(&routes::submission(id)).await;
        assert_eq!(res.body["choice_ids"], json!([right]));
    }
}

mod results {
    use super::*;

    #[tokio::test]
    async fn sums_grades_of_scored_questions() {
        let app = TestApp::spawn().await;
        let (course_id, exam) = seed_exam(&app).await;
        // Right on the first question, only one of two primes on the second.
        let id = app
            .submit(
                exam.enrollment_id,
                &[exam.add.choice_ids[1], exam.primes.choice_ids[0]],
            )
            .await;

        let res = app.get(&routes::submission_result(id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["submission_id"], id);
        assert_eq!(res.body["course_id"], course_id);
        assert_eq!(res.body["score"], 50);
        assert_eq!(res.body["possible"], 80);

        let questions = res.body["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0]["question_id"], exam.add.id);
        assert_eq!(questions[0]["is_get_score"], true);
        assert_eq!(questions[1]["question_id"], exam.primes.id);
        assert_eq!(questions[1]["is_get_score"], false);
        assert_eq!(
            questions[1]["selected_choice_ids"],
            json!([exam.primes.choice_ids[0]])
        );
    }

    #[tokio::test]
    async fn full_marks_with_extra_wrong_choices() {
        let app = TestApp::spawn().await;
        let (_, exam) = seed_exam(&app).await;
        let mut picks = exam.primes.choice_ids.clone();
        picks.extend(&exam.add.choice_ids);
        let id = app.submit(exam.enrollment_id, &picks).await;

        let res = app.get(&routes::submission_result(id)).await;
        assert_eq!(res.body["score"], 80);
        assert_eq!(res.body["possible"], 80);
    }

    #[tokio::test]
    async fn empty_submission_scores_zero() {
        let app = TestApp::spawn().await;
        let (_, exam) = seed_exam(&app).await;
        let id = app.submit(exam.enrollment_id, &[]).await;

        let res = app.get(&routes::submission_result(id)).await;
        assert_eq!(res.body["score"], 0);
        assert_eq!(res.body["possible"], 80);
    }

    #[tokio::test]
    async fn result_follows_current_answer_key() {
        let app = TestApp::spawn().await;
        let (_, exam) = seed_exam(&app).await;
        let id = app
            .submit(exam.enrollment_id, &[exam.add.choice_ids[0]])
            .await;
        assert_eq!(app.get(&routes::submission_result(id)).await.body["score"], 0);

        let res = app
            .patch(
                &routes::choice(exam.add.id, exam.add.choice_ids[1]),
                &json!({ "is_correct": false }),
            )
            .await;
        assert_eq!(res.status, 200);
        app.patch(
            &routes::choice(exam.add.id, exam.add.choice_ids[0]),
            &json!({ "is_correct": true }),
        )
        .await;

        assert_eq!(app.get(&routes::submission_result(id)).await.body["score"], 50);
    }

    #[tokio::test]
    async fn unknown_submission_is_404() {
        let app = TestApp::spawn().await;
        assert_eq!(app.get(&routes::submission_result(3)).await.status, 404);
    }
}
