use crate::common::{TestApp, routes};
use serde_json::json;

mod identities {
    use super::*;

    #[tokio::test]
    async fn upsert_creates_then_renames() {
        let app = TestApp::spawn().await;

        let res = app
            .put(&routes::identity(42), &json!({ "username": "alice" }))
            .await;
        assert_eq!(res.status, 201);
        assert_eq!(res.body["id"], 42);
        assert_eq!(res.body["username"], "alice");

        let res = app
            .put(&routes::identity(42), &json!({ "username": "alice2" }))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "alice2");

        let res = app.get(&routes::identity(42)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "alice2");
    }

    #[tokio::test]
    async fn username_must_be_unique() {
        let app = TestApp::spawn().await;
        app.create_identity(1, "alice").await;

        let res = app
            .put(&routes::identity(2), &json!({ "username": "alice" }))
            .await;
        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn rejects_blank_username() {
        let app = TestApp::spawn().await;
        let res = app
            .put(&routes::identity(1), &json!({ "username": "   " }))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let res = app
            .put(&routes::identity(1), &json!({ "name": "alice" }))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_identity_is_404() {
        let app = TestApp::spawn().await;
        let res = app.get(&routes::identity(999)).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn delete_cascades_roster_and_enrollments() {
        let app = TestApp::spawn().await;
        let user_id = app.create_identity(1, "alice").await;
        let other = app.create_identity(2, "bob").await;
        let instructor_id = app.create_instructor(user_id).await;
        let learner = app
            .post(
                routes::LEARNERS,
                &json!({ "user_id": user_id, "social_link": "https://github.com/alice" }),
            )
            .await;
        assert_eq!(learner.status, 201);
        let learner_id = learner.id();

        let course_id = app.create_course("Rust").await;
        let res = app
            .put(
                &routes::course_instructors(course_id),
                &json!({ "instructor_ids": [instructor_id] }),
            )
            .await;
        assert_eq!(res.status, 200);
        let enrollment_id = app.enroll(course_id, user_id).await;
        app.enroll(course_id, other).await;

        let res = app.delete(&routes::identity(user_id)).await;
        assert_eq!(res.status, 204);

        assert_eq!(app.get(&routes::identity(user_id)).await.status, 404);
        assert_eq!(app.get(&routes::instructor(instructor_id)).await.status, 404);
        assert_eq!(app.get(&routes::learner(learner_id)).await.status, 404);
        assert_eq!(app.get(&routes::enrollment(enrollment_id)).await.status, 404);

        let course = app.get(&routes::course(course_id)).await;
        assert_eq!(course.body["total_enrollment"], 1);
        let instructors = app.get(&routes::course_instructors(course_id)).await;
        assert_eq!(instructors.body, json!([]));
    }
}

mod instructors {
    use super::*;

    #[tokio::test]
    async fn create_defaults_to_full_time() {
        let app = TestApp::spawn().await;
        let user_id = app.create_identity(1, "alice").await;

        let res = app
            .post(
                routes::INSTRUCTORS,
                &json!({ "user_id": user_id, "total_learners": 12 }),
            )
            .await;
        assert_eq!(res.status, 201);
        assert_eq!(res.body["full_time"], true);
        assert_eq!(res.body["total_learners"], 12);
        assert_eq!(res.body["display"], "alice");
    }

    #[tokio::test]
    async fn requires_existing_identity() {
        let app = TestApp::spawn().await;
        let res = app
            .post(
                routes::INSTRUCTORS,
                &json!({ "user_id": 7, "total_learners": 0 }),
            )
            .await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn rejects_negative_total_learners() {
        let app = TestApp::spawn().await;
        let user_id = app.create_identity(1, "alice").await;
        let res = app
            .post(
                routes::INSTRUCTORS,
                &json!({ "user_id": user_id, "total_learners": -1 }),
            )
            .await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn list_filters_by_full_time() {
        let app = TestApp::spawn().await;
        let a = app.create_identity(1, "alice").await;
        let b = app.create_identity(2, "bob").await;
        app.create_instructor(a).await;
        let part_time = app
            .post(
                routes::INSTRUCTORS,
                &json!({ "user_id": b, "full_time": false, "total_learners": 3 }),
            )
            .await;
        assert_eq!(part_time.status, 201);

        let res = app
            .get(&format!("{}?full_time=false", routes::INSTRUCTORS))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 1);
        assert_eq!(res.body["data"][0]["username"], "bob");
    }

    #[tokio::test]
    async fn patch_updates_fields() {
        let app = TestApp::spawn().await;
        let user_id = app.create_identity(1, "alice").await;
        let id = app.create_instructor(user_id).await;

        let res = app
            .patch(
                &routes::instructor(id),
                &json!({ "full_time": false, "total_learners": 40 }),
            )
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["full_time"], false);
        assert_eq!(res.body["total_learners"], 40);

        let res = app.patch(&routes::instructor(id), &json!({})).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["total_learners"], 40);
    }
}

mod learners {
    use super::*;

    #[tokio::test]
    async fn create_defaults_to_student() {
        let app = TestApp::spawn().await;
        let user_id = app.create_identity(1, "bob").await;

        let res = app
            .post(
                routes::LEARNERS,
                &json!({ "user_id": user_id, "social_link": "https://github.com/bob" }),
            )
            .await;
        assert_eq!(res.status, 201);
        assert_eq!(res.body["occupation"], "student");
        assert_eq!(res.body["display"], "bob,student");
    }

    #[tokio::test]
    async fn stores_occupation_values() {
        let app = TestApp::spawn().await;
        let user_id = app.create_identity(1, "bob").await;

        let res = app
            .post(
                routes::LEARNERS,
                &json!({
                    "user_id": user_id,
                    "occupation": "dba",
                    "social_link": "https://example.org/bob",
                }),
            )
            .await;
        assert_eq!(res.status, 201);
        assert_eq!(res.body["display"], "bob,dba");

        let res = app.get(&format!("{}?occupation=dba", routes::LEARNERS)).await;
        assert_eq!(res.body["pagination"]["total"], 1);
        let res = app
            .get(&format!("{}?occupation=developer", routes::LEARNERS))
            .await;
        assert_eq!(res.body["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn rejects_unknown_occupation() {
        let app = TestApp::spawn().await;
        let user_id = app.create_identity(1, "bob").await;

        let res = app
            .post(
                routes::LEARNERS,
                &json!({
                    "user_id": user_id,
                    "occupation": "astronaut",
                    "social_link": "https://example.org/bob",
                }),
            )
            .await;
        assert_eq!(res.status, 400);

        let res = app
            .get(&format!("{}?occupation=astronaut", routes::LEARNERS))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_invalid_social_link() {
        let app = TestApp::spawn().await;
        let user_id = app.create_identity(1, "bob").await;

        let res = app
            .post(
                routes::LEARNERS,
                &json!({ "user_id": user_id, "social_link": "not a url" }),
            )
            .await;
        assert_eq!(res.status, 400);

        let long = format!("https://example.org/{}", "a".repeat(200));
        let res = app
            .post(
                routes::LEARNERS,
                &json!({ "user_id": user_id, "social_link": long }),
            )
            .await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn delete_keeps_identity() {
        let app = TestApp::spawn().await;
        let user_id = app.create_identity(1, "bob").await;
        let res = app
            .post(
                routes::LEARNERS,
                &json!({ "user_id": user_id, "social_link": "https://github.com/bob" }),
            )
            .await;
        let id = res.id();

        assert_eq!(app.delete(&routes::learner(id)).await.status, 204);
        assert_eq!(app.get(&routes::learner(id)).await.status, 404);
        assert_eq!(app.get(&routes::identity(user_id)).await.status, 200);
    }
}
