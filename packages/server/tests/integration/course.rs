use crate::common::{TestApp, routes};
use serde_json::{Value, json};

fn course_body(name: &str, description: &str, pub_date: Option<&str>) -> Value {
    json!({
        "name": name,
        "image": "course_images/cover.png",
        "description": description,
        "pub_date": pub_date,
    })
}

async fn create_with(app: &TestApp, body: Value) -> i32 {
    let res = app.post(routes::COURSES, &body).await;
    assert_eq!(res.status, 201, "create course failed: {}", res.text);
    res.id()
}

fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .expect("expected an array")
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect()
}

mod course_crud {
    use super::*;

    #[tokio::test]
    async fn create_applies_defaults() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::COURSES,
                &json!({ "image": "course_images/a.png", "description": "Basics" }),
            )
            .await;
        assert_eq!(res.status, 201);
        assert_eq!(res.body["name"], "online course");
        assert_eq!(res.body["total_enrollment"], 0);
        assert_eq!(res.body["pub_date"], Value::Null);
        assert_eq!(res.body["is_enrolled"], false);
        assert_eq!(res.body["display"], "Name: online course,Description: Basics");
    }

    #[tokio::test]
    async fn rejects_long_name() {
        let app = TestApp::spawn().await;
        let res = app
            .post(routes::COURSES, &course_body(&"x".repeat(31), "d", None))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn patch_clears_pub_date_with_null() {
        let app = TestApp::spawn().await;
        let id = create_with(&app, course_body("Rust", "Ownership", Some("2024-05-01"))).await;

        let res = app.get(&routes::course(id)).await;
        assert_eq!(res.body["pub_date"], "2024-05-01");

        let res = app
            .patch(&routes::course(id), &json!({ "name": "Rust 2" }))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "Rust 2");
        assert_eq!(res.body["pub_date"], "2024-05-01");

        let res = app
            .patch(&routes::course(id), &json!({ "pub_date": null }))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["pub_date"], Value::Null);
    }

    #[tokio::test]
    async fn is_enrolled_reflects_user() {
        let app = TestApp::spawn().await;
        let alice = app.create_identity(1, "alice").await;
        let bob = app.create_identity(2, "bob").await;
        let id = app.create_course("Rust").await;
        app.enroll(id, alice).await;

        let res = app
            .get(&format!("{}?user_id={alice}", routes::course(id)))
            .await;
        assert_eq!(res.body["is_enrolled"], true);
        let res = app.get(&format!("{}?user_id={bob}", routes::course(id))).await;
        assert_eq!(res.body["is_enrolled"], false);
        let res = app.get(&routes::course(id)).await;
        assert_eq!(res.body["is_enrolled"], false);
    }

    #[tokio::test]
    async fn unknown_course_is_404() {
        let app = TestApp::spawn().await;
        assert_eq!(app.get(&routes::course(99)).await.status, 404);
        assert_eq!(app.delete(&routes::course(99)).await.status, 404);
    }
}

mod course_listing {
    use super::*;

    async fn seed(app: &TestApp) {
        create_with(app, course_body("Rust", "Systems programming", Some("2024-01-10"))).await;
        create_with(app, course_body("Python", "Data science with pandas", Some("2024-03-05"))).await;
        create_with(app, course_body("Databases", "SQL and 100% normal forms", None)).await;
    }

    fn names(body: &Value) -> Vec<String> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn search_matches_name_and_description() {
        let app = TestApp::spawn().await;
        seed(&app).await;

        let res = app
            .get(&format!("{}?search=RUST&sort_by=name&sort_order=asc", routes::COURSES))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(names(&res.body), vec!["Rust"]);

        let res = app
            .get(&format!("{}?search=science&sort_by=name&sort_order=asc", routes::COURSES))
            .await;
        assert_eq!(names(&res.body), vec!["Python"]);
    }

    #[tokio::test]
    async fn search_escapes_wildcards() {
        let app = TestApp::spawn().await;
        seed(&app).await;

        let res = app
            .get(&format!("{}?search=100%25", routes::COURSES))
            .await;
        assert_eq!(names(&res.body), vec!["Databases"]);

        let res = app.get(&format!("{}?search=%25", routes::COURSES)).await;
        assert_eq!(res.body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn filters_by_pub_date() {
        let app = TestApp::spawn().await;
        seed(&app).await;

        let res = app
            .get(&format!("{}?pub_date=2024-03-05", routes::COURSES))
            .await;
        assert_eq!(names(&res.body), vec!["Python"]);

        let res = app
            .get(&format!(
                "{}?published_after=2024-01-01&published_before=2024-02-01",
                routes::COURSES
            ))
            .await;
        assert_eq!(names(&res.body), vec!["Rust"]);
    }

    #[tokio::test]
    async fn sorts_and_paginates() {
        let app = TestApp::spawn().await;
        seed(&app).await;

        let res = app
            .get(&format!(
                "{}?sort_by=name&sort_order=asc&per_page=2",
                routes::COURSES
            ))
            .await;
        assert_eq!(names(&res.body), vec!["Databases", "Python"]);
        assert_eq!(res.body["pagination"]["total"], 3);
        assert_eq!(res.body["pagination"]["total_pages"], 2);

        let res = app
            .get(&format!(
                "{}?sort_by=name&sort_order=asc&per_page=2&page=2",
                routes::COURSES
            ))
            .await;
        assert_eq!(names(&res.body), vec!["Rust"]);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let app = TestApp::spawn().await;
        seed(&app).await;

        for query in ["page=18446744073709551615", "page=18446744073709551615&per_page=1"] {
            let res = app.get(&format!("{}?{query}", routes::COURSES)).await;
            assert_eq!(res.status, 200, "{query}: {}", res.text);
            assert_eq!(res.body["data"], json!([]));
            assert_eq!(res.body["pagination"]["total"], 3);
        }
    }

    #[tokio::test]
    async fn rejects_unknown_sort_field() {
        let app = TestApp::spawn().await;
        let res = app.get(&format!("{}?sort_by=image", routes::COURSES)).await;
        assert_eq!(res.status, 400);
    }
}

mod course_instructors {
    use super::*;

    #[tokio::test]
    async fn round_trip_returns_attached_set() {
        let app = TestApp::spawn().await;
        let a = app.create_identity(1, "alice").await;
        let b = app.create_identity(2, "bob").await;
        let c = app.create_identity(3, "carol").await;
        let ia = app.create_instructor(a).await;
        let ib = app.create_instructor(b).await;
        let ic = app.create_instructor(c).await;

        let id = create_with(
            &app,
            json!({
                "name": "Rust",
                "image": "course_images/rust.png",
                "description": "Ownership",
                "instructor_ids": [ib, ia],
            }),
        )
        .await;

        let res = app.get(&routes::course_instructors(id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(ids(&res.body), vec![ia as i64, ib as i64]);

        let res = app
            .put(&routes::course_instructors(id), &json!({ "instructor_ids": [ic] }))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(ids(&res.body), vec![ic as i64]);
        assert_eq!(res.body[0]["display"], "carol");

        let res = app
            .put(&routes::course_instructors(id), &json!({ "instructor_ids": [] }))
            .await;
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn create_rejects_unknown_instructor() {
        let app = TestApp::spawn().await;
        let res = app
            .post(
                routes::COURSES,
                &json!({
                    "image": "course_images/rust.png",
                    "description": "Ownership",
                    "instructor_ids": [123],
                }),
            )
            .await;
        assert_eq!(res.status, 404);

        let list = app.get(routes::COURSES).await;
        assert_eq!(list.body["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn rejects_duplicate_ids() {
        let app = TestApp::spawn().await;
        let a = app.create_identity(1, "alice").await;
        let ia = app.create_instructor(a).await;
        let id = app.create_course("Rust").await;

        let res = app
            .put(&routes::course_instructors(id), &json!({ "instructor_ids": [ia, ia] }))
            .await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn add_and_remove_single_instructor() {
        let app = TestApp::spawn().await;
        let a = app.create_identity(1, "alice").await;
        let ia = app.create_instructor(a).await;
        let id = app.create_course("Rust").await;

        let res = app
            .post(&routes::course_instructors(id), &json!({ "instructor_id": ia }))
            .await;
        assert_eq!(res.status, 201);
        assert_eq!(res.body["username"], "alice");

        let res = app
            .post(&routes::course_instructors(id), &json!({ "instructor_id": ia }))
            .await;
        assert_eq!(res.status, 409);

        let res = app.delete(&routes::course_instructor(id, ia)).await;
        assert_eq!(res.status, 204);
        let res = app.delete(&routes::course_instructor(id, ia)).await;
        assert_eq!(res.status, 404);

        // The instructor itself survives.
        assert_eq!(app.get(&routes::instructor(ia)).await.status, 200);
    }

    #[tokio::test]
    async fn deleting_instructor_detaches_it() {
        let app = TestApp::spawn().await;
        let a = app.create_identity(1, "alice").await;
        let ia = app.create_instructor(a).await;
        let id = app.create_course("Rust").await;
        app.put(&routes::course_instructors(id), &json!({ "instructor_ids": [ia] }))
            .await;

        assert_eq!(app.delete(&routes::instructor(ia)).await.status, 204);
        let res = app.get(&routes::course_instructors(id)).await;
        assert_eq!(res.body, json!([]));
    }
}

mod lessons {
    use super::*;

    #[tokio::test]
    async fn create_applies_defaults() {
        let app = TestApp::spawn().await;
        let id = app.create_course("Rust").await;

        let res = app
            .post(&routes::lessons(id), &json!({ "content": "Hello" }))
            .await;
        assert_eq!(res.status, 201);
        assert_eq!(res.body["title"], "title");
        assert_eq!(res.body["order"], 0);
        assert_eq!(res.body["course_id"], id);
    }

    #[tokio::test]
    async fn listed_by_order_then_id() {
        let app = TestApp::spawn().await;
        let id = app.create_course("Rust").await;

        for (title, order) in [("Third", 2), ("First", 0), ("Second", 1), ("Also first", 0)] {
            let res = app
                .post(
                    &routes::lessons(id),
                    &json!({ "title": title, "order": order, "content": "..." }),
                )
                .await;
            assert_eq!(res.status, 201);
        }

        let res = app.get(&routes::lessons(id)).await;
        let titles: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["First", "Also first", "Second", "Third"]);
    }

    #[tokio::test]
    async fn lesson_scoped_to_course() {
        let app = TestApp::spawn().await;
        let rust = app.create_course("Rust").await;
        let go = app.create_course("Go").await;

        let res = app
            .post(&routes::lessons(rust), &json!({ "title": "Borrowing", "content": "..." }))
            .await;
        let lesson_id = res.id();

        assert_eq!(app.get(&routes::lesson(rust, lesson_id)).await.status, 200);
        assert_eq!(app.get(&routes::lesson(go, lesson_id)).await.status, 404);
        assert_eq!(app.delete(&routes::lesson(go, lesson_id)).await.status, 404);

        let res = app
            .patch(&routes::lesson(rust, lesson_id), &json!({ "order": 3 }))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["order"], 3);
        assert_eq!(res.body["title"], "Borrowing");

        assert_eq!(app.delete(&routes::lesson(rust, lesson_id)).await.status, 204);
        assert_eq!(app.get(&routes::lesson(rust, lesson_id)).await.status, 404);
    }
}

mod course_cascade {
    use super::*;

    #[tokio::test]
    async fn deleting_course_removes_owned_rows() {
        let app = TestApp::spawn().await;
        let alice = app.create_identity(1, "alice").await;
        let instructor = app.create_instructor(alice).await;
        let id = app.create_course("Rust").await;
        app.put(&routes::course_instructors(id), &json!({ "instructor_ids": [instructor] }))
            .await;

        let lesson = app
            .post(&routes::lessons(id), &json!({ "content": "..." }))
            .await
            .id();
        let question = app
            .create_question(id, "2+2=?", 50, &[("3", false), ("4", true)])
            .await;
        let enrollment = app.enroll(id, alice).await;
        let submission = app.submit(enrollment, &[question.choice_ids[1]]).await;

        let res = app.delete(&routes::course(id)).await;
        assert_eq!(res.status, 204);

        assert_eq!(app.get(&routes::course(id)).await.status, 404);
        assert_eq!(app.get(&routes::lesson(id, lesson)).await.status, 404);
        assert_eq!(app.get(&routes::question(question.id)).await.status, 404);
        assert_eq!(app.get(&routes::enrollment(enrollment)).await.status, 404);
        assert_eq!(app.get(&routes::submission(submission)).await.status, 404);

        // Identities and instructors are not owned by the course.
        assert_eq!(app.get(&routes::identity(alice)).await.status, 200);
        assert_eq!(app.get(&routes::instructor(instructor)).await.status, 200);
    }
}
