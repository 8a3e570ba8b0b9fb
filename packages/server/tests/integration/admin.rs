use crate::common::{TestApp, routes};
use serde_json::{Value, json};

fn model<'a>(site: &'a Value, name: &str) -> &'a Value {
    site["models"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["model"] == name)
        .unwrap_or_else(|| panic!("{name} is not registered"))
}

#[tokio::test]
async fn site_lists_registered_models_in_order() {
    let app = TestApp::spawn().await;
    let res = app.get(routes::ADMIN_SITE).await;
    assert_eq!(res.status, 200);

    let names: Vec<&str> = res.body["models"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["model"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "course",
            "lesson",
            "instructor",
            "learner",
            "question",
            "choice",
            "submission",
            "enrollment",
        ]
    );
}

#[tokio::test]
async fn course_admin_options() {
    let app = TestApp::spawn().await;
    let res = app.get(routes::ADMIN_SITE).await;
    let course = model(&res.body, "course");

    assert_eq!(course["list_display"], json!(["name", "pub_date"]));
    assert_eq!(course["list_filter"], json!(["pub_date"]));
    assert_eq!(course["search_fields"], json!(["name", "description"]));
    assert_eq!(
        course["inlines"],
        json!([
            { "model": "lesson", "fk": "course_id", "style": "stacked", "extra": 5 },
        ])
    );
}

#[tokio::test]
async fn question_admin_edits_choices_inline() {
    let app = TestApp::spawn().await;
    let res = app.get(routes::ADMIN_SITE).await;
    let question = model(&res.body, "question");

    assert_eq!(question["list_display"], json!(["content"]));
    assert_eq!(question["inlines"][0]["model"], "choice");
    assert_eq!(question["inlines"][0]["fk"], "question_id");
    assert_eq!(question["inlines"][0]["extra"], 2);
}

#[tokio::test]
async fn closed_choice_fields_expose_labels() {
    let app = TestApp::spawn().await;
    let res = app.get(routes::ADMIN_SITE).await;

    let learner = model(&res.body, "learner");
    assert_eq!(learner["choice_fields"][0]["field"], "occupation");
    assert_eq!(
        learner["choice_fields"][0]["options"][3],
        json!({ "value": "dba", "label": "Database Admin" })
    );

    let enrollment = model(&res.body, "enrollment");
    let values: Vec<&str> = enrollment["choice_fields"][0]["options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["value"].as_str().unwrap())
        .collect();
    assert_eq!(values, vec!["audit", "honor", "BETA"]);
}

#[tokio::test]
async fn api_reference_is_served() {
    let app = TestApp::spawn().await;
    let res = app.get("/scalar").await;
    assert_eq!(res.status, 200);
}
