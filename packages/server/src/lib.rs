pub mod admin;
pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Online Course API",
        version = "1.0.0",
        description = "API for the online course enrollment service"
    ),
    tags(
        (name = "Identities", description = "Mirrors of externally managed accounts"),
        (name = "Instructors", description = "Instructor records"),
        (name = "Learners", description = "Learner records"),
        (name = "Courses", description = "Course CRUD operations"),
        (name = "Course Instructors", description = "Assigning instructors to courses"),
        (name = "Lessons", description = "Lessons within a course"),
        (name = "Questions", description = "Exam questions and scoring"),
        (name = "Choices", description = "Answer choices of a question"),
        (name = "Enrollments", description = "Enrollments of identities in courses"),
        (name = "Submissions", description = "Exam attempts and grading"),
        (name = "Admin", description = "Admin-site registry"),
    ),
)]
struct ApiDoc;

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api/v1", routes::routes())
        .split_for_parts();

    router
        .with_state(state)
        .merge(Scalar::with_url("/scalar", api))
        .layer(cors)
}
