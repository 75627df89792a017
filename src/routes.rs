// src/routes.rs

use axum::{
    Json, Router,
    http::Method,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{student, teacher},
    state::AppState,
};

/// Liveness banner.
async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "LMS backend is running" }))
}

/// Assembles the main application router.
///
/// * Merges the teacher and student sub-routers.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store, generator, locks, config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let teacher_routes = Router::new()
        .route(
            "/quiz",
            post(teacher::create_quiz).get(teacher::list_quizzes),
        )
        .route("/quiz/{id}/{title}", delete(teacher::delete_quiz))
        .route(
            "/quiz/{id}/{title}/submissions",
            get(teacher::list_submissions),
        )
        .route("/quiz/{id}/{title}/insights", get(teacher::quiz_insights));

    let student_routes = Router::new()
        .route("/quiz/{id}/{title}", get(student::get_quiz))
        .route("/quiz/{id}/{title}/submit", post(student::submit_quiz))
        .route("/{student_id}/results", get(student::student_results));

    Router::new()
        .route("/", get(home))
        .nest("/api/teacher", teacher_routes)
        .nest("/api/student", student_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
