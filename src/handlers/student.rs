// src/handlers/student.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppError,
    grading,
    models::{
        quiz::{PublicQuiz, Quiz},
        submission::{SubmitRequest, Submission},
    },
    state::AppState,
    storage::{self, QuizKey, SUBMISSIONS_PREFIX},
};

/// Returns a quiz with the correct answers stripped out.
pub async fn get_quiz(
    State(state): State<AppState>,
    Path((quiz_id, quiz_title)): Path<(i64, String)>,
) -> Result<impl IntoResponse, AppError> {
    let key = QuizKey::new(quiz_id, &quiz_title);

    let quiz: Quiz = storage::fetch(state.store.as_ref(), &key.quiz_doc())
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(PublicQuiz::from(quiz)))
}

/// Grades a submission and appends it to the quiz's submissions collection.
pub async fn submit_quiz(
    State(state): State<AppState>,
    Path((quiz_id, quiz_title)): Path<(i64, String)>,
    Json(payload): Json<SubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let key = QuizKey::new(quiz_id, &quiz_title);

    let quiz: Quiz = storage::fetch(state.store.as_ref(), &key.quiz_doc())
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    let outcome = grading::grade(&quiz.questions, &payload.answers);

    // The store has no append primitive, so the whole collection goes
    // through a load-modify-save cycle; the per-key lock keeps concurrent
    // submissions to the same quiz from dropping each other.
    let submissions_key = key.submissions_doc();
    let _guard = state.locks.acquire(&submissions_key).await;

    let mut submissions: Vec<Submission> =
        storage::fetch(state.store.as_ref(), &submissions_key)
            .await?
            .unwrap_or_default();

    let attempt = submissions
        .iter()
        .filter(|s| s.student_id == payload.student_id)
        .count() as u32
        + 1;

    let record = Submission {
        student_id: payload.student_id,
        attempt,
        answers: payload.answers,
        score: outcome.score,
        total: quiz.questions.len() as u32,
        feedback: outcome.feedback,
        submitted_at: Some(Utc::now()),
    };

    submissions.push(record.clone());
    storage::persist(state.store.as_ref(), &submissions_key, &submissions).await?;

    tracing::info!(
        "Graded submission for quiz {}: student '{}', attempt {}, score {}/{}",
        quiz_id,
        record.student_id,
        record.attempt,
        record.score,
        record.total
    );
    Ok(Json(record))
}

/// Collects one student's submissions across every quiz.
pub async fn student_results(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let keys = state.store.list(SUBMISSIONS_PREFIX).await?;

    let mut results: Vec<Submission> = Vec::new();
    for key in keys {
        let Some(submissions) =
            storage::fetch::<Vec<Submission>>(state.store.as_ref(), &key).await?
        else {
            continue;
        };
        results.extend(submissions.into_iter().filter(|s| s.student_id == student_id));
    }

    Ok(Json(results))
}
