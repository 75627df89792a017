// src/handlers/teacher.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    insights::{self, NO_SUBMISSIONS_NARRATIVE},
    models::{
        insights::InsightsResponse,
        quiz::{CreateQuizRequest, Quiz, QuizSummary},
        submission::{Submission, SubmissionsResponse},
    },
    narrative,
    state::AppState,
    storage::{self, QUIZ_PREFIX, QuizKey},
};

/// Creates a new quiz and its (empty) submissions collection.
pub async fn create_quiz(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    // Next id is one past the highest ever assigned, so deleting a quiz
    // never recycles an identifier.
    let existing = state.store.list(QUIZ_PREFIX).await?;
    let id = existing
        .iter()
        .filter_map(|key| storage::id_from_key(key))
        .max()
        .unwrap_or(0)
        + 1;

    let key = QuizKey::new(id, &payload.title);
    let quiz = Quiz {
        id,
        subject: payload.subject,
        title: payload.title,
        questions: payload.questions.into_iter().map(Into::into).collect(),
    };

    storage::persist(state.store.as_ref(), &key.quiz_doc(), &quiz).await?;

    // Pre-create the submissions collection so later reads can distinguish
    // "no submissions yet" from "no such quiz".
    let submissions_key = key.submissions_doc();
    if state.store.load(&submissions_key).await?.is_none() {
        storage::persist(
            state.store.as_ref(),
            &submissions_key,
            &Vec::<Submission>::new(),
        )
        .await?;
    }

    tracing::info!("Created quiz {} '{}'", id, quiz.title);
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// Lists all quizzes as dashboard summaries.
pub async fn list_quizzes(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let keys = state.store.list(QUIZ_PREFIX).await?;

    let mut summaries = Vec::with_capacity(keys.len());
    for key in keys {
        // A quiz deleted between list and load is simply skipped.
        let Some(quiz) = storage::fetch::<Quiz>(state.store.as_ref(), &key).await? else {
            continue;
        };
        summaries.push(QuizSummary {
            id: quiz.id,
            title: quiz.title,
            subject: quiz.subject,
        });
    }

    Ok(Json(summaries))
}

/// Lists all submissions for one quiz, answers and feedback included.
pub async fn list_submissions(
    State(state): State<AppState>,
    Path((quiz_id, quiz_title)): Path<(i64, String)>,
) -> Result<impl IntoResponse, AppError> {
    let key = QuizKey::new(quiz_id, &quiz_title);

    let submissions: Vec<Submission> =
        storage::fetch(state.store.as_ref(), &key.submissions_doc())
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No submissions found for quiz '{}'", quiz_title))
            })?;

    Ok(Json(SubmissionsResponse {
        quiz_id,
        quiz_title,
        total_submissions: submissions.len(),
        submissions,
    }))
}

/// Builds the class analytics report plus the generated narrative summary.
///
/// The narrative is regenerated on every call; this is the only endpoint
/// that talks to the text-generation backend, and a backend failure
/// degrades to a placeholder string instead of failing the request.
pub async fn quiz_insights(
    State(state): State<AppState>,
    Path((quiz_id, quiz_title)): Path<(i64, String)>,
) -> Result<impl IntoResponse, AppError> {
    let key = QuizKey::new(quiz_id, &quiz_title);

    let quiz: Quiz = storage::fetch(state.store.as_ref(), &key.quiz_doc())
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    let submissions: Vec<Submission> =
        storage::fetch(state.store.as_ref(), &key.submissions_doc())
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No submissions found for quiz '{}'", quiz.title))
            })?;

    let analytics = insights::compute_analytics(&quiz, &submissions);

    let ai_insights = match &analytics.class_overview {
        Some(overview) => {
            let prompt = insights::build_prompt(&quiz, overview, &analytics.question_analysis);
            narrative::synthesize(state.generator.as_ref(), &prompt).await
        }
        None => NO_SUBMISSIONS_NARRATIVE.to_string(),
    };

    Ok(Json(InsightsResponse {
        quiz_id,
        quiz_title: quiz.title,
        analytics,
        ai_insights,
    }))
}

/// Deletes a quiz and its submissions collection.
pub async fn delete_quiz(
    State(state): State<AppState>,
    Path((quiz_id, quiz_title)): Path<(i64, String)>,
) -> Result<impl IntoResponse, AppError> {
    let key = QuizKey::new(quiz_id, &quiz_title);

    let existed = state.store.remove(&key.quiz_doc()).await?;
    if !existed {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }
    // The submissions doc may already be gone; nothing to report if so.
    state.store.remove(&key.submissions_doc()).await?;

    tracing::info!("Deleted quiz {} '{}'", quiz_id, quiz_title);
    Ok(StatusCode::NO_CONTENT)
}
