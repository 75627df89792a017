// src/models/submission.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Per-question grading feedback row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub question: String,

    /// `None` when the answer sheet was too short to cover this question.
    pub student_answer: Option<String>,

    pub is_correct: bool,
}

/// One graded attempt, as stored in a quiz's submissions collection.
/// Append-only; insertion order is chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub student_id: String,

    /// 1-based attempt number, dense per (student, quiz).
    pub attempt: u32,

    /// Submitted answers, index-aligned with the quiz's questions.
    pub answers: Vec<String>,

    pub score: u32,

    /// Question count of the quiz at submission time.
    pub total: u32,

    pub feedback: Vec<AnswerFeedback>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// DTO for a student submitting answers.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequest {
    #[validate(length(min = 1, max = 64))]
    pub student_id: String,
    pub answers: Vec<String>,
}

/// Teacher-facing wrapper for a quiz's submission list.
#[derive(Debug, Serialize)]
pub struct SubmissionsResponse {
    pub quiz_id: i64,
    pub quiz_title: String,
    pub total_submissions: usize,
    pub submissions: Vec<Submission>,
}
