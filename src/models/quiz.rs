// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// One multiple-choice question as stored in a quiz document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub text: String,

    /// List of options (e.g., ["Paris", "London"]).
    pub options: Vec<String>,

    /// The correct option. Stripped from student-facing DTOs.
    pub answer: String,
}

/// A quiz document as persisted under `quizzes/{id}_{slug}`.
/// Immutable once created; removable as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub subject: String,
    pub title: String,
    pub questions: Vec<Question>,
}

/// Listing row for the teacher dashboard.
#[derive(Debug, Serialize)]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    pub subject: String,
}

/// DTO for sending a question to students (excludes the answer).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub text: String,
    pub options: Vec<String>,
}

/// DTO for sending a quiz to students.
#[derive(Debug, Serialize)]
pub struct PublicQuiz {
    pub id: i64,
    pub title: String,
    pub subject: String,
    pub questions: Vec<PublicQuestion>,
}

impl From<Quiz> for PublicQuiz {
    fn from(quiz: Quiz) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title,
            subject: quiz.subject,
            questions: quiz
                .questions
                .into_iter()
                .map(|q| PublicQuestion {
                    text: q.text,
                    options: q.options,
                })
                .collect(),
        }
    }
}

/// Question payload inside a quiz-creation request.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionInput {
    pub text: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl From<QuestionInput> for Question {
    fn from(input: QuestionInput) -> Self {
        Self {
            text: input.text,
            options: input.options,
            answer: input.answer,
        }
    }
}

/// DTO for creating a new quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(custom(function = validate_questions))]
    pub questions: Vec<QuestionInput>,
}

fn validate_questions(questions: &[QuestionInput]) -> Result<(), validator::ValidationError> {
    if questions.is_empty() {
        return Err(validator::ValidationError::new("questions_cannot_be_empty"));
    }
    for q in questions {
        if q.text.trim().is_empty() {
            return Err(validator::ValidationError::new("question_text_empty"));
        }
        if q.options.is_empty() {
            return Err(validator::ValidationError::new("options_cannot_be_empty"));
        }
        if q.answer.trim().is_empty() {
            return Err(validator::ValidationError::new("answer_empty"));
        }
    }
    Ok(())
}
