// src/grading.rs

use crate::models::quiz::Question;
use crate::models::submission::AnswerFeedback;

/// Result of grading one answer sheet against a quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeOutcome {
    pub score: u32,
    pub feedback: Vec<AnswerFeedback>,
}

/// Grades a submitted answer sequence against the quiz's questions.
///
/// The comparison answer for question `i` is `answers[i]`; a missing entry
/// counts as unanswered and never matches. Matching is exact string
/// equality, case-sensitive, no normalization. Answers beyond the question
/// count are ignored. Pure and deterministic; never fails.
pub fn grade(questions: &[Question], answers: &[String]) -> GradeOutcome {
    let mut score = 0;
    let mut feedback = Vec::with_capacity(questions.len());

    for (i, question) in questions.iter().enumerate() {
        let student_answer = answers.get(i);
        let is_correct = student_answer.is_some_and(|a| a == &question.answer);
        if is_correct {
            score += 1;
        }
        feedback.push(AnswerFeedback {
            question: question.text.clone(),
            student_answer: student_answer.cloned(),
            is_correct,
        });
    }

    GradeOutcome { score, feedback }
}
