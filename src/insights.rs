// src/insights.rs

use std::cmp::Ordering;

use crate::models::insights::{Analytics, ClassOverview, QuestionAnalysis, ScoreDistribution};
use crate::models::quiz::Quiz;
use crate::models::submission::Submission;

/// Narrative shown when a quiz has no submissions. Emitted verbatim; the
/// text generator is never invoked for an empty class.
pub const NO_SUBMISSIONS_NARRATIVE: &str =
    "No submissions yet. Insights will be available after the first student takes this quiz.";

/// Markers delimiting the instruction block inside the generation prompt.
/// Some backends echo the block back, so post-processing strips anything
/// between these markers from the generated text.
pub const TASK_START: &str = "=== TASK ===";
pub const TASK_END: &str = "=== END TASK ===";

/// Aggregates all submissions for one quiz into class-level statistics.
///
/// For an empty submission list this returns the degenerate report
/// (no overview, no per-question rows); callers must not divide by the
/// class size or prompt the generator in that case.
pub fn compute_analytics(quiz: &Quiz, submissions: &[Submission]) -> Analytics {
    if submissions.is_empty() {
        return Analytics {
            class_overview: None,
            question_analysis: Vec::new(),
        };
    }

    Analytics {
        class_overview: Some(class_overview(quiz.questions.len() as u32, submissions)),
        question_analysis: question_analysis(quiz, submissions),
    }
}

fn class_overview(total_questions: u32, submissions: &[Submission]) -> ClassOverview {
    let total_students = submissions.len() as u32;
    let mut sum = 0u64;
    let mut highest = 0u32;
    let mut lowest = u32::MAX;
    let mut distribution = ScoreDistribution {
        full_marks: 0,
        zero: 0,
        partial: 0,
    };

    for sub in submissions {
        sum += u64::from(sub.score);
        highest = highest.max(sub.score);
        lowest = lowest.min(sub.score);

        // Exactly one bucket per submission, so the three counts sum to
        // the class size even for a zero-question quiz.
        if sub.score == total_questions {
            distribution.full_marks += 1;
        } else if sub.score == 0 {
            distribution.zero += 1;
        } else {
            distribution.partial += 1;
        }
    }

    ClassOverview {
        total_students,
        average_score: sum as f64 / f64::from(total_students),
        highest_score: highest,
        lowest_score: lowest,
        score_distribution: distribution,
    }
}

fn question_analysis(quiz: &Quiz, submissions: &[Submission]) -> Vec<QuestionAnalysis> {
    let total_students = submissions.len() as f64;

    quiz.questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            let mut correct = 0usize;
            // First-seen order, so the tie-break below is stable.
            let mut wrong_counts: Vec<(&str, usize)> = Vec::new();

            for sub in submissions {
                // Answer sheets too short to reach this question are
                // skipped outright rather than counted as wrong.
                let Some(answer) = sub.answers.get(i) else {
                    continue;
                };
                if *answer == question.answer {
                    correct += 1;
                } else if let Some(entry) =
                    wrong_counts.iter_mut().find(|(a, _)| *a == answer.as_str())
                {
                    entry.1 += 1;
                } else {
                    wrong_counts.push((answer.as_str(), 1));
                }
            }

            // Ties go to the wrong answer seen first across submissions.
            let mut most_common_wrong = None;
            let mut best = 0usize;
            for (answer, count) in &wrong_counts {
                if *count > best {
                    best = *count;
                    most_common_wrong = Some((*answer).to_string());
                }
            }

            QuestionAnalysis {
                question: question.text.clone(),
                correct_rate: correct as f64 * 100.0 / total_students,
                most_common_wrong,
            }
        })
        .collect()
}

/// Renders the narrative-generation prompt from the computed statistics.
///
/// Fixed template; nothing outside the overview and per-question rows
/// reaches the generator. The trailing instruction block sits between
/// `TASK_START` and `TASK_END` so the adapter can strip echoes of it.
pub fn build_prompt(quiz: &Quiz, overview: &ClassOverview, analysis: &[QuestionAnalysis]) -> String {
    // Two hardest questions: lowest correct rate first, ties keep the
    // original question order (stable sort).
    let mut order: Vec<usize> = (0..analysis.len()).collect();
    order.sort_by(|&a, &b| {
        analysis[a]
            .correct_rate
            .partial_cmp(&analysis[b].correct_rate)
            .unwrap_or(Ordering::Equal)
    });

    let hardest = order
        .iter()
        .take(2)
        .map(|&i| {
            format!(
                "\"{}\" ({:.0}% correct)",
                analysis[i].question, analysis[i].correct_rate
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    let wrong = analysis
        .iter()
        .filter_map(|qa| {
            qa.most_common_wrong
                .as_ref()
                .map(|w| format!("\"{}\" → {}", qa.question, w))
        })
        .collect::<Vec<_>>();
    let wrong = if wrong.is_empty() {
        "none".to_string()
    } else {
        wrong.join(", ")
    };

    format!(
        "Class results for the quiz \"{title}\" (subject: {subject}).\n\
         Average score: {avg:.1} out of {total} questions. \
         Highest score: {highest}, lowest score: {lowest}.\n\
         Hardest questions: {hardest}.\n\
         Most common wrong answers: {wrong}.\n\
         {TASK_START}\n\
         Write a short summary for the teacher covering how the class performed, \
         where students struggled, and one topic worth revisiting next lesson. \
         Plain prose, no closing salutation.\n\
         {TASK_END}",
        title = quiz.title,
        subject = quiz.subject,
        avg = overview.average_score,
        total = quiz.questions.len(),
        highest = overview.highest_score,
        lowest = overview.lowest_score,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::Question;

    fn quiz(answers: &[&str]) -> Quiz {
        Quiz {
            id: 1,
            subject: "Math".to_string(),
            title: "Algebra Basics".to_string(),
            questions: answers
                .iter()
                .enumerate()
                .map(|(i, a)| Question {
                    text: format!("Q{}", i + 1),
                    options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                    answer: a.to_string(),
                })
                .collect(),
        }
    }

    fn submission(student: &str, answers: &[&str], score: u32, total: u32) -> Submission {
        Submission {
            student_id: student.to_string(),
            attempt: 1,
            answers: answers.iter().map(|a| a.to_string()).collect(),
            score,
            total,
            feedback: Vec::new(),
            submitted_at: None,
        }
    }

    #[test]
    fn empty_class_yields_degenerate_report() {
        let analytics = compute_analytics(&quiz(&["A", "B"]), &[]);

        assert!(analytics.class_overview.is_none());
        assert!(analytics.question_analysis.is_empty());
    }

    #[test]
    fn overview_statistics() {
        let q = quiz(&["A", "B"]);
        let subs = vec![
            submission("s1", &["A", "B"], 2, 2),
            submission("s2", &["A", "C"], 1, 2),
            submission("s3", &["C", "C"], 0, 2),
            submission("s4", &["A", "B"], 2, 2),
        ];

        let overview = compute_analytics(&q, &subs).class_overview.unwrap();

        assert_eq!(overview.total_students, 4);
        assert_eq!(overview.average_score, 1.25);
        assert_eq!(overview.highest_score, 2);
        assert_eq!(overview.lowest_score, 0);
        assert_eq!(overview.score_distribution.full_marks, 2);
        assert_eq!(overview.score_distribution.zero, 1);
        assert_eq!(overview.score_distribution.partial, 1);
    }

    #[test]
    fn distribution_buckets_sum_to_class_size() {
        let q = quiz(&["A"]);
        let subs = vec![
            submission("s1", &["A"], 1, 1),
            submission("s2", &["B"], 0, 1),
            submission("s3", &["A"], 1, 1),
        ];

        let d = compute_analytics(&q, &subs)
            .class_overview
            .unwrap()
            .score_distribution;

        assert_eq!(d.full_marks + d.zero + d.partial, 3);
    }

    #[test]
    fn zero_question_quiz_buckets_everyone_once() {
        // score == total == 0: full_marks wins, zero stays empty.
        let q = quiz(&[]);
        let subs = vec![submission("s1", &[], 0, 0), submission("s2", &[], 0, 0)];

        let d = compute_analytics(&q, &subs)
            .class_overview
            .unwrap()
            .score_distribution;

        assert_eq!(d.full_marks, 2);
        assert_eq!(d.zero, 0);
        assert_eq!(d.full_marks + d.zero + d.partial, 2);
    }

    #[test]
    fn correct_rate_uses_whole_class_as_denominator() {
        let q = quiz(&["A"]);
        let subs = vec![
            submission("s1", &["A"], 1, 1),
            submission("s2", &["A"], 1, 1),
            submission("s3", &["A"], 1, 1),
            submission("s4", &["B"], 0, 1),
        ];

        let analysis = compute_analytics(&q, &subs).question_analysis;

        assert_eq!(analysis[0].correct_rate, 75.0);
    }

    #[test]
    fn short_answer_sheets_are_skipped_not_counted_wrong() {
        let q = quiz(&["A", "B"]);
        let subs = vec![
            submission("s1", &["A", "B"], 2, 2),
            // Too short to reach question 2: not wrong, just absent there.
            submission("s2", &["A"], 1, 2),
        ];

        let analysis = compute_analytics(&q, &subs).question_analysis;

        assert_eq!(analysis[1].correct_rate, 50.0);
        assert_eq!(analysis[1].most_common_wrong, None);
    }

    #[test]
    fn most_common_wrong_picks_highest_frequency() {
        let q = quiz(&["A"]);
        let subs = vec![
            submission("s1", &["C"], 0, 1),
            submission("s2", &["C"], 0, 1),
            submission("s3", &["D"], 0, 1),
        ];

        let analysis = compute_analytics(&q, &subs).question_analysis;

        assert_eq!(analysis[0].most_common_wrong.as_deref(), Some("C"));
    }

    #[test]
    fn most_common_wrong_tie_goes_to_first_seen() {
        let q = quiz(&["A"]);
        let subs = vec![
            submission("s1", &["D"], 0, 1),
            submission("s2", &["C"], 0, 1),
            submission("s3", &["C"], 0, 1),
            submission("s4", &["D"], 0, 1),
        ];

        let analysis = compute_analytics(&q, &subs).question_analysis;

        assert_eq!(analysis[0].most_common_wrong.as_deref(), Some("D"));
    }

    #[test]
    fn most_common_wrong_absent_when_everyone_is_right() {
        let q = quiz(&["A"]);
        let subs = vec![submission("s1", &["A"], 1, 1)];

        let analysis = compute_analytics(&q, &subs).question_analysis;

        assert_eq!(analysis[0].most_common_wrong, None);
    }

    #[test]
    fn analytics_are_idempotent() {
        let q = quiz(&["A", "B"]);
        let subs = vec![
            submission("s1", &["A", "C"], 1, 2),
            submission("s2", &["B", "B"], 1, 2),
        ];

        assert_eq!(compute_analytics(&q, &subs), compute_analytics(&q, &subs));
    }

    #[test]
    fn prompt_contains_the_expected_statistics() {
        let q = quiz(&["A", "B"]);
        let subs = vec![
            submission("s1", &["A", "C"], 1, 2),
            submission("s2", &["A", "C"], 1, 2),
            submission("s3", &["B", "B"], 1, 2),
        ];
        let analytics = compute_analytics(&q, &subs);
        let overview = analytics.class_overview.as_ref().unwrap();

        let prompt = build_prompt(&q, overview, &analytics.question_analysis);

        assert!(prompt.contains("\"Algebra Basics\" (subject: Math)"));
        assert!(prompt.contains("Average score: 1.0 out of 2 questions"));
        assert!(prompt.contains("Highest score: 1, lowest score: 1"));
        // Q2 (33% correct) must come before Q1 (67% correct).
        assert!(prompt.contains("Hardest questions: \"Q2\" (33% correct), \"Q1\" (67% correct)"));
        assert!(prompt.contains("\"Q1\" → B"));
        assert!(prompt.contains("\"Q2\" → C"));
        assert!(prompt.contains(TASK_START));
        assert!(prompt.contains(TASK_END));
    }

    #[test]
    fn hardest_question_ties_keep_question_order() {
        let q = quiz(&["A", "B", "C"]);
        let subs = vec![submission("s1", &["A", "X", "X"], 1, 3)];
        let analytics = compute_analytics(&q, &subs);
        let overview = analytics.class_overview.as_ref().unwrap();

        let prompt = build_prompt(&q, overview, &analytics.question_analysis);

        // Q2 and Q3 are both at 0%; Q2 comes first.
        assert!(prompt.contains("Hardest questions: \"Q2\" (0% correct), \"Q3\" (0% correct)"));
    }

    #[test]
    fn prompt_reports_no_wrong_answers_as_none() {
        let q = quiz(&["A"]);
        let subs = vec![submission("s1", &["A"], 1, 1)];
        let analytics = compute_analytics(&q, &subs);
        let overview = analytics.class_overview.as_ref().unwrap();

        let prompt = build_prompt(&q, overview, &analytics.question_analysis);

        assert!(prompt.contains("Most common wrong answers: none."));
    }
}
