// src/models/insights.rs

use serde::Serialize;

/// Score buckets across the class. The three counts always sum to the
/// number of submissions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreDistribution {
    pub full_marks: u32,
    pub zero: u32,
    pub partial: u32,
}

/// Class-wide score statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassOverview {
    pub total_students: u32,
    pub average_score: f64,
    pub highest_score: u32,
    pub lowest_score: u32,
    pub score_distribution: ScoreDistribution,
}

/// Per-question statistics row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionAnalysis {
    pub question: String,

    /// Percentage of the whole class answering this question correctly.
    pub correct_rate: f64,

    /// Most frequent incorrect answer, absent when nobody got it wrong.
    pub most_common_wrong: Option<String>,
}

/// Aggregated analytics block. `class_overview` is `null` and
/// `question_analysis` empty when the quiz has no submissions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub class_overview: Option<ClassOverview>,
    pub question_analysis: Vec<QuestionAnalysis>,
}

/// Full insights payload returned to the teacher.
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub quiz_id: i64,
    pub quiz_title: String,
    pub analytics: Analytics,
    pub ai_insights: String,
}
