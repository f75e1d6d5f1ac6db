// src/models/dashboard.rs

use serde::Serialize;

use crate::{
    models::{attempt::Attempt, exam::Exam},
    utils::format::{format_date, format_date_time},
};

/// Placeholder shown when an exam has no subject.
pub const MISSING_SUBJECT: &str = "N/A";
/// Placeholder shown when an attempt carries no student name.
pub const UNKNOWN_STUDENT: &str = "Unknown";
/// Placeholder shown when an attempt carries no student identifier.
pub const MISSING_STUDENT_ID: &str = "N/A";

/// Keeps a string only if it is present and non-empty.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Card data for one recently created exam.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentExamSummary {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub participants: u64,
    /// Creation timestamp as received.
    pub date: String,
}

impl RecentExamSummary {
    pub fn from_exam(exam: &Exam) -> Self {
        Self {
            id: exam.id.clone(),
            title: exam.title.clone(),
            subject: non_empty(exam.subject.as_deref())
                .unwrap_or(MISSING_SUBJECT)
                .to_string(),
            participants: exam.attempt_count(),
            date: exam.created_at().to_string(),
        }
    }
}

/// Row data for one recently submitted attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentResultSummary {
    pub student_name: String,
    pub student_id: String,
    pub exam_title: String,
    pub score: f64,
    pub submitted_at: String,
}

impl RecentResultSummary {
    pub fn from_attempt(attempt: &Attempt, exam_title: &str) -> Self {
        let student = attempt.student.as_ref();

        Self {
            student_name: non_empty(student.and_then(|s| s.name.as_deref()))
                .unwrap_or(UNKNOWN_STUDENT)
                .to_string(),
            student_id: non_empty(student.and_then(|s| s.username.as_deref()))
                .unwrap_or(MISSING_STUDENT_ID)
                .to_string(),
            exam_title: exam_title.to_string(),
            score: attempt.score.filter(|s| !s.is_nan()).unwrap_or(0.0),
            submitted_at: attempt.submitted_at().unwrap_or_default().to_string(),
        }
    }

    pub fn tier(&self) -> ScoreTier {
        ScoreTier::from_score(self.score)
    }
}

/// Colour band used when rendering a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreTier::High
        } else if score >= 50.0 {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }
}

/// Output of one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub recent_exams: Vec<RecentExamSummary>,
    pub recent_results: Vec<RecentResultSummary>,
    /// Sum over `recent_exams` only, not over every exam.
    pub total_participants: u64,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_exams: usize,
    pub new_results: usize,
    pub total_participants: u64,
}

#[derive(Debug, Serialize)]
pub struct RecentExamCard {
    #[serde(flatten)]
    pub summary: RecentExamSummary,
    pub date_label: String,
}

#[derive(Debug, Serialize)]
pub struct RecentResultRow {
    #[serde(flatten)]
    pub summary: RecentResultSummary,
    pub submitted_label: String,
    pub tier: ScoreTier,
}

/// Body of `GET /api/teacher/dashboard`.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub greeting_name: String,
    pub stats: DashboardStats,
    pub recent_exams: Vec<RecentExamCard>,
    pub recent_results: Vec<RecentResultRow>,
    /// Set when the exam list could not be loaded and the lists are empty.
    pub error: Option<String>,
}

impl DashboardResponse {
    pub fn new(greeting_name: String, dashboard: Dashboard, error: Option<String>) -> Self {
        let stats = DashboardStats {
            total_exams: dashboard.recent_exams.len(),
            new_results: dashboard.recent_results.len(),
            total_participants: dashboard.total_participants,
        };

        let recent_exams = dashboard
            .recent_exams
            .into_iter()
            .map(|summary| RecentExamCard {
                date_label: format_date(&summary.date),
                summary,
            })
            .collect();

        let recent_results = dashboard
            .recent_results
            .into_iter()
            .map(|summary| RecentResultRow {
                submitted_label: format_date_time(&summary.submitted_at),
                tier: summary.tier(),
                summary,
            })
            .collect();

        Self {
            greeting_name,
            stats,
            recent_exams,
            recent_results,
            error,
        }
    }
}
