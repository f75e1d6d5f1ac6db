// src/models/exam.rs

use serde::{Deserialize, Serialize};

/// An exam as returned by the upstream `GET /exams` endpoint.
/// Only the fields the dashboard reads are modelled; anything else is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub subject: Option<String>,

    /// ISO-8601 creation timestamp, kept verbatim. May be null upstream.
    #[serde(default)]
    pub created_at: Option<String>,

    /// Relation counters (`_count` on the wire).
    #[serde(default, rename = "_count")]
    pub counts: Option<ExamCounts>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamCounts {
    #[serde(default)]
    pub attempts: Option<u64>,
}

impl Exam {
    /// Creation timestamp, empty when the upstream sent none.
    pub fn created_at(&self) -> &str {
        self.created_at.as_deref().unwrap_or_default()
    }

    /// Number of attempts recorded against this exam, 0 when the upstream omits it.
    pub fn attempt_count(&self) -> u64 {
        self.counts
            .as_ref()
            .and_then(|counts| counts.attempts)
            .unwrap_or(0)
    }
}
