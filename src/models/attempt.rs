// src/models/attempt.rs

use serde::{Deserialize, Serialize};

/// One student's attempt, as returned by `GET /attempts/exam/{examId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub exam_id: Option<String>,

    #[serde(default)]
    pub student: Option<StudentRef>,

    /// Expected in [0, 100]; not enforced here.
    #[serde(default)]
    pub score: Option<f64>,

    /// Absent while the attempt is still in progress.
    #[serde(default)]
    pub submitted_at: Option<String>,
}

/// The student projection the upstream embeds in each attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl Attempt {
    /// Submission timestamp, with an empty string treated as not submitted.
    pub fn submitted_at(&self) -> Option<&str> {
        self.submitted_at.as_deref().filter(|ts| !ts.is_empty())
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted_at().is_some()
    }
}
