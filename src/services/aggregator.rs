// src/services/aggregator.rs

//! Pure transformation from raw exams and attempts into dashboard summaries.
//!
//! Nothing here performs I/O. Sorting is stable, so entries with equal
//! (or equally unparseable) timestamps keep their input order.

use std::{cmp::Reverse, collections::HashMap};

use crate::{
    models::{
        attempt::Attempt,
        dashboard::{Dashboard, RecentExamSummary, RecentResultSummary},
        exam::Exam,
    },
    utils::format::parse_timestamp,
};

/// Maximum number of exam cards on the dashboard.
pub const RECENT_EXAMS_LIMIT: usize = 5;
/// Maximum number of result rows on the dashboard.
pub const RECENT_RESULTS_LIMIT: usize = 10;

/// Attempts keyed by exam id. An exam with no entry has zero attempts.
pub type AttemptsByExam = HashMap<String, Vec<Attempt>>;

/// The five most recently created exams, newest first.
pub fn summarize_recent_exams(exams: &[Exam]) -> Vec<RecentExamSummary> {
    let mut ordered: Vec<&Exam> = exams.iter().collect();
    // `None` sorts below every `Some`, so unparseable dates land last.
    ordered.sort_by_cached_key(|exam| Reverse(parse_timestamp(exam.created_at())));

    ordered
        .into_iter()
        .take(RECENT_EXAMS_LIMIT)
        .map(RecentExamSummary::from_exam)
        .collect()
}

/// The ten most recently submitted attempts across all `exams`, newest first.
pub fn summarize_recent_results(
    exams: &[Exam],
    attempts_by_exam: &AttemptsByExam,
) -> Vec<RecentResultSummary> {
    let mut submitted: Vec<(&Attempt, &str)> = exams
        .iter()
        .flat_map(|exam| {
            let attempts: &[Attempt] = match attempts_by_exam.get(&exam.id) {
                Some(attempts) => attempts.as_slice(),
                None => {
                    tracing::debug!("No attempts loaded for exam {}", exam.id);
                    &[]
                }
            };
            attempts
                .iter()
                .map(move |attempt| (attempt, exam.title.as_str()))
        })
        .filter(|(attempt, _)| attempt.is_submitted())
        .collect();

    submitted.sort_by_cached_key(|(attempt, _)| {
        Reverse(attempt.submitted_at().and_then(parse_timestamp))
    });

    submitted
        .into_iter()
        .take(RECENT_RESULTS_LIMIT)
        .map(|(attempt, exam_title)| RecentResultSummary::from_attempt(attempt, exam_title))
        .collect()
}

/// Participant total over the already truncated exam list.
pub fn total_participants(recent_exams: &[RecentExamSummary]) -> u64 {
    recent_exams.iter().map(|exam| exam.participants).sum()
}

/// Runs every summary over one snapshot of upstream data.
pub fn aggregate(exams: &[Exam], attempts_by_exam: &AttemptsByExam) -> Dashboard {
    let recent_exams = summarize_recent_exams(exams);
    let recent_results = summarize_recent_results(exams, attempts_by_exam);
    let total_participants = total_participants(&recent_exams);

    Dashboard {
        recent_exams,
        recent_results,
        total_participants,
    }
}
