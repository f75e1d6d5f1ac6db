// src/services/fan_out.rs

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use tokio::task::JoinSet;

use crate::{
    client::ExamSource,
    error::ClientError,
    models::{attempt::Attempt, exam::Exam},
    services::aggregator::AttemptsByExam,
};

/// Fetches attempts for every exam concurrently, at most `concurrency` at a time.
///
/// Each exam is fetched on its own task. A failed or panicked fetch is logged
/// and leaves that exam out of the map; the other fetches are unaffected.
/// The map is keyed by exam id, so completion order does not matter.
pub async fn fetch_attempts_by_exam(
    source: Arc<dyn ExamSource>,
    exams: &[Exam],
    concurrency: usize,
) -> AttemptsByExam {
    let mut seen = HashSet::new();
    let mut pending = exams
        .iter()
        .filter(|exam| seen.insert(exam.id.as_str()))
        .map(|exam| exam.id.clone());

    let mut tasks = JoinSet::new();
    for exam_id in pending.by_ref().take(concurrency.max(1)) {
        spawn_fetch(&mut tasks, &source, exam_id);
    }

    let mut attempts_by_exam = HashMap::new();
    while let Some(joined) = tasks.join_next().await {
        // Refill the freed slot before handling the result.
        if let Some(exam_id) = pending.next() {
            spawn_fetch(&mut tasks, &source, exam_id);
        }

        match joined {
            Ok((exam_id, Ok(attempts))) => {
                tracing::debug!("Loaded {} attempts for exam {}", attempts.len(), exam_id);
                attempts_by_exam.insert(exam_id, attempts);
            }
            Ok((exam_id, Err(e))) => {
                tracing::warn!("Error loading attempts for exam {}: {}", exam_id, e);
            }
            Err(e) => {
                tracing::error!("Attempt fetch task failed: {}", e);
            }
        }
    }

    attempts_by_exam
}

fn spawn_fetch(tasks: &mut FetchTasks, source: &Arc<dyn ExamSource>, exam_id: String) {
    let source = Arc::clone(source);
    tasks.spawn(async move {
        let result = source.list_attempts(&exam_id).await;
        (exam_id, result)
    });
}

type FetchTasks = JoinSet<(String, Result<Vec<Attempt>, ClientError>)>;
