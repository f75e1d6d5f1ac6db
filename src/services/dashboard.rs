// src/services/dashboard.rs

use std::sync::Arc;

use crate::{
    client::ExamSource,
    error::ClientError,
    models::dashboard::Dashboard,
    services::{aggregator::aggregate, fan_out::fetch_attempts_by_exam},
};

/// Loads one fresh dashboard snapshot.
///
/// * Fetches the exam list; a failure here is returned to the caller.
/// * Fetches attempts for each exam, at most `fetch_concurrency` at a time
///   (per-exam failures are absorbed).
/// * Aggregates both into bounded, sorted summaries.
pub async fn load_dashboard(
    source: Arc<dyn ExamSource>,
    fetch_concurrency: usize,
) -> Result<Dashboard, ClientError> {
    let exams = source.list_exams().await?;
    tracing::debug!("Loaded {} exams", exams.len());

    let attempts_by_exam = fetch_attempts_by_exam(Arc::clone(&source), &exams, fetch_concurrency).await;

    Ok(aggregate(&exams, &attempts_by_exam))
}
