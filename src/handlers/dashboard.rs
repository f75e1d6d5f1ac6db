// src/handlers/dashboard.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{
    client::{ExamApiClient, ExamSource},
    config::Config,
    models::dashboard::{Dashboard, DashboardResponse},
    services::dashboard::load_dashboard,
    utils::jwt::{BearerToken, Claims},
};

const DEFAULT_GREETING_NAME: &str = "Teacher";

/// Teacher dashboard overview.
///
/// * Reads the exam API with the caller's own token.
/// * If the exam list cannot be loaded, answers with empty lists and `error` set.
pub async fn get_dashboard(
    State(exam_api): State<ExamApiClient>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    Extension(BearerToken(token)): Extension<BearerToken>,
) -> impl IntoResponse {
    let greeting_name = greeting_name(&claims);

    let source: Arc<dyn ExamSource> = Arc::new(exam_api.authorized(&token));

    let response = match load_dashboard(source, config.fetch_concurrency).await {
        Ok(dashboard) => {
            tracing::info!(
                "Dashboard for {}: {} exams, {} results",
                claims.sub,
                dashboard.recent_exams.len(),
                dashboard.recent_results.len()
            );
            DashboardResponse::new(greeting_name, dashboard, None)
        }
        Err(e) => {
            tracing::error!("Error loading dashboard data for {}: {}", claims.sub, e);
            DashboardResponse::new(greeting_name, Dashboard::default(), Some(e.to_string()))
        }
    };

    Json(response)
}

/// Display name, then username, then a generic title.
fn greeting_name(claims: &Claims) -> String {
    [claims.name.as_deref(), claims.username.as_deref()]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(DEFAULT_GREETING_NAME)
        .to_string()
}
