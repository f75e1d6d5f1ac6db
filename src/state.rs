use crate::{client::ExamApiClient, config::Config, error::ClientError};
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub exam_api: ExamApiClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let exam_api = ExamApiClient::new(config.api_base_url.clone(), config.fetch_timeout)?;
        Ok(Self { config, exam_api })
    }
}

impl FromRef<AppState> for ExamApiClient {
    fn from_ref(state: &AppState) -> Self {
        state.exam_api.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
