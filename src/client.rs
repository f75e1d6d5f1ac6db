// src/client.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    error::ClientError,
    models::{attempt::Attempt, exam::Exam},
};

/// Read access to the exam API, as needed by the dashboard.
#[async_trait]
pub trait ExamSource: Send + Sync {
    /// `GET /exams`: every exam visible to the caller.
    async fn list_exams(&self) -> Result<Vec<Exam>, ClientError>;

    /// `GET /attempts/exam/{exam_id}`: every attempt recorded for one exam.
    async fn list_attempts(&self, exam_id: &str) -> Result<Vec<Attempt>, ClientError>;
}

/// Shared HTTP client for the upstream exam API.
///
/// Holds the connection pool and the request timeout. Call [`ExamApiClient::authorized`]
/// to obtain a per-caller [`ExamSource`].
#[derive(Debug, Clone)]
pub struct ExamApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ExamApiClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ClientError> {
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Transport(format!(
                "API base URL {} cannot carry a path",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    /// Binds the client to a caller's bearer token.
    pub fn authorized(&self, token: &str) -> AuthorizedExamClient {
        AuthorizedExamClient {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: token.to_string(),
        }
    }
}

/// [`ExamSource`] that forwards one caller's token on every request.
#[derive(Debug, Clone)]
pub struct AuthorizedExamClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl AuthorizedExamClient {
    fn endpoint(&self, segments: &[&str]) -> Url {
        endpoint(&self.base_url, segments)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Auth(format!("{} returned {}", url, status)));
        }
        if !status.is_success() {
            return Err(ClientError::Transport(format!("{} returned {}", url, status)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl ExamSource for AuthorizedExamClient {
    async fn list_exams(&self) -> Result<Vec<Exam>, ClientError> {
        self.get_json(self.endpoint(&["exams"])).await
    }

    async fn list_attempts(&self, exam_id: &str) -> Result<Vec<Attempt>, ClientError> {
        self.get_json(self.endpoint(&["attempts", "exam", exam_id]))
            .await
    }
}

/// Appends path segments to `base`, percent-encoding each one.
fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
