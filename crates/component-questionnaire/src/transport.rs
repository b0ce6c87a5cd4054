use std::env;

use async_trait::async_trait;
use questionnaire_spec::Answer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Endpoint used when neither a flag nor the environment names one.
pub const DEFAULT_ENDPOINT: &str =
    "https://0867d4da-e4fe-4a25-99a9-f48d0a1e5b97.mock.pstmn.io/accept";
/// Environment variable overriding the submit endpoint.
pub const ENDPOINT_ENV: &str = "QUESTIONNAIRE_ENDPOINT";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Body posted to the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub answers: Vec<Option<Answer>>,
}

/// Status and raw body of whatever the endpoint replied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Delivers answers to the remote endpoint. One call per submission attempt.
#[async_trait]
pub trait AnswerTransport: Send + Sync {
    async fn post_answers(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<TransportResponse, TransportError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitConfig {
    pub endpoint: String,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl SubmitConfig {
    /// Explicit value first, then `QUESTIONNAIRE_ENDPOINT`, then the default.
    pub fn resolve(endpoint: Option<String>) -> Self {
        let endpoint = endpoint
            .and_then(non_blank)
            .or_else(|| env::var(ENDPOINT_ENV).ok().and_then(non_blank))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Self { endpoint }
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// JSON-over-HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpTransport {
    pub fn new(config: &SubmitConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("questionnaire/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(config, client)
    }

    pub fn with_client(
        config: &SubmitConfig,
        client: reqwest::Client,
    ) -> Result<Self, TransportError> {
        let endpoint = match reqwest::Url::parse(&config.endpoint) {
            Ok(endpoint) => endpoint,
            Err(err) => {
                return Err(TransportError::InvalidEndpoint {
                    endpoint: config.endpoint.clone(),
                    reason: err.to_string(),
                });
            }
        };
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[async_trait]
impl AnswerTransport for HttpTransport {
    async fn post_answers(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<TransportResponse, TransportError> {
        log::debug!(
            "posting {} answers to {}",
            payload.answers.len(),
            self.endpoint
        );
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        log::debug!("submit response status: {}", status);
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}
