use std::fmt;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

use super::domain::Destination;

/// Webhook URLs per destination. The signup URL is a secret and never printed.
#[derive(Clone)]
pub struct Endpoints {
    pub attendance: Url,
    pub signup: Option<Url>,
}

impl Endpoints {
    pub fn resolve(&self, destination: Destination) -> Result<&Url, SubmissionError> {
        match destination {
            Destination::Attendance => Ok(&self.attendance),
            Destination::Signup => self
                .signup
                .as_ref()
                .ok_or(SubmissionError::NotConfigured(destination)),
        }
    }
}

impl fmt::Debug for Endpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoints")
            .field("attendance", &self.attendance.as_str())
            .field("signup", &self.signup.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Delivery failure. Every variant is shown to the visitor as the same generic banner.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("webhook responded with status {status}")]
    Rejected { status: u16 },
    /// The message never carries the request URL.
    #[error("webhook unreachable: {0}")]
    Transport(String),
    #[error("no webhook configured for {0} submissions")]
    NotConfigured(Destination),
    #[error("payload could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SubmissionError {
    /// Message returned to the browser, matching the relay route's historic responses.
    pub fn public_message(&self) -> &'static str {
        match self {
            SubmissionError::Rejected { .. } => "Failed to submit",
            SubmissionError::Transport(_)
            | SubmissionError::NotConfigured(_)
            | SubmissionError::Encode(_) => "Server error",
        }
    }
}

/// Outbound hook so the service can be exercised without a network.
#[async_trait]
pub trait SubmissionClient: Send + Sync {
    /// Issue exactly one POST of `body` to `endpoint`.
    async fn deliver(&self, endpoint: &Url, body: &Value) -> Result<(), SubmissionError>;
}

/// reqwest-backed client posting JSON to spreadsheet webhooks.
#[derive(Debug, Clone, Default)]
pub struct WebhookClient {
    http: reqwest::Client,
}

impl WebhookClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionClient for WebhookClient {
    async fn deliver(&self, endpoint: &Url, body: &Value) -> Result<(), SubmissionError> {
        let response = self
            .http
            .post(endpoint.clone())
            .json(body)
            .send()
            .await
            .map_err(|err| SubmissionError::Transport(err.without_url().to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SubmissionError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}
