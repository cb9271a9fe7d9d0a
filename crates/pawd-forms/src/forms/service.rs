use std::sync::Arc;

use chrono::{Local, Utc};
use tracing::{error, info, warn};

use super::client::{Endpoints, SubmissionClient, SubmissionError};
use super::domain::{Destination, Form, SubmissionContext};
use super::state::{FormState, FormStateError, SubmitStatus};
use super::validation::{FormRules, Validate};

/// Source of "now" and "today" for a submission attempt.
pub trait Clock: Send + Sync {
    fn context(&self) -> SubmissionContext;
}

/// Wall clock. "Today" is the local calendar date of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn context(&self) -> SubmissionContext {
        SubmissionContext {
            submitted_at: Utc::now(),
            today: Local::now().date_naive(),
        }
    }
}

/// Pinned clock for tests and offline checks.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub SubmissionContext);

impl Clock for FixedClock {
    fn context(&self) -> SubmissionContext {
        self.0
    }
}

/// Service composing the validator rules, a clock, and the webhook client.
pub struct FormsService<C> {
    rules: Arc<FormRules>,
    client: Arc<C>,
    endpoints: Endpoints,
    clock: Arc<dyn Clock>,
}

impl<C> FormsService<C>
where
    C: SubmissionClient + 'static,
{
    pub fn new(rules: FormRules, client: Arc<C>, endpoints: Endpoints) -> Self {
        Self {
            rules: Arc::new(rules),
            client,
            endpoints,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn rules(&self) -> &FormRules {
        &self.rules
    }

    /// Validate, deliver once, and record the outcome on `state`.
    ///
    /// Validation failures never reach the client. Delivery failures leave the state in
    /// `error` and are returned so callers can pick a response.
    pub async fn submit<F: Form>(
        &self,
        state: &mut FormState<F>,
    ) -> Result<SubmitStatus, FormsServiceError> {
        let context = self.clock.context();
        let payload = state.begin_submit(&self.rules, &context)?;

        let outcome = self.deliver::<F>(&payload).await;
        let status = state.finish(&outcome)?;
        outcome?;
        Ok(status)
    }

    async fn deliver<F: Form>(
        &self,
        payload: &<F as Validate>::Payload,
    ) -> Result<(), SubmissionError> {
        let destination = F::DESTINATION;
        let result = self.post_row(destination, payload).await;

        match &result {
            Ok(()) => info!(%destination, "form submission delivered"),
            Err(SubmissionError::Rejected { status }) => {
                warn!(%destination, status, "webhook rejected form submission")
            }
            Err(err) => error!(%destination, error = %err, "form submission failed"),
        }

        result
    }

    async fn post_row<P: serde::Serialize + Sync>(
        &self,
        destination: Destination,
        payload: &P,
    ) -> Result<(), SubmissionError> {
        let endpoint = self.endpoints.resolve(destination)?;
        let body = serde_json::to_value([payload])?;
        self.client.deliver(endpoint, &body).await
    }
}

/// Error raised by the forms service.
#[derive(Debug, thiserror::Error)]
pub enum FormsServiceError {
    #[error(transparent)]
    State(#[from] FormStateError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
