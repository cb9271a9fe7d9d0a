use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{NaiveDate, TimeZone, Utc};
use reqwest::Url;
use serde_json::Value;

use crate::forms::client::{Endpoints, SubmissionClient, SubmissionError};
use crate::forms::domain::{AttendanceForm, SignupForm, SubmissionContext};
use crate::forms::service::{FixedClock, FormsService};
use crate::forms::validation::FormRules;

pub(crate) const DOMAIN: &str = "example.org";

pub(crate) fn rules() -> FormRules {
    FormRules::for_domain(DOMAIN).expect("domain compiles")
}

pub(crate) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date")
}

pub(crate) fn context() -> SubmissionContext {
    SubmissionContext {
        submitted_at: Utc.with_ymd_and_hms(2024, 1, 10, 18, 30, 0).unwrap(),
        today: today(),
    }
}

pub(crate) fn valid_attendance() -> AttendanceForm {
    AttendanceForm {
        date: "2024-01-10".to_string(),
        name: "Jane Doe".to_string(),
        grade: "9th - Freshman".to_string(),
        email: "s1234567@online.example.org".to_string(),
    }
}

pub(crate) fn valid_signup() -> SignupForm {
    SignupForm {
        name: "Jane Doe".to_string(),
        grade: "11th - Junior".to_string(),
        email: "s7654321@online.example.org".to_string(),
        q1: "Building things that work.".to_string(),
        q2: "Web apps and a little Rust.".to_string(),
        q3: "Learn with friends.".to_string(),
        honor_code: true,
    }
}

pub(crate) fn endpoints() -> Endpoints {
    Endpoints {
        attendance: Url::parse("https://sheets.example.org/attendance").expect("valid url"),
        signup: Some(Url::parse("https://hooks.example.org/signup").expect("valid url")),
    }
}

pub(crate) fn build_service<C>(client: Arc<C>) -> FormsService<C>
where
    C: SubmissionClient + 'static,
{
    FormsService::new(rules(), client, endpoints()).with_clock(Arc::new(FixedClock(context())))
}

/// Records every delivery and answers with a canned outcome.
#[derive(Default, Clone)]
pub(crate) struct RecordingClient {
    deliveries: Arc<Mutex<Vec<(Url, Value)>>>,
    reject_with: Option<u16>,
}

impl RecordingClient {
    pub(crate) fn rejecting(status: u16) -> Self {
        Self {
            reject_with: Some(status),
            ..Self::default()
        }
    }

    pub(crate) fn deliveries(&self) -> Vec<(Url, Value)> {
        self.deliveries
            .lock()
            .expect("client mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl SubmissionClient for RecordingClient {
    async fn deliver(&self, endpoint: &Url, body: &Value) -> Result<(), SubmissionError> {
        self.deliveries
            .lock()
            .expect("client mutex poisoned")
            .push((endpoint.clone(), body.clone()));
        match self.reject_with {
            Some(status) => Err(SubmissionError::Rejected { status }),
            None => Ok(()),
        }
    }
}

pub(crate) struct OfflineClient;

#[async_trait]
impl SubmissionClient for OfflineClient {
    async fn deliver(&self, _endpoint: &Url, _body: &Value) -> Result<(), SubmissionError> {
        Err(SubmissionError::Transport("connection refused".to_string()))
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
